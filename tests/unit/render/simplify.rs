use super::*;

#[test]
fn collinear_points_collapse() {
    let pts: Vec<Point> = (0..10).map(|i| Point::new(i as f64, 2.0 * i as f64)).collect();
    let out = simplify_polyline(&pts, 0.1);
    assert_eq!(out, vec![pts[0], pts[9]]);
}

#[test]
fn corners_survive() {
    let pts = vec![
        Point::new(0.0, 0.0),
        Point::new(5.0, 0.0),
        Point::new(5.0, 5.0),
        Point::new(10.0, 5.0),
    ];
    assert_eq!(simplify_polyline(&pts, 0.5), pts);
}

#[test]
fn larger_tolerance_drops_more() {
    let pts: Vec<Point> = (0..200)
        .map(|i| {
            let x = i as f64;
            Point::new(x, (x * 0.1).sin() * 20.0)
        })
        .collect();
    let fine = simplify_polyline(&pts, 1.0 / 9.0);
    let coarse = simplify_polyline(&pts, 1.0);
    assert!(coarse.len() <= fine.len());
    assert!(fine.len() < pts.len());
    assert_eq!(coarse.first(), pts.first());
    assert_eq!(coarse.last(), pts.last());
}

#[test]
fn zero_tolerance_is_identity() {
    let pts = vec![Point::new(0.0, 0.0), Point::new(1.0, 0.0), Point::new(2.0, 0.0)];
    assert_eq!(simplify_polyline(&pts, 0.0), pts);
}
