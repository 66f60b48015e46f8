use super::*;

#[test]
fn resample_preserves_bounds_and_density() {
    let pts = [(0.0, 0.0), (1.0, 10.0), (2.0, 0.0)];
    let out = resample_linear(&pts, WAVE_SAMPLES);
    assert_eq!(out.len(), WAVE_SAMPLES);
    assert_eq!(out[0], (0.0, 0.0));
    assert_eq!(out[WAVE_SAMPLES - 1], (2.0, 0.0));
    assert!(out.windows(2).all(|w| w[0].0 <= w[1].0));
}

#[test]
fn resample_interpolates_linearly() {
    let pts = [(0.0, 0.0), (4.0, 8.0)];
    let out = resample_linear(&pts, 5);
    let ys: Vec<f64> = out.iter().map(|p| p.1).collect();
    assert_eq!(ys, vec![0.0, 2.0, 4.0, 6.0, 8.0]);
}

#[test]
fn resample_sorts_unordered_input() {
    let pts = [(2.0, 4.0), (0.0, 0.0), (1.0, 2.0)];
    let out = resample_linear(&pts, 3);
    assert_eq!(out, vec![(0.0, 0.0), (1.0, 2.0), (2.0, 4.0)]);
}

#[test]
fn resample_single_point_series() {
    let out = resample_linear(&[(3.0, 7.0)], 4);
    assert_eq!(out.len(), 4);
    assert!(out.iter().all(|p| *p == (3.0, 7.0)));
}

#[test]
fn resample_gate() {
    assert!(needs_resample(true, true, 99));
    assert!(!needs_resample(true, true, 100));
    assert!(!needs_resample(true, false, 10));
    assert!(!needs_resample(false, true, 10));
}
