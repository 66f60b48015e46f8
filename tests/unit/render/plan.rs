use super::*;
use crate::foundation::error::BridgeError;

fn opts() -> RenderOpts {
    RenderOpts::default()
}

fn req(raw: &str) -> ChartRequest {
    ChartRequest::parse(raw).unwrap()
}

#[test]
fn mismatched_series_is_skipped_and_sibling_drawn() {
    let r = req(
        r#"{"chart_type":"line","series":[{"name":"A","x_values":[0,1,2],"y_values":[0,1,4]},{"name":"B","x_values":[0,1],"y_values":[5]}]}"#,
    );
    let plan = compile_chart(&r, &opts()).unwrap();
    let c = &plan.content;
    assert_eq!(c.series.len(), 1);
    assert_eq!(c.series[0].name, "A");
    assert_eq!(c.series[0].drawn_points, 3);
    assert_eq!(c.skipped.len(), 1);
    assert_eq!(c.skipped[0].name, "B");
    assert_eq!(c.skipped[0].reason, SkipReason::LengthMismatch);
    assert_eq!(c.legend, Some(vec!["A".to_owned()]));

    let alone = req(r#"{"chart_type":"line","series":[{"name":"A","x_values":[0,1,2],"y_values":[0,1,4]}]}"#);
    let solo = compile_chart(&alone, &opts()).unwrap().content;
    assert_eq!(solo.series, c.series);
    assert_eq!(solo.x_range, c.x_range);
    assert_eq!(solo.y_range, c.y_range);
    assert_eq!(solo.legend, None);
}

#[test]
fn bounds_apply_only_in_pairs() {
    let data = r#""series":[{"x_values":[0,10],"y_values":[0,10]}]"#;
    let lone = compile_chart(&req(&format!(r#"{{"x_min":3,{data}}}"#)), &opts())
        .unwrap()
        .content;
    assert!(!lone.x_bounds_applied);
    assert_eq!(lone.x_range, auto_range(Some((0.0, 10.0))));

    let pair = compile_chart(&req(&format!(r#"{{"x_min":3,"x_max":7,{data}}}"#)), &opts())
        .unwrap()
        .content;
    assert!(pair.x_bounds_applied);
    assert_eq!(pair.x_range, (3.0, 7.0));
    assert!(!pair.y_bounds_applied);

    let inverted = compile_chart(&req(&format!(r#"{{"y_min":10,"y_max":0,{data}}}"#)), &opts())
        .unwrap()
        .content;
    assert_eq!(inverted.y_range, (10.0, 0.0));
}

#[test]
fn empty_request_renders_unit_axes() {
    let plan = compile_chart(&ChartRequest::default(), &opts()).unwrap();
    assert_eq!(plan.content.x_range, (0.0, 1.0));
    assert_eq!(plan.content.y_range, (0.0, 1.0));
    assert!(plan.content.series.is_empty());
    assert!(plan.content.legend.is_none());
    assert!(plan.content.grid);
    assert!(!plan.ops.is_empty());
}

#[test]
fn wave_series_is_resampled_only_when_interpolating() {
    let body = r#""series":[{"x_values":[0,1,2,3],"y_values":[0,1,0,-1],"is_wave":true}]"#;
    let on = compile_chart(&req(&format!(r#"{{"interpolate":true,{body}}}"#)), &opts())
        .unwrap()
        .content;
    assert!(on.series[0].resampled);
    assert_eq!(on.series[0].source_points, 4);
    assert_eq!(on.series[0].drawn_points, WAVE_SAMPLES);

    let off = compile_chart(&req(&format!("{{{body}}}")), &opts()).unwrap().content;
    assert!(!off.series[0].resampled);
    assert_eq!(off.series[0].drawn_points, 4);
    assert_eq!(on.x_range, off.x_range);
}

#[test]
fn fast_mode_and_size_do_not_change_content() {
    let r = req(
        r#"{"title":"T","series":[{"name":"A","x_values":[0,1,2,3],"y_values":[3,1,4,1]},{"name":"B","x_values":[0,1],"y_values":[1,2],"marker":"o"}]}"#,
    );
    let slow = compile_chart(&r, &opts()).unwrap();
    let fast = compile_chart(
        &r,
        &RenderOpts {
            width: 320,
            height: 200,
            dpi: 50,
            fast: true,
        },
    )
    .unwrap();
    assert_eq!(slow.content, fast.content);
    assert_eq!(compile_chart(&r, &opts()).unwrap().content, slow.content);
}

#[test]
fn bar_and_area_ranges_include_zero() {
    let bar = compile_chart(
        &req(r#"{"chart_type":"bar","series":[{"x_values":[1,2],"y_values":[5,6]}]}"#),
        &opts(),
    )
    .unwrap()
    .content;
    assert!(bar.y_range.0 < 0.0);
    assert!(bar.x_range.0 < 1.0 - BAR_WIDTH / 2.0);
    assert!(bar.x_range.1 > 2.0 + BAR_WIDTH / 2.0);

    let area = compile_chart(
        &req(r#"{"chart_type":"area","series":[{"x_values":[1,2],"y_values":[-5,-6]}]}"#),
        &opts(),
    )
    .unwrap()
    .content;
    assert!(area.y_range.1 > 0.0);
}

#[test]
fn hidden_and_empty_series_are_reported() {
    let c = compile_chart(
        &req(
            r#"{"series":[{"name":"H","visible":false,"x_values":[1],"y_values":[1]},{"x_values":[],"y_values":[1]}]}"#,
        ),
        &opts(),
    )
    .unwrap()
    .content;
    assert!(c.series.is_empty());
    let reasons: Vec<_> = c.skipped.iter().map(|s| s.reason).collect();
    assert_eq!(reasons, [SkipReason::Hidden, SkipReason::Empty]);
    assert_eq!(c.skipped[1].name, "Series 2");
    assert!(c.legend.is_none());
}

#[test]
fn bad_color_is_render_error() {
    let err = compile_chart(
        &req(r#"{"series":[{"x_values":[1],"y_values":[1],"color":"nope"}]}"#),
        &opts(),
    )
    .unwrap_err();
    assert!(matches!(err, BridgeError::Render(_)));
}

#[test]
fn palette_and_explicit_colors() {
    let c = compile_chart(
        &req(r#"{"series":[{"x_values":[1],"y_values":[1]},{"x_values":[1],"y_values":[1],"color":"'#123456'"}]}"#),
        &opts(),
    )
    .unwrap()
    .content;
    assert_eq!(c.series[0].color, "#1f77b4");
    assert_eq!(c.series[1].color, "#123456");
}

#[test]
fn grid_flag_controls_grid_stroke() {
    let count_grid = |raw: &str| {
        compile_chart(&req(raw), &opts())
            .unwrap()
            .ops
            .iter()
            .filter(|op| matches!(op, DrawOp::Stroke { color, .. } if color.r == 0xb0))
            .count()
    };
    assert_eq!(count_grid(r#"{"grid":true}"#), 1);
    assert_eq!(count_grid(r#"{"grid":false}"#), 0);
}

#[test]
fn labels_carry_title_and_axis_text() {
    let plan = compile_chart(&req(r#"{"title":"Load","x_label":"t","y_label":"v"}"#), &opts()).unwrap();
    let texts: Vec<_> = plan.labels.iter().map(|l| l.text.as_str()).collect();
    assert!(texts.contains(&"Load"));
    assert!(texts.contains(&"t"));
    assert!(texts.contains(&"v"));
    let y_label = plan.labels.iter().find(|l| l.text == "v").unwrap();
    assert_eq!(y_label.rotate_deg, -90.0);
}

#[test]
fn mid_steps_change_halfway() {
    let s = mid_steps(&[(0.0, 1.0), (2.0, 3.0), (4.0, 5.0)]);
    assert_eq!(
        s,
        vec![
            (0.0, 1.0),
            (1.0, 1.0),
            (1.0, 3.0),
            (3.0, 3.0),
            (3.0, 5.0),
            (4.0, 5.0)
        ]
    );
    assert_eq!(mid_steps(&[(1.0, 1.0)]), vec![(1.0, 1.0)]);
    assert!(mid_steps(&[]).is_empty());
}

#[test]
fn scatter_area_matches_line_width() {
    let r = scatter_radius_px(2.0, 1.0);
    let area = std::f64::consts::PI * r * r;
    assert!((area - 50.0).abs() < 1e-9);
}

#[test]
fn invalid_opts_are_rejected() {
    let bad = RenderOpts {
        width: 0,
        ..RenderOpts::default()
    };
    assert!(compile_chart(&ChartRequest::default(), &bad).is_err());
    let huge = RenderOpts {
        width: 70_000,
        ..RenderOpts::default()
    };
    assert!(compile_chart(&ChartRequest::default(), &huge).is_err());
}

fn op_points_finite(op: &DrawOp) -> bool {
    let path = match op {
        DrawOp::FillRect { rect, .. } => {
            return [rect.x0, rect.y0, rect.x1, rect.y1]
                .iter()
                .all(|v| v.is_finite());
        }
        DrawOp::Fill { path, .. } | DrawOp::Stroke { path, .. } => path,
    };
    path.elements().iter().all(|el| {
        let pts: &[Point] = match el {
            kurbo::PathEl::MoveTo(p) | kurbo::PathEl::LineTo(p) => std::slice::from_ref(p),
            kurbo::PathEl::QuadTo(a, b) => return [a, b].iter().all(|p| p.is_finite()),
            kurbo::PathEl::CurveTo(a, b, c) => return [a, b, c].iter().all(|p| p.is_finite()),
            kurbo::PathEl::ClosePath => &[],
        };
        pts.iter().all(|p| p.is_finite())
    })
}

#[test]
fn near_max_data_keeps_axes_and_geometry_finite() {
    let r = req(r#"{"series":[{"x_values":[-1e308,1e308],"y_values":[0,1]}]}"#);
    let plan = compile_chart(&r, &opts()).unwrap();
    let c = &plan.content;
    assert_eq!(c.series.len(), 1);
    assert!(c.x_range.0.is_finite() && c.x_range.1.is_finite());
    assert!(c.x_range.0 < c.x_range.1);
    assert!(c.x_ticks.len() >= 3);
    assert!(c.x_ticks.iter().all(|t| t.is_finite()));
    assert!(plan.ops.iter().all(op_points_finite));
    assert!(plan.labels.iter().all(|l| l.x.is_finite() && l.y.is_finite()));

    let bounded = req(
        r#"{"x_min":-1.7e308,"x_max":1.7e308,"series":[{"x_values":[0,1],"y_values":[0,1]}]}"#,
    );
    let plan = compile_chart(&bounded, &opts()).unwrap();
    assert!(plan.ops.iter().all(op_points_finite));
}
