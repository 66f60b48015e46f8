use super::*;

#[test]
fn empty_object_is_a_valid_request() {
    let req = ChartRequest::parse("{}").unwrap();
    assert_eq!(req, ChartRequest::default());
    assert_eq!(req.x_label, "Time");
    assert_eq!(req.y_label, "Value");
    assert!(req.grid);
    assert!(!req.interpolate);
    assert!(req.series.is_empty());
}

#[test]
fn series_defaults_are_filled_in() {
    let req = ChartRequest::parse(r#"{"series":[{"x_values":[0,1],"y_values":[2,3]}]}"#).unwrap();
    let s = &req.series[0];
    assert_eq!(s.label(0), "Series 1");
    assert!(s.visible);
    assert_eq!(s.line_width, 2.0);
    assert_eq!(s.line_style, LineStyle::Solid);
    assert_eq!(s.marker, Marker::None);
    assert!(s.color.is_none());
}

#[test]
fn malformed_input_is_protocol_error() {
    for raw in [
        "not json",
        "[1, 2]",
        "42",
        r#"{"series": 3}"#,
        r#"{"series": [1]}"#,
        r#"{"series": [{"x_values": ["1"], "y_values": [1]}]}"#,
        r#"{"series": [{"x_values": [null], "y_values": [1]}]}"#,
        r#"{"chart_type": 3}"#,
        r#"{"grid": "yes"}"#,
        r#"{"x_min": "0", "x_max": 1}"#,
        r#"{"series": [{"line_width": 0}]}"#,
        r#"{"series": [{"line_width": -1.5}]}"#,
        r#"{"x_min": 2, "x_max": 2}"#,
    ] {
        let err = ChartRequest::parse(raw).unwrap_err();
        assert!(
            matches!(err, BridgeError::Protocol(_)),
            "expected protocol error for {raw}, got {err:?}"
        );
    }
}

#[test]
fn unknown_chart_type_falls_back_to_line() {
    let req = ChartRequest::parse(r#"{"chart_type": "pie"}"#).unwrap();
    assert_eq!(req.chart_type, ChartType::Line);
}

#[test]
fn bounds_apply_only_as_complete_pairs() {
    let req = ChartRequest::parse(r#"{"x_min": 1}"#).unwrap();
    assert_eq!(req.x_range(), None);

    let req = ChartRequest::parse(r#"{"x_min": 1, "x_max": 5, "y_max": 3}"#).unwrap();
    assert_eq!(req.x_range(), Some((1.0, 5.0)));
    assert_eq!(req.y_range(), None);

    let req = ChartRequest::parse(r#"{"y_min": 5, "y_max": -5}"#).unwrap();
    assert_eq!(req.y_range(), Some((5.0, -5.0)));
}

#[test]
fn color_quotes_are_stripped() {
    let req =
        ChartRequest::parse(r#"{"series":[{"color":"'#ff0000'"},{"color":"\"red\""}]}"#).unwrap();
    assert_eq!(req.series[0].color_str(), Some("#ff0000"));
    assert_eq!(req.series[1].color_str(), Some("red"));
}

#[test]
fn skip_reasons() {
    let mut s = SeriesSpec::new("A", vec![0.0, 1.0, 2.0], vec![0.0, 1.0, 4.0]);
    assert_eq!(s.skip_reason(), None);
    s.y_values.pop();
    assert_eq!(s.skip_reason(), Some(SkipReason::LengthMismatch));
    s.y_values.clear();
    assert_eq!(s.skip_reason(), Some(SkipReason::Empty));
    s.visible = false;
    assert_eq!(s.skip_reason(), Some(SkipReason::Hidden));
}

#[test]
fn legend_follows_request_series_count() {
    let req = ChartRequest::parse(
        r#"{"series":[{"name":"A","x_values":[0],"y_values":[1]},{"name":"B","x_values":[0,1],"y_values":[5]}]}"#,
    )
    .unwrap();
    assert!(req.wants_legend());
    assert!(!ChartRequest::default().wants_legend());
}

#[test]
fn json_round_trip_preserves_request() {
    let req = ChartRequest::parse(
        r#"{"title":"T","chart_type":"bar","x_min":0,"x_max":3,"series":[{"name":"A","x_values":[0,1],"y_values":[1,2],"color":"tab:red","marker":"o","line_style":"--"}]}"#,
    )
    .unwrap();
    let back = ChartRequest::parse(&req.to_json().unwrap()).unwrap();
    assert_eq!(back, req);
}

#[test]
fn from_path_maps_missing_file_to_io() {
    let dir = tempfile::tempdir().unwrap();
    let err = ChartRequest::from_path(&dir.path().join("missing.json")).unwrap_err();
    assert!(matches!(err, BridgeError::Io(_)));
}
