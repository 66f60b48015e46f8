use super::*;

#[test]
fn chart_type_names_and_fallback() {
    assert_eq!(ChartType::from("scatter".to_owned()), ChartType::Scatter);
    assert_eq!(ChartType::from(" Bar ".to_owned()), ChartType::Bar);
    assert_eq!(ChartType::from("pie".to_owned()), ChartType::Line);
    assert_eq!(ChartType::from_name("pie"), None);
    for t in ChartType::ALL {
        assert_eq!(ChartType::from(String::from(t)), t);
    }
}

#[test]
fn host_indices_match_combo_order() {
    let names: Vec<_> = (0..6).map(|i| ChartType::from_index(i).as_str()).collect();
    assert_eq!(names, ["line", "scatter", "bar", "area", "step", "sine"]);
    assert_eq!(ChartType::from_index(42), ChartType::Line);

    assert_eq!(LineStyle::from_index(0).as_str(), "-");
    assert_eq!(LineStyle::from_index(1).as_str(), "--");
    assert_eq!(LineStyle::from_index(2).as_str(), ":");
    assert_eq!(LineStyle::from_index(3).as_str(), "-.");
    assert_eq!(LineStyle::from_index(9), LineStyle::Solid);

    assert_eq!(Marker::from_index(0).code(), None);
    assert_eq!(Marker::from_index(1).code(), Some("o"));
    assert_eq!(Marker::from_index(2).code(), Some("s"));
    assert_eq!(Marker::from_index(3).code(), Some("^"));
    assert_eq!(Marker::from_index(4).code(), Some("*"));
}

#[test]
fn line_style_accepts_long_names() {
    assert_eq!(LineStyle::from("dashed".to_owned()), LineStyle::Dashed);
    assert_eq!(LineStyle::from("dotted".to_owned()), LineStyle::Dotted);
    assert_eq!(LineStyle::from("dashdot".to_owned()), LineStyle::DashDot);
    assert_eq!(LineStyle::from("wiggly".to_owned()), LineStyle::Solid);
    assert!(LineStyle::Solid.dash_pattern(2.0).is_none());
    assert_eq!(LineStyle::Dotted.dash_pattern(2.0).unwrap().len(), 2);
}

#[test]
fn marker_wire_forms() {
    let m: Marker = serde_json::from_str("null").unwrap();
    assert_eq!(m, Marker::None);
    let m: Marker = serde_json::from_str("\"None\"").unwrap();
    assert_eq!(m, Marker::None);
    let m: Marker = serde_json::from_str("\"^\"").unwrap();
    assert_eq!(m, Marker::Triangle);
    assert_eq!(serde_json::to_string(&Marker::Star).unwrap(), "\"*\"");
    assert_eq!(serde_json::to_string(&Marker::None).unwrap(), "null");
    assert!(Marker::Plus.is_stroked());
    assert!(!Marker::Circle.is_stroked());
}

#[test]
fn chart_type_rejects_non_string() {
    assert!(serde_json::from_str::<ChartType>("3").is_err());
    assert!(serde_json::from_str::<ChartType>("null").is_err());
}
