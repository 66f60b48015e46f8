use super::*;
use crate::foundation::core::Rgba8;

fn label(text: &str) -> TextLabel {
    TextLabel {
        text: text.to_owned(),
        x: 10.0,
        y: 20.0,
        size_px: 13.9,
        color: Rgba8::rgb(0, 0, 0),
        anchor: TextAnchor::Middle,
        rotate_deg: 0.0,
    }
}

#[test]
fn overlay_escapes_markup() {
    let svg = TextRasterizer::overlay_svg(&[label("a < b & \"c\"")], 100, 50);
    assert!(svg.contains("a &lt; b &amp; &quot;c&quot;"));
    assert!(svg.contains(r#"text-anchor="middle""#));
    assert!(svg.contains(r##"fill="#000000""##));
    assert!(svg.starts_with("<svg"));
    assert!(svg.ends_with("</svg>"));
}

#[test]
fn overlay_rotates_around_anchor() {
    let mut l = label("Value");
    l.rotate_deg = -90.0;
    let svg = TextRasterizer::overlay_svg(&[l], 100, 50);
    assert!(svg.contains(r#"transform="rotate(-90.000 10.000 20.000)""#));
}

#[test]
fn blank_labels_are_dropped() {
    let svg = TextRasterizer::overlay_svg(&[label("   ")], 100, 50);
    assert!(!svg.contains("<text"));
}

#[test]
fn overlay_parses_and_rasterizes_to_canvas_size() {
    let text = TextRasterizer::new();
    let out = text.rasterize(&[label("Title")], 64, 32).unwrap();
    if let Some(bytes) = out {
        assert_eq!(bytes.len(), 64 * 32 * 4);
    } else {
        assert_eq!(text.face_count(), 0);
    }
}

#[test]
fn nothing_to_draw_is_none() {
    let text = TextRasterizer::new();
    assert!(text.rasterize(&[], 64, 32).unwrap().is_none());
}
