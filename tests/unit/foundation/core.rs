use super::*;

#[test]
fn premul_scales_channels_by_alpha() {
    assert_eq!(Rgba8::rgba(255, 0, 0, 128).to_premul(), [128, 0, 0, 128]);
    assert_eq!(Rgba8::rgb(10, 20, 30).to_premul(), [10, 20, 30, 255]);
    assert_eq!(Rgba8::transparent().to_premul(), [0, 0, 0, 0]);
}

#[test]
fn alpha_mul_is_clamped() {
    assert_eq!(Rgba8::rgb(1, 2, 3).with_alpha_mul(0.7).a, 179);
    assert_eq!(Rgba8::rgb(1, 2, 3).with_alpha_mul(2.0).a, 255);
    assert_eq!(Rgba8::rgb(1, 2, 3).with_alpha_mul(-1.0).a, 0);
}

#[test]
fn hex_formatting() {
    assert_eq!(Rgba8::rgb(31, 119, 180).to_hex(), "#1f77b4");
    assert_eq!(Rgba8::rgba(255, 0, 0, 128).to_hex(), "#ff000080");
}
