use crate::foundation::core::Rgba8;
use crate::foundation::error::{BridgeError, BridgeResult};

/// Tableau 10, the default series color cycle.
pub const TABLEAU: [Rgba8; 10] = [
    Rgba8::rgb(0x1f, 0x77, 0xb4),
    Rgba8::rgb(0xff, 0x7f, 0x0e),
    Rgba8::rgb(0x2c, 0xa0, 0x2c),
    Rgba8::rgb(0xd6, 0x27, 0x28),
    Rgba8::rgb(0x94, 0x67, 0xbd),
    Rgba8::rgb(0x8c, 0x56, 0x4b),
    Rgba8::rgb(0xe3, 0x77, 0xc2),
    Rgba8::rgb(0x7f, 0x7f, 0x7f),
    Rgba8::rgb(0xbc, 0xbd, 0x22),
    Rgba8::rgb(0x17, 0xbe, 0xcf),
];

const TABLEAU_NAMES: [&str; 10] = [
    "blue", "orange", "green", "red", "purple", "brown", "pink", "gray", "olive", "cyan",
];

/// The CSS4 named colors in alphabetical order.
const CSS4: [(&str, Rgba8); 148] = [
    ("aliceblue", Rgba8::rgb(240, 248, 255)),
    ("antiquewhite", Rgba8::rgb(250, 235, 215)),
    ("aqua", Rgba8::rgb(0, 255, 255)),
    ("aquamarine", Rgba8::rgb(127, 255, 212)),
    ("azure", Rgba8::rgb(240, 255, 255)),
    ("beige", Rgba8::rgb(245, 245, 220)),
    ("bisque", Rgba8::rgb(255, 228, 196)),
    ("black", Rgba8::rgb(0, 0, 0)),
    ("blanchedalmond", Rgba8::rgb(255, 235, 205)),
    ("blue", Rgba8::rgb(0, 0, 255)),
    ("blueviolet", Rgba8::rgb(138, 43, 226)),
    ("brown", Rgba8::rgb(165, 42, 42)),
    ("burlywood", Rgba8::rgb(222, 184, 135)),
    ("cadetblue", Rgba8::rgb(95, 158, 160)),
    ("chartreuse", Rgba8::rgb(127, 255, 0)),
    ("chocolate", Rgba8::rgb(210, 105, 30)),
    ("coral", Rgba8::rgb(255, 127, 80)),
    ("cornflowerblue", Rgba8::rgb(100, 149, 237)),
    ("cornsilk", Rgba8::rgb(255, 248, 220)),
    ("crimson", Rgba8::rgb(220, 20, 60)),
    ("cyan", Rgba8::rgb(0, 255, 255)),
    ("darkblue", Rgba8::rgb(0, 0, 139)),
    ("darkcyan", Rgba8::rgb(0, 139, 139)),
    ("darkgoldenrod", Rgba8::rgb(184, 134, 11)),
    ("darkgray", Rgba8::rgb(169, 169, 169)),
    ("darkgreen", Rgba8::rgb(0, 100, 0)),
    ("darkgrey", Rgba8::rgb(169, 169, 169)),
    ("darkkhaki", Rgba8::rgb(189, 183, 107)),
    ("darkmagenta", Rgba8::rgb(139, 0, 139)),
    ("darkolivegreen", Rgba8::rgb(85, 107, 47)),
    ("darkorange", Rgba8::rgb(255, 140, 0)),
    ("darkorchid", Rgba8::rgb(153, 50, 204)),
    ("darkred", Rgba8::rgb(139, 0, 0)),
    ("darksalmon", Rgba8::rgb(233, 150, 122)),
    ("darkseagreen", Rgba8::rgb(143, 188, 143)),
    ("darkslateblue", Rgba8::rgb(72, 61, 139)),
    ("darkslategray", Rgba8::rgb(47, 79, 79)),
    ("darkslategrey", Rgba8::rgb(47, 79, 79)),
    ("darkturquoise", Rgba8::rgb(0, 206, 209)),
    ("darkviolet", Rgba8::rgb(148, 0, 211)),
    ("deeppink", Rgba8::rgb(255, 20, 147)),
    ("deepskyblue", Rgba8::rgb(0, 191, 255)),
    ("dimgray", Rgba8::rgb(105, 105, 105)),
    ("dimgrey", Rgba8::rgb(105, 105, 105)),
    ("dodgerblue", Rgba8::rgb(30, 144, 255)),
    ("firebrick", Rgba8::rgb(178, 34, 34)),
    ("floralwhite", Rgba8::rgb(255, 250, 240)),
    ("forestgreen", Rgba8::rgb(34, 139, 34)),
    ("fuchsia", Rgba8::rgb(255, 0, 255)),
    ("gainsboro", Rgba8::rgb(220, 220, 220)),
    ("ghostwhite", Rgba8::rgb(248, 248, 255)),
    ("gold", Rgba8::rgb(255, 215, 0)),
    ("goldenrod", Rgba8::rgb(218, 165, 32)),
    ("gray", Rgba8::rgb(128, 128, 128)),
    ("green", Rgba8::rgb(0, 128, 0)),
    ("greenyellow", Rgba8::rgb(173, 255, 47)),
    ("grey", Rgba8::rgb(128, 128, 128)),
    ("honeydew", Rgba8::rgb(240, 255, 240)),
    ("hotpink", Rgba8::rgb(255, 105, 180)),
    ("indianred", Rgba8::rgb(205, 92, 92)),
    ("indigo", Rgba8::rgb(75, 0, 130)),
    ("ivory", Rgba8::rgb(255, 255, 240)),
    ("khaki", Rgba8::rgb(240, 230, 140)),
    ("lavender", Rgba8::rgb(230, 230, 250)),
    ("lavenderblush", Rgba8::rgb(255, 240, 245)),
    ("lawngreen", Rgba8::rgb(124, 252, 0)),
    ("lemonchiffon", Rgba8::rgb(255, 250, 205)),
    ("lightblue", Rgba8::rgb(173, 216, 230)),
    ("lightcoral", Rgba8::rgb(240, 128, 128)),
    ("lightcyan", Rgba8::rgb(224, 255, 255)),
    ("lightgoldenrodyellow", Rgba8::rgb(250, 250, 210)),
    ("lightgray", Rgba8::rgb(211, 211, 211)),
    ("lightgreen", Rgba8::rgb(144, 238, 144)),
    ("lightgrey", Rgba8::rgb(211, 211, 211)),
    ("lightpink", Rgba8::rgb(255, 182, 193)),
    ("lightsalmon", Rgba8::rgb(255, 160, 122)),
    ("lightseagreen", Rgba8::rgb(32, 178, 170)),
    ("lightskyblue", Rgba8::rgb(135, 206, 250)),
    ("lightslategray", Rgba8::rgb(119, 136, 153)),
    ("lightslategrey", Rgba8::rgb(119, 136, 153)),
    ("lightsteelblue", Rgba8::rgb(176, 196, 222)),
    ("lightyellow", Rgba8::rgb(255, 255, 224)),
    ("lime", Rgba8::rgb(0, 255, 0)),
    ("limegreen", Rgba8::rgb(50, 205, 50)),
    ("linen", Rgba8::rgb(250, 240, 230)),
    ("magenta", Rgba8::rgb(255, 0, 255)),
    ("maroon", Rgba8::rgb(128, 0, 0)),
    ("mediumaquamarine", Rgba8::rgb(102, 205, 170)),
    ("mediumblue", Rgba8::rgb(0, 0, 205)),
    ("mediumorchid", Rgba8::rgb(186, 85, 211)),
    ("mediumpurple", Rgba8::rgb(147, 112, 219)),
    ("mediumseagreen", Rgba8::rgb(60, 179, 113)),
    ("mediumslateblue", Rgba8::rgb(123, 104, 238)),
    ("mediumspringgreen", Rgba8::rgb(0, 250, 154)),
    ("mediumturquoise", Rgba8::rgb(72, 209, 204)),
    ("mediumvioletred", Rgba8::rgb(199, 21, 133)),
    ("midnightblue", Rgba8::rgb(25, 25, 112)),
    ("mintcream", Rgba8::rgb(245, 255, 250)),
    ("mistyrose", Rgba8::rgb(255, 228, 225)),
    ("moccasin", Rgba8::rgb(255, 228, 181)),
    ("navajowhite", Rgba8::rgb(255, 222, 173)),
    ("navy", Rgba8::rgb(0, 0, 128)),
    ("oldlace", Rgba8::rgb(253, 245, 230)),
    ("olive", Rgba8::rgb(128, 128, 0)),
    ("olivedrab", Rgba8::rgb(107, 142, 35)),
    ("orange", Rgba8::rgb(255, 165, 0)),
    ("orangered", Rgba8::rgb(255, 69, 0)),
    ("orchid", Rgba8::rgb(218, 112, 214)),
    ("palegoldenrod", Rgba8::rgb(238, 232, 170)),
    ("palegreen", Rgba8::rgb(152, 251, 152)),
    ("paleturquoise", Rgba8::rgb(175, 238, 238)),
    ("palevioletred", Rgba8::rgb(219, 112, 147)),
    ("papayawhip", Rgba8::rgb(255, 239, 213)),
    ("peachpuff", Rgba8::rgb(255, 218, 185)),
    ("peru", Rgba8::rgb(205, 133, 63)),
    ("pink", Rgba8::rgb(255, 192, 203)),
    ("plum", Rgba8::rgb(221, 160, 221)),
    ("powderblue", Rgba8::rgb(176, 224, 230)),
    ("purple", Rgba8::rgb(128, 0, 128)),
    ("rebeccapurple", Rgba8::rgb(102, 51, 153)),
    ("red", Rgba8::rgb(255, 0, 0)),
    ("rosybrown", Rgba8::rgb(188, 143, 143)),
    ("royalblue", Rgba8::rgb(65, 105, 225)),
    ("saddlebrown", Rgba8::rgb(139, 69, 19)),
    ("salmon", Rgba8::rgb(250, 128, 114)),
    ("sandybrown", Rgba8::rgb(244, 164, 96)),
    ("seagreen", Rgba8::rgb(46, 139, 87)),
    ("seashell", Rgba8::rgb(255, 245, 238)),
    ("sienna", Rgba8::rgb(160, 82, 45)),
    ("silver", Rgba8::rgb(192, 192, 192)),
    ("skyblue", Rgba8::rgb(135, 206, 235)),
    ("slateblue", Rgba8::rgb(106, 90, 205)),
    ("slategray", Rgba8::rgb(112, 128, 144)),
    ("slategrey", Rgba8::rgb(112, 128, 144)),
    ("snow", Rgba8::rgb(255, 250, 250)),
    ("springgreen", Rgba8::rgb(0, 255, 127)),
    ("steelblue", Rgba8::rgb(70, 130, 180)),
    ("tan", Rgba8::rgb(210, 180, 140)),
    ("teal", Rgba8::rgb(0, 128, 128)),
    ("thistle", Rgba8::rgb(216, 191, 216)),
    ("tomato", Rgba8::rgb(255, 99, 71)),
    ("turquoise", Rgba8::rgb(64, 224, 208)),
    ("violet", Rgba8::rgb(238, 130, 238)),
    ("wheat", Rgba8::rgb(245, 222, 179)),
    ("white", Rgba8::rgb(255, 255, 255)),
    ("whitesmoke", Rgba8::rgb(245, 245, 245)),
    ("yellow", Rgba8::rgb(255, 255, 0)),
    ("yellowgreen", Rgba8::rgb(154, 205, 50)),
];

/// Palette color for the series at `index`.
///
/// The cycle is [`TABLEAU`] followed by every [`CSS4`] color, so series past the tenth still get
/// distinct colors.
pub fn palette_color(index: usize) -> Rgba8 {
    let i = index % (TABLEAU.len() + CSS4.len());
    match TABLEAU.get(i) {
        Some(c) => *c,
        None => CSS4[i - TABLEAU.len()].1,
    }
}

/// Parse a series color string.
///
/// Accepts `#rgb`, `#rrggbb`, `#rrggbbaa`, `tab:<name>`, `C0`..`C9`, the single-letter
/// codes `bgrcmykw` and the CSS4 color names (case-insensitive).
pub fn parse_color(s: &str) -> BridgeResult<Rgba8> {
    let s = s.trim();
    if let Some(hex) = s.strip_prefix('#') {
        return parse_hex(hex).map_err(|e| BridgeError::render(format!("color \"{s}\": {e}")));
    }

    let lower = s.to_ascii_lowercase();
    if let Some(name) = lower.strip_prefix("tab:") {
        let name = if name == "grey" { "gray" } else { name };
        if let Some(i) = TABLEAU_NAMES.iter().position(|n| *n == name) {
            return Ok(TABLEAU[i]);
        }
    }
    if let Some(digit) = lower.strip_prefix('c')
        && digit.len() == 1
        && let Ok(i) = digit.parse::<usize>()
    {
        return Ok(TABLEAU[i]);
    }
    if let Some(c) = single_letter(&lower) {
        return Ok(c);
    }
    if let Some((_, c)) = CSS4.iter().find(|(n, _)| *n == lower) {
        return Ok(*c);
    }

    Err(BridgeError::render(format!("unrecognized color \"{s}\"")))
}

fn single_letter(s: &str) -> Option<Rgba8> {
    Some(match s {
        "b" => Rgba8::rgb(0, 0, 255),
        "g" => Rgba8::rgb(0, 128, 0),
        "r" => Rgba8::rgb(255, 0, 0),
        "c" => Rgba8::rgb(0, 191, 191),
        "m" => Rgba8::rgb(191, 0, 191),
        "y" => Rgba8::rgb(191, 191, 0),
        "k" => Rgba8::rgb(0, 0, 0),
        "w" => Rgba8::rgb(255, 255, 255),
        _ => return None,
    })
}

fn parse_hex(s: &str) -> Result<Rgba8, String> {
    if !s.is_ascii() {
        return Err("hex color must be ASCII".to_owned());
    }
    if let Some(bad) = s.chars().find(|c| !c.is_ascii_hexdigit()) {
        return Err(format!("invalid hex digit '{bad}'"));
    }

    fn hex_byte(pair: &str) -> Result<u8, String> {
        u8::from_str_radix(pair, 16).map_err(|_| format!("invalid hex byte \"{pair}\""))
    }

    fn hex_nibble(ch: &str) -> Result<u8, String> {
        let v = u8::from_str_radix(ch, 16).map_err(|_| format!("invalid hex digit \"{ch}\""))?;
        Ok(v * 17)
    }

    match s.len() {
        3 => Ok(Rgba8::rgb(
            hex_nibble(&s[0..1])?,
            hex_nibble(&s[1..2])?,
            hex_nibble(&s[2..3])?,
        )),
        6 => Ok(Rgba8::rgb(
            hex_byte(&s[0..2])?,
            hex_byte(&s[2..4])?,
            hex_byte(&s[4..6])?,
        )),
        8 => Ok(Rgba8::rgba(
            hex_byte(&s[0..2])?,
            hex_byte(&s[2..4])?,
            hex_byte(&s[4..6])?,
            hex_byte(&s[6..8])?,
        )),
        _ => Err("hex color must be #RGB, #RRGGBB or #RRGGBBAA".to_owned()),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/color.rs"]
mod tests;
