use std::path::Path;
use std::sync::Arc;

use crate::foundation::error::{BridgeError, BridgeResult};
use crate::render::plan::{TextAnchor, TextLabel};

/// Environment variable naming an extra directory of `.ttf`/`.otf`/`.ttc` fonts.
pub const FONT_DIR_ENV: &str = "CHARTBRIDGE_FONT_DIR";

const FONT_FAMILY: &str = "DejaVu Sans, Bitstream Vera Sans, Arial, Helvetica, sans-serif";

/// Rasterizes chart labels through an SVG overlay.
///
/// Owns the font database; build once and reuse across renders.
pub struct TextRasterizer {
    fontdb: Arc<usvg::fontdb::Database>,
}

impl TextRasterizer {
    /// Load system fonts plus any fonts under [`FONT_DIR_ENV`].
    pub fn new() -> Self {
        let mut db = usvg::fontdb::Database::new();
        db.load_system_fonts();
        if let Some(dir) = std::env::var_os(FONT_DIR_ENV) {
            load_fonts_from_dir(&mut db, Path::new(&dir));
        }
        tracing::debug!(faces = db.len(), "font database loaded");
        Self {
            fontdb: Arc::new(db),
        }
    }

    /// Number of usable font faces.
    pub fn face_count(&self) -> usize {
        self.fontdb.len()
    }

    /// Build the SVG document drawing `labels` on a transparent `width` x `height` canvas.
    pub fn overlay_svg(labels: &[TextLabel], width: u32, height: u32) -> String {
        let mut svg = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"#
        );
        for l in labels {
            if l.text.trim().is_empty() {
                continue;
            }
            let anchor = match l.anchor {
                TextAnchor::Start => "start",
                TextAnchor::Middle => "middle",
                TextAnchor::End => "end",
            };
            let transform = if l.rotate_deg != 0.0 {
                format!(
                    r#" transform="rotate({:.3} {:.3} {:.3})""#,
                    l.rotate_deg, l.x, l.y
                )
            } else {
                String::new()
            };
            let opacity = if l.color.a == 255 {
                String::new()
            } else {
                format!(r#" fill-opacity="{:.3}""#, f64::from(l.color.a) / 255.0)
            };
            svg.push_str(&format!(
                r##"<text x="{:.3}" y="{:.3}" font-family="{FONT_FAMILY}" font-size="{:.3}" fill="#{:02x}{:02x}{:02x}"{opacity} text-anchor="{anchor}"{transform}>{}</text>"##,
                l.x,
                l.y,
                l.size_px,
                l.color.r,
                l.color.g,
                l.color.b,
                escape_xml(&l.text),
            ));
        }
        svg.push_str("</svg>");
        svg
    }

    /// Rasterize `labels` into premultiplied RGBA8 bytes.
    ///
    /// Returns `Ok(None)` when there is nothing to draw or no fonts are installed; missing
    /// fonts drop text rather than failing the chart.
    pub fn rasterize(
        &self,
        labels: &[TextLabel],
        width: u32,
        height: u32,
    ) -> BridgeResult<Option<Vec<u8>>> {
        if labels.is_empty() {
            return Ok(None);
        }
        if self.face_count() == 0 {
            tracing::warn!("no fonts available; chart text omitted");
            return Ok(None);
        }

        let svg = Self::overlay_svg(labels, width, height);
        let opts = usvg::Options {
            fontdb: self.fontdb.clone(),
            font_resolver: make_font_resolver(),
            ..Default::default()
        };
        let tree = usvg::Tree::from_str(&svg, &opts)
            .map_err(|e| BridgeError::render(format!("text overlay: {e}")))?;

        let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
            .ok_or_else(|| BridgeError::render("failed to allocate text pixmap"))?;
        resvg::render(
            &tree,
            resvg::tiny_skia::Transform::identity(),
            &mut pixmap.as_mut(),
        );
        Ok(Some(pixmap.take()))
    }
}

impl Default for TextRasterizer {
    fn default() -> Self {
        Self::new()
    }
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c if c.is_control() => out.push(' '),
            c => out.push(c),
        }
    }
    out
}

fn load_fonts_from_dir(db: &mut usvg::fontdb::Database, dir: &Path) {
    let Ok(rd) = std::fs::read_dir(dir) else {
        tracing::warn!(dir = %dir.display(), "font directory not readable");
        return;
    };

    for entry in rd.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(ext) = path.extension().and_then(|s| s.to_str()) else {
            continue;
        };
        let ext = ext.to_ascii_lowercase();
        if ext != "ttf" && ext != "otf" && ext != "ttc" {
            continue;
        }
        if let Err(e) = db.load_font_file(&path) {
            tracing::debug!(path = %path.display(), error = %e, "skipping font file");
        }
    }
}

/// Prefer the requested families, then any sans-serif face, then whatever is installed.
fn make_font_resolver() -> usvg::FontResolver<'static> {
    use usvg::FontResolver;

    FontResolver {
        select_font: Box::new(|font, fontdb| {
            let mut families = Vec::<usvg::fontdb::Family<'_>>::new();
            for family in font.families() {
                families.push(match family {
                    usvg::FontFamily::Serif => usvg::fontdb::Family::Serif,
                    usvg::FontFamily::SansSerif => usvg::fontdb::Family::SansSerif,
                    usvg::FontFamily::Cursive => usvg::fontdb::Family::Cursive,
                    usvg::FontFamily::Fantasy => usvg::fontdb::Family::Fantasy,
                    usvg::FontFamily::Monospace => usvg::fontdb::Family::Monospace,
                    usvg::FontFamily::Named(s) => usvg::fontdb::Family::Name(s),
                });
            }
            families.push(usvg::fontdb::Family::SansSerif);

            let query = usvg::fontdb::Query {
                families: &families,
                weight: usvg::fontdb::Weight(font.weight()),
                stretch: usvg::fontdb::Stretch::Normal,
                style: usvg::fontdb::Style::Normal,
            };

            if let Some(id) = fontdb.query(&query) {
                return Some(id);
            }
            fontdb.faces().next().map(|f| f.id)
        }),
        select_fallback: FontResolver::default_fallback_selector(),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/text.rs"]
mod tests;
