//! Axis scaling, tick placement and plot-area geometry.

use crate::foundation::core::Rect;

/// Fraction of the data span added on both sides of auto-scaled axes.
pub const AXIS_MARGIN: f64 = 0.05;

/// Target number of major ticks per axis.
const TARGET_TICKS: usize = 6;

/// Affine mapping from a data interval onto a pixel interval.
///
/// Either interval may be decreasing; an inverted data range flips the axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Scale {
    /// Data value mapped to `r0`.
    pub d0: f64,
    /// Data value mapped to `r1`.
    pub d1: f64,
    /// Pixel coordinate of `d0`.
    pub r0: f64,
    /// Pixel coordinate of `d1`.
    pub r1: f64,
}

impl Scale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self {
            d0: domain.0,
            d1: domain.1,
            r0: range.0,
            r1: range.1,
        }
    }

    /// Map a data value to pixels. Results are clamped to a large finite window.
    pub fn map(&self, v: f64) -> f64 {
        // Halved differences stay finite for any finite inputs.
        let span = self.d1 * 0.5 - self.d0 * 0.5;
        let t = (v * 0.5 - self.d0 * 0.5) / span;
        if span == 0.0 || !t.is_finite() {
            return (self.r0 + self.r1) * 0.5;
        }
        let px = self.r0 + t * (self.r1 - self.r0);
        px.clamp(-1.0e6, 1.0e6)
    }
}

/// Extent of a set of values, `None` if empty.
pub fn extent(values: impl IntoIterator<Item = f64>) -> Option<(f64, f64)> {
    values.into_iter().fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

/// Auto-scaled axis range for a data extent: widened by [`AXIS_MARGIN`] on both sides.
///
/// A zero-width extent is first widened around its value; no data gives `[0, 1]`.
pub fn auto_range(data: Option<(f64, f64)>) -> (f64, f64) {
    let Some((mut lo, mut hi)) = data else {
        return (0.0, 1.0);
    };
    if hi - lo == 0.0 {
        let delta = if lo == 0.0 { 0.5 } else { lo.abs() * 0.05 };
        lo -= delta;
        hi += delta;
    }
    let pad = hi * AXIS_MARGIN - lo * AXIS_MARGIN;
    ((lo - pad).max(f64::MIN), (hi + pad).min(f64::MAX))
}

/// Round-number tick positions inside `range` (either orientation), ascending.
pub fn nice_ticks(range: (f64, f64)) -> Vec<f64> {
    let lo = range.0.min(range.1);
    let hi = range.0.max(range.1);
    let half_span = hi * 0.5 - lo * 0.5;
    if !half_span.is_finite() || half_span <= 0.0 {
        return vec![lo];
    }

    let step = nice_step(half_span / TARGET_TICKS as f64 * 2.0);
    let first = (lo / step).ceil();
    let last = (hi / step).floor();
    let n = (last - first) as i64;
    if !(0..=200).contains(&n) {
        return vec![lo, hi];
    }
    (0..=n)
        .map(|i| {
            let v = (first + i as f64) * step;
            if v.abs() < step * 1e-9 { 0.0 } else { v }
        })
        .collect()
}

fn nice_step(raw: f64) -> f64 {
    let mag = 10f64.powf(raw.log10().floor());
    let norm = raw / mag;
    let nice = if norm <= 1.0 {
        1.0
    } else if norm <= 2.0 {
        2.0
    } else if norm <= 2.5 {
        2.5
    } else if norm <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice * mag
}

/// Format tick values with just enough decimals to tell neighbours apart.
pub fn format_ticks(ticks: &[f64]) -> Vec<String> {
    let step = ticks
        .windows(2)
        .map(|w| (w[1] - w[0]).abs())
        .fold(f64::INFINITY, f64::min);
    let max_abs = ticks.iter().fold(0.0f64, |m, v| m.max(v.abs()));

    if max_abs >= 1.0e6 || (max_abs > 0.0 && max_abs < 1.0e-4) {
        return ticks.iter().map(|v| format!("{v:.2e}")).collect();
    }

    let decimals = if step.is_finite() && step > 0.0 {
        (0..=8)
            .find(|&d| {
                let scaled = step * 10f64.powi(d);
                (scaled - scaled.round()).abs() < 1e-6 * scaled.max(1.0)
            })
            .unwrap_or(8) as usize
    } else {
        0
    };

    ticks
        .iter()
        .map(|v| {
            let s = format!("{v:.decimals$}");
            if s.starts_with('-') && s[1..].chars().all(|c| c == '0' || c == '.') {
                s[1..].to_owned()
            } else {
                s
            }
        })
        .collect()
}

/// Space reserved around the plot area, in pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Insets {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl Insets {
    /// Plot rectangle inside a `width` x `height` canvas.
    ///
    /// Insets that do not fit are shrunk proportionally so the plot keeps at least
    /// a quarter of each dimension.
    pub fn plot_rect(self, width: f64, height: f64) -> Rect {
        fn fit(a: f64, b: f64, total: f64) -> (f64, f64) {
            let budget = total * 0.75;
            let sum = a + b;
            if sum <= budget || sum <= 0.0 {
                (a, b)
            } else {
                let k = budget / sum;
                (a * k, b * k)
            }
        }
        let (left, right) = fit(self.left, self.right, width);
        let (top, bottom) = fit(self.top, self.bottom, height);
        Rect::new(left, top, width - right, height - bottom)
    }
}

/// Rough advance width of `text` at `font_px`; good enough for reserving margins.
pub fn estimate_text_width(text: &str, font_px: f64) -> f64 {
    text.chars().count() as f64 * font_px * 0.6
}

#[cfg(test)]
#[path = "../../tests/unit/render/layout.rs"]
mod tests;
