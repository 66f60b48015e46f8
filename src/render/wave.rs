use crate::foundation::math::lerp;

/// Series shorter than this are resampled when flagged as waves.
pub const WAVE_SMOOTHING_THRESHOLD: usize = 100;

/// Number of evenly spaced samples a wave is resampled onto.
pub const WAVE_SAMPLES: usize = 500;

/// Whether a series with `len` points is resampled before drawing.
pub fn needs_resample(is_wave: bool, interpolate: bool, len: usize) -> bool {
    is_wave && interpolate && len < WAVE_SMOOTHING_THRESHOLD
}

/// Resample `points` onto `samples` evenly spaced x values spanning their x extent.
///
/// Points are sorted by x first. Values are linearly interpolated; the first and last
/// x of the output equal the minimum and maximum input x.
pub fn resample_linear(points: &[(f64, f64)], samples: usize) -> Vec<(f64, f64)> {
    if points.is_empty() || samples == 0 {
        return Vec::new();
    }

    let mut sorted = points.to_vec();
    sorted.sort_by(|a, b| a.0.total_cmp(&b.0));

    let x_min = sorted[0].0;
    let x_max = sorted[sorted.len() - 1].0;
    if samples == 1 {
        return vec![(x_min, interp(&sorted, x_min))];
    }

    let denom = (samples - 1) as f64;
    (0..samples)
        .map(|i| {
            let x = if i == samples - 1 {
                x_max
            } else {
                lerp(x_min, x_max, i as f64 / denom)
            };
            (x, interp(&sorted, x))
        })
        .collect()
}

fn interp(sorted: &[(f64, f64)], x: f64) -> f64 {
    let idx = sorted.partition_point(|p| p.0 <= x);
    if idx == 0 {
        return sorted[0].1;
    }
    if idx == sorted.len() {
        return sorted[sorted.len() - 1].1;
    }
    let (x0, y0) = sorted[idx - 1];
    let (x1, y1) = sorted[idx];
    let dx = x1 - x0;
    if dx == 0.0 {
        return y1;
    }
    lerp(y0, y1, (x - x0) / dx)
}

#[cfg(test)]
#[path = "../../tests/unit/render/wave.rs"]
mod tests;
