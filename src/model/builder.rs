use crate::foundation::core::Rgba8;
use crate::foundation::error::BridgeResult;
use crate::model::request::{ChartRequest, SeriesSpec};
use crate::model::style::ChartType;

impl ChartRequest {
    /// Start building a request from defaults.
    pub fn builder() -> ChartRequestBuilder {
        ChartRequestBuilder::default()
    }
}

#[derive(Clone, Debug, Default)]
/// Fluent constructor for [`ChartRequest`], validated on [`ChartRequestBuilder::build`].
pub struct ChartRequestBuilder {
    req: ChartRequest,
}

impl ChartRequestBuilder {
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.req.title = title.into();
        self
    }

    pub fn x_label(mut self, label: impl Into<String>) -> Self {
        self.req.x_label = label.into();
        self
    }

    pub fn y_label(mut self, label: impl Into<String>) -> Self {
        self.req.y_label = label.into();
        self
    }

    pub fn chart_type(mut self, chart_type: ChartType) -> Self {
        self.req.chart_type = chart_type;
        self
    }

    pub fn interpolate(mut self, on: bool) -> Self {
        self.req.interpolate = on;
        self
    }

    pub fn grid(mut self, on: bool) -> Self {
        self.req.grid = on;
        self
    }

    pub fn x_bounds(mut self, min: f64, max: f64) -> Self {
        self.req.x_min = Some(min);
        self.req.x_max = Some(max);
        self
    }

    pub fn y_bounds(mut self, min: f64, max: f64) -> Self {
        self.req.y_min = Some(min);
        self.req.y_max = Some(max);
        self
    }

    /// Append one series; order is draw and legend order.
    pub fn series(mut self, series: SeriesSpec) -> Self {
        self.req.series.push(series);
        self
    }

    pub fn build(self) -> BridgeResult<ChartRequest> {
        self.req.validate()?;
        Ok(self.req)
    }
}

/// Sum-of-sines test chart: one `Sine {f} Hz` series per frequency.
///
/// Frequencies without a matching amplitude and phase are skipped. Samples are
/// `start + j * (end - start) / points` for `j in 0..points`.
pub fn sine_waves(
    frequencies: &[f64],
    amplitudes: &[f64],
    phases: &[f64],
    x_range: (f64, f64),
    points: usize,
    title: impl Into<String>,
) -> BridgeResult<ChartRequest> {
    let (start, end) = x_range;
    let step = if points == 0 {
        0.0
    } else {
        (end - start) / points as f64
    };

    let mut b = ChartRequest::builder()
        .title(title)
        .x_label("Time (s)")
        .y_label("Amplitude")
        .chart_type(ChartType::Line)
        .interpolate(true);

    for (i, ((&freq, &amp), &phase)) in frequencies
        .iter()
        .zip(amplitudes)
        .zip(phases)
        .enumerate()
    {
        let xs: Vec<f64> = (0..points).map(|j| start + j as f64 * step).collect();
        let ys = xs
            .iter()
            .map(|&x| amp * (std::f64::consts::TAU * freq * x + phase).sin())
            .collect();
        let mut s = SeriesSpec::new(format!("Sine {freq} Hz"), xs, ys);
        s.color = Some(hsv_color((i as u32 * 50) % 360, 200, 220).to_hex());
        b = b.series(s);
    }

    b.build()
}

/// HSV to RGB with hue in degrees and saturation/value in `0..=255`.
pub fn hsv_color(hue: u32, sat: u8, val: u8) -> Rgba8 {
    let h = f64::from(hue % 360) / 60.0;
    let s = f64::from(sat) / 255.0;
    let v = f64::from(val) / 255.0;

    let c = v * s;
    let x = c * (1.0 - ((h % 2.0) - 1.0).abs());
    let m = v - c;
    let (r, g, b) = match h as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let to_u8 = |f: f64| ((f + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    Rgba8::rgb(to_u8(r), to_u8(g), to_u8(b))
}

#[cfg(test)]
#[path = "../../tests/unit/model/builder.rs"]
mod tests;
