use std::path::Path;

use crate::foundation::error::{BridgeError, BridgeResult};
use crate::model::style::{ChartType, LineStyle, Marker};

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// One chart to render.
///
/// The wire form is a JSON object; every field is optional and defaults to the value
/// documented on the field, so `{}` is a valid request that renders an empty chart.
pub struct ChartRequest {
    /// Title drawn above the plot area (default empty).
    pub title: String,
    /// X-axis label (default `"Time"`).
    pub x_label: String,
    /// Y-axis label (default `"Value"`).
    pub y_label: String,
    /// Chart type shared by every series (default line).
    pub chart_type: ChartType,
    /// Enables wave resampling for series flagged with `is_wave` (default `false`).
    pub interpolate: bool,
    /// Draw dashed grid lines at the major ticks (default `true`).
    pub grid: bool,
    /// Lower x bound; only used together with `x_max`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x_min: Option<f64>,
    /// Upper x bound; only used together with `x_min`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x_max: Option<f64>,
    /// Lower y bound; only used together with `y_max`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y_min: Option<f64>,
    /// Upper y bound; only used together with `y_min`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y_max: Option<f64>,
    /// Series in draw and legend order.
    pub series: Vec<SeriesSpec>,
}

impl Default for ChartRequest {
    fn default() -> Self {
        Self {
            title: String::new(),
            x_label: "Time".to_owned(),
            y_label: "Value".to_owned(),
            chart_type: ChartType::Line,
            interpolate: false,
            grid: true,
            x_min: None,
            x_max: None,
            y_min: None,
            y_max: None,
            series: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// One data series of a [`ChartRequest`].
pub struct SeriesSpec {
    /// Legend label; `"Series N"` (1-based) when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// X coordinates.
    pub x_values: Vec<f64>,
    /// Y coordinates, paired index-wise with `x_values`.
    pub y_values: Vec<f64>,
    /// Color string; palette color by series index when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Hidden series are parsed but never drawn.
    pub visible: bool,
    /// Dash pattern for line-like chart types.
    pub line_style: LineStyle,
    /// Point marker for line-like chart types.
    pub marker: Marker,
    /// Stroke width in points.
    pub line_width: f64,
    /// Resample onto a dense grid before drawing when the chart interpolates.
    pub is_wave: bool,
}

impl Default for SeriesSpec {
    fn default() -> Self {
        Self {
            name: None,
            x_values: Vec::new(),
            y_values: Vec::new(),
            color: None,
            visible: true,
            line_style: LineStyle::Solid,
            marker: Marker::None,
            line_width: 2.0,
            is_wave: false,
        }
    }
}

/// Reason a series is left out of the rendered chart.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// `visible` was false.
    Hidden,
    /// `x_values` or `y_values` was empty.
    Empty,
    /// `x_values` and `y_values` differ in length.
    LengthMismatch,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Hidden => "hidden",
            Self::Empty => "empty values",
            Self::LengthMismatch => "length mismatch",
        })
    }
}

impl SeriesSpec {
    /// Series with the given name and data, everything else defaulted.
    pub fn new(name: impl Into<String>, x_values: Vec<f64>, y_values: Vec<f64>) -> Self {
        Self {
            name: Some(name.into()),
            x_values,
            y_values,
            ..Self::default()
        }
    }

    /// Legend label for the series at `index`.
    pub fn label(&self, index: usize) -> String {
        match &self.name {
            Some(n) => n.clone(),
            None => format!("Series {}", index + 1),
        }
    }

    /// Color string with any surrounding quote characters removed.
    pub fn color_str(&self) -> Option<&str> {
        self.color
            .as_deref()
            .map(|c| c.trim().trim_matches(|ch| ch == '\'' || ch == '"'))
    }

    /// Why this series will not be drawn, or `None` when it will be.
    pub fn skip_reason(&self) -> Option<SkipReason> {
        if !self.visible {
            Some(SkipReason::Hidden)
        } else if self.x_values.is_empty() || self.y_values.is_empty() {
            Some(SkipReason::Empty)
        } else if self.x_values.len() != self.y_values.len() {
            Some(SkipReason::LengthMismatch)
        } else {
            None
        }
    }

    fn validate(&self, index: usize) -> BridgeResult<()> {
        if !self.line_width.is_finite() || self.line_width <= 0.0 {
            return Err(BridgeError::protocol(format!(
                "series[{index}].line_width must be finite and > 0"
            )));
        }
        if let Some((i, _)) = self
            .x_values
            .iter()
            .chain(&self.y_values)
            .enumerate()
            .find(|(_, v)| !v.is_finite())
        {
            return Err(BridgeError::protocol(format!(
                "series[{index}] contains a non-finite value at position {i}"
            )));
        }
        Ok(())
    }
}

impl ChartRequest {
    /// Parse and validate the JSON wire form.
    pub fn parse(raw: &str) -> BridgeResult<Self> {
        let value: serde_json::Value = serde_json::from_str(raw)
            .map_err(|e| BridgeError::protocol(format!("request is not valid JSON: {e}")))?;
        Self::from_value(value)
    }

    /// Validate an already-decoded JSON value.
    pub fn from_value(value: serde_json::Value) -> BridgeResult<Self> {
        let Some(obj) = value.as_object() else {
            return Err(BridgeError::protocol("request must be a JSON object"));
        };
        if let Some(series) = obj.get("series") {
            let Some(items) = series.as_array() else {
                return Err(BridgeError::protocol("series must be a list"));
            };
            if let Some(i) = items.iter().position(|s| !s.is_object()) {
                return Err(BridgeError::protocol(format!(
                    "series[{i}] must be an object"
                )));
            }
        }

        let req: Self = serde_json::from_value(value)
            .map_err(|e| BridgeError::protocol(format!("invalid request: {e}")))?;
        req.validate()?;
        Ok(req)
    }

    /// Read and parse a request file.
    pub fn from_path(path: &Path) -> BridgeResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            BridgeError::io(format!("read request file '{}': {e}", path.display()))
        })?;
        Self::parse(&raw)
    }

    /// Serialize to the JSON wire form.
    pub fn to_json(&self) -> BridgeResult<String> {
        serde_json::to_string(self)
            .map_err(|e| BridgeError::protocol(format!("serialize request: {e}")))
    }

    /// Check invariants that the type system cannot express.
    pub fn validate(&self) -> BridgeResult<()> {
        for (axis, lo, hi) in [
            ("x", self.x_min, self.x_max),
            ("y", self.y_min, self.y_max),
        ] {
            for v in [lo, hi].into_iter().flatten() {
                if !v.is_finite() {
                    return Err(BridgeError::protocol(format!(
                        "{axis} bound must be finite"
                    )));
                }
            }
            if let (Some(lo), Some(hi)) = (lo, hi)
                && lo == hi
            {
                return Err(BridgeError::protocol(format!(
                    "{axis}_min and {axis}_max must differ (both are {lo})"
                )));
            }
        }
        for (i, s) in self.series.iter().enumerate() {
            s.validate(i)?;
        }
        Ok(())
    }

    /// Explicit x range, applied only when both bounds are present.
    pub fn x_range(&self) -> Option<(f64, f64)> {
        self.x_min.zip(self.x_max)
    }

    /// Explicit y range, applied only when both bounds are present.
    pub fn y_range(&self) -> Option<(f64, f64)> {
        self.y_min.zip(self.y_max)
    }

    /// Whether a legend is drawn: more than one series in the request.
    pub fn wants_legend(&self) -> bool {
        self.series.len() > 1
    }
}

#[cfg(test)]
#[path = "../../tests/unit/model/request.rs"]
mod tests;
