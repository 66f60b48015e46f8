#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(from = "String", into = "String")]
/// How every series of a chart is drawn.
///
/// Unrecognized names fall back to [`ChartType::Line`].
pub enum ChartType {
    /// Polyline with optional markers.
    #[default]
    Line,
    /// Circles at each data point.
    Scatter,
    /// Vertical bars centered on each x value.
    Bar,
    /// Region between the data and zero, plus an outline.
    Area,
    /// Piecewise constant line, stepping halfway between points.
    Step,
    /// Plain polyline, used for generated waveforms.
    Sine,
}

impl ChartType {
    /// All chart types in host index order.
    pub const ALL: [Self; 6] = [
        Self::Line,
        Self::Scatter,
        Self::Bar,
        Self::Area,
        Self::Step,
        Self::Sine,
    ];

    /// Wire name of this chart type.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Line => "line",
            Self::Scatter => "scatter",
            Self::Bar => "bar",
            Self::Area => "area",
            Self::Step => "step",
            Self::Sine => "sine",
        }
    }

    /// Map a host combo-box index (`0..=5`) to a chart type. Out-of-range indices map to line.
    pub fn from_index(idx: usize) -> Self {
        Self::ALL.get(idx).copied().unwrap_or_default()
    }

    /// Parse a wire name. Returns `None` for unknown names.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(name))
    }
}

impl From<String> for ChartType {
    fn from(value: String) -> Self {
        Self::from_name(&value).unwrap_or_default()
    }
}

impl From<ChartType> for String {
    fn from(value: ChartType) -> Self {
        value.as_str().to_owned()
    }
}

impl std::fmt::Display for ChartType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(from = "String", into = "String")]
/// Stroke dash pattern of a series line.
pub enum LineStyle {
    /// Continuous stroke (`-`).
    #[default]
    Solid,
    /// Long dashes (`--`).
    Dashed,
    /// Dots (`:`).
    Dotted,
    /// Alternating dash and dot (`-.`).
    DashDot,
}

impl LineStyle {
    /// Short wire form of this style.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Solid => "-",
            Self::Dashed => "--",
            Self::Dotted => ":",
            Self::DashDot => "-.",
        }
    }

    /// Map a host index (`0..=3`) to a style. Out-of-range indices map to solid.
    pub fn from_index(idx: usize) -> Self {
        match idx {
            1 => Self::Dashed,
            2 => Self::Dotted,
            3 => Self::DashDot,
            _ => Self::Solid,
        }
    }

    /// Dash pattern in points for this style, `None` for solid lines.
    ///
    /// Pattern lengths are multiples of the line width so thick dashed lines stay legible.
    pub fn dash_pattern(self, line_width_pt: f64) -> Option<Vec<f64>> {
        let lw = line_width_pt.max(0.5);
        match self {
            Self::Solid => None,
            Self::Dashed => Some(vec![3.7 * lw, 1.6 * lw]),
            Self::Dotted => Some(vec![lw, 1.65 * lw]),
            Self::DashDot => Some(vec![6.4 * lw, 1.6 * lw, lw, 1.6 * lw]),
        }
    }
}

impl From<String> for LineStyle {
    fn from(value: String) -> Self {
        match value.trim() {
            "--" | "dashed" => Self::Dashed,
            ":" | "dotted" => Self::Dotted,
            "-." | "dashdot" => Self::DashDot,
            _ => Self::Solid,
        }
    }
}

impl From<LineStyle> for String {
    fn from(value: LineStyle) -> Self {
        value.as_str().to_owned()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(from = "Option<String>", into = "Option<String>")]
/// Glyph drawn at every data point of a line series.
pub enum Marker {
    /// No marker (`null`, empty string or `"None"` on the wire).
    #[default]
    None,
    /// Filled circle (`o`).
    Circle,
    /// Filled square (`s`).
    Square,
    /// Filled upward triangle (`^`).
    Triangle,
    /// Filled five-pointed star (`*`).
    Star,
    /// Diagonal cross (`x`).
    Cross,
    /// Upright cross (`+`).
    Plus,
    /// Small dot (`.`).
    Point,
}

impl Marker {
    /// Wire code of this marker, `None` when no marker is drawn.
    pub fn code(self) -> Option<&'static str> {
        match self {
            Self::None => None,
            Self::Circle => Some("o"),
            Self::Square => Some("s"),
            Self::Triangle => Some("^"),
            Self::Star => Some("*"),
            Self::Cross => Some("x"),
            Self::Plus => Some("+"),
            Self::Point => Some("."),
        }
    }

    /// Map a host index (`0..=4`) to a marker. Out-of-range indices map to none.
    pub fn from_index(idx: usize) -> Self {
        match idx {
            1 => Self::Circle,
            2 => Self::Square,
            3 => Self::Triangle,
            4 => Self::Star,
            _ => Self::None,
        }
    }

    /// Outline-only markers are stroked instead of filled.
    pub fn is_stroked(self) -> bool {
        matches!(self, Self::Cross | Self::Plus)
    }
}

impl From<Option<String>> for Marker {
    fn from(value: Option<String>) -> Self {
        let Some(value) = value else {
            return Self::None;
        };
        match value.trim() {
            "o" => Self::Circle,
            "s" => Self::Square,
            "^" => Self::Triangle,
            "*" => Self::Star,
            "x" => Self::Cross,
            "+" => Self::Plus,
            "." => Self::Point,
            _ => Self::None,
        }
    }
}

impl From<Marker> for Option<String> {
    fn from(value: Marker) -> Self {
        value.code().map(str::to_owned)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/model/style.rs"]
mod tests;
