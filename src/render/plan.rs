//! Compile a [`ChartRequest`] into backend-agnostic draw operations.

use kurbo::{Circle, Shape};

use crate::foundation::core::{BezPath, Point, Rect, Rgba8};
use crate::foundation::error::BridgeResult;
use crate::model::request::{ChartRequest, SeriesSpec, SkipReason};
use crate::model::style::{ChartType, LineStyle, Marker};
use crate::render::backend::RenderOpts;
use crate::render::color::{palette_color, parse_color};
use crate::render::layout::{
    Insets, Scale, auto_range, estimate_text_width, extent, format_ticks, nice_ticks,
};
use crate::render::simplify::simplify_polyline;
use crate::render::wave::{WAVE_SAMPLES, needs_resample, resample_linear};

const TITLE_PT: f64 = 12.0;
const LABEL_PT: f64 = 10.0;
const TICK_PT: f64 = 10.0;
const LEGEND_PT: f64 = 10.0;
const TICK_LEN_PT: f64 = 3.5;
const TICK_PAD_PT: f64 = 3.5;
const LABEL_PAD_PT: f64 = 4.0;
const TITLE_PAD_PT: f64 = 6.0;
const EDGE_PAD_PT: f64 = 6.0;
const SPINE_PT: f64 = 0.8;
const GRID_PT: f64 = 0.8;
const MARKER_PT: f64 = 6.0;

/// Bar width in data units.
pub const BAR_WIDTH: f64 = 0.8;
const BAR_ALPHA: f64 = 0.7;
const AREA_ALPHA: f64 = 0.3;
const GRID_ALPHA: f64 = 0.7;

const FIGURE_BG: Rgba8 = Rgba8::rgb(255, 255, 255);
const AXES_BG: Rgba8 = Rgba8::rgb(255, 255, 255);
const GRID_COLOR: Rgba8 = Rgba8::rgb(0xb0, 0xb0, 0xb0);
const INK: Rgba8 = Rgba8::rgb(0, 0, 0);
const LEGEND_EDGE: Rgba8 = Rgba8::rgb(0xcc, 0xcc, 0xcc);

/// One backend drawing command in pixel space.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    /// Fill an axis-aligned rectangle.
    FillRect { rect: Rect, color: Rgba8 },
    /// Fill a closed path (non-zero winding).
    Fill { path: BezPath, color: Rgba8 },
    /// Stroke a path with butt caps.
    Stroke {
        path: BezPath,
        color: Rgba8,
        width: f64,
    },
}

/// Horizontal alignment of a [`TextLabel`] relative to its anchor point.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextAnchor {
    Start,
    Middle,
    End,
}

/// A text run drawn over the chart.
#[derive(Clone, Debug, PartialEq)]
pub struct TextLabel {
    pub text: String,
    /// Anchor x in pixels.
    pub x: f64,
    /// Baseline y in pixels.
    pub y: f64,
    pub size_px: f64,
    pub color: Rgba8,
    pub anchor: TextAnchor,
    /// Clockwise rotation around the anchor point, in degrees.
    pub rotate_deg: f64,
}

/// What a chart shows, independent of pixel output.
///
/// Two renders of the same request always produce equal content.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct ChartContent {
    pub chart_type: ChartType,
    pub title: String,
    /// Drawn series in draw order.
    pub series: Vec<SeriesContent>,
    /// Series left out, in request order.
    pub skipped: Vec<SkippedSeries>,
    pub x_range: (f64, f64),
    pub y_range: (f64, f64),
    /// The request supplied both x bounds.
    pub x_bounds_applied: bool,
    /// The request supplied both y bounds.
    pub y_bounds_applied: bool,
    pub x_ticks: Vec<f64>,
    pub y_ticks: Vec<f64>,
    /// Legend entries, `None` when no legend is drawn.
    pub legend: Option<Vec<String>>,
    pub grid: bool,
}

/// A series that made it into the chart.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct SeriesContent {
    /// Position in the request.
    pub index: usize,
    pub name: String,
    /// Resolved color as `#rrggbb[aa]`.
    pub color: String,
    /// Points supplied by the request.
    pub source_points: usize,
    /// Points after wave resampling.
    pub drawn_points: usize,
    pub resampled: bool,
}

/// A series left out of the chart, and why.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct SkippedSeries {
    pub index: usize,
    pub name: String,
    pub reason: SkipReason,
}

/// Backend-agnostic description of one chart image.
#[derive(Clone, Debug)]
pub struct ChartPlan {
    pub width: u32,
    pub height: u32,
    /// Drawn in order, later ops on top.
    pub ops: Vec<DrawOp>,
    /// Drawn after all ops.
    pub labels: Vec<TextLabel>,
    pub content: ChartContent,
}

struct PreparedSeries<'a> {
    index: usize,
    name: String,
    color: Rgba8,
    spec: &'a SeriesSpec,
    points: Vec<(f64, f64)>,
    resampled: bool,
}

/// Compile `req` into a [`ChartPlan`] sized by `opts`.
///
/// Fails only on invalid options or an unparseable series color.
#[tracing::instrument(skip_all, fields(chart_type = %req.chart_type, series = req.series.len()))]
pub fn compile_chart(req: &ChartRequest, opts: &RenderOpts) -> BridgeResult<ChartPlan> {
    opts.validate()?;
    let pt = opts.px_per_pt();
    let w = f64::from(opts.width);
    let h = f64::from(opts.height);

    let (prepared, skipped) = prepare_series(req)?;

    let (x_data, y_data) = data_extents(req.chart_type, &prepared);
    let x_range = req.x_range().unwrap_or_else(|| auto_range(x_data));
    let y_range = req.y_range().unwrap_or_else(|| auto_range(y_data));
    let x_ticks = nice_ticks(x_range);
    let y_ticks = nice_ticks(y_range);
    let x_tick_labels = format_ticks(&x_ticks);
    let y_tick_labels = format_ticks(&y_ticks);

    let tick_px = TICK_PT * pt;
    let label_px = LABEL_PT * pt;
    let title_px = TITLE_PT * pt;
    let y_tick_w = y_tick_labels
        .iter()
        .map(|s| estimate_text_width(s, tick_px))
        .fold(0.0, f64::max);
    let x_label_band = if req.x_label.is_empty() {
        0.0
    } else {
        label_px + LABEL_PAD_PT * pt
    };
    let y_label_band = if req.y_label.is_empty() {
        0.0
    } else {
        label_px + LABEL_PAD_PT * pt
    };
    let title_band = if req.title.is_empty() {
        0.0
    } else {
        title_px + TITLE_PAD_PT * pt
    };
    let insets = Insets {
        left: EDGE_PAD_PT * pt + y_label_band + y_tick_w + (TICK_PAD_PT + TICK_LEN_PT) * pt,
        right: EDGE_PAD_PT * pt + tick_px,
        top: EDGE_PAD_PT * pt + title_band,
        bottom: EDGE_PAD_PT * pt + x_label_band + tick_px + (TICK_PAD_PT + TICK_LEN_PT) * pt,
    };
    let plot = insets.plot_rect(w, h);
    let sx = Scale::new(x_range, (plot.x0, plot.x1));
    let sy = Scale::new(y_range, (plot.y1, plot.y0));

    let mut ops = vec![
        DrawOp::FillRect {
            rect: Rect::new(0.0, 0.0, w, h),
            color: FIGURE_BG,
        },
        DrawOp::FillRect {
            rect: plot,
            color: AXES_BG,
        },
    ];
    let mut labels = Vec::new();

    if req.grid {
        push_grid(&mut ops, plot, &sx, &sy, &x_ticks, &y_ticks, pt);
    }

    let tolerance = opts.simplify_tolerance_px();
    for s in &prepared {
        push_series(&mut ops, req.chart_type, s, &sx, &sy, pt, tolerance);
    }

    // Hide geometry that spilled outside the plot area.
    for rect in [
        Rect::new(0.0, 0.0, w, plot.y0),
        Rect::new(0.0, plot.y1, w, h),
        Rect::new(0.0, plot.y0, plot.x0, plot.y1),
        Rect::new(plot.x1, plot.y0, w, plot.y1),
    ] {
        if rect.area() > 0.0 {
            ops.push(DrawOp::FillRect {
                rect,
                color: FIGURE_BG,
            });
        }
    }

    ops.push(DrawOp::Stroke {
        path: plot.to_path(0.1),
        color: INK,
        width: SPINE_PT * pt,
    });

    let tick_len = TICK_LEN_PT * pt;
    let tick_pad = TICK_PAD_PT * pt;
    let mut tick_path = BezPath::new();
    for (t, text) in x_ticks.iter().zip(&x_tick_labels) {
        let px = sx.map(*t);
        if !in_span(px, plot.x0, plot.x1) {
            continue;
        }
        tick_path.move_to((px, plot.y1));
        tick_path.line_to((px, plot.y1 + tick_len));
        labels.push(TextLabel {
            text: text.clone(),
            x: px,
            y: plot.y1 + tick_len + tick_pad + tick_px * 0.8,
            size_px: tick_px,
            color: INK,
            anchor: TextAnchor::Middle,
            rotate_deg: 0.0,
        });
    }
    for (t, text) in y_ticks.iter().zip(&y_tick_labels) {
        let py = sy.map(*t);
        if !in_span(py, plot.y0, plot.y1) {
            continue;
        }
        tick_path.move_to((plot.x0 - tick_len, py));
        tick_path.line_to((plot.x0, py));
        labels.push(TextLabel {
            text: text.clone(),
            x: plot.x0 - tick_len - tick_pad,
            y: py + tick_px * 0.35,
            size_px: tick_px,
            color: INK,
            anchor: TextAnchor::End,
            rotate_deg: 0.0,
        });
    }
    if !tick_path.elements().is_empty() {
        ops.push(DrawOp::Stroke {
            path: tick_path,
            color: INK,
            width: SPINE_PT * pt,
        });
    }

    let plot_cx = (plot.x0 + plot.x1) * 0.5;
    if !req.title.is_empty() {
        labels.push(TextLabel {
            text: req.title.clone(),
            x: plot_cx,
            y: plot.y0 - TITLE_PAD_PT * pt,
            size_px: title_px,
            color: INK,
            anchor: TextAnchor::Middle,
            rotate_deg: 0.0,
        });
    }
    if !req.x_label.is_empty() {
        labels.push(TextLabel {
            text: req.x_label.clone(),
            x: plot_cx,
            y: plot.y1 + tick_len + tick_pad + tick_px + LABEL_PAD_PT * pt + label_px * 0.8,
            size_px: label_px,
            color: INK,
            anchor: TextAnchor::Middle,
            rotate_deg: 0.0,
        });
    }
    if !req.y_label.is_empty() {
        labels.push(TextLabel {
            text: req.y_label.clone(),
            x: (plot.x0 - tick_len - tick_pad - y_tick_w - LABEL_PAD_PT * pt).max(label_px * 0.8),
            y: (plot.y0 + plot.y1) * 0.5,
            size_px: label_px,
            color: INK,
            anchor: TextAnchor::Middle,
            rotate_deg: -90.0,
        });
    }

    let legend = if req.wants_legend() && !prepared.is_empty() {
        push_legend(&mut ops, &mut labels, req.chart_type, &prepared, plot, pt);
        Some(prepared.iter().map(|s| s.name.clone()).collect())
    } else {
        None
    };

    let content = ChartContent {
        chart_type: req.chart_type,
        title: req.title.clone(),
        series: prepared
            .iter()
            .map(|s| SeriesContent {
                index: s.index,
                name: s.name.clone(),
                color: s.color.to_hex(),
                source_points: s.spec.x_values.len(),
                drawn_points: s.points.len(),
                resampled: s.resampled,
            })
            .collect(),
        skipped,
        x_range,
        y_range,
        x_bounds_applied: req.x_range().is_some(),
        y_bounds_applied: req.y_range().is_some(),
        x_ticks,
        y_ticks,
        legend,
        grid: req.grid,
    };

    Ok(ChartPlan {
        width: opts.width,
        height: opts.height,
        ops,
        labels,
        content,
    })
}

fn prepare_series(req: &ChartRequest) -> BridgeResult<(Vec<PreparedSeries<'_>>, Vec<SkippedSeries>)> {
    let mut prepared = Vec::new();
    let mut skipped = Vec::new();

    for (index, spec) in req.series.iter().enumerate() {
        let name = spec.label(index);
        if let Some(reason) = spec.skip_reason() {
            match reason {
                SkipReason::Hidden => tracing::debug!(series = %name, "series hidden"),
                _ => tracing::warn!(
                    series = %name,
                    %reason,
                    x_len = spec.x_values.len(),
                    y_len = spec.y_values.len(),
                    "skipping series"
                ),
            }
            skipped.push(SkippedSeries {
                index,
                name,
                reason,
            });
            continue;
        }

        let color = match spec.color_str().filter(|c| !c.is_empty()) {
            Some(c) => parse_color(c)?,
            None => palette_color(index),
        };

        let mut points: Vec<(f64, f64)> = spec
            .x_values
            .iter()
            .copied()
            .zip(spec.y_values.iter().copied())
            .collect();
        let resampled = needs_resample(spec.is_wave, req.interpolate, points.len());
        if resampled {
            points = resample_linear(&points, WAVE_SAMPLES);
        }

        prepared.push(PreparedSeries {
            index,
            name,
            color,
            spec,
            points,
            resampled,
        });
    }

    Ok((prepared, skipped))
}

fn data_extents(
    chart_type: ChartType,
    series: &[PreparedSeries<'_>],
) -> (Option<(f64, f64)>, Option<(f64, f64)>) {
    let points = || series.iter().flat_map(|s| s.points.iter().copied());
    match chart_type {
        ChartType::Bar => {
            let half = BAR_WIDTH * 0.5;
            let x = extent(points().flat_map(|(x, _)| [x - half, x + half]));
            let y = extent(points().map(|(_, y)| y)).map(|(lo, hi)| (lo.min(0.0), hi.max(0.0)));
            (x, y)
        }
        ChartType::Area => {
            let x = extent(points().map(|(x, _)| x));
            let y = extent(points().map(|(_, y)| y)).map(|(lo, hi)| (lo.min(0.0), hi.max(0.0)));
            (x, y)
        }
        _ => (
            extent(points().map(|(x, _)| x)),
            extent(points().map(|(_, y)| y)),
        ),
    }
}

fn in_span(v: f64, a: f64, b: f64) -> bool {
    let eps = 1e-6;
    v >= a.min(b) - eps && v <= a.max(b) + eps
}

fn push_grid(
    ops: &mut Vec<DrawOp>,
    plot: Rect,
    sx: &Scale,
    sy: &Scale,
    x_ticks: &[f64],
    y_ticks: &[f64],
    pt: f64,
) {
    let mut path = BezPath::new();
    for px in x_ticks.iter().map(|t| sx.map(*t)) {
        if in_span(px, plot.x0, plot.x1) {
            path.move_to((px, plot.y0));
            path.line_to((px, plot.y1));
        }
    }
    for py in y_ticks.iter().map(|t| sy.map(*t)) {
        if in_span(py, plot.y0, plot.y1) {
            path.move_to((plot.x0, py));
            path.line_to((plot.x1, py));
        }
    }
    if path.elements().is_empty() {
        return;
    }
    ops.push(DrawOp::Stroke {
        path: dashed(path, LineStyle::Dashed, GRID_PT, pt),
        color: GRID_COLOR.with_alpha_mul(GRID_ALPHA),
        width: GRID_PT * pt,
    });
}

fn push_series(
    ops: &mut Vec<DrawOp>,
    chart_type: ChartType,
    s: &PreparedSeries<'_>,
    sx: &Scale,
    sy: &Scale,
    pt: f64,
    tolerance: f64,
) {
    let lw = s.spec.line_width;
    let to_px = |(x, y): (f64, f64)| Point::new(sx.map(x), sy.map(y));
    let pts: Vec<Point> = s.points.iter().copied().map(to_px).collect();

    match chart_type {
        ChartType::Line | ChartType::Sine => {
            let line = polyline_path(&simplify_polyline(&pts, tolerance));
            ops.push(DrawOp::Stroke {
                path: dashed(line, s.spec.line_style, lw, pt),
                color: s.color,
                width: lw * pt,
            });
            push_markers(ops, s.spec.marker, &pts, s.color, pt);
        }
        ChartType::Scatter => {
            let r = scatter_radius_px(lw, pt);
            let mut path = BezPath::new();
            for p in &pts {
                path.extend(Circle::new(*p, r).path_elements(0.1));
            }
            ops.push(DrawOp::Fill {
                path,
                color: s.color,
            });
        }
        ChartType::Bar => {
            let half = BAR_WIDTH * 0.5;
            let y0 = sy.map(0.0);
            let color = s.color.with_alpha_mul(BAR_ALPHA);
            for &(x, y) in &s.points {
                let rect = Rect::new(sx.map(x - half), y0, sx.map(x + half), sy.map(y)).abs();
                ops.push(DrawOp::FillRect { rect, color });
            }
        }
        ChartType::Area => {
            let outline = simplify_polyline(&pts, tolerance);
            if let (Some(first), Some(last)) = (s.points.first(), s.points.last()) {
                let y0 = sy.map(0.0);
                let mut fill = BezPath::new();
                fill.move_to((sx.map(first.0), y0));
                for p in &outline {
                    fill.line_to(*p);
                }
                fill.line_to((sx.map(last.0), y0));
                fill.close_path();
                ops.push(DrawOp::Fill {
                    path: fill,
                    color: s.color.with_alpha_mul(AREA_ALPHA),
                });
            }
            ops.push(DrawOp::Stroke {
                path: polyline_path(&outline),
                color: s.color,
                width: lw * pt,
            });
        }
        ChartType::Step => {
            let steps: Vec<Point> = mid_steps(&s.points).into_iter().map(to_px).collect();
            let line = polyline_path(&simplify_polyline(&steps, tolerance));
            ops.push(DrawOp::Stroke {
                path: dashed(line, s.spec.line_style, lw, pt),
                color: s.color,
                width: lw * pt,
            });
        }
    }
}

/// Vertices of a step line that changes value halfway between neighbouring x values.
pub fn mid_steps(points: &[(f64, f64)]) -> Vec<(f64, f64)> {
    let Some(&first) = points.first() else {
        return Vec::new();
    };
    let mut out = Vec::with_capacity(points.len() * 2);
    out.push(first);
    for w in points.windows(2) {
        let (x0, y0) = w[0];
        let (x1, y1) = w[1];
        let xm = (x0 + x1) * 0.5;
        out.push((xm, y0));
        out.push((xm, y1));
    }
    if points.len() > 1 {
        out.push(points[points.len() - 1]);
    }
    out
}

/// Radius in pixels of a scatter dot whose area is `line_width * 25` square points.
pub fn scatter_radius_px(line_width: f64, px_per_pt: f64) -> f64 {
    (line_width * 25.0 / std::f64::consts::PI).sqrt() * px_per_pt
}

fn polyline_path(points: &[Point]) -> BezPath {
    let mut path = BezPath::new();
    let mut it = points.iter();
    if let Some(p) = it.next() {
        path.move_to(*p);
        for p in it {
            path.line_to(*p);
        }
    }
    path
}

fn dashed(path: BezPath, style: LineStyle, line_width_pt: f64, pt: f64) -> BezPath {
    match style.dash_pattern(line_width_pt) {
        Some(pattern) => {
            let pattern: Vec<f64> = pattern.into_iter().map(|d| d * pt).collect();
            kurbo::dash(path.iter(), 0.0, &pattern).collect()
        }
        None => path,
    }
}

fn push_markers(ops: &mut Vec<DrawOp>, marker: Marker, pts: &[Point], color: Rgba8, pt: f64) {
    if marker == Marker::None || pts.is_empty() {
        return;
    }
    let d = MARKER_PT * pt;
    let mut path = BezPath::new();
    for &c in pts {
        append_marker(&mut path, marker, c, d);
    }
    if marker.is_stroked() {
        ops.push(DrawOp::Stroke {
            path,
            color,
            width: pt,
        });
    } else {
        ops.push(DrawOp::Fill { path, color });
    }
}

fn append_marker(path: &mut BezPath, marker: Marker, c: Point, d: f64) {
    let r = d * 0.5;
    match marker {
        Marker::None => {}
        Marker::Circle => path.extend(Circle::new(c, r).path_elements(0.1)),
        Marker::Point => path.extend(Circle::new(c, r * 0.5).path_elements(0.1)),
        Marker::Square => path.extend(Rect::from_center_size(c, (d, d)).path_elements(0.1)),
        Marker::Triangle => {
            path.move_to((c.x, c.y - r));
            path.line_to((c.x + r, c.y + r));
            path.line_to((c.x - r, c.y + r));
            path.close_path();
        }
        Marker::Star => {
            let inner = r * 0.381_966;
            for i in 0..10 {
                let rad = if i % 2 == 0 { r } else { inner };
                let a = -std::f64::consts::FRAC_PI_2 + i as f64 * std::f64::consts::PI / 5.0;
                let p = (c.x + rad * a.cos(), c.y + rad * a.sin());
                if i == 0 {
                    path.move_to(p);
                } else {
                    path.line_to(p);
                }
            }
            path.close_path();
        }
        Marker::Cross => {
            path.move_to((c.x - r, c.y - r));
            path.line_to((c.x + r, c.y + r));
            path.move_to((c.x - r, c.y + r));
            path.line_to((c.x + r, c.y - r));
        }
        Marker::Plus => {
            path.move_to((c.x - r, c.y));
            path.line_to((c.x + r, c.y));
            path.move_to((c.x, c.y - r));
            path.line_to((c.x, c.y + r));
        }
    }
}

fn push_legend(
    ops: &mut Vec<DrawOp>,
    labels: &mut Vec<TextLabel>,
    chart_type: ChartType,
    series: &[PreparedSeries<'_>],
    plot: Rect,
    pt: f64,
) {
    let font = LEGEND_PT * pt;
    let row_h = font * 1.4;
    let handle_w = font * 2.0;
    let pad = font * 0.4;
    let gap = font * 0.8;
    let text_w = series
        .iter()
        .map(|s| estimate_text_width(&s.name, font))
        .fold(0.0, f64::max);

    let box_w = pad * 2.0 + handle_w + gap + text_w;
    let box_h = pad * 2.0 + row_h * series.len() as f64;
    let x1 = plot.x1 - font * 0.5;
    let y0 = plot.y0 + font * 0.5;
    let frame = Rect::new(x1 - box_w, y0, x1, y0 + box_h);

    ops.push(DrawOp::FillRect {
        rect: frame,
        color: Rgba8::rgb(255, 255, 255).with_alpha_mul(0.8),
    });
    ops.push(DrawOp::Stroke {
        path: frame.to_path(0.1),
        color: LEGEND_EDGE,
        width: SPINE_PT * pt,
    });

    for (row, s) in series.iter().enumerate() {
        let cy = frame.y0 + pad + row_h * (row as f64 + 0.5);
        let hx0 = frame.x0 + pad;
        let hx1 = hx0 + handle_w;
        let lw = s.spec.line_width;
        match chart_type {
            ChartType::Line | ChartType::Sine | ChartType::Step => {
                let mut handle = BezPath::new();
                handle.move_to((hx0, cy));
                handle.line_to((hx1, cy));
                ops.push(DrawOp::Stroke {
                    path: dashed(handle, s.spec.line_style, lw, pt),
                    color: s.color,
                    width: lw * pt,
                });
                if chart_type != ChartType::Step {
                    push_markers(
                        ops,
                        s.spec.marker,
                        &[Point::new((hx0 + hx1) * 0.5, cy)],
                        s.color,
                        pt,
                    );
                }
            }
            ChartType::Scatter => {
                let r = scatter_radius_px(lw, pt).min(row_h * 0.5);
                ops.push(DrawOp::Fill {
                    path: Circle::new(((hx0 + hx1) * 0.5, cy), r).to_path(0.1),
                    color: s.color,
                });
            }
            ChartType::Bar | ChartType::Area => {
                let alpha = if chart_type == ChartType::Bar {
                    BAR_ALPHA
                } else {
                    AREA_ALPHA
                };
                ops.push(DrawOp::FillRect {
                    rect: Rect::new(hx0, cy - font * 0.35, hx1, cy + font * 0.35),
                    color: s.color.with_alpha_mul(alpha),
                });
            }
        }
        labels.push(TextLabel {
            text: s.name.clone(),
            x: hx1 + gap,
            y: cy + font * 0.35,
            size_px: font,
            color: INK,
            anchor: TextAnchor::Start,
            rotate_deg: 0.0,
        });
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/plan.rs"]
mod tests;
