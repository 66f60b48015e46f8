use crate::foundation::core::{BezPath, Rgba8};
use crate::foundation::error::{BridgeError, BridgeResult};
use crate::foundation::math::premul_over_in_place;
use crate::render::backend::{ChartBackend, FrameRGBA};
use crate::render::plan::{ChartPlan, DrawOp};
use crate::render::text::TextRasterizer;

/// CPU chart backend powered by `vello_cpu`; labels go through [`TextRasterizer`].
pub struct CpuBackend {
    text: Option<TextRasterizer>,
}

impl CpuBackend {
    pub fn new() -> Self {
        Self { text: None }
    }
}

impl Default for CpuBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl ChartBackend for CpuBackend {
    #[tracing::instrument(skip_all, fields(width = plan.width, height = plan.height, ops = plan.ops.len()))]
    fn render_plan(&mut self, plan: &ChartPlan) -> BridgeResult<FrameRGBA> {
        let w: u16 = plan
            .width
            .try_into()
            .map_err(|_| BridgeError::render("image width exceeds u16"))?;
        let h: u16 = plan
            .height
            .try_into()
            .map_err(|_| BridgeError::render("image height exceeds u16"))?;

        let mut pixmap = vello_cpu::Pixmap::new(w, h);
        let mut ctx = vello_cpu::RenderContext::new(w, h);
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        for op in &plan.ops {
            draw_op(&mut ctx, op);
        }
        ctx.flush();
        ctx.render_to_pixmap(&mut pixmap);
        let mut data = pixmap.data_as_u8_slice().to_vec();

        if !plan.labels.is_empty() {
            let text = self.text.get_or_insert_with(TextRasterizer::new);
            if let Some(overlay) = text.rasterize(&plan.labels, plan.width, plan.height)? {
                premul_over_in_place(&mut data, &overlay);
            }
        }

        Ok(FrameRGBA {
            width: plan.width,
            height: plan.height,
            data,
            premultiplied: true,
        })
    }
}

fn draw_op(ctx: &mut vello_cpu::RenderContext, op: &DrawOp) {
    match op {
        DrawOp::FillRect { rect, color } => {
            set_color(ctx, *color);
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                rect.x0, rect.y0, rect.x1, rect.y1,
            ));
        }
        DrawOp::Fill { path, color } => {
            if path.elements().is_empty() {
                return;
            }
            set_color(ctx, *color);
            ctx.fill_path(&bezpath_to_cpu(path));
        }
        DrawOp::Stroke { path, color, width } => {
            if path.elements().is_empty() || *width <= 0.0 {
                return;
            }
            set_color(ctx, *color);
            ctx.set_stroke(vello_cpu::kurbo::Stroke::new(*width));
            ctx.stroke_path(&bezpath_to_cpu(path));
        }
    }
}

fn set_color(ctx: &mut vello_cpu::RenderContext, c: Rgba8) {
    ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a));
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::LineTo(p) => out.line_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::QuadTo(p1, p2) => out.quad_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
            ),
            PathEl::CurveTo(p1, p2, p3) => out.curve_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
                vello_cpu::kurbo::Point::new(p3.x, p3.y),
            ),
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
