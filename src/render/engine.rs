use std::path::{Path, PathBuf};

use crate::foundation::error::BridgeResult;
use crate::foundation::math::unpremultiply_in_place;
use crate::model::request::ChartRequest;
use crate::render::backend::{BackendKind, ChartBackend, FrameRGBA, RenderOpts, create_backend};
use crate::render::output::{ensure_dir, unique_chart_path, write_png_atomic};
use crate::render::plan::{ChartContent, compile_chart};

/// Environment variable overriding [`default_output_dir`].
pub const OUTPUT_DIR_ENV: &str = "CHARTBRIDGE_OUTPUT_DIR";

/// `$CHARTBRIDGE_OUTPUT_DIR`, or `chartbridge/` under the system temp directory.
pub fn default_output_dir() -> PathBuf {
    match std::env::var_os(OUTPUT_DIR_ENV) {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => std::env::temp_dir().join("chartbridge"),
    }
}

/// Result of a successful [`RenderEngine::render`].
#[derive(Clone, Debug)]
pub struct RenderOutput {
    /// Where the PNG was written.
    pub image_path: PathBuf,
    /// What the image shows.
    pub content: ChartContent,
}

/// Turns chart requests into PNG files inside one output directory.
pub struct RenderEngine {
    output_dir: PathBuf,
    backend: Box<dyn ChartBackend>,
    fast: bool,
}

impl RenderEngine {
    /// Engine with the CPU backend writing into `output_dir`.
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self::with_backend(output_dir, create_backend(BackendKind::Cpu))
    }

    pub fn with_backend(output_dir: impl Into<PathBuf>, backend: Box<dyn ChartBackend>) -> Self {
        Self {
            output_dir: output_dir.into(),
            backend,
            fast: false,
        }
    }

    /// Coarser path simplification for quicker renders.
    pub fn fast(mut self, fast: bool) -> Self {
        self.fast = fast;
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Compile and rasterize `req` without touching the filesystem.
    pub fn render_frame(
        &mut self,
        req: &ChartRequest,
        width: u32,
        height: u32,
        dpi: u32,
    ) -> BridgeResult<(FrameRGBA, ChartContent)> {
        req.validate()?;
        let opts = RenderOpts {
            width,
            height,
            dpi,
            fast: self.fast,
        };
        let plan = compile_chart(req, &opts)?;
        let frame = self.backend.render_plan(&plan)?;
        Ok((frame, plan.content))
    }

    /// Render a small throwaway chart so fonts and raster state are loaded before the first job.
    pub fn warm_up(&mut self) -> BridgeResult<()> {
        let req = ChartRequest {
            title: "warm-up".to_owned(),
            ..ChartRequest::default()
        };
        self.render_frame(&req, 64, 48, 72).map(|_| ())
    }

    /// Render `req` to a new uniquely named PNG in the output directory.
    #[tracing::instrument(skip(self, req), fields(output_dir = %self.output_dir.display()))]
    pub fn render(
        &mut self,
        req: &ChartRequest,
        width: u32,
        height: u32,
        dpi: u32,
    ) -> BridgeResult<RenderOutput> {
        let (mut frame, content) = self.render_frame(req, width, height, dpi)?;
        if frame.premultiplied {
            unpremultiply_in_place(&mut frame.data);
            frame.premultiplied = false;
        }

        ensure_dir(&self.output_dir)?;
        let image_path = unique_chart_path(&self.output_dir);
        write_png_atomic(&image_path, frame.width, frame.height, &frame.data)?;

        tracing::info!(
            path = %image_path.display(),
            drawn = content.series.len(),
            skipped = content.skipped.len(),
            "chart written"
        );
        Ok(RenderOutput {
            image_path,
            content,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/engine.rs"]
mod tests;
