use crate::foundation::error::{BridgeError, BridgeResult};
use crate::render::plan::ChartPlan;

/// A rendered chart as RGBA8 pixels.
///
/// Backends return **premultiplied alpha**; the `premultiplied` flag makes this explicit at
/// API boundaries.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// RGBA8 bytes of the pixel at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + x as usize) * 4;
        let px = self.data.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }
}

/// Output geometry and quality knobs for one render.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderOpts {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Dots per inch; point sizes scale by `dpi / 72`.
    pub dpi: u32,
    /// Coarser path simplification. Never changes chart content.
    pub fast: bool,
}

impl Default for RenderOpts {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            dpi: 100,
            fast: false,
        }
    }
}

impl RenderOpts {
    pub fn validate(&self) -> BridgeResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(BridgeError::render("image width/height must be > 0"));
        }
        if self.width > u32::from(u16::MAX) || self.height > u32::from(u16::MAX) {
            return Err(BridgeError::render(format!(
                "image size {}x{} exceeds {}x{}",
                self.width,
                self.height,
                u16::MAX,
                u16::MAX
            )));
        }
        if self.dpi == 0 {
            return Err(BridgeError::render("dpi must be > 0"));
        }
        Ok(())
    }

    /// Pixels per typographic point.
    pub fn px_per_pt(&self) -> f64 {
        f64::from(self.dpi) / 72.0
    }

    /// Maximum deviation in pixels allowed when simplifying polylines.
    pub fn simplify_tolerance_px(&self) -> f64 {
        if self.fast { 1.0 } else { 1.0 / 9.0 }
    }
}

/// A rasterizer that turns a compiled [`ChartPlan`] into pixels.
pub trait ChartBackend {
    /// Draw every operation and label of `plan`.
    fn render_plan(&mut self, plan: &ChartPlan) -> BridgeResult<FrameRGBA>;
}

/// Available backend kinds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BackendKind {
    /// CPU raster backend powered by `vello_cpu`.
    #[default]
    Cpu,
}

/// Create a chart backend implementation.
pub fn create_backend(kind: BackendKind) -> Box<dyn ChartBackend> {
    match kind {
        BackendKind::Cpu => Box::new(crate::render::cpu::CpuBackend::new()),
    }
}
