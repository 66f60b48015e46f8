use std::path::PathBuf;

use clap::Parser;

pub const DEFAULT_WIDTH: u32 = 800;
pub const DEFAULT_HEIGHT: u32 = 600;
pub const DEFAULT_DPI: u32 = 100;
pub const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 3600;

/// Command line of the `chart-worker` binary.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "chart-worker",
    version,
    about = "Render a chart request to PNG, or stay preloaded and serve render jobs from stdin"
)]
pub struct WorkerArgs {
    /// Request JSON file (one-shot mode).
    pub request: Option<PathBuf>,

    /// Optional `WIDTH HEIGHT [DPI]`; invalid values fall back to 800x600 at 100 dpi.
    #[arg(num_args = 0..=3)]
    pub dims: Vec<String>,

    /// Coarser path simplification and quieter logging.
    #[arg(long, default_value_t = false)]
    pub fast: bool,

    /// Print a readiness line and serve JSON-line jobs from stdin.
    #[arg(long, default_value_t = false)]
    pub preload: bool,

    /// Seconds a preloaded worker waits for a job before exiting.
    #[arg(long, default_value_t = DEFAULT_IDLE_TIMEOUT_SECS)]
    pub idle_timeout: u64,

    /// Directory receiving chart images (default: `$CHARTBRIDGE_OUTPUT_DIR` or the temp dir).
    #[arg(long)]
    pub output_dir: Option<PathBuf>,
}

/// Image geometry parsed from the positional arguments after the request path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Dims {
    pub width: u32,
    pub height: u32,
    pub dpi: u32,
}

impl Default for Dims {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            dpi: DEFAULT_DPI,
        }
    }
}

fn positive(s: &str) -> Option<u32> {
    s.trim().parse::<u32>().ok().filter(|v| *v > 0)
}

/// Width and height are taken together; a bad value in either keeps both defaults.
pub fn parse_dims(raw: &[String]) -> Dims {
    let mut dims = Dims::default();
    match raw {
        [] => {}
        [_] => tracing::warn!("height missing; using default size"),
        [w, h, rest @ ..] => {
            match (positive(w), positive(h)) {
                (Some(width), Some(height)) => {
                    dims.width = width;
                    dims.height = height;
                }
                _ => tracing::warn!(width = %w, height = %h, "invalid width or height; using defaults"),
            }
            if let Some(d) = rest.first() {
                match positive(d) {
                    Some(dpi) => dims.dpi = dpi,
                    None => tracing::warn!(dpi = %d, "invalid dpi; using default"),
                }
            }
        }
    }
    dims
}

#[cfg(test)]
#[path = "../../tests/unit/worker/cli.rs"]
mod tests;
