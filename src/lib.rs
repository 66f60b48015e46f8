//! chartbridge renders charts in a separate worker process.
//!
//! The host builds a [`ChartRequest`], hands it to a [`Supervisor`], and gets back the path of a
//! PNG written by the `chart-worker` binary. The supervisor finds the runtime the worker runs in,
//! launches it cold (one process per chart) or keeps one warm, and turns crashes, timeouts and
//! malformed requests into typed [`BridgeError`]s.
//!
//! The worker side ([`worker`]) reads a request, draws it with the CPU renderer and prints
//! `Chart generated: <path>` as its final stdout line.
#![forbid(unsafe_code)]

mod foundation;

pub(crate) mod model;
pub(crate) mod render;

/// Locating and vetting the worker runtime.
pub mod env;
/// Tracing subscriber setup.
pub mod logging;
/// Worker process supervision.
pub mod supervisor;
/// The `chart-worker` side of the bridge.
pub mod worker;

pub use crate::foundation::core::{BezPath, Point, Rect, Rgba8};
pub use crate::foundation::error::{BridgeError, BridgeResult, ErrorKind};

pub use crate::env::resolver::{
    EnvironmentConfig, EnvironmentDescriptor, EnvironmentResolver, RuntimeKind,
};
pub use crate::model::builder::{ChartRequestBuilder, hsv_color, sine_waves};
pub use crate::model::request::{ChartRequest, SeriesSpec, SkipReason};
pub use crate::model::style::{ChartType, LineStyle, Marker};
pub use crate::render::backend::{
    BackendKind, ChartBackend, FrameRGBA, RenderOpts, create_backend,
};
pub use crate::render::color::parse_color;
pub use crate::render::engine::{OUTPUT_DIR_ENV, RenderEngine, RenderOutput, default_output_dir};
pub use crate::render::plan::{
    ChartContent, ChartPlan, DrawOp, SeriesContent, SkippedSeries, TextAnchor, TextLabel,
    compile_chart,
};
pub use crate::render::text::FONT_DIR_ENV;
pub use crate::supervisor::config::{SupervisorConfig, WorkerConfig};
pub use crate::supervisor::state::WorkerState;
pub use crate::supervisor::{RenderMode, RenderResult, RenderSize, Supervisor};

#[cfg(test)]
#[path = "../tests/unit/support.rs"]
mod test_support;
