//! Launching and supervising `chart-worker` processes.
//!
//! A [`Supervisor`] resolves the worker runtime once, then serves each render either cold (a
//! fresh worker per request) or warm (one preloaded worker reused across requests).

pub mod config;
pub mod process;
pub mod state;

mod cold;
mod warm;

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;

use crate::env::resolver::{EnvironmentDescriptor, EnvironmentResolver};
use crate::foundation::error::{BridgeError, BridgeResult};
use crate::model::request::ChartRequest;
use config::SupervisorConfig;
use state::WorkerState;
use warm::WarmWorker;

/// How a render is dispatched.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum RenderMode {
    /// Fresh worker per request.
    #[default]
    Cold,
    /// Reuse the preloaded worker, launching it on demand.
    Warm,
}

impl std::str::FromStr for RenderMode {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cold" => Ok(Self::Cold),
            "warm" | "preload" => Ok(Self::Warm),
            other => Err(BridgeError::config(format!("unknown render mode '{other}'"))),
        }
    }
}

/// Output geometry of one render.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderSize {
    pub width: u32,
    pub height: u32,
    pub dpi: u32,
}

impl RenderSize {
    pub fn new(width: u32, height: u32, dpi: u32) -> Self {
        Self { width, height, dpi }
    }
}

/// A chart the worker produced.
#[derive(Clone, Debug)]
pub struct RenderResult {
    pub image_path: PathBuf,
    /// Other stdout lines the worker printed for this request.
    pub diagnostics: Vec<String>,
    pub elapsed: Duration,
}

struct Inner {
    config: SupervisorConfig,
    resolver: EnvironmentResolver,
    warm: Mutex<Option<WarmWorker>>,
}

/// Cheap-to-clone handle; all clones share the runtime cache and the warm worker.
#[derive(Clone)]
pub struct Supervisor {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for Supervisor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Supervisor")
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}

impl Supervisor {
    pub fn new(config: SupervisorConfig) -> Self {
        let resolver = EnvironmentResolver::new(config.environment.clone());
        Self::from_parts(config, resolver)
    }

    /// Supervisor that launches workers through `descriptor` without searching.
    pub fn with_environment(config: SupervisorConfig, descriptor: EnvironmentDescriptor) -> Self {
        let resolver = EnvironmentResolver::preseeded(config.environment.clone(), descriptor);
        Self::from_parts(config, resolver)
    }

    fn from_parts(config: SupervisorConfig, resolver: EnvironmentResolver) -> Self {
        Self {
            inner: Arc::new(Inner {
                config,
                resolver,
                warm: Mutex::new(None),
            }),
        }
    }

    pub fn config(&self) -> &SupervisorConfig {
        &self.inner.config
    }

    /// Resolve the runtime (and verify dependencies) now instead of on the first render.
    pub async fn initialize(&self) -> BridgeResult<EnvironmentDescriptor> {
        self.inner.resolver.resolve().await
    }

    pub async fn is_available(&self) -> bool {
        self.inner.resolver.resolve().await.is_ok()
    }

    /// Forget a cached runtime or failure, and stop the warm worker that used it.
    pub async fn reset_environment(&self) {
        self.stop_warm().await;
        self.inner.resolver.reset().await;
    }

    /// Render at the configured default size.
    pub async fn render(
        &self,
        request: &ChartRequest,
        mode: RenderMode,
        timeout: Duration,
    ) -> BridgeResult<RenderResult> {
        let w = &self.inner.config.worker;
        let size = RenderSize::new(w.width, w.height, w.dpi);
        self.render_sized(request, size, mode, timeout).await
    }

    /// Parse a raw JSON request and render it.
    pub async fn render_json(
        &self,
        raw: &str,
        mode: RenderMode,
        timeout: Duration,
    ) -> BridgeResult<RenderResult> {
        let request = ChartRequest::parse(raw)?;
        self.render(&request, mode, timeout).await
    }

    #[tracing::instrument(skip(self, request), fields(series = request.series.len()))]
    pub async fn render_sized(
        &self,
        request: &ChartRequest,
        size: RenderSize,
        mode: RenderMode,
        timeout: Duration,
    ) -> BridgeResult<RenderResult> {
        let started = Instant::now();
        request.validate()?;
        if size.width == 0 || size.height == 0 || size.dpi == 0 {
            return Err(BridgeError::protocol(format!(
                "image size must be non-zero, got {}x{} at {} dpi",
                size.width, size.height, size.dpi
            )));
        }

        let desc = self.inner.resolver.resolve().await?;
        let request_file = self.write_request(request)?;

        let result = match mode {
            RenderMode::Cold => {
                cold::render_cold(&desc, &self.inner.config.worker, request_file.path(), size, timeout)
                    .await
            }
            RenderMode::Warm => self.render_warm(&desc, request_file.path(), size, timeout).await,
        };

        match &result {
            Ok(out) => tracing::info!(
                path = %out.image_path.display(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "chart rendered"
            ),
            Err(e) => tracing::warn!(kind = %e.kind(), error = %e, "render failed"),
        }
        result.map(|out| RenderResult {
            elapsed: started.elapsed(),
            ..out
        })
    }

    async fn render_warm(
        &self,
        desc: &EnvironmentDescriptor,
        request_path: &std::path::Path,
        size: RenderSize,
        timeout: Duration,
    ) -> BridgeResult<RenderResult> {
        let started = Instant::now();
        let mut slot = self.inner.warm.lock().await;
        let worker = self.ensure_warm(&mut slot, desc).await?;

        let outcome = worker.render(request_path, size, timeout).await;
        if worker.state() != WorkerState::Ready {
            // Crashed or timed out; the next request launches a replacement.
            *slot = None;
        }
        let (image_path, diagnostics) = outcome?;
        if !image_path.is_file() {
            return Err(BridgeError::render(format!(
                "worker reported '{}' but no such file exists",
                image_path.display()
            )));
        }
        Ok(RenderResult {
            image_path,
            diagnostics,
            elapsed: started.elapsed(),
        })
    }

    /// The slot's worker if reusable, otherwise a freshly launched one.
    async fn ensure_warm<'a>(
        &self,
        slot: &'a mut Option<WarmWorker>,
        desc: &EnvironmentDescriptor,
    ) -> BridgeResult<&'a mut WarmWorker> {
        let cfg = &self.inner.config.worker;
        if let Some(mut stale) = slot.take() {
            if stale.is_reusable() {
                return Ok(slot.insert(stale));
            }
            tracing::info!(pid = ?stale.pid(), state = %stale.state(), "replacing warm worker");
            stale.shutdown(cfg.shutdown_grace()).await;
        }
        let worker = WarmWorker::launch(desc, cfg).await?;
        Ok(slot.insert(worker))
    }

    /// Launch the warm worker now so the first warm render does not pay for startup.
    pub async fn warm_up(&self) -> BridgeResult<()> {
        let desc = self.inner.resolver.resolve().await?;
        let mut slot = self.inner.warm.lock().await;
        self.ensure_warm(&mut slot, &desc).await.map(|_| ())
    }

    /// State of the warm worker, if one exists.
    pub async fn warm_state(&self) -> Option<WorkerState> {
        self.inner.warm.lock().await.as_ref().map(WarmWorker::state)
    }

    pub async fn warm_worker_pid(&self) -> Option<u32> {
        self.inner.warm.lock().await.as_ref().and_then(WarmWorker::pid)
    }

    /// Stop the warm worker. Cold workers are never left running.
    pub async fn shutdown(&self) {
        self.stop_warm().await;
    }

    async fn stop_warm(&self) {
        let worker = self.inner.warm.lock().await.take();
        if let Some(worker) = worker {
            worker.shutdown(self.inner.config.worker.shutdown_grace()).await;
        }
    }

    /// Serialize `request` to a temporary file removed when the handle drops.
    fn write_request(&self, request: &ChartRequest) -> BridgeResult<tempfile::NamedTempFile> {
        let dir = self
            .inner
            .config
            .worker
            .request_dir
            .clone()
            .unwrap_or_else(std::env::temp_dir);
        std::fs::create_dir_all(&dir).map_err(|e| {
            BridgeError::io(format!("failed to create request dir '{}': {e}", dir.display()))
        })?;
        let mut file = tempfile::Builder::new()
            .prefix("chart_request_")
            .suffix(".json")
            .tempfile_in(&dir)
            .map_err(|e| BridgeError::io(format!("failed to create request file: {e}")))?;
        let json = request.to_json()?;
        file.write_all(json.as_bytes())
            .and_then(|()| file.flush())
            .map_err(|e| BridgeError::io(format!("failed to write request file: {e}")))?;
        Ok(file)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/supervisor/supervisor.rs"]
mod tests;
