use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::env::resolver::EnvironmentConfig;
use crate::foundation::error::{BridgeError, BridgeResult};

/// Everything a [`Supervisor`](crate::Supervisor) needs, loadable from TOML.
///
/// ```toml
/// [environment]
/// project_root = "/opt/charts"
/// ambient = ["chart-worker"]
///
/// [environment.dependencies]
/// manifest = "requirements.txt"
///
/// [worker]
/// fast = true
/// render_timeout_ms = 8000
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SupervisorConfig {
    pub environment: EnvironmentConfig,
    pub worker: WorkerConfig,
}

/// Launch and lifetime settings for worker processes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WorkerConfig {
    pub width: u32,
    pub height: u32,
    pub dpi: u32,
    /// Pass `--fast` to every worker.
    pub fast: bool,
    /// Passed as `--output-dir` when set.
    pub output_dir: Option<PathBuf>,
    /// Where temporary request files go; the system temp dir when unset.
    pub request_dir: Option<PathBuf>,
    pub render_timeout_ms: u64,
    /// Time a warm worker gets to print its readiness line.
    pub startup_timeout_ms: u64,
    /// Idle window handed to warm workers.
    pub idle_timeout_secs: u64,
    /// A warm worker is replaced this long before its idle window ends.
    pub idle_margin_secs: u64,
    pub shutdown_grace_ms: u64,
    /// Stderr lines kept for error reports.
    pub stderr_lines: usize,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            dpi: 100,
            fast: false,
            output_dir: None,
            request_dir: None,
            render_timeout_ms: 8_000,
            startup_timeout_ms: 5_000,
            idle_timeout_secs: 3_600,
            idle_margin_secs: 60,
            shutdown_grace_ms: 1_000,
            stderr_lines: 50,
        }
    }
}

impl WorkerConfig {
    pub fn render_timeout(&self) -> Duration {
        Duration::from_millis(self.render_timeout_ms)
    }

    pub fn startup_timeout(&self) -> Duration {
        Duration::from_millis(self.startup_timeout_ms)
    }

    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_millis(self.shutdown_grace_ms)
    }

    /// How long a warm worker may sit idle before it is replaced.
    pub fn reuse_window(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs.saturating_sub(self.idle_margin_secs))
    }

    /// Arguments shared by cold and warm launches.
    pub(crate) fn common_args(&self) -> Vec<String> {
        let mut args = Vec::new();
        if self.fast {
            args.push("--fast".to_owned());
        }
        if let Some(dir) = &self.output_dir {
            args.push("--output-dir".to_owned());
            args.push(dir.display().to_string());
        }
        args
    }
}

impl SupervisorConfig {
    pub fn from_toml(text: &str) -> BridgeResult<Self> {
        let cfg: Self =
            toml::from_str(text).map_err(|e| BridgeError::config(format!("invalid config: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_file(path: &Path) -> BridgeResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            BridgeError::config(format!("failed to read config '{}': {e}", path.display()))
        })?;
        Self::from_toml(&text)
    }

    pub fn validate(&self) -> BridgeResult<()> {
        let w = &self.worker;
        if w.width == 0 || w.height == 0 || w.dpi == 0 {
            return Err(BridgeError::config("worker width, height and dpi must be non-zero"));
        }
        if w.render_timeout_ms == 0 || w.startup_timeout_ms == 0 {
            return Err(BridgeError::config("worker timeouts must be non-zero"));
        }
        if w.idle_timeout_secs <= w.idle_margin_secs {
            return Err(BridgeError::config(format!(
                "idle_timeout_secs ({}) must exceed idle_margin_secs ({})",
                w.idle_timeout_secs, w.idle_margin_secs
            )));
        }
        if self.environment.program.trim().is_empty() {
            return Err(BridgeError::config("environment.program must not be empty"));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/supervisor/config.rs"]
mod tests;
