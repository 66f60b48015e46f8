use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::env::probe::run_command;
use crate::foundation::error::{BridgeError, BridgeResult};

/// Replaced by the manifest path in [`DependencyConfig::install_args`].
pub const MANIFEST_PLACEHOLDER: &str = "{manifest}";

/// How to check for, and install, the packages the worker runtime needs.
///
/// Every command is run as `<runtime> <args..>`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DependencyConfig {
    /// Exits successfully when the dependencies are importable.
    pub check_args: Vec<String>,
    /// Manifest file, relative paths resolved against the project root.
    pub manifest: Option<PathBuf>,
    /// Manifest-driven install.
    pub install_args: Vec<String>,
    /// Install of a fixed package set, tried when the manifest install fails.
    pub fallback_args: Vec<String>,
    pub timeout_ms: u64,
}

impl Default for DependencyConfig {
    fn default() -> Self {
        Self {
            check_args: strings(&["-c", "import matplotlib, numpy"]),
            manifest: Some(PathBuf::from("requirements.txt")),
            install_args: strings(&["-m", "pip", "install", "-r", MANIFEST_PLACEHOLDER]),
            fallback_args: strings(&["-m", "pip", "install", "matplotlib", "numpy"]),
            timeout_ms: 300_000,
        }
    }
}

fn strings(v: &[&str]) -> Vec<String> {
    v.iter().map(|s| (*s).to_owned()).collect()
}

impl DependencyConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Manifest path resolved against `root`, if configured.
    pub fn manifest_in(&self, root: &Path) -> Option<PathBuf> {
        self.manifest.as_ref().map(|m| {
            if m.is_absolute() {
                m.clone()
            } else {
                root.join(m)
            }
        })
    }

    fn install_args_for(&self, manifest: &Path) -> Vec<String> {
        let manifest = manifest.display().to_string();
        self.install_args
            .iter()
            .map(|a| a.replace(MANIFEST_PLACEHOLDER, &manifest))
            .collect()
    }
}

async fn succeeds(runtime: &Path, args: &[String], timeout: Duration) -> bool {
    if args.is_empty() {
        return false;
    }
    match run_command(runtime, args, timeout).await {
        Ok(out) if out.success => true,
        Ok(out) => {
            tracing::debug!(code = ?out.code, stderr = %out.stderr.trim(), ?args, "command failed");
            false
        }
        Err(e) => {
            tracing::debug!(error = %e, ?args, "command did not run");
            false
        }
    }
}

/// Make sure `runtime` has its dependencies: check, else install from the manifest, else the
/// fallback package set. Each install is followed by a fresh check.
#[tracing::instrument(skip(cfg), fields(runtime = %runtime.display()))]
pub async fn verify_dependencies(
    runtime: &Path,
    cfg: &DependencyConfig,
    manifest: Option<&Path>,
) -> BridgeResult<()> {
    let timeout = cfg.timeout();
    if cfg.check_args.is_empty() || succeeds(runtime, &cfg.check_args, timeout).await {
        return Ok(());
    }

    if let Some(manifest) = manifest.filter(|m| m.is_file()) {
        tracing::info!(manifest = %manifest.display(), "installing dependencies from manifest");
        if succeeds(runtime, &cfg.install_args_for(manifest), timeout).await
            && succeeds(runtime, &cfg.check_args, timeout).await
        {
            return Ok(());
        }
        tracing::warn!("manifest install failed; trying fallback package set");
    }

    if succeeds(runtime, &cfg.fallback_args, timeout).await
        && succeeds(runtime, &cfg.check_args, timeout).await
    {
        return Ok(());
    }

    Err(BridgeError::dependency(format!(
        "could not install rendering dependencies into '{}'",
        runtime.display()
    )))
}

#[cfg(test)]
#[path = "../../tests/unit/env/deps.rs"]
mod tests;
