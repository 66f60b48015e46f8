use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::env::deps::{DependencyConfig, verify_dependencies};
use crate::env::probe::probe_runtime;
use crate::foundation::error::{BridgeError, BridgeResult, ErrorKind};

/// Where to look for the worker runtime and how to vet it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentConfig {
    /// Search root; defaults to the directory of the running executable (or the folder holding
    /// its `.app` bundle).
    pub project_root: Option<PathBuf>,
    /// Name of the project-local runtime directory.
    pub isolated_dir: String,
    /// How many parents of the project root are searched as well.
    pub search_parents: usize,
    /// Executable name inside `<isolated_dir>/bin`.
    pub program: String,
    /// Ambient candidates, tried in order. Bare names are looked up next to the running
    /// executable and then on `PATH`.
    pub ambient: Vec<String>,
    /// Arguments placed before the worker arguments on every launch.
    pub launch_args: Vec<String>,
    pub probe_args: Vec<String>,
    pub probe_timeout_ms: u64,
    /// Dependency verification; skipped when absent.
    pub dependencies: Option<DependencyConfig>,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            project_root: None,
            isolated_dir: "runtime".to_owned(),
            search_parents: 3,
            program: "chart-worker".to_owned(),
            ambient: vec!["chart-worker".to_owned()],
            launch_args: Vec::new(),
            probe_args: vec!["--version".to_owned()],
            probe_timeout_ms: 1000,
            dependencies: None,
        }
    }
}

impl EnvironmentConfig {
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }

    /// Configured root, or the application root of the running executable.
    pub fn root(&self) -> PathBuf {
        if let Some(root) = &self.project_root {
            return root.clone();
        }
        std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(app_root))
            .or_else(|| std::env::current_dir().ok())
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Isolated runtime locations in search order, without duplicates.
    pub fn isolated_candidates(&self) -> Vec<PathBuf> {
        let root = self.root();
        let mut dirs: Vec<PathBuf> = root
            .ancestors()
            .take(self.search_parents + 1)
            .map(Path::to_path_buf)
            .collect();
        if let Ok(cwd) = std::env::current_dir() {
            dirs.push(cwd);
        }

        let mut out: Vec<PathBuf> = Vec::new();
        for dir in dirs {
            let candidate = isolated_program(&dir.join(&self.isolated_dir), &self.program);
            if !out.contains(&candidate) {
                out.push(candidate);
            }
        }
        out
    }
}

fn isolated_program(runtime_dir: &Path, program: &str) -> PathBuf {
    if cfg!(windows) {
        runtime_dir.join("Scripts").join(format!("{program}.exe"))
    } else {
        runtime_dir.join("bin").join(program)
    }
}

/// Folder that holds the application: the parent of an enclosing `.app` bundle, else `exe_dir`.
pub fn app_root(exe_dir: &Path) -> PathBuf {
    exe_dir
        .ancestors()
        .find(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.ends_with(".app"))
        })
        .and_then(Path::parent)
        .unwrap_or(exe_dir)
        .to_path_buf()
}

/// Look up a program: paths are taken as given, bare names are searched next to the running
/// executable and then in `PATH`.
pub fn find_program(name: &str) -> Option<PathBuf> {
    let as_path = Path::new(name);
    if as_path.components().count() > 1 || as_path.is_absolute() {
        return as_path.is_file().then(|| as_path.to_path_buf());
    }

    let file_name = if cfg!(windows) && as_path.extension().is_none() {
        format!("{name}.exe")
    } else {
        name.to_owned()
    };

    let beside_exe = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf));
    let path_dirs = std::env::var_os("PATH")
        .map(|p| std::env::split_paths(&p).collect::<Vec<_>>())
        .unwrap_or_default();

    beside_exe
        .into_iter()
        .chain(path_dirs)
        .map(|dir| dir.join(&file_name))
        .find(|p| p.is_file())
}

/// Whether the runtime is project-local or found in the ambient environment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RuntimeKind {
    Isolated,
    Ambient,
}

impl RuntimeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Isolated => "isolated",
            Self::Ambient => "ambient",
        }
    }
}

/// A vetted runtime the worker can be launched through.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EnvironmentDescriptor {
    pub runtime: PathBuf,
    pub kind: RuntimeKind,
    /// Placed before the worker arguments.
    pub launch_args: Vec<String>,
    pub manifest: Option<PathBuf>,
    pub dependencies_verified: bool,
    /// First line printed by the probe.
    pub version: Option<String>,
}

impl EnvironmentDescriptor {
    /// Descriptor for a known runtime, skipping discovery and probing.
    pub fn ambient(runtime: impl Into<PathBuf>) -> Self {
        Self {
            runtime: runtime.into(),
            kind: RuntimeKind::Ambient,
            launch_args: Vec::new(),
            manifest: None,
            dependencies_verified: false,
            version: None,
        }
    }

    /// The cached runtime is still on disk.
    pub fn is_valid(&self) -> bool {
        self.runtime.is_file()
    }
}

enum Cache {
    Empty,
    Resolved(EnvironmentDescriptor),
    Failed(ErrorKind, String),
}

/// Finds the worker runtime once and remembers the outcome.
///
/// A resolved runtime is re-resolved only when its file disappears. A failure sticks until
/// [`EnvironmentResolver::reset`].
pub struct EnvironmentResolver {
    config: EnvironmentConfig,
    cache: Mutex<Cache>,
}

impl EnvironmentResolver {
    pub fn new(config: EnvironmentConfig) -> Self {
        Self {
            config,
            cache: Mutex::new(Cache::Empty),
        }
    }

    /// Resolver that always hands out `descriptor` while it stays valid.
    pub fn preseeded(config: EnvironmentConfig, descriptor: EnvironmentDescriptor) -> Self {
        Self {
            config,
            cache: Mutex::new(Cache::Resolved(descriptor)),
        }
    }

    pub fn config(&self) -> &EnvironmentConfig {
        &self.config
    }

    /// Forget the cached outcome; the next [`resolve`](Self::resolve) searches again.
    pub async fn reset(&self) {
        *self.cache.lock().await = Cache::Empty;
    }

    pub async fn resolve(&self) -> BridgeResult<EnvironmentDescriptor> {
        let mut cache = self.cache.lock().await;
        match &*cache {
            Cache::Resolved(desc) if desc.is_valid() => return Ok(desc.clone()),
            Cache::Resolved(desc) => {
                tracing::warn!(runtime = %desc.runtime.display(), "cached runtime vanished; resolving again");
            }
            Cache::Failed(kind, msg) => return Err(BridgeError::from_kind(*kind, msg.clone())),
            Cache::Empty => {}
        }

        match self.discover().await {
            Ok(desc) => {
                tracing::info!(
                    runtime = %desc.runtime.display(),
                    kind = desc.kind.as_str(),
                    version = desc.version.as_deref().unwrap_or("unknown"),
                    "runtime resolved"
                );
                *cache = Cache::Resolved(desc.clone());
                Ok(desc)
            }
            Err(e) => {
                tracing::error!(error = %e, "no usable runtime");
                *cache = Cache::Failed(e.kind(), e.message());
                Err(e)
            }
        }
    }

    #[tracing::instrument(skip(self))]
    async fn discover(&self) -> BridgeResult<EnvironmentDescriptor> {
        let root = self.config.root();
        let mut dependency_error = None;

        for candidate in self.config.isolated_candidates() {
            if !candidate.is_file() {
                continue;
            }
            match self.vet(candidate, RuntimeKind::Isolated, &root).await {
                Ok(Some(desc)) => return Ok(desc),
                Ok(None) => continue,
                Err(e) => {
                    tracing::warn!(error = %e, "abandoning isolated runtime");
                    dependency_error = Some(e);
                    break;
                }
            }
        }

        tracing::warn!("no isolated runtime usable; falling back to the ambient runtime");
        for name in &self.config.ambient {
            let Some(candidate) = find_program(name) else {
                tracing::debug!(candidate = %name, "ambient candidate not found");
                continue;
            };
            match self.vet(candidate, RuntimeKind::Ambient, &root).await {
                Ok(Some(desc)) => return Ok(desc),
                Ok(None) => continue,
                Err(e) => dependency_error = Some(e),
            }
        }

        match dependency_error {
            Some(e) => Err(e),
            None => Err(BridgeError::environment(format!(
                "no usable '{}' runtime under '{}' or among ambient candidates {:?}",
                self.config.program,
                root.display(),
                self.config.ambient
            ))),
        }
    }

    /// `Ok(None)` when the probe fails, `Err` only for dependency failures.
    async fn vet(
        &self,
        runtime: PathBuf,
        kind: RuntimeKind,
        root: &Path,
    ) -> BridgeResult<Option<EnvironmentDescriptor>> {
        let version = match probe_runtime(
            &runtime,
            &self.config.probe_args,
            self.config.probe_timeout(),
        )
        .await
        {
            Ok(v) => v,
            Err(e) => {
                tracing::debug!(runtime = %runtime.display(), error = %e, "probe failed");
                return Ok(None);
            }
        };

        let mut desc = EnvironmentDescriptor {
            runtime,
            kind,
            launch_args: self.config.launch_args.clone(),
            manifest: None,
            dependencies_verified: false,
            version,
        };
        if let Some(deps) = &self.config.dependencies {
            desc.manifest = deps.manifest_in(root);
            verify_dependencies(&desc.runtime, deps, desc.manifest.as_deref()).await?;
            desc.dependencies_verified = true;
        }
        Ok(Some(desc))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/env/resolver.rs"]
mod tests;
