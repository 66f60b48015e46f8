use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::env::resolver::EnvironmentDescriptor;
use crate::foundation::error::{BridgeError, BridgeResult};
use crate::supervisor::config::WorkerConfig;
use crate::supervisor::process::WorkerProcess;
use crate::supervisor::state::WorkerState;
use crate::supervisor::RenderSize;
use crate::worker::protocol::{RenderJob, SHUTDOWN_COMMAND, WorkerLine};

type Reply = BridgeResult<(PathBuf, Vec<String>)>;

/// A preloaded worker serving one job at a time.
pub(crate) struct WarmWorker {
    process: WorkerProcess,
    reuse_window: Duration,
}

impl WarmWorker {
    /// Launch with `--preload` and wait for the readiness line.
    #[tracing::instrument(skip(desc, cfg), fields(runtime = %desc.runtime.display()))]
    pub(crate) async fn launch(desc: &EnvironmentDescriptor, cfg: &WorkerConfig) -> BridgeResult<Self> {
        let mut args = vec![
            "--preload".to_owned(),
            "--idle-timeout".to_owned(),
            cfg.idle_timeout_secs.to_string(),
        ];
        args.extend(cfg.common_args());

        let mut process = WorkerProcess::spawn(desc, &args, cfg.stderr_lines)?;
        let startup = cfg.startup_timeout();

        let ready = tokio::time::timeout(startup, async {
            loop {
                match process.next_line().await? {
                    Some(line) => match WorkerLine::classify(&line) {
                        WorkerLine::Ready => return Ok(true),
                        other => tracing::debug!(line = ?other, "output before readiness"),
                    },
                    None => return Ok::<_, BridgeError>(false),
                }
            }
        })
        .await;

        match ready {
            Ok(Ok(true)) => {
                process.transition(WorkerState::Ready)?;
                process.touch();
                tracing::info!(pid = ?process.pid(), "warm worker ready");
                Ok(Self {
                    process,
                    reuse_window: cfg.reuse_window(),
                })
            }
            Ok(Ok(false)) => {
                let status = process.wait().await.ok();
                let err = process.exit_error(status).await;
                process.mark_failed();
                Err(err)
            }
            Ok(Err(e)) => {
                process.kill().await;
                process.mark_failed();
                Err(e)
            }
            Err(_) => {
                process.kill().await;
                process.mark_failed();
                Err(BridgeError::timeout(format!(
                    "warm worker not ready within {} ms",
                    startup.as_millis()
                )))
            }
        }
    }

    pub(crate) fn state(&self) -> WorkerState {
        self.process.state()
    }

    pub(crate) fn pid(&self) -> Option<u32> {
        self.process.pid()
    }

    /// Ready, still running, and not about to hit its idle window.
    pub(crate) fn is_reusable(&mut self) -> bool {
        self.process.state() == WorkerState::Ready
            && self.process.idle_for() < self.reuse_window
            && !self.process.has_exited()
    }

    /// Run one job. On a crash or timeout the worker ends up [`WorkerState::Failed`]; a job the
    /// worker rejected leaves it [`WorkerState::Ready`].
    pub(crate) async fn render(
        &mut self,
        request_path: &Path,
        size: RenderSize,
        timeout: Duration,
    ) -> Reply {
        self.process.transition(WorkerState::Rendering)?;
        let job = RenderJob {
            request_path: request_path.to_path_buf(),
            width: size.width,
            height: size.height,
            dpi: size.dpi,
        };

        let process = &mut self.process;
        let outcome = tokio::time::timeout(timeout, async {
            process.send_line(&job.to_line()?).await?;
            let mut diagnostics = Vec::new();
            loop {
                let Some(line) = process.next_line().await? else {
                    return Ok::<Option<Reply>, BridgeError>(None);
                };
                match WorkerLine::classify(&line) {
                    WorkerLine::Generated(path) => return Ok(Some(Ok((path, diagnostics)))),
                    WorkerLine::Failed { kind, message } => {
                        return Ok(Some(Err(BridgeError::from_kind(kind, message))));
                    }
                    WorkerLine::Ready => {}
                    WorkerLine::Diagnostic(line) => diagnostics.push(line),
                }
            }
        })
        .await;

        match outcome {
            Ok(Ok(Some(reply))) => {
                self.process.transition(WorkerState::Ready)?;
                self.process.touch();
                reply
            }
            Ok(Ok(None)) => {
                let status = self.process.wait().await.ok();
                let err = self.process.exit_error(status).await;
                self.process.mark_failed();
                tracing::warn!(pid = ?self.process.pid(), error = %err, "warm worker exited mid-job");
                Err(err)
            }
            Ok(Err(e)) => {
                self.process.kill().await;
                self.process.mark_failed();
                Err(e)
            }
            Err(_) => {
                self.process.kill().await;
                self.process.mark_failed();
                tracing::warn!(pid = ?self.process.pid(), "warm worker timed out; killed");
                Err(BridgeError::timeout(format!(
                    "worker did not answer within {} ms",
                    timeout.as_millis()
                )))
            }
        }
    }

    /// Ask the worker to exit, then kill it if it outlives `grace`.
    pub(crate) async fn shutdown(mut self, grace: Duration) {
        if self.process.state() == WorkerState::Ready
            && let Err(e) = self.process.send_line(SHUTDOWN_COMMAND).await
        {
            tracing::debug!(error = %e, "shutdown line not delivered");
        }
        self.process.close_stdin();
        if tokio::time::timeout(grace, self.process.wait()).await.is_err() {
            tracing::debug!(pid = ?self.process.pid(), "worker ignored shutdown; killing");
            self.process.kill().await;
        }
        if self.process.state() == WorkerState::Ready {
            let _ = self.process.transition(WorkerState::Exited);
        }
        tracing::info!(pid = ?self.process.pid(), "warm worker stopped");
    }
}
