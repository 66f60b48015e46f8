use std::path::Path;
use std::time::{Duration, Instant};

use crate::env::resolver::EnvironmentDescriptor;
use crate::foundation::error::{BridgeError, BridgeResult};
use crate::supervisor::config::WorkerConfig;
use crate::supervisor::process::WorkerProcess;
use crate::supervisor::state::WorkerState;
use crate::supervisor::{RenderResult, RenderSize};
use crate::worker::protocol::WorkerLine;

/// Launch one worker for `request_path`, wait for it, and discard it.
#[tracing::instrument(skip(desc, cfg), fields(runtime = %desc.runtime.display()))]
pub(crate) async fn render_cold(
    desc: &EnvironmentDescriptor,
    cfg: &WorkerConfig,
    request_path: &Path,
    size: RenderSize,
    timeout: Duration,
) -> BridgeResult<RenderResult> {
    let started = Instant::now();
    let mut args = vec![
        request_path.display().to_string(),
        size.width.to_string(),
        size.height.to_string(),
        size.dpi.to_string(),
    ];
    args.extend(cfg.common_args());

    let mut proc = WorkerProcess::spawn(desc, &args, cfg.stderr_lines)?;
    proc.transition(WorkerState::Ready)?;
    proc.transition(WorkerState::Rendering)?;

    let collected = tokio::time::timeout(timeout, async {
        let mut lines = Vec::new();
        while let Some(line) = proc.next_line().await? {
            lines.push(line);
        }
        let status = proc.wait().await?;
        Ok::<_, BridgeError>((lines, status))
    })
    .await;

    let (mut lines, status) = match collected {
        Ok(Ok(done)) => done,
        Ok(Err(e)) => {
            proc.kill().await;
            proc.mark_failed();
            return Err(e);
        }
        Err(_) => {
            proc.kill().await;
            proc.mark_failed();
            tracing::warn!(pid = ?proc.pid(), timeout_ms = timeout.as_millis() as u64, "worker timed out");
            return Err(BridgeError::timeout(format!(
                "worker did not finish within {} ms",
                timeout.as_millis()
            )));
        }
    };

    while lines.last().is_some_and(|l| l.trim().is_empty()) {
        lines.pop();
    }
    let image_path = match lines.last().map(|l| WorkerLine::classify(l)) {
        Some(WorkerLine::Generated(path)) if status.success() => {
            if !path.is_file() {
                proc.mark_failed();
                return Err(BridgeError::render(format!(
                    "worker reported '{}' but no such file exists",
                    path.display()
                )));
            }
            lines.pop();
            path
        }
        _ => {
            let err = proc.exit_error(Some(status)).await;
            proc.mark_failed();
            return Err(err);
        }
    };
    proc.transition(WorkerState::Exited)?;

    Ok(RenderResult {
        image_path,
        diagnostics: lines,
        elapsed: started.elapsed(),
    })
}
