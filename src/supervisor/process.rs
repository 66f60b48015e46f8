use std::collections::VecDeque;
use std::process::{ExitStatus, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::process::{Child, ChildStdin, ChildStdout};
use tokio::task::JoinHandle;

use crate::env::resolver::EnvironmentDescriptor;
use crate::foundation::error::{BridgeError, BridgeResult, ErrorKind};
use crate::supervisor::state::WorkerState;
use crate::worker::protocol::kind_for_exit_code;

/// Environment toggles set on every launch: no bytecode caching, unbuffered output.
pub const WORKER_ENV: [(&str, &str); 2] = [
    ("PYTHONDONTWRITEBYTECODE", "1"),
    ("PYTHONUNBUFFERED", "1"),
];

const STDERR_DRAIN: Duration = Duration::from_millis(500);

/// Last `cap` stderr lines of a worker.
#[derive(Clone, Debug)]
pub(crate) struct StderrTail {
    lines: Arc<Mutex<VecDeque<String>>>,
    cap: usize,
}

impl StderrTail {
    pub(crate) fn new(cap: usize) -> Self {
        Self {
            lines: Arc::new(Mutex::new(VecDeque::with_capacity(cap.min(256)))),
            cap: cap.max(1),
        }
    }

    pub(crate) fn push(&self, line: String) {
        let mut lines = self.lines.lock();
        if lines.len() == self.cap {
            lines.pop_front();
        }
        lines.push_back(line);
    }

    pub(crate) fn snapshot(&self) -> Vec<String> {
        self.lines.lock().iter().cloned().collect()
    }
}

/// A running worker child with piped stdio.
pub struct WorkerProcess {
    child: Child,
    stdin: Option<ChildStdin>,
    stdout: Lines<BufReader<ChildStdout>>,
    stderr: StderrTail,
    stderr_task: Option<JoinHandle<()>>,
    state: WorkerState,
    pid: Option<u32>,
    last_activity: Instant,
}

impl WorkerProcess {
    /// Launch `<runtime> <launch_args..> <args..>`. The process is in [`WorkerState::Launching`].
    #[tracing::instrument(skip(desc), fields(runtime = %desc.runtime.display()))]
    pub fn spawn(
        desc: &EnvironmentDescriptor,
        args: &[String],
        stderr_lines: usize,
    ) -> BridgeResult<Self> {
        let mut cmd = tokio::process::Command::new(&desc.runtime);
        cmd.args(&desc.launch_args)
            .args(args)
            .envs(WORKER_ENV)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let mut child = cmd.spawn().map_err(|e| {
            BridgeError::render(format!(
                "failed to launch worker '{}': {e}",
                desc.runtime.display()
            ))
        })?;

        let stdin = child.stdin.take();
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| BridgeError::render("worker stdout was not captured"))?;
        let stderr_pipe = child
            .stderr
            .take()
            .ok_or_else(|| BridgeError::render("worker stderr was not captured"))?;

        let pid = child.id();
        let stderr = StderrTail::new(stderr_lines);
        let sink = stderr.clone();
        let stderr_task = tokio::spawn(async move {
            let mut lines = BufReader::new(stderr_pipe).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                tracing::debug!(target: "chartbridge::worker", pid = ?pid, "{line}");
                sink.push(line);
            }
        });

        tracing::debug!(pid = ?pid, "worker launched");
        Ok(Self {
            child,
            stdin,
            stdout: BufReader::new(stdout).lines(),
            stderr,
            stderr_task: Some(stderr_task),
            state: WorkerState::NotStarted.transition(WorkerState::Launching)?,
            pid,
            last_activity: Instant::now(),
        })
    }

    pub fn pid(&self) -> Option<u32> {
        self.pid
    }

    pub fn state(&self) -> WorkerState {
        self.state
    }

    pub fn transition(&mut self, next: WorkerState) -> BridgeResult<()> {
        self.state = self.state.transition(next)?;
        Ok(())
    }

    /// Move to [`WorkerState::Failed`] unless already terminal.
    pub fn mark_failed(&mut self) {
        if !self.state.is_terminal() {
            self.state = WorkerState::Failed;
        }
    }

    pub fn touch(&mut self) {
        self.last_activity = Instant::now();
    }

    pub fn idle_for(&self) -> Duration {
        self.last_activity.elapsed()
    }

    /// Next stdout line, or `None` at end of stream.
    pub async fn next_line(&mut self) -> BridgeResult<Option<String>> {
        self.stdout
            .next_line()
            .await
            .map_err(|e| BridgeError::render(format!("failed to read worker stdout: {e}")))
    }

    pub async fn send_line(&mut self, line: &str) -> BridgeResult<()> {
        let stdin = self
            .stdin
            .as_mut()
            .ok_or_else(|| BridgeError::render("worker stdin is closed"))?;
        let mut buf = Vec::with_capacity(line.len() + 1);
        buf.extend_from_slice(line.as_bytes());
        buf.push(b'\n');
        stdin
            .write_all(&buf)
            .await
            .map_err(|e| BridgeError::render(format!("failed to write to worker: {e}")))?;
        stdin
            .flush()
            .await
            .map_err(|e| BridgeError::render(format!("failed to write to worker: {e}")))
    }

    pub fn close_stdin(&mut self) {
        self.stdin = None;
    }

    /// Whether the child has already exited.
    pub fn has_exited(&mut self) -> bool {
        !matches!(self.child.try_wait(), Ok(None))
    }

    pub async fn wait(&mut self) -> BridgeResult<ExitStatus> {
        self.child
            .wait()
            .await
            .map_err(|e| BridgeError::render(format!("failed to wait for worker: {e}")))
    }

    /// Kill the child and reap it; errors are logged, not returned.
    pub async fn kill(&mut self) {
        if let Err(e) = self.child.kill().await {
            tracing::debug!(pid = ?self.pid, error = %e, "kill failed");
        }
    }

    /// Let the stderr reader catch up, then return the retained lines.
    pub async fn stderr_tail(&mut self) -> Vec<String> {
        if let Some(task) = self.stderr_task.take() {
            let _ = tokio::time::timeout(STDERR_DRAIN, task).await;
        }
        self.stderr.snapshot()
    }

    /// Typed error for a worker that ended with `status` without reporting a result.
    pub async fn exit_error(&mut self, status: Option<ExitStatus>) -> BridgeError {
        let tail = self.stderr_tail().await;
        let detail = if tail.is_empty() {
            "no stderr output".to_owned()
        } else {
            tail.join("\n")
        };
        match status.and_then(|s| s.code()) {
            Some(0) => BridgeError::render(format!(
                "worker exited without a result line; stderr:\n{detail}"
            )),
            Some(code) => {
                let kind = kind_for_exit_code(code);
                BridgeError::from_kind(
                    kind,
                    format!("worker exited with code {code}; stderr:\n{detail}"),
                )
            }
            None => BridgeError::from_kind(
                ErrorKind::Render,
                format!("worker terminated abnormally; stderr:\n{detail}"),
            ),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/supervisor/process.rs"]
mod tests;
