use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use crate::foundation::error::{BridgeError, BridgeResult};

/// Captured result of a short helper command.
#[derive(Clone, Debug, Default)]
pub struct CommandOutput {
    pub success: bool,
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// First non-empty line of stdout, falling back to stderr.
    pub fn first_line(&self) -> Option<String> {
        self.stdout
            .lines()
            .chain(self.stderr.lines())
            .map(str::trim)
            .find(|l| !l.is_empty())
            .map(str::to_owned)
    }
}

/// Run `program args..` to completion with stdin closed, killing it after `timeout`.
pub async fn run_command(
    program: &Path,
    args: &[String],
    timeout: Duration,
) -> BridgeResult<CommandOutput> {
    let child = tokio::process::Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| {
            BridgeError::environment(format!("failed to start '{}': {e}", program.display()))
        })?;

    // Dropping the timed-out future drops the child, which kills it.
    let output = tokio::time::timeout(timeout, child.wait_with_output())
        .await
        .map_err(|_| {
            BridgeError::timeout(format!(
                "'{}' did not finish within {} ms",
                program.display(),
                timeout.as_millis()
            ))
        })?
        .map_err(|e| {
            BridgeError::environment(format!("failed to wait for '{}': {e}", program.display()))
        })?;

    Ok(CommandOutput {
        success: output.status.success(),
        code: output.status.code(),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
}

/// Check that `runtime` starts and exits successfully; returns its reported version line.
#[tracing::instrument(level = "debug", skip(args), fields(runtime = %runtime.display()))]
pub async fn probe_runtime(
    runtime: &Path,
    args: &[String],
    timeout: Duration,
) -> BridgeResult<Option<String>> {
    let out = run_command(runtime, args, timeout).await?;
    if !out.success {
        return Err(BridgeError::environment(format!(
            "probe of '{}' exited with {:?}",
            runtime.display(),
            out.code
        )));
    }
    Ok(out.first_line())
}

#[cfg(test)]
#[path = "../../tests/unit/env/probe.rs"]
mod tests;
