//! Line protocol spoken between the supervisor and `chart-worker`.
//!
//! stdout carries exactly one machine-readable line per render:
//!
//! - `Chart generated: <path>` on success,
//! - `Chart failed (<kind>): <message>` when a preloaded worker rejects a job.
//!
//! A preloaded worker first prints `Chart backend ready`. Everything else the worker emits
//! goes to stderr and is diagnostic only.

use std::path::{Path, PathBuf};

use crate::foundation::error::{BridgeError, BridgeResult, ErrorKind};

/// Prefix of the success line.
pub const SUCCESS_PREFIX: &str = "Chart generated: ";
/// Prefix of a per-job failure line in preload mode.
pub const FAILURE_PREFIX: &str = "Chart failed (";
/// Printed once by a preloaded worker before it accepts jobs.
pub const READY_LINE: &str = "Chart backend ready";
/// Control line asking a preloaded worker to exit cleanly.
pub const SHUTDOWN_COMMAND: &str = "shutdown";

pub const EXIT_OK: i32 = 0;
pub const EXIT_RENDER: i32 = 1;
pub const EXIT_PROTOCOL: i32 = 2;
pub const EXIT_IO: i32 = 3;

/// Process exit code reported for an error of `kind`.
pub fn exit_code_for(kind: ErrorKind) -> i32 {
    match kind {
        ErrorKind::Protocol | ErrorKind::Config => EXIT_PROTOCOL,
        ErrorKind::Io => EXIT_IO,
        _ => EXIT_RENDER,
    }
}

/// Error kind implied by a non-zero worker exit code.
pub fn kind_for_exit_code(code: i32) -> ErrorKind {
    match code {
        EXIT_PROTOCOL => ErrorKind::Protocol,
        EXIT_IO => ErrorKind::Io,
        _ => ErrorKind::Render,
    }
}

pub fn success_line(image_path: &Path) -> String {
    format!("{SUCCESS_PREFIX}{}", image_path.display())
}

/// Single-line failure report; embedded newlines are flattened.
pub fn failure_line(err: &BridgeError) -> String {
    let msg = err.message().replace(['\r', '\n'], " ");
    format!("{FAILURE_PREFIX}{}): {msg}", err.kind())
}

/// Meaning of one stdout line from the worker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WorkerLine {
    /// A chart was written to this path.
    Generated(PathBuf),
    /// A preloaded worker rejected a job.
    Failed { kind: ErrorKind, message: String },
    /// The preloaded worker accepts jobs.
    Ready,
    /// Anything else.
    Diagnostic(String),
}

impl WorkerLine {
    pub fn classify(line: &str) -> Self {
        let line = line.trim_end_matches(['\r', '\n']);
        if let Some(path) = line.strip_prefix(SUCCESS_PREFIX) {
            let path = path.trim();
            if !path.is_empty() {
                return Self::Generated(PathBuf::from(path));
            }
        }
        if let Some(rest) = line.strip_prefix(FAILURE_PREFIX)
            && let Some((kind, message)) = rest.split_once("): ")
        {
            return Self::Failed {
                kind: ErrorKind::parse(kind),
                message: message.to_owned(),
            };
        }
        if line.trim() == READY_LINE {
            return Self::Ready;
        }
        Self::Diagnostic(line.to_owned())
    }
}

/// One render job sent to a preloaded worker as a JSON line.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RenderJob {
    /// File holding the request JSON.
    pub request_path: PathBuf,
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    #[serde(default = "default_dpi")]
    pub dpi: u32,
}

fn default_width() -> u32 {
    800
}

fn default_height() -> u32 {
    600
}

fn default_dpi() -> u32 {
    100
}

impl RenderJob {
    pub fn to_line(&self) -> BridgeResult<String> {
        serde_json::to_string(self).map_err(|e| BridgeError::protocol(format!("encode job: {e}")))
    }

    pub fn parse_line(line: &str) -> BridgeResult<Self> {
        serde_json::from_str(line.trim())
            .map_err(|e| BridgeError::protocol(format!("invalid job line: {e}")))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/worker/protocol.rs"]
mod tests;
