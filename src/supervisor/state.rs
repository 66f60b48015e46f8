use crate::foundation::error::{BridgeError, BridgeResult};

/// Lifecycle of one worker process.
///
/// ```text
/// NotStarted -> Launching -> Ready <-> Rendering
///                   |          |          |
///                   +-> Failed <----------+-> Exited
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkerState {
    #[default]
    NotStarted,
    Launching,
    Ready,
    Rendering,
    Exited,
    Failed,
}

impl WorkerState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotStarted => "not_started",
            Self::Launching => "launching",
            Self::Ready => "ready",
            Self::Rendering => "rendering",
            Self::Exited => "exited",
            Self::Failed => "failed",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Exited | Self::Failed)
    }

    pub fn can_transition_to(self, next: Self) -> bool {
        use WorkerState::*;
        matches!(
            (self, next),
            (NotStarted, Launching)
                | (Launching, Ready | Failed)
                | (Ready, Rendering | Exited | Failed)
                | (Rendering, Ready | Exited | Failed)
        )
    }

    /// The state after moving to `next`, or an error for an illegal move.
    pub fn transition(self, next: Self) -> BridgeResult<Self> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(BridgeError::render(format!(
                "illegal worker state transition {self} -> {next}"
            )))
        }
    }
}

impl std::fmt::Display for WorkerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/supervisor/state.rs"]
mod tests;
