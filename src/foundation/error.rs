/// Convenience result type used across chartbridge.
pub type BridgeResult<T> = Result<T, BridgeError>;

/// Top-level error taxonomy shared by the model, renderer, worker and supervisor.
#[derive(thiserror::Error, Debug)]
pub enum BridgeError {
    /// No usable runtime (isolated or ambient) could be found.
    #[error("environment error: {0}")]
    Environment(String),

    /// Required rendering dependencies could not be installed.
    #[error("dependency error: {0}")]
    Dependency(String),

    /// The request failed schema validation.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// The worker crashed or the chart could not be drawn.
    #[error("render error: {0}")]
    Render(String),

    /// The worker did not produce a result before its deadline.
    #[error("timeout error: {0}")]
    Timeout(String),

    /// Reading a request or writing an image failed.
    #[error("io error: {0}")]
    Io(String),

    /// Invalid configuration file or options.
    #[error("config error: {0}")]
    Config(String),

    /// Wrapped lower-level error from dependencies.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Copyable discriminant of [`BridgeError`], used on the wire and for exit codes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// See [`BridgeError::Environment`].
    Environment,
    /// See [`BridgeError::Dependency`].
    Dependency,
    /// See [`BridgeError::Protocol`].
    Protocol,
    /// See [`BridgeError::Render`].
    Render,
    /// See [`BridgeError::Timeout`].
    Timeout,
    /// See [`BridgeError::Io`].
    Io,
    /// See [`BridgeError::Config`].
    Config,
    /// See [`BridgeError::Other`].
    Other,
}

impl ErrorKind {
    /// Stable lowercase name used in worker failure lines.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Environment => "environment",
            Self::Dependency => "dependency",
            Self::Protocol => "protocol",
            Self::Render => "render",
            Self::Timeout => "timeout",
            Self::Io => "io",
            Self::Config => "config",
            Self::Other => "other",
        }
    }

    /// Inverse of [`ErrorKind::as_str`]. Unknown names map to [`ErrorKind::Other`].
    pub fn parse(name: &str) -> Self {
        match name.trim() {
            "environment" => Self::Environment,
            "dependency" => Self::Dependency,
            "protocol" => Self::Protocol,
            "render" => Self::Render,
            "timeout" => Self::Timeout,
            "io" => Self::Io,
            "config" => Self::Config,
            _ => Self::Other,
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl BridgeError {
    /// Build a [`BridgeError::Environment`] value.
    pub fn environment(msg: impl Into<String>) -> Self {
        Self::Environment(msg.into())
    }

    /// Build a [`BridgeError::Dependency`] value.
    pub fn dependency(msg: impl Into<String>) -> Self {
        Self::Dependency(msg.into())
    }

    /// Build a [`BridgeError::Protocol`] value.
    pub fn protocol(msg: impl Into<String>) -> Self {
        Self::Protocol(msg.into())
    }

    /// Build a [`BridgeError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`BridgeError::Timeout`] value.
    pub fn timeout(msg: impl Into<String>) -> Self {
        Self::Timeout(msg.into())
    }

    /// Build a [`BridgeError::Io`] value.
    pub fn io(msg: impl Into<String>) -> Self {
        Self::Io(msg.into())
    }

    /// Build a [`BridgeError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Rebuild an error from its kind and message, e.g. after crossing the process boundary.
    pub fn from_kind(kind: ErrorKind, msg: impl Into<String>) -> Self {
        let msg = msg.into();
        match kind {
            ErrorKind::Environment => Self::Environment(msg),
            ErrorKind::Dependency => Self::Dependency(msg),
            ErrorKind::Protocol => Self::Protocol(msg),
            ErrorKind::Render => Self::Render(msg),
            ErrorKind::Timeout => Self::Timeout(msg),
            ErrorKind::Io => Self::Io(msg),
            ErrorKind::Config => Self::Config(msg),
            ErrorKind::Other => Self::Other(anyhow::anyhow!(msg)),
        }
    }

    /// Discriminant of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Environment(_) => ErrorKind::Environment,
            Self::Dependency(_) => ErrorKind::Dependency,
            Self::Protocol(_) => ErrorKind::Protocol,
            Self::Render(_) => ErrorKind::Render,
            Self::Timeout(_) => ErrorKind::Timeout,
            Self::Io(_) => ErrorKind::Io,
            Self::Config(_) => ErrorKind::Config,
            Self::Other(_) => ErrorKind::Other,
        }
    }

    /// The message without the kind prefix.
    pub fn message(&self) -> String {
        match self {
            Self::Environment(m)
            | Self::Dependency(m)
            | Self::Protocol(m)
            | Self::Render(m)
            | Self::Timeout(m)
            | Self::Io(m)
            | Self::Config(m) => m.clone(),
            Self::Other(e) => format!("{e:#}"),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
