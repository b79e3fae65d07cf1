//! Shared error type across bizmetrics crates.

use thiserror::Error;

/// Stable error codes (used in logs and asserted by tests).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Invalid configuration.
    Config,
    /// Simulator started while not idle.
    AlreadyRunning,
    /// Simulator stopped while idle.
    NotRunning,
    /// Metric registration or encoding failed.
    Registry,
    /// Simulator task panicked or was aborted.
    Worker,
    /// Internal error.
    Internal,
}

impl ErrorCode {
    /// String representation used in log fields.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::Config => "CONFIG",
            ErrorCode::AlreadyRunning => "ALREADY_RUNNING",
            ErrorCode::NotRunning => "NOT_RUNNING",
            ErrorCode::Registry => "REGISTRY",
            ErrorCode::Worker => "WORKER",
            ErrorCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type used by core and server.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid config: {0}")]
    Config(String),
    #[error("simulator is already running")]
    AlreadyRunning,
    #[error("simulator is not running")]
    NotRunning,
    #[error("metrics registry: {0}")]
    Registry(String),
    #[error("simulator worker: {0}")]
    Worker(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl Error {
    /// Map the error to its stable code.
    pub fn code(&self) -> ErrorCode {
        match self {
            Error::Config(_) => ErrorCode::Config,
            Error::AlreadyRunning => ErrorCode::AlreadyRunning,
            Error::NotRunning => ErrorCode::NotRunning,
            Error::Registry(_) => ErrorCode::Registry,
            Error::Worker(_) => ErrorCode::Worker,
            Error::Internal(_) => ErrorCode::Internal,
        }
    }
}

impl From<prometheus::Error> for Error {
    fn from(e: prometheus::Error) -> Self {
        Error::Registry(e.to_string())
    }
}
