//! Error types for the Biblio client

use thiserror::Error;

/// Failure classification carried alongside the user-facing message.
///
/// Every rejected operation collapses into one human-readable string, but
/// the kind keeps transport faults, HTTP status failures, local
/// precondition failures and decode failures distinguishable so callers
/// can differentiate policy without parsing message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// A local precondition failed; no request was issued.
    Precondition,
    /// Connect, IO or timeout fault before an HTTP status was received.
    Transport,
    /// The server answered with a non-success HTTP status.
    Status(u16),
    /// The response body could not be decoded.
    Decode,
}

/// Failure recorded in container state when an operation is rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct RequestError {
    pub kind: FailureKind,
    pub message: String,
}

impl RequestError {
    /// A failure raised before any network call.
    pub fn precondition(message: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::Precondition,
            message: message.into(),
        }
    }

    /// Flatten an API failure into the operation's user-facing message,
    /// keeping the structured kind.
    pub fn from_api(error: &ApiError, message: &str) -> Self {
        let kind = match error {
            ApiError::Status { status } => FailureKind::Status(*status),
            ApiError::Transport(_) => FailureKind::Transport,
            ApiError::Decode(_) => FailureKind::Decode,
        };
        Self {
            kind,
            message: message.to_string(),
        }
    }
}

/// Failure raised by the HTTP API client
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("server returned status {status}")]
    Status { status: u16 },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("invalid response body: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            ApiError::Decode(error.to_string())
        } else {
            ApiError::Transport(error.to_string())
        }
    }
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: {0}")]
    Api(#[from] ApiError),
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
