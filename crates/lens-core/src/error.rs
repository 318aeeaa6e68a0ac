//! Error types for landmark-lens.

use thiserror::Error;

/// Result type alias using landmark-lens's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// How an error is allowed to travel through the enrichment paths.
///
/// Suggestions and stats absorb degraded and skipped failures where they
/// happen and surface them as empty or partial results; only
/// [`ErrorKind::Fatal`] errors leave those paths. Recognition has no
/// fallback result, so every recognition backend error reaches the caller
/// with its original kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The request cannot produce a result at all.
    Fatal,
    /// An enrichment sub-result is replaced by an empty value.
    Degraded,
    /// A single malformed record is dropped from a batch.
    Skipped,
}

/// Core error type for landmark-lens operations.
#[derive(Error, Debug)]
pub enum Error {
    /// The recognition model produced no content
    #[error("Recognition model returned an empty response")]
    EmptyResponse,

    /// An external call did not finish before its deadline
    #[error("Timed out after {0} ms")]
    Timeout(u64),

    /// HTTP/network request failed
    #[error("Request error: {0}")]
    Request(String),

    /// Upstream API answered with a non-success status
    #[error("Upstream returned {status}: {body}")]
    UpstreamStatus { status: u16, body: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error (missing credentials, bad URL)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input, including malformed individual records
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Classify the error for propagation decisions.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::EmptyResponse | Error::Timeout(_) | Error::Internal(_) => ErrorKind::Fatal,
            Error::Serialization(_) => ErrorKind::Fatal,
            Error::Request(_)
            | Error::UpstreamStatus { .. }
            | Error::Config(_) => ErrorKind::Degraded,
            Error::InvalidInput(_) => ErrorKind::Skipped,
        }
    }

    pub fn is_fatal(&self) -> bool {
        self.kind() == ErrorKind::Fatal
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Request(e.to_string())
    }
}
