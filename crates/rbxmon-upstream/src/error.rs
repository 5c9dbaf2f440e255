//! Error types for upstream calls.

use rbxmon_core::SourceError;
use thiserror::Error;

/// Errors that can occur while talking to upstream.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// Network failure, timeout or non-success HTTP status.
    #[error("request failed: {0}")]
    Request(String),

    /// Response body did not have the expected shape.
    #[error("malformed response: {0}")]
    Malformed(String),

    /// A base URL could not be combined with the request path.
    #[error("invalid endpoint URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Upstream answered definitively that the username does not exist.
    #[error("username not found: {0}")]
    UsernameNotFound(String),

    /// Every base URL for a capability failed.
    #[error("{capability}: all {} base URLs failed: {}", .attempts.len(), .attempts.join("; "))]
    Exhausted {
        /// Capability name, e.g. `presence`.
        capability: &'static str,
        /// One entry per failed base.
        attempts: Vec<String>,
    },
}

impl UpstreamError {
    /// Whether the next base URL should be tried after this error.
    pub fn is_retryable(&self) -> bool {
        !matches!(
            self,
            UpstreamError::UsernameNotFound(_) | UpstreamError::Exhausted { .. }
        )
    }
}

/// Result type for upstream operations.
pub type Result<T> = std::result::Result<T, UpstreamError>;

impl From<reqwest::Error> for UpstreamError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            UpstreamError::Malformed(e.to_string())
        } else {
            UpstreamError::Request(e.to_string())
        }
    }
}

impl From<UpstreamError> for SourceError {
    fn from(e: UpstreamError) -> Self {
        match e {
            UpstreamError::UsernameNotFound(name) => SourceError::UsernameNotFound(name),
            UpstreamError::Malformed(msg) => SourceError::MalformedResponse(msg),
            other => SourceError::UpstreamUnavailable(other.to_string()),
        }
    }
}
