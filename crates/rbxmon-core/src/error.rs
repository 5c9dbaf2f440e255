//! Error types for the core crate.

use thiserror::Error;

/// Errors raised while loading configuration. These are fatal at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required variable is not set or is empty.
    #[error("missing required configuration: {0}")]
    Missing(&'static str),

    /// A variable is set but cannot be parsed.
    #[error("invalid value for {var}: {value:?} ({reason})")]
    Invalid {
        /// Variable name.
        var: &'static str,
        /// Raw value as found in the environment.
        value: String,
        /// Why it was rejected.
        reason: String,
    },
}

impl ConfigError {
    pub(crate) fn invalid(var: &'static str, value: &str, reason: impl ToString) -> Self {
        ConfigError::Invalid {
            var,
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Errors reported by upstream sources.
///
/// None of these ever escape a single user's poll: the caller degrades to an
/// offline snapshot or an untagged event.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    /// Every configured base URL failed at the network or HTTP level.
    #[error("upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    /// The username does not resolve to an account.
    #[error("username not found: {0}")]
    UsernameNotFound(String),

    /// Upstream answered but the body lacked expected fields.
    #[error("malformed upstream response: {0}")]
    MalformedResponse(String),
}

/// Result type for source operations.
pub type SourceResult<T> = std::result::Result<T, SourceError>;
