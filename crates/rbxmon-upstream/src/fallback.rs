//! Ordered base URL fallback.

use std::future::Future;

use rbxmon_core::Endpoints;
use tracing::{debug, warn};
use url::Url;

use crate::error::{Result, UpstreamError};

/// Runs `attempt` against each base URL in order and returns the first success.
///
/// Non-retryable errors (see [`UpstreamError::is_retryable`]) are returned
/// immediately. When every base fails the result is
/// [`UpstreamError::Exhausted`] listing each attempt.
pub async fn first_success<T, F, Fut>(
    capability: &'static str,
    endpoints: &Endpoints,
    mut attempt: F,
) -> Result<T>
where
    F: FnMut(Url) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut failures = Vec::new();

    for base in endpoints.bases() {
        match attempt(base.clone()).await {
            Ok(value) => {
                if !failures.is_empty() {
                    debug!(capability, base = %base, failed = failures.len(), "fell back to secondary base");
                }
                return Ok(value);
            }
            Err(e) if e.is_retryable() => {
                warn!(capability, base = %base, error = %e, "upstream attempt failed");
                failures.push(format!("{}: {}", base, e));
            }
            Err(e) => return Err(e),
        }
    }

    Err(UpstreamError::Exhausted {
        capability,
        attempts: failures,
    })
}

/// Joins a request path onto a base URL, keeping any path prefix of the base.
pub(crate) fn endpoint(base: &Url, path: &str) -> Result<Url> {
    let mut base = base.clone();
    if !base.path().ends_with('/') {
        let with_slash = format!("{}/", base.path());
        base.set_path(&with_slash);
    }
    Ok(base.join(path.trim_start_matches('/'))?)
}
