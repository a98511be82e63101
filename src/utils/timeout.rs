//! Async timeout wrappers.

use crate::error::{Result, SaslError};
use std::future::Future;
use std::time::Duration;

/// Default timeout for secure-channel send/receive operations.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Run `fut` under a deadline, mapping expiry to [`SaslError::Timeout`].
pub async fn with_timeout<F, T>(fut: F, duration: Duration) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(duration, fut).await {
        Ok(result) => result,
        Err(_) => Err(SaslError::Timeout),
    }
}
