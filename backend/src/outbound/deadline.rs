//! Bounded execution for store operations.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

/// Run `operation`, failing with `on_timeout` if it does not finish within
/// `limit`. The abandoned future is dropped.
pub(crate) async fn bounded<T, E, F, C>(limit: Duration, operation: F, on_timeout: C) -> Result<T, E>
where
    F: Future<Output = Result<T, E>>,
    C: FnOnce(String) -> E,
{
    match tokio::time::timeout(limit, operation).await {
        Ok(result) => result,
        Err(_) => {
            let limit_ms = limit.as_millis();
            warn!(limit_ms, "store operation timed out");
            Err(on_timeout(format!("no response within {limit_ms}ms")))
        }
    }
}
