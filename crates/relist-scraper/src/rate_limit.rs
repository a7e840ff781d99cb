//! Retry with exponential backoff for transient storefront errors.
//!
//! 429 responses and network-level failures are retried; 404s, other
//! HTTP statuses, and parse failures are propagated immediately since
//! retrying cannot change the outcome.

use std::future::Future;
use std::time::Duration;

use crate::error::ScraperError;

/// Returns `true` if `err` represents a transient condition worth
/// retrying after a backoff delay.
fn is_retriable(err: &ScraperError) -> bool {
    matches!(
        err,
        ScraperError::RateLimited { .. } | ScraperError::Http(_)
    )
}

/// Executes `operation` with exponential backoff retries on transient errors.
///
/// On a retriable error the function sleeps `backoff_base_secs * 2^attempt`
/// seconds and tries again, up to `max_retries` additional attempts after
/// the first try. Non-retriable errors are returned immediately.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_secs: u64,
    mut operation: F,
) -> Result<T, ScraperError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ScraperError>>,
{
    let mut attempt = 0u32;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_retriable(&err) || attempt >= max_retries {
                    return Err(err);
                }

                // Cap the shift to keep the multiplication well-defined on
                // extreme configs.
                let delay_secs = backoff_base_secs.saturating_mul(1u64 << attempt.min(62));
                tracing::warn!(
                    attempt,
                    max_retries,
                    delay_secs,
                    error = %err,
                    "transient storefront error — retrying after backoff"
                );
                tokio::time::sleep(Duration::from_secs(delay_secs)).await;
                attempt += 1;
            }
        }
    }
}
