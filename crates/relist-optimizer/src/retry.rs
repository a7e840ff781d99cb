//! Retry policy for generative service calls.
//!
//! One policy object applied uniformly to the text and image call
//! sites. 429 responses are the common case under batch optimization;
//! transport failures and 5xx-style API errors are retried the same
//! way. Only a missing API key is terminal — retrying cannot conjure a
//! credential.

use std::future::Future;
use std::time::Duration;

use crate::error::OptimizerError;

#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Additional attempts after the first failure.
    pub max_retries: u32,
    /// Base delay for exponential backoff; the wait before the n-th
    /// retry is `backoff_base_ms * 2^(n-1)`, jittered ±25%.
    pub backoff_base_ms: u64,
}

impl RetryPolicy {
    #[must_use]
    pub fn new(max_retries: u32, backoff_base_ms: u64) -> Self {
        Self {
            max_retries,
            backoff_base_ms,
        }
    }

    /// Runs `operation` under this policy.
    ///
    /// # Errors
    ///
    /// Returns the last error once retries are exhausted, or immediately
    /// for [`OptimizerError::MissingApiKey`].
    pub async fn run<T, F, Fut>(&self, mut operation: F) -> Result<T, OptimizerError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, OptimizerError>>,
    {
        const MAX_DELAY_MS: u64 = 60_000;
        let mut attempt = 0u32;
        loop {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(err) => {
                    if !is_retriable(&err) || attempt >= self.max_retries {
                        return Err(err);
                    }
                    attempt += 1;
                    let computed = self
                        .backoff_base_ms
                        .saturating_mul(1u64 << (attempt - 1).min(10));
                    let capped = computed.min(MAX_DELAY_MS);
                    #[allow(
                        clippy::cast_possible_truncation,
                        clippy::cast_sign_loss,
                        clippy::cast_precision_loss
                    )]
                    let delay_ms = (capped as f64 * (rand::random::<f64>() * 0.5 + 0.75)) as u64;
                    tracing::warn!(
                        attempt,
                        max_retries = self.max_retries,
                        delay_ms,
                        error = %err,
                        "AI call failed — retrying after backoff"
                    );
                    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                }
            }
        }
    }
}

/// Everything except a missing credential is treated as transient: the
/// service rate-limits aggressively under batch load, and its transient
/// 5xx/empty-candidate responses recover on their own.
fn is_retriable(err: &OptimizerError) -> bool {
    !matches!(err, OptimizerError::MissingApiKey)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn policy() -> RetryPolicy {
        RetryPolicy::new(3, 0)
    }

    #[tokio::test]
    async fn succeeds_immediately_on_first_try() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = policy()
            .run(|| {
                let c = Arc::clone(&c);
                async move {
                    c.fetch_add(1, Ordering::SeqCst);
                    Ok::<u32, OptimizerError>(42)
                }
            })
            .await;
        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn retries_rate_limited_then_succeeds() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = policy()
            .run(|| {
                let c = Arc::clone(&c);
                async move {
                    let n = c.fetch_add(1, Ordering::SeqCst);
                    if n < 2 {
                        Err(OptimizerError::RateLimited {
                            retry_after_secs: 0,
                        })
                    } else {
                        Ok::<u32, OptimizerError>(7)
                    }
                }
            })
            .await;
        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn retries_api_errors_up_to_the_ceiling() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = policy()
            .run(|| {
                let c = Arc::clone(&c);
                async move {
                    c.fetch_add(1, Ordering::SeqCst);
                    Err::<u32, OptimizerError>(OptimizerError::Api {
                        status: 503,
                        message: "overloaded".to_owned(),
                    })
                }
            })
            .await;
        // max_retries=3 → 4 total attempts
        assert_eq!(calls.load(Ordering::SeqCst), 4);
        assert!(matches!(result, Err(OptimizerError::Api { status: 503, .. })));
    }

    #[tokio::test]
    async fn does_not_retry_missing_api_key() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = policy()
            .run(|| {
                let c = Arc::clone(&c);
                async move {
                    c.fetch_add(1, Ordering::SeqCst);
                    Err::<u32, OptimizerError>(OptimizerError::MissingApiKey)
                }
            })
            .await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(matches!(result, Err(OptimizerError::MissingApiKey)));
    }
}
