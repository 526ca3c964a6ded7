//! Bounded retries with exponential backoff for provider calls.

use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{EmbeddingError, Result};

/// How transient provider failures are retried.
///
/// The delay before retry `n` (1-based) is `unit * backoff_base^n`, so the
/// defaults wait 1.5s, 2.25s and 3.375s before giving up.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub max_retries: u32,

    /// Base raised to the attempt number.
    pub backoff_base: f64,

    /// Time unit the backoff is expressed in.
    pub unit: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            backoff_base: 1.5,
            unit: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    pub fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    pub fn with_backoff_base(mut self, base: f64) -> Self {
        self.backoff_base = base;
        self
    }

    pub fn with_unit(mut self, unit: Duration) -> Self {
        self.unit = unit;
        self
    }

    /// Delay before the given retry (1-based).
    pub fn delay_for(&self, retry: u32) -> Duration {
        let exponent = i32::try_from(retry).unwrap_or(i32::MAX);
        let secs = self.unit.as_secs_f64() * self.backoff_base.max(0.0).powi(exponent);
        Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
    }

    /// Wait before the given retry after `err`: the backoff delay, or the
    /// provider's `Retry-After` hint when that is longer.
    pub fn wait_before(&self, retry: u32, err: &EmbeddingError) -> Duration {
        let delay = self.delay_for(retry);
        err.retry_after().map_or(delay, |hint| delay.max(hint))
    }

    /// Run `op` until it succeeds, fails permanently, or retries run out.
    ///
    /// `op` receives the 0-based attempt number. Non-transient errors are
    /// returned as-is; exhausting the budget yields
    /// [`EmbeddingError::RetriesExhausted`].
    pub async fn run<T, F, Fut>(&self, mut op: F) -> Result<T>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut attempt = 0;
        loop {
            match op(attempt).await {
                Ok(value) => return Ok(value),
                Err(err) if !err.is_transient() => return Err(err),
                Err(err) if attempt >= self.max_retries => {
                    return Err(EmbeddingError::RetriesExhausted {
                        attempts: attempt + 1,
                        last: Box::new(err),
                    });
                }
                Err(err) => {
                    attempt += 1;
                    let delay = self.wait_before(attempt, &err);
                    warn!(
                        "Transient embedding failure (attempt {attempt}/{}): {err}; retrying in {delay:?}",
                        self.max_retries + 1
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast() -> RetryPolicy {
        RetryPolicy::default().with_unit(Duration::from_millis(1))
    }

    #[test]
    fn test_delay_is_base_to_the_attempt() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_for(1), Duration::from_millis(1500));
        assert_eq!(policy.delay_for(2), Duration::from_millis(2250));
        assert_eq!(policy.delay_for(3), Duration::from_millis(3375));
    }

    #[test]
    fn test_rate_limit_hint_extends_the_wait() {
        let policy = RetryPolicy::default();
        let limited = |secs| EmbeddingError::RateLimited {
            retry_after_secs: secs,
        };

        assert_eq!(policy.wait_before(1, &limited(30)), Duration::from_secs(30));
        assert_eq!(policy.wait_before(1, &limited(0)), Duration::from_millis(1500));
        assert_eq!(policy.wait_before(3, &limited(2)), Duration::from_millis(3375));
        assert_eq!(
            policy.wait_before(2, &EmbeddingError::Timeout("slow".to_string())),
            Duration::from_millis(2250)
        );
    }

    #[tokio::test]
    async fn test_retries_then_succeeds() {
        let calls = AtomicU32::new(0);
        let value = fast()
            .run(|attempt| {
                calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if attempt < 2 {
                        Err(EmbeddingError::RateLimited { retry_after_secs: 0 })
                    } else {
                        Ok(attempt)
                    }
                }
            })
            .await
            .unwrap();

        assert_eq!(value, 2);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_exhaustion_reports_attempts() {
        let calls = AtomicU32::new(0);
        let err = fast()
            .run(|_| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err::<(), _>(EmbeddingError::Timeout("slow".to_string())) }
            })
            .await
            .unwrap_err();

        assert_eq!(calls.load(Ordering::SeqCst), 4);
        match err {
            EmbeddingError::RetriesExhausted { attempts, last } => {
                assert_eq!(attempts, 4);
                assert!(matches!(*last, EmbeddingError::Timeout(_)));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_permanent_errors_are_not_retried() {
        let calls = AtomicU32::new(0);
        let err = fast()
            .run(|_| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err::<(), _>(EmbeddingError::ApiRequest("bad key".to_string())) }
            })
            .await
            .unwrap_err();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(matches!(err, EmbeddingError::ApiRequest(_)));
    }
}
