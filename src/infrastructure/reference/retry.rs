//! Bounded exponential backoff for external fetches.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use tokio::time::sleep;
use tracing::warn;

use crate::domain::error::ServiceError;
use crate::infrastructure::config::RetryConfig;

/// Run `op` with exponential backoff between attempts.
///
/// Retries up to `config.max_attempts` total attempts, sleeping
/// `initial_delay_ms` scaled by `backoff_multiplier` after each failure,
/// capped at `max_delay_ms`. Exhausted retries surface as
/// [`ServiceError::Unavailable`] carrying the final failure; the caller
/// decides whether a cached fallback applies.
pub async fn with_backoff<T, E, F, Fut>(
    config: &RetryConfig,
    service: &'static str,
    mut op: F,
) -> Result<T, ServiceError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = std::result::Result<T, E>>,
    E: Display,
{
    let mut delay_ms = config.initial_delay_ms;
    let mut last_error = String::new();

    for attempt in 1..=config.max_attempts {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                last_error = err.to_string();
                warn!(
                    service,
                    attempt,
                    max_attempts = config.max_attempts,
                    error = %err,
                    "fetch failed"
                );
                if attempt < config.max_attempts {
                    sleep(Duration::from_millis(delay_ms)).await;
                    delay_ms = ((delay_ms as f64 * config.backoff_multiplier) as u64)
                        .min(config.max_delay_ms);
                }
            }
        }
    }

    Err(ServiceError::Unavailable {
        service,
        attempts: config.max_attempts,
        reason: last_error,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast_retry() -> RetryConfig {
        RetryConfig {
            initial_delay_ms: 1,
            max_delay_ms: 2,
            backoff_multiplier: 2.0,
            max_attempts: 3,
        }
    }

    #[tokio::test]
    async fn succeeds_after_transient_failures() {
        let calls = AtomicU32::new(0);
        let result = with_backoff(&fast_retry(), "test", || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 {
                    Err("transient")
                } else {
                    Ok(42)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn exhausted_retries_surface_unavailable() {
        let result: Result<u32, _> =
            with_backoff(&fast_retry(), "test", || async { Err("down") }).await;

        match result {
            Err(ServiceError::Unavailable {
                service, attempts, ..
            }) => {
                assert_eq!(service, "test");
                assert_eq!(attempts, 3);
            }
            other => panic!("expected Unavailable, got {other:?}"),
        }
    }
}
