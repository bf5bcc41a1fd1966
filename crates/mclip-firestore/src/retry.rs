//! Retry policy with exponential backoff and full jitter.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tracing::{info_span, warn, Instrument};

use crate::error::FirestoreResult;
use crate::metrics::record_retry;

// =============================================================================
// Configuration
// =============================================================================

/// Retry policy configuration.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retry attempts.
    pub max_retries: u32,
    /// Base delay for exponential backoff (in milliseconds).
    pub base_delay_ms: u64,
    /// Maximum delay cap (in milliseconds).
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay_ms: 100,
            max_delay_ms: 5000,
        }
    }
}

impl RetryConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let read = |name: &str, fallback: u64| -> u64 {
            std::env::var(name)
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(fallback)
        };

        Self {
            max_retries: defaults.max_retries,
            base_delay_ms: read("FIRESTORE_RETRY_BASE_MS", defaults.base_delay_ms),
            max_delay_ms: read("FIRESTORE_RETRY_MAX_MS", defaults.max_delay_ms),
        }
    }
}

// =============================================================================
// Retry Policy
// =============================================================================

/// Run `op`, retrying transient failures (network, 429, 5xx).
///
/// Non-retryable errors and the last failure are returned unchanged.
pub async fn with_retry<T, F, Fut>(
    config: &RetryConfig,
    operation: &str,
    op: F,
) -> FirestoreResult<T>
where
    F: Fn() -> Fut,
    Fut: std::future::Future<Output = FirestoreResult<T>>,
{
    let mut attempt: u32 = 0;

    loop {
        let span = info_span!("firestore_retry", operation = %operation, attempt = attempt + 1);

        match op().instrument(span).await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_retryable() && attempt < config.max_retries => {
                let delay = calculate_delay(config, attempt, e.retry_after_ms());

                warn!(
                    operation = %operation,
                    attempt = attempt + 1,
                    delay_ms = delay.as_millis() as u64,
                    error = %e,
                    "Firestore operation failed, retrying"
                );
                record_retry(operation);

                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

/// Exponential backoff with full jitter, floored at the base delay.
fn calculate_delay(config: &RetryConfig, attempt: u32, retry_after_ms: Option<u64>) -> Duration {
    if let Some(after) = retry_after_ms {
        return Duration::from_millis(after);
    }

    let capped = config
        .base_delay_ms
        .saturating_mul(2u64.saturating_pow(attempt))
        .min(config.max_delay_ms);

    let jittered = (capped as f64 * jitter_factor()) as u64;
    Duration::from_millis(jittered.max(config.base_delay_ms))
}

/// Pseudo-random factor in `[0, 1)` from the clock's sub-second nanos.
fn jitter_factor() -> f64 {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos())
        .unwrap_or(0);
    (nanos % 1000) as f64 / 1000.0
}

// =============================================================================
// Tests
// =============================================================================
