//! Rate Limiter
//!
//! Fixed-interval spacing between consecutive provider calls.

use crate::domain::ports::RateLimiter;
use async_trait::async_trait;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// Rate limiter configuration.
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Minimum spacing between the start of consecutive calls
    pub min_interval: Duration,
    /// Maximum IPs per call (None = provider's own limit)
    pub max_batch: Option<usize>,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            // ip-api.com allows 45 single lookups per minute
            min_interval: Duration::from_millis(1500),
            max_batch: None,
        }
    }
}

/// Fixed delay rate limiter.
///
/// `throttle` returns immediately on first use and afterwards waits until
/// `min_interval` has passed since the previous `throttle` returned.
pub struct FixedDelayLimiter {
    config: RateLimitConfig,
    /// When the last permit was handed out
    last_permit: Mutex<Option<Instant>>,
}

impl FixedDelayLimiter {
    /// Create a new rate limiter.
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            last_permit: Mutex::new(None),
        }
    }

    pub fn with_interval(min_interval: Duration) -> Self {
        Self::new(RateLimitConfig {
            min_interval,
            ..Default::default()
        })
    }
}

impl Default for FixedDelayLimiter {
    fn default() -> Self {
        Self::new(RateLimitConfig::default())
    }
}

#[async_trait]
impl RateLimiter for FixedDelayLimiter {
    async fn throttle(&self) {
        let mut last = self.last_permit.lock().await;

        if let Some(prev) = *last {
            let ready_at = prev + self.config.min_interval;
            if ready_at > Instant::now() {
                tracing::trace!(
                    "rate limiter: waiting {:?}",
                    ready_at.saturating_duration_since(Instant::now())
                );
                tokio::time::sleep_until(ready_at).await;
            }
        }

        *last = Some(Instant::now());
    }

    fn max_batch(&self) -> Option<usize> {
        self.config.max_batch
    }
}

/// Limiter that never waits. Used for tests and self-hosted providers.
#[derive(Debug, Default, Clone)]
pub struct UnthrottledLimiter;

#[async_trait]
impl RateLimiter for UnthrottledLimiter {
    async fn throttle(&self) {}
}
