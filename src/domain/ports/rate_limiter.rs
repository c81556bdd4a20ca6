//! Rate Limiter Port
//!
//! Defines the suspension point placed between outbound provider calls.

use async_trait::async_trait;

/// Spacing policy for consecutive calls to one provider.
///
/// First-come-first-served with a fixed delay; no backoff.
#[async_trait]
pub trait RateLimiter: Send + Sync {
    /// Wait until the next call may be issued.
    async fn throttle(&self);

    /// Upper bound on IPs per call imposed by the limiter, if any.
    fn max_batch(&self) -> Option<usize> {
        None
    }
}
