//! Request rate limiting and retry backoff
//!
//! The limiter enforces a minimum interval between consecutive requests.
//! It holds one piece of mutable state, the instant of the last release,
//! and is owned by the engine's single control flow; it is not meant for
//! concurrent callers.

use std::time::{Duration, Instant};

/// Minimum-interval rate limiter
#[derive(Debug)]
pub struct RateLimiter {
    interval: Duration,
    last_release: Option<Instant>,
}

impl RateLimiter {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_release: None,
        }
    }

    /// Suspends the caller until the configured interval has elapsed since
    /// the previous `wait` returned; the first call never waits
    pub async fn wait(&mut self) {
        if let Some(last) = self.last_release {
            let elapsed = last.elapsed();
            if elapsed < self.interval {
                tokio::time::sleep(self.interval - elapsed).await;
            }
        }
        self.last_release = Some(Instant::now());
    }
}

/// Computes the retry delay for an attempt: `base_ms * 2^attempt`
///
/// Saturates instead of overflowing for pathological attempt counts.
///
/// # Examples
///
/// ```
/// use surface_scout::crawler::exponential_backoff;
///
/// assert_eq!(exponential_backoff(0, 1000), 1000);
/// assert_eq!(exponential_backoff(3, 1000), 8000);
/// ```
pub fn exponential_backoff(attempt: u32, base_ms: u64) -> u64 {
    base_ms.saturating_mul(2u64.saturating_pow(attempt))
}
