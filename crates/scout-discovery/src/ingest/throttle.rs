//! Minimum-interval call throttling shared by the sources of one provider

use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use std::sync::Arc;
use std::time::Duration;

type SharedRateLimiter = Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>;

/// Spaces consecutive calls to one provider at least `interval` apart
///
/// Clones share the same limiter, so every source built from one throttle
/// waits on the same schedule. Separate throttles never wait on each other.
#[derive(Debug, Clone)]
pub struct Throttle {
    limiter: Option<SharedRateLimiter>,
    interval: Duration,
}

impl Throttle {
    /// One call per `interval`; a zero interval never waits
    pub fn every(interval: Duration) -> Self {
        let limiter = Quota::with_period(interval).map(|quota| Arc::new(RateLimiter::direct(quota)));
        Self { limiter, interval }
    }

    /// A throttle that never waits
    pub fn unlimited() -> Self {
        Self::every(Duration::ZERO)
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Wait until the next call is allowed
    pub async fn until_ready(&self) {
        if let Some(limiter) = &self.limiter {
            limiter.until_ready().await;
        }
    }
}
