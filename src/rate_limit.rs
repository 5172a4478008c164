//! Request pacing shared by the ID converter and the article fetcher
//!
//! NCBI asks for no more than three requests per second without an API key.
//! Every request reserves the next free slot on a shared timeline, so clones of
//! one [`RateLimiter`] pace all of their callers together.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::{Instant, sleep_until};
use tracing::{debug, instrument};

/// Evenly spaced request slots
///
/// # Example
///
/// ```no_run
/// use pmc_markdown::RateLimiter;
///
/// #[tokio::main]
/// async fn main() {
///     // 0.4 s between requests
///     let limiter = RateLimiter::new(2.5);
///     for _ in 0..3 {
///         limiter.acquire().await;
///         // make a request
///     }
/// }
/// ```
#[derive(Clone, Debug)]
pub struct RateLimiter {
    interval: Duration,
    next_slot: Arc<Mutex<Option<Instant>>>,
}

impl RateLimiter {
    /// Pace requests at `rate` per second
    ///
    /// A rate that is zero, negative or not finite disables pacing.
    pub fn new(rate: f64) -> Self {
        let interval = if rate.is_finite() && rate > 0.0 {
            Duration::from_secs_f64(1.0 / rate)
        } else {
            Duration::ZERO
        };
        Self {
            interval,
            next_slot: Arc::new(Mutex::new(None)),
        }
    }

    /// Wait until this caller's slot comes up
    ///
    /// The first call returns at once; each later call starts at least one
    /// interval after the slot before it.
    #[instrument(skip(self))]
    pub async fn acquire(&self) {
        let slot = {
            let mut next_slot = self.next_slot.lock().await;
            let now = Instant::now();
            let slot = next_slot.map_or(now, |next| next.max(now));
            *next_slot = Some(slot + self.interval);
            slot
        };

        let wait = slot.saturating_duration_since(Instant::now());
        if !wait.is_zero() {
            debug!(wait_ms = wait.as_millis() as u64, "Waiting for request slot");
            sleep_until(slot).await;
        }
    }
}
