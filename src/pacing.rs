//! Fixed-interval pacing between vendor requests.
//!
//! The crawler issues [`Pacer::pause`] after every network call, so at least
//! one interval elapses between any two requests to the vendor.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use firmware_downloader_core::Pacer;
//!
//! # async fn example() {
//! let pacer = Pacer::new(Duration::from_secs(5));
//! // ... request ...
//! pacer.pause().await;
//! // ... next request ...
//! # }
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tracing::{debug, instrument, trace};

/// Default interval between requests (5 seconds).
pub const DEFAULT_DELAY: Duration = Duration::from_secs(5);

/// Sleeps a fixed interval after each request.
#[derive(Debug)]
pub struct Pacer {
    interval: Duration,

    /// Number of pauses issued, including no-op pauses when disabled.
    pauses: AtomicU64,
}

impl Default for Pacer {
    fn default() -> Self {
        Self::new(DEFAULT_DELAY)
    }
}

impl Pacer {
    /// Creates a pacer with the given interval.
    #[must_use]
    #[instrument(skip_all, fields(delay_ms = interval.as_millis()))]
    pub fn new(interval: Duration) -> Self {
        debug!("creating pacer");
        Self {
            interval,
            pauses: AtomicU64::new(0),
        }
    }

    /// Creates a pacer that never sleeps.
    ///
    /// Use this when `--delay-ms 0` is specified, and in tests.
    #[must_use]
    pub fn disabled() -> Self {
        Self::new(Duration::ZERO)
    }

    /// Returns whether pacing is disabled.
    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.interval.is_zero()
    }

    /// Returns the configured interval.
    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Returns how many pauses have been issued so far.
    #[must_use]
    pub fn pauses(&self) -> u64 {
        self.pauses.load(Ordering::SeqCst)
    }

    /// Waits one interval.
    pub async fn pause(&self) {
        let count = self.pauses.fetch_add(1, Ordering::SeqCst) + 1;
        if self.is_disabled() {
            return;
        }
        trace!(
            delay_ms = self.interval.as_millis(),
            pause = count,
            "pacing next request"
        );
        tokio::time::sleep(self.interval).await;
    }
}
