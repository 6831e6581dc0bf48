//! Average-rate transfer throttling.
//!
//! After every write the throttle compares the wall-clock time elapsed since
//! the transfer started with the time that *should* have elapsed for the bytes
//! written so far at the configured rate, and sleeps for the positive
//! difference. Long-run average throughput stays at or below the ceiling while
//! short bursts pass through unslowed.

use std::time::Duration;

use tokio::time::Instant;

/// Paces writes to an average byte rate.
#[derive(Debug)]
pub(crate) struct Throttle {
    /// Ceiling in bytes per second. Never zero.
    rate: u64,
    start: Instant,
    written: u64,
}

impl Throttle {
    pub(crate) fn new(rate: u64) -> Self {
        debug_assert!(rate > 0);
        Self {
            rate,
            start: Instant::now(),
            written: 0,
        }
    }

    /// Records `bytes` just written and sleeps if the transfer is ahead of
    /// the configured rate.
    pub(crate) async fn pace(&mut self, bytes: usize) {
        self.written += bytes as u64;
        let expected = Duration::from_secs_f64(self.written as f64 / self.rate as f64);
        let elapsed = self.start.elapsed();
        if expected > elapsed {
            tokio::time::sleep(expected - elapsed).await;
        }
    }
}
