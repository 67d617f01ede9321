//! Clock backed by the embassy-time driver
//!
//! Requires a time driver to be linked in (e.g. `embassy-rp` with
//! `time-driver`). Both the counter and the delays are blocking.

use embassy_time::{block_for, Duration, Instant};
use embedded_hal::delay::DelayNs;

use crate::clock::MonotonicClock;

/// Microsecond clock and busy-wait delay on top of `embassy_time`
#[derive(Debug, Clone, Copy, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EmbassyClock;

impl EmbassyClock {
    /// Create a new clock handle
    pub const fn new() -> Self {
        Self
    }
}

impl MonotonicClock for EmbassyClock {
    fn now_us(&mut self) -> u32 {
        // Truncation to 32 bits is intended; see `MonotonicClock::elapsed_us`
        Instant::now().as_micros() as u32
    }
}

impl DelayNs for EmbassyClock {
    fn delay_ns(&mut self, ns: u32) {
        block_for(Duration::from_nanos(ns as u64));
    }

    fn delay_us(&mut self, us: u32) {
        block_for(Duration::from_micros(us as u64));
    }

    fn delay_ms(&mut self, ms: u32) {
        block_for(Duration::from_millis(ms as u64));
    }
}
