//! Monotonic time source abstractions
//!
//! Drivers that time external events (echo pulses, handshakes) sample a
//! free-running microsecond counter and subtract. The counter is 32 bits
//! wide and wraps roughly every 71.6 minutes, so differences must always go
//! through [`MonotonicClock::elapsed_us`].

use embedded_hal::delay::DelayNs;

/// Free-running microsecond counter
pub trait MonotonicClock {
    /// Sample the counter
    fn now_us(&mut self) -> u32;

    /// Microseconds from `start` to `end`
    ///
    /// Wrapping subtraction: a rollover between the two samples still
    /// yields the short forward distance, as long as the real interval is
    /// below one full counter period.
    fn elapsed_us(&self, start: u32, end: u32) -> u32 {
        end.wrapping_sub(start)
    }
}

impl<T: MonotonicClock + ?Sized> MonotonicClock for &mut T {
    fn now_us(&mut self) -> u32 {
        T::now_us(self)
    }

    fn elapsed_us(&self, start: u32, end: u32) -> u32 {
        T::elapsed_us(self, start, end)
    }
}

/// A counter and a delay provider joined into one time source
///
/// Drivers that both busy-wait and timestamp take a single `MonotonicClock
/// + DelayNs` handle. When a platform exposes those as separate objects
/// (a timer peripheral and a SysTick delay, for example), wrap them here.
#[derive(Debug)]
pub struct Timebase<C, D> {
    clock: C,
    delay: D,
}

impl<C, D> Timebase<C, D> {
    /// Join a counter and a delay provider
    pub fn new(clock: C, delay: D) -> Self {
        Self { clock, delay }
    }

    /// Split back into the counter and the delay provider
    pub fn release(self) -> (C, D) {
        (self.clock, self.delay)
    }
}

impl<C: MonotonicClock, D> MonotonicClock for Timebase<C, D> {
    fn now_us(&mut self) -> u32 {
        self.clock.now_us()
    }

    fn elapsed_us(&self, start: u32, end: u32) -> u32 {
        self.clock.elapsed_us(start, end)
    }
}

impl<C, D: DelayNs> DelayNs for Timebase<C, D> {
    fn delay_ns(&mut self, ns: u32) {
        self.delay.delay_ns(ns);
    }

    fn delay_us(&mut self, us: u32) {
        self.delay.delay_us(us);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.delay.delay_ms(ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Counter(u32);

    impl MonotonicClock for Counter {
        fn now_us(&mut self) -> u32 {
            self.0 = self.0.wrapping_add(10);
            self.0
        }
    }

    #[derive(Default)]
    struct RecordingDelay {
        total_ns: u64,
    }

    impl DelayNs for RecordingDelay {
        fn delay_ns(&mut self, ns: u32) {
            self.total_ns += ns as u64;
        }
    }

    #[test]
    fn test_elapsed_plain() {
        let clock = Counter(0);
        assert_eq!(clock.elapsed_us(100, 1260), 1160);
    }

    #[test]
    fn test_elapsed_across_wraparound() {
        let clock = Counter(0);
        let start = u32::MAX - 99;
        let end = 1060;
        assert_eq!(clock.elapsed_us(start, end), 1160);
    }

    #[test]
    fn test_counter_rollover() {
        let mut clock = Counter(u32::MAX - 15);
        let a = clock.now_us();
        let b = clock.now_us();
        assert!(b < a);
        assert_eq!(clock.elapsed_us(a, b), 10);
    }

    #[test]
    fn test_timebase_forwards() {
        let mut tb = Timebase::new(Counter(0), RecordingDelay::default());

        assert_eq!(tb.now_us(), 10);
        tb.delay_us(2);
        tb.delay_us(10);

        let (clock, delay) = tb.release();
        assert_eq!(clock.0, 10);
        assert_eq!(delay.total_ns, 12_000);
    }
}
