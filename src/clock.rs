use std::time::{Duration, Instant};

/// Time primitives the throttle relies on: a monotonic millisecond clock
/// with an arbitrary epoch, and a blocking sleep.
pub trait Clock {
    /// non-decreasing milliseconds since some fixed point
    fn now_ms(&mut self) -> u64;

    /// block the calling thread for roughly `ms` milliseconds
    fn sleep_ms(&mut self, ms: u64);
}

/// wall-clock implementation; sleeps with `spin_sleep` so short slices
/// aren't rounded up to the OS scheduler quantum
pub struct SystemClock {
    epoch: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        SystemClock {
            epoch: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        SystemClock::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&mut self) -> u64 {
        self.epoch.elapsed().as_millis() as u64
    }

    fn sleep_ms(&mut self, ms: u64) {
        spin_sleep::sleep(Duration::from_millis(ms));
    }
}

/// deterministic clock for testing: time only moves when told to, and a
/// sleep moves it by exactly the requested amount
#[derive(Debug, Default)]
pub struct DummyClock {
    now: u64,
    sleeps: Vec<u64>,
}

impl DummyClock {
    pub fn new(start_ms: u64) -> Self {
        DummyClock {
            now: start_ms,
            sleeps: Vec::new(),
        }
    }

    /// simulate time spent outside the throttle (emulating, polling input)
    pub fn advance(&mut self, ms: u64) {
        self.now += ms;
    }

    /// every sleep requested so far, in order
    pub fn sleeps(&self) -> &[u64] {
        self.sleeps.as_slice()
    }

    pub fn total_slept(&self) -> u64 {
        self.sleeps.iter().sum()
    }
}

impl Clock for DummyClock {
    fn now_ms(&mut self) -> u64 {
        self.now
    }

    fn sleep_ms(&mut self, ms: u64) {
        self.sleeps.push(ms);
        self.now += ms;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dummy_clock_sleep_advances() {
        let mut c = DummyClock::new(10);
        c.sleep_ms(5);
        c.advance(3);
        c.sleep_ms(7);
        assert_eq!(c.now_ms(), 25);
        assert_eq!(c.sleeps(), &[5, 7]);
        assert_eq!(c.total_slept(), 12);
    }

    #[test]
    fn test_system_clock_monotonic() {
        let mut c = SystemClock::new();
        let a = c.now_ms();
        c.sleep_ms(2);
        let b = c.now_ms();
        assert!(b >= a + 1);
    }
}
