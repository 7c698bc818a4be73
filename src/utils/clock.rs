use core::sync::atomic::{AtomicU32, Ordering::Relaxed};

/// Millisecond counter advanced by the 1 ms timer interrupt.
///
/// The count wraps after ~49.7 days of uptime. Soft timers compare with wrapping
/// subtraction, so a wrap costs at most one early or late firing.
pub struct MillisClock {
    ticks: AtomicU32,
}

impl MillisClock {
    pub const fn new() -> Self {
        MillisClock {
            ticks: AtomicU32::new(0),
        }
    }

    /// Called from the timer interrupt only.
    pub fn tick(&self) {
        self.ticks.fetch_add(1, Relaxed);
    }

    pub fn now(&self) -> u32 {
        self.ticks.load(Relaxed)
    }
}

impl Default for MillisClock {
    fn default() -> Self {
        Self::new()
    }
}

/// Periodic deadline checked against [`MillisClock::now`] from the main loop.
///
/// Fires when strictly more than `period_ms` has elapsed since the last firing, then
/// re-arms at the current time. Missed loop passes never queue extra firings.
pub struct SoftTimer {
    period_ms: u32,
    last_fired: u32,
}

impl SoftTimer {
    pub const fn new(period_ms: u32) -> Self {
        SoftTimer {
            period_ms,
            last_fired: 0,
        }
    }

    /// Milliseconds since the last firing (or since boot).
    pub fn elapsed(&self, now: u32) -> u32 {
        now.wrapping_sub(self.last_fired)
    }

    pub fn poll(&mut self, now: u32) -> bool {
        if self.elapsed(now) > self.period_ms {
            self.last_fired = now;
            true
        } else {
            false
        }
    }

    pub fn period_ms(&self) -> u32 {
        self.period_ms
    }

    pub fn last_fired(&self) -> u32 {
        self.last_fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_counts_ticks() {
        let clock = MillisClock::new();
        for _ in 0..1500 {
            clock.tick();
        }
        assert_eq!(clock.now(), 1500);
    }

    #[test]
    fn clock_wraps_silently() {
        let clock = MillisClock {
            ticks: AtomicU32::new(u32::MAX),
        };
        clock.tick();
        assert_eq!(clock.now(), 0);
    }

    #[test]
    fn one_second_timer_fires_once_at_1001() {
        let mut timer = SoftTimer::new(1000);
        let fired: u32 = (0..=1001).map(|now| timer.poll(now) as u32).sum();
        assert_eq!(fired, 1);
        assert_eq!(timer.last_fired(), 1001);
    }

    #[test]
    fn timer_needs_strictly_more_than_period() {
        let mut timer = SoftTimer::new(2000);
        assert!(!timer.poll(2000));
        assert!(timer.poll(2001));
        assert!(!timer.poll(4001));
        assert!(timer.poll(4002));
    }

    #[test]
    fn late_poll_fires_once_and_rearms_at_now() {
        let mut timer = SoftTimer::new(1000);
        assert!(timer.poll(3500));
        assert_eq!(timer.last_fired(), 3500);
        assert!(!timer.poll(4000));
        assert!(timer.poll(4501));
    }

    #[test]
    fn timer_reports_its_period() {
        let mut timer = SoftTimer::new(5000);
        timer.poll(5001);
        assert_eq!(timer.period_ms(), 5000);
        assert_eq!(timer.elapsed(10_001), 5000);
    }

    #[test]
    fn timer_survives_clock_wrap() {
        let mut timer = SoftTimer::new(1000);
        assert!(timer.poll(u32::MAX - 10));
        assert!(!timer.poll(500));
        assert!(timer.poll(990));
    }
}
