use core::sync::atomic::{AtomicU32, Ordering::Relaxed};

/// Wheel-revolution edge counter.
///
/// The edge interrupt is the only writer. Each reader window is emptied with an atomic
/// swap, so an edge landing during a read-and-reset is counted in exactly one window.
pub struct RotationCounter {
    /// Edges since the last velocity computation.
    velocity_window: AtomicU32,
    /// Edges since the last RPM panel update.
    rpm_window: AtomicU32,
    /// Edges since boot.
    total: AtomicU32,
}

impl RotationCounter {
    pub const fn new() -> Self {
        RotationCounter {
            velocity_window: AtomicU32::new(0),
            rpm_window: AtomicU32::new(0),
            total: AtomicU32::new(0),
        }
    }

    /// Called from the rotation-sensor edge interrupt only.
    pub fn record_edge(&self) {
        self.velocity_window.fetch_add(1, Relaxed);
        self.rpm_window.fetch_add(1, Relaxed);
        self.total.fetch_add(1, Relaxed);
    }

    pub fn take_velocity_window(&self) -> u32 {
        self.velocity_window.swap(0, Relaxed)
    }

    pub fn take_rpm_window(&self) -> u32 {
        self.rpm_window.swap(0, Relaxed)
    }

    pub fn velocity_window(&self) -> u32 {
        self.velocity_window.load(Relaxed)
    }

    pub fn total(&self) -> u32 {
        self.total.load(Relaxed)
    }
}

impl Default for RotationCounter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edges_land_in_every_view() {
        let counter = RotationCounter::new();
        for _ in 0..7 {
            counter.record_edge();
        }
        assert_eq!(counter.velocity_window(), 7);
        assert_eq!(counter.take_rpm_window(), 7);
        assert_eq!(counter.total(), 7);
    }

    #[test]
    fn windows_reset_independently() {
        let counter = RotationCounter::new();
        for _ in 0..3 {
            counter.record_edge();
        }
        assert_eq!(counter.take_rpm_window(), 3);
        counter.record_edge();
        assert_eq!(counter.take_rpm_window(), 1);
        assert_eq!(counter.take_velocity_window(), 4);
        assert_eq!(counter.take_velocity_window(), 0);
        assert_eq!(counter.total(), 4);
    }

    #[test]
    fn concurrent_edges_are_never_lost() {
        use std::sync::Arc;
        use std::thread;

        let counter = Arc::new(RotationCounter::new());
        let writer = {
            let counter = Arc::clone(&counter);
            thread::spawn(move || {
                for _ in 0..100_000 {
                    counter.record_edge();
                }
            })
        };

        let mut taken = 0u32;
        while !writer.is_finished() {
            taken += counter.take_velocity_window();
        }
        writer.join().unwrap();
        taken += counter.take_velocity_window();

        assert_eq!(taken, 100_000);
        assert_eq!(counter.total(), 100_000);
    }
}
