use core::f32::consts::PI;
use core::num::NonZeroU32;

use crate::config::{MS_TO_KMH, WHEEL_DIAMETER_M};
use crate::utils::rotation::RotationCounter;

/// Result of one velocity window.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Velocity {
    /// Revolutions per window second, integer-truncated.
    pub rpm: u32,
    pub kmh: f32,
}

impl Velocity {
    /// Whole km/h for the 3-digit display (saturates at 255).
    pub fn display_value(&self) -> u8 {
        self.kmh as u8
    }
}

/// Speed from a revolution count over `delta_s` seconds.
///
/// The revolution rate is integer division on purpose: the display rounding downstream
/// was tuned against it.
pub fn velocity_from_count(revolutions: u32, delta_s: NonZeroU32) -> Velocity {
    let rpm = revolutions / delta_s.get();
    let metres_per_second = rpm as f32 * PI * WHEEL_DIAMETER_M;
    Velocity {
        rpm,
        kmh: metres_per_second * MS_TO_KMH,
    }
}

/// Consume the counter's velocity window and convert it.
///
/// `delta_s` must match how often this is called, otherwise the reading is biased.
pub fn compute_velocity(counter: &RotationCounter, delta_s: NonZeroU32) -> Velocity {
    velocity_from_count(counter.take_velocity_window(), delta_s)
}
