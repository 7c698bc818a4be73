//! Compile-time configuration for the ride panel.
//!
//! Everything the board and the scheduler need to agree on lives here: timer
//! cadences, digit-line masks, sensor thresholds and the wheel geometry.
//! There is no runtime configuration; change a constant and reflash.

use core::num::NonZeroU32;

// =============================================================================
// Timing
// =============================================================================

/// nRF TIMER count rate (1 MHz).
pub const TIMER_TICKS_PER_SECOND: u32 = 1_000_000;

/// Timer ticks per clock millisecond.
pub const TIMER_TICKS_PER_MS: u32 = TIMER_TICKS_PER_SECOND / 1000;

/// Dwell time of each digit while multiplexing the numeric display.
pub const DIGIT_DWELL_MS: u32 = 10;

/// Cadence of the RPM and cell-level panel lines.
pub const RPM_PERIOD_MS: u32 = 1_000;

/// Cadence of the temperature line and the overheat check.
pub const TEMPERATURE_PERIOD_MS: u32 = 2_000;

/// Cadence of the velocity computation.
pub const VELOCITY_PERIOD_MS: u32 = 5_000;

/// Window passed to the velocity estimator. Matches [`VELOCITY_PERIOD_MS`]
/// in whole seconds; the real firing interval is only checked, not used.
pub const VELOCITY_WINDOW_S: u32 = VELOCITY_PERIOD_MS / 1000;

/// [`VELOCITY_WINDOW_S`] as the estimator's divisor. A zero window fails the build.
pub const VELOCITY_WINDOW: NonZeroU32 = NonZeroU32::new(VELOCITY_WINDOW_S).unwrap();

/// How far the measured velocity interval may stray from the nominal window
/// before it is reported as drift.
pub const DRIFT_TOLERANCE_MS: u32 = 50;

// =============================================================================
// Numeric display wiring
// =============================================================================

/// Number of multiplexed digits.
pub const DIGIT_COUNT: usize = 3;

/// Data-port bits carrying the BCD digit (bit 0 = least significant input
/// of the decoder).
pub const DIGIT_DATA_MASK: u8 = 0b0100_0111;

/// Enable-port bit for each digit position, units first.
pub const DIGIT_ENABLE_LINES: [u8; DIGIT_COUNT] = [1 << 0, 1 << 1, 1 << 4];

/// All enable lines at once.
pub const DIGIT_ENABLE_MASK: u8 = DIGIT_ENABLE_LINES[0] | DIGIT_ENABLE_LINES[1] | DIGIT_ENABLE_LINES[2];

// =============================================================================
// Sensors
// =============================================================================

/// Largest raw reading of the 10-bit converter.
pub const ADC_FULL_SCALE: u16 = 1023;

/// Temperature above which the overheat indicator is raised (°C).
pub const OVERHEAT_THRESHOLD_C: i32 = 80;

/// Photoresistor curve: `light = LIGHT_CURVE_K / raw - LIGHT_CURVE_OFFSET`.
pub const LIGHT_CURVE_K: u32 = 1_023_000;
pub const LIGHT_CURVE_OFFSET: i32 = 1_000;

/// Light level above which the backlight turns off.
pub const LIGHT_BRIGHT: i32 = 500;

/// Light level above which the backlight dims.
pub const LIGHT_DIM: i32 = 300;

// =============================================================================
// Backlight
// =============================================================================

/// PWM duty range of the backlight.
pub const BACKLIGHT_MAX_DUTY: u8 = 255;

/// Duty used between the dim and bright thresholds (~49%).
pub const BACKLIGHT_DIM_DUTY: u8 = 125;

/// Duty from power-on until the first light conversion completes.
pub const BACKLIGHT_BOOT_DUTY: u8 = 200;

// =============================================================================
// Wheel
// =============================================================================

/// Wheel diameter in metres.
pub const WHEEL_DIAMETER_M: f32 = 0.3;

/// m/s to km/h.
pub const MS_TO_KMH: f32 = 3.6;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn velocity_window_matches_its_timer() {
        assert_eq!(VELOCITY_WINDOW.get() * 1000, VELOCITY_PERIOD_MS);
    }

    #[test]
    fn enable_mask_covers_every_digit() {
        assert_eq!(DIGIT_ENABLE_MASK.count_ones() as usize, DIGIT_COUNT);
    }
}
