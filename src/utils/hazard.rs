use core::fmt;

/// Runtime conditions the firmware detects and works around instead of faulting.
///
/// None of these stop the panel; they are clamped or reported over RTT and the
/// loop carries on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Hazard {
    /// The light channel read 0 and the photoresistor curve would divide by it.
    /// Treated as "no light": level 0, full backlight.
    ZeroLightReading,
    /// The velocity timer's real interval strayed from the fixed window the
    /// estimator divides by.
    TimingDrift { expected_ms: u32, actual_ms: u32 },
}

impl fmt::Display for Hazard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Hazard::ZeroLightReading => write!(f, "light channel read 0, clamped to dark"),
            Hazard::TimingDrift {
                expected_ms,
                actual_ms,
            } => write!(f, "velocity window drift: expected {expected_ms} ms, measured {actual_ms} ms"),
        }
    }
}
