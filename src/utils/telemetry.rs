use crate::utils::acquisition::SensorSample;
use crate::utils::clock::MillisClock;
use crate::utils::rotation::RotationCounter;

/// State shared between the interrupt handlers and the main loop.
///
/// Lives in a single `static` on the board. Each handler touches only its own field
/// (`clock` from the timer, `rotation` from the edge interrupt, `sensors` from the
/// converter); the scheduler reads all three. Every field is built from atomics, so no
/// lock is needed.
pub struct Telemetry {
    pub clock: MillisClock,
    pub rotation: RotationCounter,
    pub sensors: SensorSample,
}

impl Telemetry {
    pub const fn new() -> Self {
        Telemetry {
            clock: MillisClock::new(),
            rotation: RotationCounter::new(),
            sensors: SensorSample::new(),
        }
    }
}

impl Default for Telemetry {
    fn default() -> Self {
        Self::new()
    }
}
