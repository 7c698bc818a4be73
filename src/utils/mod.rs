pub mod acquisition;
pub mod clock;
pub mod digit_encoder;
pub mod hazard;
pub mod panel;
pub mod rotation;
pub mod scheduler;
pub mod telemetry;
pub mod velocity;
