//! Ride panel library - the board-agnostic half of the firmware.
//!
//! Everything here is plain `no_std` logic over atomics and `embedded-hal` traits, so it can
//! be tested on the host machine. The binary (`main.rs`) owns the micro:bit peripherals, the
//! interrupt handlers and the statics, and calls into this library.
//!
//! # Testing
//!
//! ```bash
//! cargo test --lib --tests --target x86_64-unknown-linux-gnu
//! ```

// Use no_std only when NOT testing (tests need std for the test harness)
#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod utils;

pub use utils::acquisition::{AcquisitionCycle, AcquisitionState, Calibration, SensorSample};
pub use utils::clock::{MillisClock, SoftTimer};
pub use utils::hazard::Hazard;
pub use utils::panel::{PanelText, StatusPanel};
pub use utils::rotation::RotationCounter;
pub use utils::scheduler::{Dashboard, DigitMultiplexer, DigitPort};
pub use utils::telemetry::Telemetry;
