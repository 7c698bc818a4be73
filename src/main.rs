//! Ride panel firmware for the BBC micro:bit v2.
//!
//! The firmware itself only exists on the ARM target. Host builds get an empty `main` so the
//! package still builds for `cargo test`; the logic lives in the library and is tested there.

#![cfg_attr(target_arch = "arm", no_std)]
#![cfg_attr(target_arch = "arm", no_main)]

#[cfg(target_arch = "arm")]
mod board;
#[cfg(target_arch = "arm")]
mod firmware;

#[cfg(not(target_arch = "arm"))]
fn main() {}
