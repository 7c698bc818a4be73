//! acquisition.rs
//! Copyright © 2026 Sean Springer
//! [This program is licensed under the "MIT License"]
//! Please see the file LICENSE in the source distribution of this software for license terms.
//!
//! The acquisition module contains the round-robin analog state machine run from the
//! conversion-complete interrupt. Each completed conversion is converted with the current
//! channel's calibration, stored in the shared SensorSample, and the machine moves to the next
//! channel (TEMP -> CELL -> LIGHT -> TEMP ...). The LIGHT step also decides the backlight duty.
//! The machine never waits on the main loop; the board driver restarts the converter as soon
//! as the returned Conversion has been applied.

use core::sync::atomic::{AtomicI32, AtomicU8, AtomicU32, Ordering::Relaxed};

use crate::config::{
    ADC_FULL_SCALE, BACKLIGHT_BOOT_DUTY, BACKLIGHT_DIM_DUTY, BACKLIGHT_MAX_DUTY, LIGHT_BRIGHT,
    LIGHT_CURVE_K, LIGHT_CURVE_OFFSET, LIGHT_DIM,
};
use crate::utils::hazard::Hazard;

/// C-style enum naming the channel whose conversion is in flight.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AcquisitionState {
    Temp = 0,
    Cell = 1,
    Light = 2,
}

impl AcquisitionState {
    /// PUBLIC
    /// The state that follows this one, with wrap-around.
    pub fn next(self) -> Self {
        match self {
            AcquisitionState::Temp => AcquisitionState::Cell,
            AcquisitionState::Cell => AcquisitionState::Light,
            AcquisitionState::Light => AcquisitionState::Temp,
        }
    }

    /// PUBLIC
    /// Converter input and reference used while in this state.
    pub fn channel(self) -> AnalogChannel {
        match self {
            AcquisitionState::Temp => AnalogChannel {
                input: 0,
                reference: Reference::Internal,
            },
            AcquisitionState::Cell => AnalogChannel {
                input: 1,
                reference: Reference::Rail,
            },
            AcquisitionState::Light => AnalogChannel {
                input: 2,
                reference: Reference::Rail,
            },
        }
    }
}

/// Voltage reference for a conversion.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Reference {
    /// Fixed internal bandgap reference.
    Internal,
    /// Supply rail reference.
    Rail,
}

/// Multiplexer setting for one channel: analog input index plus reference.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AnalogChannel {
    pub input: u8,
    pub reference: Reference,
}

/// Per-channel conversion formulas.
///
/// The defaults are the bench formulas the hardware shipped with. The temperature one in
/// particular is an uncalibrated placeholder and is kept as-is until a probe is characterised.
#[derive(Clone, Copy)]
pub struct Calibration {
    pub temperature: fn(u16) -> i32,
    pub cell_level: fn(u16) -> i32,
    pub light_level: fn(u16) -> Result<i32, Hazard>,
}

impl Default for Calibration {
    fn default() -> Self {
        Calibration {
            temperature: placeholder_temperature,
            cell_level: cell_percent,
            light_level: photoresistor_light,
        }
    }
}

/// Raw converter reading as seen by the formulas. Single-ended readings can dip just below
/// zero around 0 V; those count as 0.
pub fn clamp_raw(sample: i16) -> u16 {
    sample.max(0) as u16
}

/// Placeholder temperature curve (not calibrated against a real probe).
pub fn placeholder_temperature(raw: u16) -> i32 {
    let scaled = 95.5 * raw as f32 + 20.0;
    (scaled * 1.1 / ADC_FULL_SCALE as f32) as i32
}

/// Cell level as a percentage of the converter's full scale.
pub fn cell_percent(raw: u16) -> i32 {
    (raw as f32 / ADC_FULL_SCALE as f32 * 100.0) as i32
}

/// Inverse-proportional photoresistor approximation. A zero reading has no defined level.
pub fn photoresistor_light(raw: u16) -> Result<i32, Hazard> {
    if raw == 0 {
        return Err(Hazard::ZeroLightReading);
    }
    Ok((LIGHT_CURVE_K / raw as u32) as i32 - LIGHT_CURVE_OFFSET)
}

/// Three-tier backlight duty: off in bright light, dimmed in between, full in the dark.
pub fn backlight_duty(light_level: i32) -> u8 {
    if light_level > LIGHT_BRIGHT {
        0
    } else if light_level > LIGHT_DIM {
        BACKLIGHT_DIM_DUTY
    } else {
        BACKLIGHT_MAX_DUTY
    }
}

/// Latest converted readings, written field by field from the conversion interrupt.
///
/// Fields are independent: a reader can see a fresh temperature next to a cell level from
/// the previous cycle. That is fine for continuously resampled telemetry.
pub struct SensorSample {
    temperature: AtomicI32,
    cell_level: AtomicI32,
    light_level: AtomicI32,
    backlight_duty: AtomicU8,
    dark_readings: AtomicU32,
}

/// Plain copy of a [`SensorSample`] taken by the main loop.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SensorSnapshot {
    pub temperature: i32,
    pub cell_level: i32,
    pub light_level: i32,
    pub backlight_duty: u8,
}

impl SensorSample {
    pub const fn new() -> Self {
        SensorSample {
            temperature: AtomicI32::new(0),
            cell_level: AtomicI32::new(0),
            light_level: AtomicI32::new(0),
            backlight_duty: AtomicU8::new(BACKLIGHT_BOOT_DUTY),
            dark_readings: AtomicU32::new(0),
        }
    }

    pub fn temperature(&self) -> i32 {
        self.temperature.load(Relaxed)
    }

    pub fn cell_level(&self) -> i32 {
        self.cell_level.load(Relaxed)
    }

    pub fn light_level(&self) -> i32 {
        self.light_level.load(Relaxed)
    }

    pub fn backlight_duty(&self) -> u8 {
        self.backlight_duty.load(Relaxed)
    }

    /// Number of zero light readings clamped since boot.
    pub fn dark_readings(&self) -> u32 {
        self.dark_readings.load(Relaxed)
    }

    pub fn snapshot(&self) -> SensorSnapshot {
        SensorSnapshot {
            temperature: self.temperature(),
            cell_level: self.cell_level(),
            light_level: self.light_level(),
            backlight_duty: self.backlight_duty(),
        }
    }
}

impl Default for SensorSample {
    fn default() -> Self {
        Self::new()
    }
}

/// What the driver must do after a conversion has been consumed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Conversion {
    /// Channel to select before the next conversion.
    pub next: AnalogChannel,
    /// New backlight duty, decided on the LIGHT step only.
    pub backlight: Option<u8>,
    /// Condition clamped while converting this reading.
    pub hazard: Option<Hazard>,
}

/// AcquisitionCycle struct declaration: Note all fields are private
///
/// 1. state: channel whose conversion is currently in flight
/// 2. calibration: formulas applied to each raw reading
pub struct AcquisitionCycle {
    state: AcquisitionState,
    calibration: Calibration,
}

impl AcquisitionCycle {
    /// PUBLIC
    /// Start on the temperature channel, which the driver must select before the first
    /// conversion (see [`AcquisitionCycle::channel`]).
    pub fn new(calibration: Calibration) -> Self {
        AcquisitionCycle {
            state: AcquisitionState::Temp,
            calibration,
        }
    }

    pub fn state(&self) -> AcquisitionState {
        self.state
    }

    /// PUBLIC
    /// Channel the in-flight conversion must be using.
    pub fn channel(&self) -> AnalogChannel {
        self.state.channel()
    }

    /// PUBLIC
    /// Consume the conversion that just completed for the current state, publish the converted
    /// value, and advance to the next state. Called by the conversion-complete interrupt.
    pub fn on_conversion(&mut self, raw: u16, sample: &SensorSample) -> Conversion {
        let mut backlight = None;
        let mut hazard = None;

        match self.state {
            AcquisitionState::Temp => {
                sample
                    .temperature
                    .store((self.calibration.temperature)(raw), Relaxed);
            }
            AcquisitionState::Cell => {
                sample
                    .cell_level
                    .store((self.calibration.cell_level)(raw), Relaxed);
            }
            AcquisitionState::Light => {
                let light = match (self.calibration.light_level)(raw) {
                    Ok(level) => level,
                    Err(h) => {
                        sample.dark_readings.fetch_add(1, Relaxed);
                        hazard = Some(h);
                        0
                    }
                };
                let duty = if hazard.is_some() {
                    BACKLIGHT_MAX_DUTY
                } else {
                    backlight_duty(light)
                };
                sample.light_level.store(light, Relaxed);
                sample.backlight_duty.store(duty, Relaxed);
                backlight = Some(duty);
            }
        }

        self.state = self.state.next();

        Conversion {
            next: self.state.channel(),
            backlight,
            hazard,
        }
    }
}

impl Default for AcquisitionCycle {
    fn default() -> Self {
        Self::new(Calibration::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn visits_states_in_fixed_cyclic_order() {
        let sample = SensorSample::new();
        let mut cycle = AcquisitionCycle::default();
        let order = [
            AcquisitionState::Temp,
            AcquisitionState::Cell,
            AcquisitionState::Light,
        ];

        for i in 0..3000 {
            assert_eq!(cycle.state(), order[i % 3]);
            let raw = (i % 1024) as u16;
            let conversion = cycle.on_conversion(raw, &sample);
            assert_eq!(conversion.next, order[(i + 1) % 3].channel());
        }
    }

    #[test]
    fn each_state_writes_only_its_field() {
        let sample = SensorSample::new();
        let mut cycle = AcquisitionCycle::default();

        cycle.on_conversion(1023, &sample);
        assert_eq!(sample.temperature(), 105);
        assert_eq!(sample.cell_level(), 0);

        cycle.on_conversion(512, &sample);
        assert_eq!(sample.cell_level(), 50);
        assert_eq!(sample.light_level(), 0);

        let light = cycle.on_conversion(1023, &sample);
        assert_eq!(sample.light_level(), 0);
        assert_eq!(light.backlight, Some(255));
        assert_eq!(sample.temperature(), 105);
    }

    #[test]
    fn only_light_step_decides_backlight() {
        let sample = SensorSample::new();
        let mut cycle = AcquisitionCycle::default();
        assert_eq!(cycle.on_conversion(300, &sample).backlight, None);
        assert_eq!(cycle.on_conversion(300, &sample).backlight, None);
        assert!(cycle.on_conversion(300, &sample).backlight.is_some());
    }

    #[test]
    fn channels_switch_reference() {
        assert_eq!(AcquisitionState::Temp.channel().reference, Reference::Internal);
        assert_eq!(AcquisitionState::Cell.channel().reference, Reference::Rail);
        assert_eq!(AcquisitionState::Light.channel().reference, Reference::Rail);
    }

    #[test]
    fn placeholder_temperature_formula() {
        assert_eq!(placeholder_temperature(0), 0);
        // (95.5 * 500 + 20) * 1.1 / 1023 = 51.37
        assert_eq!(placeholder_temperature(500), 51);
        assert_eq!(placeholder_temperature(1023), 105);
    }

    #[test]
    fn cell_percent_truncates() {
        assert_eq!(cell_percent(0), 0);
        assert_eq!(cell_percent(1023), 100);
        assert_eq!(cell_percent(1022), 99);
    }

    #[test]
    fn photoresistor_curve() {
        assert_eq!(photoresistor_light(1023), Ok(0));
        assert_eq!(photoresistor_light(1000), Ok(23));
        assert_eq!(photoresistor_light(682), Ok(500));
        assert_eq!(photoresistor_light(1), Ok(1_022_000));
    }

    #[test]
    fn zero_light_reading_is_clamped_to_dark() {
        let sample = SensorSample::new();
        let mut cycle = AcquisitionCycle::default();
        cycle.on_conversion(100, &sample);
        cycle.on_conversion(100, &sample);

        let conversion = cycle.on_conversion(0, &sample);
        assert_eq!(conversion.hazard, Some(Hazard::ZeroLightReading));
        assert_eq!(conversion.backlight, Some(255));
        assert_eq!(sample.light_level(), 0);
        assert_eq!(sample.dark_readings(), 1);
        assert_eq!(cycle.state(), AcquisitionState::Temp);
    }

    #[test]
    fn negative_readings_clamp_to_zero() {
        assert_eq!(clamp_raw(-5), 0);
        assert_eq!(clamp_raw(i16::MIN), 0);
        assert_eq!(clamp_raw(0), 0);
        assert_eq!(clamp_raw(1023), 1023);
    }

    #[test]
    fn backlight_starts_at_boot_duty() {
        let sample = SensorSample::new();
        assert_eq!(sample.backlight_duty(), BACKLIGHT_BOOT_DUTY);
        assert_eq!(sample.snapshot().backlight_duty, BACKLIGHT_BOOT_DUTY);
    }

    #[test]
    fn backlight_duty_tiers() {
        assert_eq!(backlight_duty(501), 0);
        assert_eq!(backlight_duty(500), 125);
        assert_eq!(backlight_duty(301), 125);
        assert_eq!(backlight_duty(300), 255);
        assert_eq!(backlight_duty(-1000), 255);
    }

    #[test]
    fn backlight_duty_is_non_increasing_in_light() {
        let mut previous = u8::MAX;
        for light in -1000..2000 {
            let duty = backlight_duty(light);
            assert!([0, 125, 255].contains(&duty));
            assert!(duty <= previous);
            previous = duty;
        }
    }

    #[test]
    fn custom_calibration_is_used() {
        fn fixed(_: u16) -> i32 {
            42
        }
        let sample = SensorSample::new();
        let mut cycle = AcquisitionCycle::new(Calibration {
            temperature: fixed,
            ..Calibration::default()
        });
        cycle.on_conversion(0, &sample);
        assert_eq!(sample.temperature(), 42);
    }
}
