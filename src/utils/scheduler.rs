//! scheduler.rs
//! Copyright © 2026 Sean Springer
//! [This program is licensed under the "MIT License"]
//! Please see the file LICENSE in the source distribution of this software for license terms.
//!
//! The scheduler module contains the cooperative foreground loop body. Dashboard::poll() is
//! called over and over by main.rs; every pass it steps the digit multiplexer, checks the three
//! soft timers (1 s RPM/cell, 2 s temperature/overheat, 5 s velocity) against the millisecond
//! clock, and redraws the status panel. Nothing in here blocks: the multiplexer dwells by
//! comparing clock readings, the same way the soft timers do.

use embedded_hal::digital::OutputPin;
use rtt_target::rprintln;

use crate::config::{
    BACKLIGHT_BOOT_DUTY, DIGIT_COUNT, DIGIT_DATA_MASK, DIGIT_DWELL_MS, DIGIT_ENABLE_LINES,
    DIGIT_ENABLE_MASK, DRIFT_TOLERANCE_MS, OVERHEAT_THRESHOLD_C, RPM_PERIOD_MS,
    TEMPERATURE_PERIOD_MS, VELOCITY_PERIOD_MS, VELOCITY_WINDOW,
};
use crate::utils::clock::SoftTimer;
use crate::utils::digit_encoder::{decode_digit, encode};
use crate::utils::hazard::Hazard;
use crate::utils::panel::{PanelText, StatusPanel};
use crate::utils::telemetry::Telemetry;
use crate::utils::velocity::compute_velocity;

/// A group of output lines addressed as the bits of one byte.
pub trait DigitPort {
    /// Drive the lines in `mask` to the matching bits of `bits`; leave the others alone.
    fn write_masked(&mut self, mask: u8, bits: u8);
}

/// DigitMultiplexer struct declaration: Note all fields are private
///
/// 1. data: port carrying the BCD digit into the decoder
/// 2. enable: port carrying one enable line per digit
/// 3. position: next digit to light (0 = units)
/// 4. last_step: clock reading of the previous step, None before the first one
pub struct DigitMultiplexer<D, E> {
    data: D,
    enable: E,
    position: usize,
    last_step: Option<u32>,
}

impl<D: DigitPort, E: DigitPort> DigitMultiplexer<D, E> {
    pub fn new(data: D, enable: E) -> Self {
        DigitMultiplexer {
            data,
            enable,
            position: 0,
            last_step: None,
        }
    }

    /// PUBLIC
    /// Light the next digit of `value` once the current one has been shown for its dwell time.
    /// Returns true when a step happened.
    pub fn poll(&mut self, now: u32, value: u8) -> bool {
        if let Some(last) = self.last_step
            && now.wrapping_sub(last) < DIGIT_DWELL_MS
        {
            return false;
        }

        self.enable.write_masked(DIGIT_ENABLE_MASK, 0);
        self.enable
            .write_masked(DIGIT_ENABLE_MASK, DIGIT_ENABLE_LINES[self.position]);
        let digit = decode_digit(value, self.position);
        self.data.write_masked(DIGIT_DATA_MASK, encode(digit, DIGIT_DATA_MASK));

        self.position = (self.position + 1) % DIGIT_COUNT;
        self.last_step = Some(now);
        true
    }

    /// PUBLIC
    /// Digit position the next step will light.
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn ports(&self) -> (&D, &E) {
        (&self.data, &self.enable)
    }
}

/// Dashboard struct declaration: Note all fields are private
///
/// 1. digits: non-blocking multiplexer for the 3-digit display
/// 2. rpm_timer / temperature_timer / velocity_timer: the three soft timers
/// 3. text: the four panel lines, refreshed by the timers
/// 4. display_value: number on the 3-digit display (whole km/h)
/// 5. overheat: indicator line raised above the temperature threshold
/// 6. overheated: level last written to the indicator
/// 7. backlight_duty: backlight duty last reported
/// 8. dark_readings: zero light readings already reported
/// 9. last_hazard: most recent condition the loop reported
pub struct Dashboard<D, E, O> {
    digits: DigitMultiplexer<D, E>,
    rpm_timer: SoftTimer,
    temperature_timer: SoftTimer,
    velocity_timer: SoftTimer,
    text: PanelText,
    display_value: u8,
    overheat: O,
    overheated: bool,
    backlight_duty: u8,
    dark_readings: u32,
    last_hazard: Option<Hazard>,
}

impl<D, E, O> Dashboard<D, E, O>
where
    D: DigitPort,
    E: DigitPort,
    O: OutputPin,
{
    pub fn new(data: D, enable: E, overheat: O) -> Self {
        Dashboard {
            digits: DigitMultiplexer::new(data, enable),
            rpm_timer: SoftTimer::new(RPM_PERIOD_MS),
            temperature_timer: SoftTimer::new(TEMPERATURE_PERIOD_MS),
            velocity_timer: SoftTimer::new(VELOCITY_PERIOD_MS),
            text: PanelText::new(),
            display_value: 0,
            overheat,
            overheated: false,
            backlight_duty: BACKLIGHT_BOOT_DUTY,
            dark_readings: 0,
            last_hazard: None,
        }
    }

    /// PUBLIC
    /// One pass of the foreground loop.
    pub fn poll<P: StatusPanel>(&mut self, telemetry: &Telemetry, panel: &mut P) {
        let now = telemetry.clock.now();

        self.digits.poll(now, self.display_value);

        if self.rpm_timer.poll(now) {
            self.refresh_rpm_and_cell(telemetry);
        }

        if self.temperature_timer.poll(now) {
            self.refresh_temperature(telemetry);
        }

        let velocity_interval = self.velocity_timer.elapsed(now);
        if self.velocity_timer.poll(now) {
            self.refresh_velocity(telemetry, velocity_interval);
        }

        self.text.draw(panel);
    }

    pub fn display_value(&self) -> u8 {
        self.display_value
    }

    pub fn text(&self) -> &PanelText {
        &self.text
    }

    pub fn overheated(&self) -> bool {
        self.overheated
    }

    /// Backlight duty as of the last 1 s refresh.
    pub fn backlight_duty(&self) -> u8 {
        self.backlight_duty
    }

    pub fn last_hazard(&self) -> Option<Hazard> {
        self.last_hazard
    }

    pub fn digits(&self) -> &DigitMultiplexer<D, E> {
        &self.digits
    }

    fn refresh_rpm_and_cell(&mut self, telemetry: &Telemetry) {
        self.text.set_rpm(telemetry.rotation.take_rpm_window());

        let sensors = telemetry.sensors.snapshot();
        self.text.set_cell(sensors.cell_level);

        if sensors.backlight_duty != self.backlight_duty {
            rprintln!(
                "backlight {} -> {} (light {})",
                self.backlight_duty,
                sensors.backlight_duty,
                sensors.light_level
            );
            self.backlight_duty = sensors.backlight_duty;
        }

        let dark_readings = telemetry.sensors.dark_readings();
        if dark_readings != self.dark_readings {
            let hazard = Hazard::ZeroLightReading;
            rprintln!("{} ({} since boot)", hazard, dark_readings);
            self.dark_readings = dark_readings;
            self.last_hazard = Some(hazard);
        }
    }

    fn refresh_temperature(&mut self, telemetry: &Telemetry) {
        let temperature = telemetry.sensors.temperature();
        self.text.set_temperature(temperature);

        let hot = temperature > OVERHEAT_THRESHOLD_C;
        if hot {
            self.overheat.set_high().ok();
        } else {
            self.overheat.set_low().ok();
        }

        if hot != self.overheated {
            rprintln!("overheat {} at {} C", if hot { "on" } else { "off" }, temperature);
            self.overheated = hot;
        }
    }

    fn refresh_velocity(&mut self, telemetry: &Telemetry, interval_ms: u32) {
        let velocity = compute_velocity(&telemetry.rotation, VELOCITY_WINDOW);

        self.display_value = velocity.display_value();
        self.text.set_velocity(self.display_value);
        rprintln!("velocity {} rpm, {} km/h", velocity.rpm, self.display_value);

        let expected_ms = self.velocity_timer.period_ms();
        if interval_ms.abs_diff(expected_ms) > DRIFT_TOLERANCE_MS {
            let hazard = Hazard::TimingDrift {
                expected_ms,
                actual_ms: interval_ms,
            };
            rprintln!("{}", hazard);
            self.last_hazard = Some(hazard);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct FakePort {
        bits: u8,
        writes: usize,
    }

    impl DigitPort for FakePort {
        fn write_masked(&mut self, mask: u8, bits: u8) {
            self.bits = (self.bits & !mask) | (bits & mask);
            self.writes += 1;
        }
    }

    #[test]
    fn first_poll_steps_immediately() {
        let mut digits = DigitMultiplexer::new(FakePort::default(), FakePort::default());
        assert!(digits.poll(0, 247));
        let (data, enable) = digits.ports();
        assert_eq!(enable.bits, DIGIT_ENABLE_LINES[0]);
        assert_eq!(data.bits, encode(7, DIGIT_DATA_MASK));
    }

    #[test]
    fn dwell_holds_each_digit() {
        let mut digits = DigitMultiplexer::new(FakePort::default(), FakePort::default());
        assert!(digits.poll(100, 247));
        for now in 101..110 {
            assert!(!digits.poll(now, 247));
        }
        assert_eq!(digits.position(), 1);
        assert!(digits.poll(110, 247));
        assert_eq!(digits.position(), 2);
    }

    #[test]
    fn cycles_through_all_positions() {
        let mut digits = DigitMultiplexer::new(FakePort::default(), FakePort::default());
        let expected = [(0, 7u8), (1, 4), (4, 2)];

        for (step, (enable_bit, digit)) in expected.iter().cycle().take(9).enumerate() {
            assert!(digits.poll(step as u32 * DIGIT_DWELL_MS, 247));
            let (data, enable) = digits.ports();
            assert_eq!(enable.bits, 1 << enable_bit);
            assert_eq!(data.bits, encode(*digit, DIGIT_DATA_MASK));
        }
    }

    #[test]
    fn only_one_enable_line_is_active() {
        let mut digits = DigitMultiplexer::new(FakePort::default(), FakePort::default());
        for step in 0..30u32 {
            digits.poll(step * DIGIT_DWELL_MS, 123);
            let (_, enable) = digits.ports();
            assert_eq!(enable.bits.count_ones(), 1);
        }
    }
}
