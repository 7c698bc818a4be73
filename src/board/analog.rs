//! analog.rs
//! Copyright © 2026 Sean Springer
//! [This program is licensed under the "MIT License"]
//! Please see the file LICENSE in the source distribution of this software for license terms.
//!
//! The analog module contains AnalogFrontEnd, which runs the SAADC free-running from its own
//! interrupt: STARTED triggers a sample, END hands the reading to the AcquisitionCycle, applies
//! the returned channel (and backlight duty), and starts the next conversion straight away.
//! The SAADC is driven at register level because the HAL's Saadc only offers blocking reads.

use microbit::pac::SAADC;

use ride_panel::SensorSample;
use ride_panel::utils::acquisition::{AcquisitionCycle, AnalogChannel, Reference, clamp_raw};

use super::backlight::Backlight;

/// AnalogFrontEnd struct declaration: Note all fields are private
///
/// 1. saadc: the converter, owned for register access
/// 2. cycle: TEMP/CELL/LIGHT state machine deciding what each reading means
/// 3. backlight: PWM output updated on every LIGHT conversion
/// 4. buffer: EasyDMA target, only read after END while the converter is idle
pub struct AnalogFrontEnd {
    saadc: SAADC,
    cycle: AcquisitionCycle,
    backlight: Backlight,
    buffer: i16,
}

impl AnalogFrontEnd {
    /// PUBLIC
    /// Configure the SAADC for single 10-bit conversions with STARTED/END interrupts, and
    /// select the cycle's first channel. Nothing converts until start().
    pub fn new(saadc: SAADC, cycle: AcquisitionCycle, backlight: Backlight) -> Self {
        saadc.enable.write(|w| w.enable().enabled());
        // 10 bits keeps full scale at 1023
        saadc.resolution.write(|w| w.val()._10bit());
        saadc.oversample.write(|w| w.oversample().bypass());
        saadc.samplerate.write(|w| w.mode().task());
        saadc.ch[0].pseln.write(|w| w.pseln().nc());
        saadc.result.maxcnt.write(|w| unsafe { w.maxcnt().bits(1) });

        saadc.events_started.reset();
        saadc.events_end.reset();
        saadc.intenset.write(|w| w.started().set().end().set());

        let front_end = AnalogFrontEnd {
            saadc,
            cycle,
            backlight,
            buffer: 0,
        };
        front_end.select(front_end.cycle.channel());
        front_end
    }

    /// PUBLIC
    /// Kick off a conversion. The STARTED interrupt follows and triggers the sample.
    ///
    /// The result pointer is latched by START, so it is written here, once the front end sits
    /// at its final address inside its static.
    pub fn start(&mut self) {
        let buffer = (&raw mut self.buffer) as u32;
        self.saadc
            .result
            .ptr
            .write(|w| unsafe { w.ptr().bits(buffer) });
        self.saadc.tasks_start.write(|w| unsafe { w.bits(1) });
    }

    /// PUBLIC
    /// SAADC interrupt body.
    pub fn on_interrupt(&mut self, sensors: &SensorSample) {
        if self.saadc.events_started.read().bits() != 0 {
            self.saadc.events_started.reset();
            self.saadc.tasks_sample.write(|w| unsafe { w.bits(1) });
        }

        if self.saadc.events_end.read().bits() != 0 {
            self.saadc.events_end.reset();

            // SAFETY: END means EasyDMA has finished writing the buffer
            let sample = unsafe { core::ptr::read_volatile(&raw const self.buffer) };
            let raw = clamp_raw(sample);

            let conversion = self.cycle.on_conversion(raw, sensors);
            if let Some(duty) = conversion.backlight {
                self.backlight.set_duty(duty);
            }

            self.select(conversion.next);
            self.start();
        }
    }

    /// PRIVATE
    /// Point channel 0 at the given input and reference. The internal 0.6 V reference uses
    /// gain 1/6 (3.6 V range); the rail reference is VDD/4 with gain 1/4 (VDD range).
    fn select(&self, channel: AnalogChannel) {
        let ch = &self.saadc.ch[0];
        ch.pselp.write(|w| match channel.input {
            0 => w.pselp().analog_input0(),
            1 => w.pselp().analog_input1(),
            _ => w.pselp().analog_input2(),
        });
        ch.config.write(|w| {
            let w = match channel.reference {
                Reference::Internal => w.refsel().internal().gain().gain1_6(),
                Reference::Rail => w.refsel().vdd1_4().gain().gain1_4(),
            };
            w.tacq()
                ._40us()
                .mode()
                .se()
                .resp()
                .bypass()
                .resn()
                .bypass()
                .burst()
                .disabled()
        });
    }
}
