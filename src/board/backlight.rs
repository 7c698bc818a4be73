use microbit::hal::{
    gpio::{Output, Pin, PushPull},
    pwm::{self, Pwm},
};
use microbit::pac::PWM0;

use ride_panel::config::{BACKLIGHT_BOOT_DUTY, BACKLIGHT_MAX_DUTY};

pub struct Backlight {
    pwm: Pwm<PWM0>,
}

impl Backlight {
    const CHANNEL: pwm::Channel = pwm::Channel::C0;

    // 16 MHz / 64 / 255 steps is ~980 Hz, well above visible flicker
    const PRESCALER: pwm::Prescaler = pwm::Prescaler::Div64;

    pub fn new(pwm: PWM0, pin: Pin<Output<PushPull>>) -> Self {
        let pwm = Pwm::new(pwm);
        pwm.set_output_pin(Backlight::CHANNEL, pin)
            .set_prescaler(Backlight::PRESCALER)
            .set_max_duty(BACKLIGHT_MAX_DUTY as u16);
        pwm.enable();

        let backlight = Backlight { pwm };
        backlight.set_duty(BACKLIGHT_BOOT_DUTY);
        backlight
    }

    /// duty is on-time out of 255
    pub fn set_duty(&self, duty: u8) {
        self.pwm.set_duty_on(Backlight::CHANNEL, duty as u16);
    }
}
