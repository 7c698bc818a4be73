use embedded_hal::digital::OutputPin;
use microbit::hal::gpio::{Output, Pin, PushPull};

use ride_panel::DigitPort;

/// Up to 8 output pins driven together as the bits of one byte.
/// Index = bit position; `None` marks a bit with nothing wired to it.
pub struct SegmentPort {
    lines: [Option<Pin<Output<PushPull>>>; 8],
}

impl SegmentPort {
    pub fn new(lines: [Option<Pin<Output<PushPull>>>; 8]) -> Self {
        SegmentPort { lines }
    }
}

impl DigitPort for SegmentPort {
    fn write_masked(&mut self, mask: u8, bits: u8) {
        for (bit, line) in self.lines.iter_mut().enumerate() {
            if mask & (1 << bit) == 0 {
                continue;
            }
            if let Some(pin) = line {
                if bits & (1 << bit) != 0 {
                    pin.set_high().ok();
                } else {
                    pin.set_low().ok();
                }
            }
        }
    }
}
