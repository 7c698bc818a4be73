use core::fmt::Write;

use heapless::String;

/// One line of panel text. Long enough for any `u32`/`i32` reading plus its label.
pub type PanelLine = String<24>;

/// Text-mode status panel.
///
/// Drawing happens into a back buffer; nothing reaches the glass until `render`.
pub trait StatusPanel {
    fn clear(&mut self);
    fn set_cursor(&mut self, x: u8, y: u8);
    fn write_string(&mut self, text: &str, scale: u8);
    fn render(&mut self);
}

/// Cursor positions of the four lines, top to bottom.
const RPM_AT: (u8, u8) = (1, 1);
const VELOCITY_AT: (u8, u8) = (1, 11);
const CELL_AT: (u8, u8) = (1, 21);
const TEMPERATURE_AT: (u8, u8) = (1, 31);

const TEXT_SCALE: u8 = 1;

/// The four formatted readings drawn on every loop pass.
pub struct PanelText {
    rpm: PanelLine,
    velocity: PanelLine,
    cell: PanelLine,
    temperature: PanelLine,
}

impl PanelText {
    pub fn new() -> Self {
        PanelText {
            rpm: line(format_args!("RPM: 0")),
            velocity: line(format_args!("VEL: 0")),
            cell: line(format_args!("CELL: 0")),
            temperature: line(format_args!("TEMP: 0")),
        }
    }

    pub fn set_rpm(&mut self, revolutions: u32) {
        self.rpm = line(format_args!("RPM: {revolutions} rot/m"));
    }

    pub fn set_velocity(&mut self, kmh: u8) {
        self.velocity = line(format_args!("VEL {kmh}"));
    }

    pub fn set_cell(&mut self, percent: i32) {
        self.cell = line(format_args!("CELL: {percent} pc"));
    }

    pub fn set_temperature(&mut self, celsius: i32) {
        self.temperature = line(format_args!("TEMP: {celsius} C"));
    }

    pub fn rpm(&self) -> &str {
        &self.rpm
    }

    pub fn velocity(&self) -> &str {
        &self.velocity
    }

    pub fn cell(&self) -> &str {
        &self.cell
    }

    pub fn temperature(&self) -> &str {
        &self.temperature
    }

    /// Redraw the whole panel.
    pub fn draw<P: StatusPanel>(&self, panel: &mut P) {
        panel.clear();
        for ((x, y), text) in [
            (RPM_AT, &self.rpm),
            (VELOCITY_AT, &self.velocity),
            (CELL_AT, &self.cell),
            (TEMPERATURE_AT, &self.temperature),
        ] {
            panel.set_cursor(x, y);
            panel.write_string(text, TEXT_SCALE);
        }
        panel.render();
    }
}

impl Default for PanelText {
    fn default() -> Self {
        Self::new()
    }
}

fn line(args: core::fmt::Arguments<'_>) -> PanelLine {
    let mut text = PanelLine::new();
    // capacity covers every reading this panel formats
    text.write_fmt(args).ok();
    text
}
