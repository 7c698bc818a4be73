//! rtt_panel.rs
//!
//! The rtt_panel module contains RttPanel, a StatusPanel that mirrors the 4-line status panel
//! onto the RTT console. Lines are addressed by the panel's pixel rows (1, 11, 21, 31); the
//! console only gets a new print when render() is called with text that differs from what was
//! last shown, so the main loop can redraw every pass without flooding the probe.

use rtt_target::rprintln;

use ride_panel::StatusPanel;
use ride_panel::utils::panel::PanelLine;

/// Constants
pub const PANEL_LINES: usize = 4;
const ROW_HEIGHT: u8 = 10;

/// RttPanel struct declaration: Note all fields are private
///
/// 1. back: lines drawn since the last clear()
/// 2. shown: lines printed by the last render()
/// 3. row: line selected by the last set_cursor()
pub struct RttPanel {
    back: [PanelLine; PANEL_LINES],
    shown: [PanelLine; PANEL_LINES],
    row: usize,
}

impl RttPanel {
    /// PUBLIC
    /// Generate a new, blank RttPanel.
    pub fn new() -> Self {
        RttPanel {
            back: Default::default(),
            shown: Default::default(),
            row: 0,
        }
    }
}

impl StatusPanel for RttPanel {
    fn clear(&mut self) {
        for line in self.back.iter_mut() {
            line.clear();
        }
        self.row = 0;
    }

    /// The column is ignored; the console has no horizontal layout.
    fn set_cursor(&mut self, _x: u8, y: u8) {
        self.row = ((y / ROW_HEIGHT) as usize).min(PANEL_LINES - 1);
    }

    fn write_string(&mut self, text: &str, _scale: u8) {
        // text that does not fit is dropped, as on the glass
        self.back[self.row].push_str(text).ok();
    }

    fn render(&mut self) {
        if self.back == self.shown {
            return;
        }
        rprintln!(
            "{} | {} | {} | {}",
            self.back[0],
            self.back[1],
            self.back[2],
            self.back[3]
        );
        self.shown = self.back.clone();
    }
}
