pub mod analog;
pub mod backlight;
pub mod rtt_panel;
pub mod segment_port;
