use core::sync::atomic::{AtomicBool, Ordering::SeqCst};

use cortex_m::asm;
use cortex_m_rt::entry;
use critical_section_lock_mut::LockMut;
use embedded_hal::digital::OutputPin;
use microbit::{
    board::Board,
    hal::{
        Timer,
        gpio::{Level, Output, Pin, PushPull},
        gpiote::Gpiote,
        timer::Periodic,
    },
    pac::{Interrupt, NVIC, TIMER1, interrupt},
};
use panic_rtt_target as _;
use rtt_target::{rprintln, rtt_init_print};

use ride_panel::config::TIMER_TICKS_PER_MS;
use ride_panel::{AcquisitionCycle, Dashboard, Telemetry};

use crate::board::analog::AnalogFrontEnd;
use crate::board::backlight::Backlight;
use crate::board::rtt_panel::RttPanel;
use crate::board::segment_port::SegmentPort;

/// types
type ClockTimer = Timer<TIMER1, Periodic>;
type OutputLine = Pin<Output<PushPull>>;

/// globals
static TELEMETRY: Telemetry = Telemetry::new();
static CLOCK_TIMER: LockMut<ClockTimer> = LockMut::new();
static GPIOTE_PERIPHERAL: LockMut<Gpiote> = LockMut::new();
static ANALOG: LockMut<AnalogFrontEnd> = LockMut::new();
static BUTTON_LINE: LockMut<OutputLine> = LockMut::new();
static BUTTON_LINE_HIGH: AtomicBool = AtomicBool::new(false);

/// Millisecond clock event handler
#[interrupt]
fn TIMER1() {
    CLOCK_TIMER.with_lock(|clock_timer| {
        clock_timer.reset_event();
    });
    TELEMETRY.clock.tick();
}

/// Rotation sensor and panel button event handler
#[interrupt]
fn GPIOTE() {
    GPIOTE_PERIPHERAL.with_lock(|gpiote| {
        if gpiote.channel0().is_event_triggered() {
            // wheel revolution edge
            gpiote.channel0().reset_events();
            TELEMETRY.rotation.record_edge();
        }
        if gpiote.channel1().is_event_triggered() {
            // panel button press toggles its line; nothing else consumes it
            gpiote.channel1().reset_events();
            let high = !BUTTON_LINE_HIGH.fetch_xor(true, SeqCst);
            BUTTON_LINE.with_lock(|line| {
                if high {
                    line.set_high().ok();
                } else {
                    line.set_low().ok();
                }
            });
        }
    });
}

/// Conversion complete event handler
#[interrupt]
fn SAADC() {
    ANALOG.with_lock(|front_end| {
        front_end.on_interrupt(&TELEMETRY.sensors);
    });
}

#[entry]
fn main() -> ! {
    rtt_init_print!();

    let board = Board::take().unwrap();
    let display_pins = board.display_pins;

    // millisecond clock: 1000 ticks of the 1 MHz timer, auto-cleared on compare
    let mut clock_timer: ClockTimer = Timer::periodic(board.TIMER1);
    clock_timer.enable_interrupt();
    clock_timer.reset_event();
    clock_timer.start(TIMER_TICKS_PER_MS);
    CLOCK_TIMER.init(clock_timer);

    // rotation sensor (rising edge) and panel button (falling edge, pulled up)
    let rotation_in = board.edge.e09.into_pulldown_input().degrade();
    let button_in = board.buttons.button_a.into_pullup_input().degrade();
    let gpiote = Gpiote::new(board.GPIOTE);
    let channel0 = gpiote.channel0(); // rotation
    let channel1 = gpiote.channel1(); // button
    channel0.input_pin(&rotation_in).lo_to_hi().enable_interrupt();
    channel0.reset_events();
    channel1.input_pin(&button_in).hi_to_lo().enable_interrupt();
    channel1.reset_events();
    GPIOTE_PERIPHERAL.init(gpiote);
    BUTTON_LINE.init(display_pins.row5.degrade());

    // analog inputs: AIN0 temperature, AIN1 cell, AIN2 light
    let _temperature_in = board.edge.e00.into_floating_input();
    let _cell_in = board.edge.e01.into_floating_input();
    let _light_in = board.edge.e02.into_floating_input();
    let backlight_pin: OutputLine = board.edge.e16.into_push_pull_output(Level::Low).degrade();
    let backlight = Backlight::new(board.PWM0, backlight_pin);
    ANALOG.init(AnalogFrontEnd::new(
        board.ADC,
        AcquisitionCycle::default(),
        backlight,
    ));

    // numeric display: BCD data on bits 0, 1, 2, 6 and digit enables on bits 0, 1, 4
    let data = SegmentPort::new([
        Some(display_pins.col1.degrade()),
        Some(display_pins.col2.degrade()),
        Some(display_pins.col3.degrade()),
        None,
        None,
        None,
        Some(display_pins.col4.degrade()),
        None,
    ]);
    let enable = SegmentPort::new([
        Some(display_pins.row1.degrade()),
        Some(display_pins.row2.degrade()),
        None,
        None,
        Some(display_pins.row3.degrade()),
        None,
        None,
        None,
    ]);
    let overheat: OutputLine = board.edge.e08.into_push_pull_output(Level::Low).degrade();

    let mut dashboard = Dashboard::new(data, enable, overheat);
    let mut panel = RttPanel::new();

    // Set up the NVIC to handle interrupts.
    unsafe {
        NVIC::unmask(Interrupt::TIMER1); // millisecond clock
        NVIC::unmask(Interrupt::GPIOTE); // rotation + button
        NVIC::unmask(Interrupt::SAADC); // conversion complete
    };
    NVIC::unpend(Interrupt::TIMER1);
    NVIC::unpend(Interrupt::GPIOTE);
    NVIC::unpend(Interrupt::SAADC);

    ANALOG.with_lock(|front_end| front_end.start());
    rprintln!("ride panel running");

    loop {
        dashboard.poll(&TELEMETRY, &mut panel);
        // every interrupt wakes us, the 1 ms tick at the latest
        asm::wfi();
    }
}
