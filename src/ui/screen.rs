//! Screen layouts for the two receiver loops.
//!
//! Interrupt-driven loop (refreshed on a timer):
//! ```text
//! y=0   <last packet>
//! y=12  Time since: 3s
//! y=24  Last Rssi:  -87.00dBm
//! y=36  Last SNR :  9.25dB
//! ```
//!
//! Blocking loop (refreshed after every receive attempt):
//! ```text
//! y=0   <last packet>
//! y=12  No packet:  4x
//! ```

use core::fmt::Write;

use crate::config::{LINE_HEIGHT, SPLASH_TEXT};
use crate::state::ReceiverState;
use crate::ui::{DisplayError, TextDisplay};
use heapless::String;

/// One formatted status line.
pub type Line = String<40>;

pub fn time_since_line(secs: u64) -> Line {
    let mut line = Line::new();
    let _ = write!(line, "Time since: {}s", secs);
    line
}

pub fn rssi_line(rssi: f32) -> Line {
    let mut line = Line::new();
    let _ = write!(line, "Last Rssi:  {:.2}dBm", rssi);
    line
}

pub fn snr_line(snr: f32) -> Line {
    let mut line = Line::new();
    let _ = write!(line, "Last SNR :  {:.2}dB", snr);
    line
}

pub fn missed_line(missed: u32) -> Line {
    let mut line = Line::new();
    let _ = write!(line, "No packet:  {}x", missed);
    line
}

/// Boot message shown before the radio is up.
pub fn draw_splash<D: TextDisplay>(display: &mut D) -> Result<(), DisplayError> {
    display.clear();
    display.draw_text(0, 0, SPLASH_TEXT)?;
    display.flush()
}

/// Last packet, time since it arrived, and its RSSI/SNR.
pub fn draw_status<D: TextDisplay>(
    display: &mut D,
    state: &ReceiverState,
    now_us: u64,
) -> Result<(), DisplayError> {
    display.clear();
    display.draw_text(0, 0, state.last_packet())?;
    display.draw_text(
        0,
        LINE_HEIGHT,
        &time_since_line(state.secs_since_last_message(now_us)),
    )?;
    display.draw_text(0, 2 * LINE_HEIGHT, &rssi_line(state.last_rssi()))?;
    display.draw_text(0, 3 * LINE_HEIGHT, &snr_line(state.last_snr()))?;
    display.flush()
}

/// Last packet and the consecutive no-packet count.
pub fn draw_attempt<D: TextDisplay>(
    display: &mut D,
    state: &ReceiverState,
) -> Result<(), DisplayError> {
    display.clear();
    display.draw_text(0, 0, state.last_packet())?;
    display.draw_text(0, LINE_HEIGHT, &missed_line(state.missed()))?;
    display.flush()
}
