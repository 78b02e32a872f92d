//! LoRa packet monitor for an SX1262 radio with an SSD1306 status screen.
//!
//! The receiver loops, their state, and the screen layouts are plain
//! `no_std` logic behind small driver traits, so they build and test on
//! the host (no embedded hardware required).
//!
//! Usage: `cargo test`
//!
//! The firmware binaries (`rx-interrupt`, `rx-blocking`) and the RAK4631
//! board glue in [`board`] need `--features embedded` and a
//! `thumbv7em-none-eabihf` target.

#![cfg_attr(not(test), no_std)]
#![allow(async_fn_in_trait)]

pub mod config;
pub mod error;
pub mod flag;
pub mod radio;
pub mod receiver;
pub mod state;
pub mod ui;

#[cfg(feature = "embedded")]
pub mod board;

pub use error::{Error, RadioError};
pub use flag::RxFlag;
pub use radio::{BlockingReceive, PacketListener, Radio, RxEvent};
pub use receiver::{Attempt, BlockingReceiver, Clock, InterruptReceiver, Refresh, Tick};
pub use state::ReceiverState;
pub use ui::{DisplayError, TextDisplay};

// ═══════════════════════════════════════════════════════════════════════════
// Unit Tests
// ═══════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::config;
    use super::error::{Error, RadioError};
    use super::flag::RxFlag;
    use super::radio::payload::decode;
    use super::radio::RxEvent;
    use super::state::ReceiverState;
    use super::ui::screen;

    // ════════════════════════════════════════════════════════════════════════
    // RxFlag Tests
    // ════════════════════════════════════════════════════════════════════════

    #[test]
    fn flag_starts_lowered() {
        let flag = RxFlag::new();
        assert!(!flag.is_raised());
        assert!(!flag.take());
    }

    #[test]
    fn flag_is_consumed_exactly_once() {
        let flag = RxFlag::new();
        flag.raise();
        assert!(flag.is_raised());
        assert!(flag.take());
        assert!(!flag.take());
        assert!(!flag.is_raised());
    }

    #[test]
    fn flag_collapses_repeated_raises() {
        let flag = RxFlag::new();
        flag.raise();
        flag.raise();
        flag.raise();
        assert!(flag.take());
        assert!(!flag.take());
    }

    #[test]
    fn flag_can_be_raised_again_after_take() {
        static FLAG: RxFlag = RxFlag::new();
        FLAG.raise();
        assert!(FLAG.take());
        FLAG.raise();
        assert!(FLAG.take());
    }

    // ════════════════════════════════════════════════════════════════════════
    // Payload Decoding Tests
    // ════════════════════════════════════════════════════════════════════════

    #[test]
    fn payload_plain_ascii() {
        assert_eq!(decode(b"Hello World! #12").as_str(), "Hello World! #12");
    }

    #[test]
    fn payload_empty() {
        assert_eq!(decode(&[]).as_str(), "");
    }

    #[test]
    fn payload_cut_at_first_nul() {
        assert_eq!(decode(b"ping\0\0garbage").as_str(), "ping");
        assert_eq!(decode(b"\0ping").as_str(), "");
    }

    #[test]
    fn payload_keeps_multibyte_utf8() {
        assert_eq!(decode("temp 21°C".as_bytes()).as_str(), "temp 21°C");
    }

    #[test]
    fn payload_replaces_invalid_utf8() {
        assert_eq!(decode(&[b'a', 0xFF, b'b', 0xC3]).as_str(), "a?b?");
    }

    #[test]
    fn payload_fills_to_capacity() {
        let bytes = [b'x'; config::MAX_PAYLOAD_LEN];
        let text = decode(&bytes);
        assert_eq!(text.len(), config::MAX_PAYLOAD_LEN);
    }

    // ════════════════════════════════════════════════════════════════════════
    // ReceiverState Tests
    // ════════════════════════════════════════════════════════════════════════

    #[test]
    fn state_initial_values() {
        let state = ReceiverState::new();
        assert_eq!(state.last_packet(), "");
        assert_eq!(state.last_rssi(), 0.0);
        assert_eq!(state.last_snr(), 0.0);
        assert_eq!(state.last_message_us(), 0);
        assert_eq!(state.last_refresh_us(), 0);
        assert_eq!(state.missed(), 0);
        assert_eq!(state.received(), 0);
    }

    #[test]
    fn state_record_packet_overwrites_previous() {
        let mut state = ReceiverState::new();
        state.record_packet(b"first", -90.0, 5.5, 1_000);
        state.record_packet(b"second", -70.5, 9.25, 2_000);
        assert_eq!(state.last_packet(), "second");
        assert_eq!(state.last_rssi(), -70.5);
        assert_eq!(state.last_snr(), 9.25);
        assert_eq!(state.last_message_us(), 2_000);
        assert_eq!(state.received(), 2);
    }

    #[test]
    fn state_missed_counts_timeouts_and_resets_on_packet() {
        let mut state = ReceiverState::new();
        state.record_timeout();
        state.record_timeout();
        state.record_timeout();
        assert_eq!(state.missed(), 3);

        state.record_packet(b"hi", -80.0, 7.0, 10);
        assert_eq!(state.missed(), 0);

        state.record_timeout();
        assert_eq!(state.missed(), 1);
    }

    #[test]
    fn state_refresh_due_is_strictly_after_interval() {
        let mut state = ReceiverState::new();
        state.mark_refreshed(1_000_000);
        assert!(!state.refresh_due(1_000_000, 100_000));
        assert!(!state.refresh_due(1_100_000, 100_000));
        assert!(state.refresh_due(1_100_001, 100_000));
    }

    #[test]
    fn state_refresh_due_tolerates_clock_behind_last_refresh() {
        let mut state = ReceiverState::new();
        state.mark_refreshed(500_000);
        assert!(!state.refresh_due(100, 100_000));
    }

    #[test]
    fn state_secs_since_last_message() {
        let mut state = ReceiverState::new();
        // No packet yet: counts from boot.
        assert_eq!(state.secs_since_last_message(4_999_999), 4);

        state.record_packet(b"x", 0.0, 0.0, 2_000_000);
        assert_eq!(state.secs_since_last_message(2_999_999), 0);
        assert_eq!(state.secs_since_last_message(3_000_000), 1);
        assert_eq!(state.secs_since_last_message(1_000_000), 0);
    }

    // ════════════════════════════════════════════════════════════════════════
    // Screen Text Tests
    // ════════════════════════════════════════════════════════════════════════

    #[test]
    fn screen_time_since_line() {
        assert_eq!(screen::time_since_line(0).as_str(), "Time since: 0s");
        assert_eq!(screen::time_since_line(125).as_str(), "Time since: 125s");
    }

    #[test]
    fn screen_rssi_and_snr_lines_use_two_decimals() {
        assert_eq!(screen::rssi_line(-87.0).as_str(), "Last Rssi:  -87.00dBm");
        assert_eq!(screen::snr_line(9.25).as_str(), "Last SNR :  9.25dB");
        assert_eq!(screen::snr_line(-3.5).as_str(), "Last SNR :  -3.50dB");
    }

    #[test]
    fn screen_missed_line() {
        assert_eq!(screen::missed_line(0).as_str(), "No packet:  0x");
        assert_eq!(screen::missed_line(17).as_str(), "No packet:  17x");
    }

    #[test]
    fn screen_time_since_line_fits_largest_value() {
        let line = screen::time_since_line(u64::MAX);
        assert!(line.as_str().ends_with("s"));
    }

    // ════════════════════════════════════════════════════════════════════════
    // Error Tests
    // ════════════════════════════════════════════════════════════════════════

    #[test]
    fn radio_error_codes() {
        assert_eq!(RadioError::Timeout.code(), -6);
        assert_eq!(RadioError::CrcMismatch.code(), -7);
        assert_eq!(RadioError::Other(-2).code(), -2);
    }

    #[test]
    fn radio_error_from_code() {
        assert_eq!(RadioError::from_code(-6), RadioError::Timeout);
        assert_eq!(RadioError::from_code(-7), RadioError::CrcMismatch);
        assert_eq!(RadioError::from_code(-705), RadioError::Other(-705));
    }

    #[test]
    fn rx_event_from_radio_error() {
        assert_eq!(RxEvent::from(RadioError::Timeout), RxEvent::Timeout);
        assert_eq!(RxEvent::from(RadioError::CrcMismatch), RxEvent::CrcMismatch);
        assert_eq!(RxEvent::from(RadioError::Other(-1)), RxEvent::Failed(-1));
    }

    #[test]
    fn only_init_failure_is_fatal() {
        assert!(Error::RadioInit(RadioError::Other(-2)).is_fatal());
        assert!(!Error::StartReceive(RadioError::Other(-2)).is_fatal());
        assert_eq!(
            Error::StartReceive(RadioError::Timeout).radio(),
            RadioError::Timeout
        );
    }

    #[test]
    fn rx_timeout_is_one_hundred_symbols() {
        assert_eq!(config::RX_TIMEOUT_SYMBOLS, 100);
        assert_eq!(config::LORA_SYMBOL_US, 4_096);
        assert_eq!(config::RX_TIMEOUT_US, 409_600);
    }
}
