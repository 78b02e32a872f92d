//! Blocking receiver loop.
//!
//! Every [`BlockingReceiver::step`] waits for one packet (the driver owns
//! the timeout), updates the state, flashes the status LED on success,
//! and redraws the screen after every attempt.

use embedded_hal::digital::OutputPin;
use embedded_hal_async::delay::DelayNs;

use crate::config::{INDICATOR_FLASH_MS, MAX_PAYLOAD_LEN};
use crate::error::{Error, RadioError};
use crate::radio::{BlockingReceive, RxEvent};
use crate::receiver::{bring_up, Clock};
use crate::state::ReceiverState;
use crate::ui::{screen, DisplayError, TextDisplay};

/// Result of one receive attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Attempt {
    pub rx: RxEvent,
    /// Outcome of the redraw that follows every attempt.
    pub display: Result<(), DisplayError>,
}

/// Context object for the blocking loop.
pub struct BlockingReceiver<R, D, C, L, T> {
    radio: R,
    display: D,
    clock: C,
    led: L,
    delay: T,
    state: ReceiverState,
}

impl<R, D, C, L, T> BlockingReceiver<R, D, C, L, T>
where
    R: BlockingReceive,
    D: TextDisplay,
    C: Clock,
    L: OutputPin,
    T: DelayNs,
{
    pub fn new(radio: R, display: D, clock: C, led: L, delay: T) -> Self {
        Self {
            radio,
            display,
            clock,
            led,
            delay,
            state: ReceiverState::new(),
        }
    }

    /// Splash and radio init. Any error returned is fatal.
    pub async fn start(&mut self) -> Result<(), Error> {
        bring_up(&mut self.radio, &mut self.display).await
    }

    /// One receive attempt followed by a redraw.
    pub async fn step(&mut self) -> Attempt {
        let mut buf = [0u8; MAX_PAYLOAD_LEN];
        let rx = match self.radio.receive(&mut buf).await {
            Ok(len) => {
                let len = len.min(buf.len());
                let now = self.clock.now_us();
                self.state
                    .record_packet(&buf[..len], self.radio.rssi(), self.radio.snr(), now);
                self.flash().await;
                RxEvent::Received
            }
            Err(RadioError::Timeout) => {
                self.state.record_timeout();
                RxEvent::Timeout
            }
            Err(e) => RxEvent::from(e),
        };

        let display = screen::draw_attempt(&mut self.display, &self.state);
        Attempt { rx, display }
    }

    async fn flash(&mut self) {
        let _ = self.led.set_high();
        self.delay.delay_ms(INDICATOR_FLASH_MS).await;
        let _ = self.led.set_low();
    }

    pub fn state(&self) -> &ReceiverState {
        &self.state
    }
}
