//! Interrupt-driven receiver loop.
//!
//! The radio raises an [`RxFlag`] from its callback context when a packet
//! completes. Each [`InterruptReceiver::poll`] consumes the flag (at most
//! once per raise), reads the packet, and independently redraws the
//! status screen whenever the refresh interval has elapsed.

use crate::config::{MAX_PAYLOAD_LEN, SCREEN_REFRESH_INTERVAL_US};
use crate::error::Error;
use crate::flag::RxFlag;
use crate::radio::{PacketListener, RxEvent};
use crate::receiver::{bring_up, Clock};
use crate::state::ReceiverState;
use crate::ui::{screen, DisplayError, TextDisplay};

/// Whether a poll redrew the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Refresh {
    /// Interval not yet elapsed.
    Skipped,
    /// Screen redrawn.
    Drawn,
    /// Redraw attempted but the display failed.
    Failed(DisplayError),
}

/// Result of one loop iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Tick {
    /// `Some` when the flag was consumed this iteration.
    pub rx: Option<RxEvent>,
    pub refresh: Refresh,
}

/// Context object for the interrupt-driven loop.
pub struct InterruptReceiver<R, D, C> {
    radio: R,
    display: D,
    clock: C,
    flag: &'static RxFlag,
    state: ReceiverState,
    refresh_interval_us: u64,
}

impl<R, D, C> InterruptReceiver<R, D, C>
where
    R: PacketListener,
    D: TextDisplay,
    C: Clock,
{
    pub fn new(radio: R, display: D, clock: C, flag: &'static RxFlag) -> Self {
        Self {
            radio,
            display,
            clock,
            flag,
            state: ReceiverState::new(),
            refresh_interval_us: SCREEN_REFRESH_INTERVAL_US,
        }
    }

    /// Override the screen refresh interval (µs).
    pub fn with_refresh_interval(mut self, interval_us: u64) -> Self {
        self.refresh_interval_us = interval_us;
        self
    }

    /// Splash, radio init, then arm the flag and start listening.
    ///
    /// Only [`Error::RadioInit`] is fatal; [`Error::StartReceive`] is
    /// reported so it can be logged, and polling may continue.
    pub async fn start(&mut self) -> Result<(), Error> {
        bring_up(&mut self.radio, &mut self.display).await?;
        self.radio.set_packet_received_action(self.flag);
        self.radio
            .start_receive()
            .await
            .map_err(Error::StartReceive)
    }

    /// One loop iteration.
    pub async fn poll(&mut self) -> Tick {
        let rx = if self.flag.take() {
            Some(self.read_pending().await)
        } else {
            None
        };

        let now = self.clock.now_us();
        let refresh = if self.state.refresh_due(now, self.refresh_interval_us) {
            let drawn = screen::draw_status(&mut self.display, &self.state, now);
            self.state.mark_refreshed(now);
            match drawn {
                Ok(()) => Refresh::Drawn,
                Err(e) => Refresh::Failed(e),
            }
        } else {
            Refresh::Skipped
        };

        Tick { rx, refresh }
    }

    async fn read_pending(&mut self) -> RxEvent {
        let mut buf = [0u8; MAX_PAYLOAD_LEN];
        match self.radio.read_packet(&mut buf).await {
            Ok(len) => {
                let len = len.min(buf.len());
                let now = self.clock.now_us();
                self.state
                    .record_packet(&buf[..len], self.radio.rssi(), self.radio.snr(), now);
                RxEvent::Received
            }
            Err(e) => RxEvent::from(e),
        }
    }

    pub fn state(&self) -> &ReceiverState {
        &self.state
    }
}
