//! Radio driver seam.
//!
//! The receiver loops never talk to the SX1262 directly. They consume
//! one of two driver shapes:
//!
//! 1. **PacketListener** - continuous receive; the driver raises an
//!    [`RxFlag`] whenever a packet completes and the loop reads it later.
//! 2. **BlockingReceive** - one receive call per loop iteration, bounded
//!    by a timeout the driver owns.
//!
//! Modulation, CRC checking and RSSI/SNR measurement all stay inside the
//! driver.

pub mod payload;

use crate::error::RadioError;
use crate::flag::RxFlag;

/// Operations every radio driver offers.
pub trait Radio {
    /// Bring up the transceiver with the board's pins and default settings.
    async fn init(&mut self) -> Result<(), RadioError>;

    /// RSSI of the most recently received packet (dBm).
    fn rssi(&self) -> f32;

    /// SNR of the most recently received packet (dB).
    fn snr(&self) -> f32;
}

/// Continuous receive with a packet-received notification.
pub trait PacketListener: Radio {
    /// Register the flag the driver raises when a packet has arrived.
    fn set_packet_received_action(&mut self, flag: &'static RxFlag);

    /// Start listening. Packets are announced through the registered flag.
    async fn start_receive(&mut self) -> Result<(), RadioError>;

    /// Copy the pending packet into `buf` and return its length.
    async fn read_packet(&mut self, buf: &mut [u8]) -> Result<usize, RadioError>;
}

/// Single blocking receive per call.
pub trait BlockingReceive: Radio {
    /// Wait for one packet, up to the driver's receive timeout.
    async fn receive(&mut self, buf: &mut [u8]) -> Result<usize, RadioError>;
}

/// What a single receive attempt produced, for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RxEvent {
    /// A packet was stored as the new last packet.
    Received,
    /// The receive window closed without a packet.
    Timeout,
    /// A packet arrived with a bad CRC and was dropped.
    CrcMismatch,
    /// Unclassified driver failure.
    Failed(i16),
}

impl From<RadioError> for RxEvent {
    fn from(e: RadioError) -> Self {
        match e {
            RadioError::Timeout => RxEvent::Timeout,
            RadioError::CrcMismatch => RxEvent::CrcMismatch,
            RadioError::Other(code) => RxEvent::Failed(code),
        }
    }
}
