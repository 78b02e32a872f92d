//! Receiver state: last packet, its signal metrics, and loop timing.
//!
//! Everything lives for the life of the process; a reboot starts from
//! [`ReceiverState::new`].

use crate::radio::payload::{self, PayloadText};

/// Microseconds per second, for the "time since" readout.
const US_PER_SEC: u64 = 1_000_000;

/// State shared by both receiver loops.
#[derive(Debug, Clone)]
pub struct ReceiverState {
    last_packet: PayloadText,
    last_rssi: f32,
    last_snr: f32,
    last_message_us: u64,
    last_refresh_us: u64,
    missed: u32,
    received: u32,
}

impl ReceiverState {
    /// Fresh state: empty packet, zeroed metrics and timestamps.
    pub const fn new() -> Self {
        Self {
            last_packet: PayloadText::new(),
            last_rssi: 0.0,
            last_snr: 0.0,
            last_message_us: 0,
            last_refresh_us: 0,
            missed: 0,
            received: 0,
        }
    }

    /// Store a successfully received packet with its metrics.
    pub fn record_packet(&mut self, bytes: &[u8], rssi: f32, snr: f32, now_us: u64) {
        self.last_packet = payload::decode(bytes);
        self.last_rssi = rssi;
        self.last_snr = snr;
        self.last_message_us = now_us;
        self.missed = 0;
        self.received = self.received.wrapping_add(1);
    }

    /// Count one receive window that closed without a packet.
    pub fn record_timeout(&mut self) {
        self.missed = self.missed.saturating_add(1);
    }

    /// True once more than `interval_us` has passed since the last refresh.
    pub fn refresh_due(&self, now_us: u64, interval_us: u64) -> bool {
        now_us.saturating_sub(self.last_refresh_us) > interval_us
    }

    pub fn mark_refreshed(&mut self, now_us: u64) {
        self.last_refresh_us = now_us;
    }

    /// Whole seconds since the last packet (since boot if none yet).
    pub fn secs_since_last_message(&self, now_us: u64) -> u64 {
        now_us.saturating_sub(self.last_message_us) / US_PER_SEC
    }

    pub fn last_packet(&self) -> &str {
        self.last_packet.as_str()
    }

    pub fn last_rssi(&self) -> f32 {
        self.last_rssi
    }

    pub fn last_snr(&self) -> f32 {
        self.last_snr
    }

    pub fn last_message_us(&self) -> u64 {
        self.last_message_us
    }

    pub fn last_refresh_us(&self) -> u64 {
        self.last_refresh_us
    }

    /// Consecutive receive attempts without a packet.
    pub fn missed(&self) -> u32 {
        self.missed
    }

    /// Packets received since boot.
    pub fn received(&self) -> u32 {
        self.received
    }
}

impl Default for ReceiverState {
    fn default() -> Self {
        Self::new()
    }
}
