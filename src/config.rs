//! Application-wide constants and compile-time configuration.
//!
//! All hardware pin assignments, timing parameters, and radio
//! settings live here so they can be tuned in one place.

// Display

/// Interval between screen refreshes in the interrupt-driven loop (µs).
pub const SCREEN_REFRESH_INTERVAL_US: u64 = 100_000;

/// Vertical distance between text rows (pixels).
pub const LINE_HEIGHT: i32 = 12;

/// Text shown while the radio is being brought up.
pub const SPLASH_TEXT: &str = "Starting...";

// Status LED

/// How long the status LED stays on after a successful receive (ms).
pub const INDICATOR_FLASH_MS: u32 = 50;

// LoRa
//
// RadioLib's SX126x defaults, so a stock RadioLib transmitter is heard
// without extra setup.

/// Largest LoRa payload the SX1262 can deliver (bytes).
pub const MAX_PAYLOAD_LEN: usize = 255;

/// Carrier frequency (Hz).
pub const LORA_FREQUENCY_HZ: u32 = 434_000_000;

/// Spreading factor (SF9).
pub const LORA_SPREADING_FACTOR: u8 = 9;

/// Bandwidth (Hz).
pub const LORA_BANDWIDTH_HZ: u32 = 125_000;

/// Coding rate denominator (4/7).
pub const LORA_CODING_RATE_DENOM: u8 = 7;

/// Preamble length (symbols).
pub const LORA_PREAMBLE_LEN: u16 = 8;

/// Private network sync word (0x12) rather than LoRaWAN's public one.
pub const LORA_PUBLIC_NETWORK: bool = false;

/// Length of one LoRa symbol at the configured SF/BW (µs).
pub const LORA_SYMBOL_US: u64 =
    (1u64 << LORA_SPREADING_FACTOR) * 1_000_000 / LORA_BANDWIDTH_HZ as u64;

/// Blocking receive timeout, in LoRa symbols. Programmed into the SX1262,
/// which gives up when no preamble is detected within this many symbols.
pub const RX_TIMEOUT_SYMBOLS: u16 = 100;

/// Wait for a preamble before a blocking receive times out (µs).
/// 409.6 ms at SF9 / 125 kHz. Packet airtime is not included.
pub const RX_TIMEOUT_US: u64 = RX_TIMEOUT_SYMBOLS as u64 * LORA_SYMBOL_US;

// GPIO pin assignments (RAK4631 WisBlock core + RAK1921 OLED)
//
// These are logical names; actual `embassy_nrf::peripherals::*` types are
// selected in `board.rs`.  Adjust for a different base board.
//
//   LoRa NSS       → P1.10
//   LoRa SCK       → P1.11
//   LoRa MOSI      → P1.12
//   LoRa MISO      → P1.13
//   LoRa RESET     → P1.06
//   LoRa BUSY      → P1.14
//   LoRa DIO1      → P1.15
//   RF switch RX   → P1.05
//   RF switch TX   → P1.07
//   I²C SDA        → P0.13
//   I²C SCL        → P0.14
//   Vext (3V3_S)   → P1.02
//   Status LED     → P1.03
