//! Unified error type for loraview.
//!
//! We avoid `alloc` - all error variants carry only fixed-size data.
//! Implements `defmt::Format` (behind the `defmt` feature) for efficient
//! on-target logging.

/// Status code reported for a receive timeout.
pub const STATUS_RX_TIMEOUT: i16 = -6;

/// Status code reported for a CRC mismatch.
pub const STATUS_CRC_MISMATCH: i16 = -7;

/// Status code for failures the driver does not classify further.
pub const STATUS_UNKNOWN: i16 = -1;

/// Top-level error type used across the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// The radio could not be initialised. Fatal: the firmware parks.
    RadioInit(RadioError),

    /// Continuous receive could not be started.
    StartReceive(RadioError),
}

impl Error {
    /// Whether the firmware must stop making progress after this error.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::RadioInit(_))
    }

    /// The radio failure behind this error.
    pub fn radio(&self) -> RadioError {
        match *self {
            Error::RadioInit(e) | Error::StartReceive(e) => e,
        }
    }
}

/// Outcome classes a radio operation can fail with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RadioError {
    /// No packet arrived before the driver's receive window closed.
    Timeout,
    /// A packet arrived but its payload CRC did not match.
    CrcMismatch,
    /// Any other driver failure, with its status code.
    Other(i16),
}

impl RadioError {
    /// Numeric status code, as printed in `failed, code <n>` log lines.
    pub const fn code(self) -> i16 {
        match self {
            RadioError::Timeout => STATUS_RX_TIMEOUT,
            RadioError::CrcMismatch => STATUS_CRC_MISMATCH,
            RadioError::Other(code) => code,
        }
    }

    /// Map a raw status code back onto the three outcome classes.
    pub const fn from_code(code: i16) -> Self {
        match code {
            STATUS_RX_TIMEOUT => RadioError::Timeout,
            STATUS_CRC_MISMATCH => RadioError::CrcMismatch,
            other => RadioError::Other(other),
        }
    }
}
