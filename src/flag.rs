//! Packet-received flag shared between the radio callback and the main loop.
//!
//! The callback context only ever raises the flag and the main loop only
//! ever consumes it. Consumption is a single atomic swap, so a raised flag
//! is observed exactly once. Several arrivals between two polls collapse
//! into one: the flag is a latest-wins signal, not a counter.

use core::sync::atomic::{AtomicBool, Ordering};

/// Single-bit handoff from interrupt/callback context to the main loop.
#[derive(Debug, Default)]
pub struct RxFlag {
    raised: AtomicBool,
}

impl RxFlag {
    /// Create a lowered flag. `const` so it can live in a `static`.
    pub const fn new() -> Self {
        Self {
            raised: AtomicBool::new(false),
        }
    }

    /// Mark that a packet is waiting. Called from the callback context.
    pub fn raise(&self) {
        self.raised.store(true, Ordering::Release);
    }

    /// Consume the flag: returns `true` at most once per raise.
    pub fn take(&self) -> bool {
        self.raised.swap(false, Ordering::AcqRel)
    }

    /// Peek without consuming.
    pub fn is_raised(&self) -> bool {
        self.raised.load(Ordering::Acquire)
    }
}
