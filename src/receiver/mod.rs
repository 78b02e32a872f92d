//! The two receiver loops.
//!
//! Each loop is a context object owning the radio, the display, a clock
//! and the [`ReceiverState`](crate::state::ReceiverState). The firmware
//! calls `start` once and then the loop's step function forever.
//!
//! - [`interrupt::InterruptReceiver`] - flag-driven reads, display on a timer
//! - [`blocking::BlockingReceiver`] - one blocking receive per step, display
//!   after every attempt

pub mod blocking;
pub mod interrupt;

pub use blocking::{Attempt, BlockingReceiver};
pub use interrupt::{InterruptReceiver, Refresh, Tick};

use crate::error::Error;
use crate::radio::Radio;
use crate::ui::{screen, TextDisplay};

/// Monotonic microsecond time source.
pub trait Clock {
    fn now_us(&self) -> u64;
}

/// Shared startup: splash screen, then radio init.
///
/// A display failure here is ignored; a radio failure is returned as
/// [`Error::RadioInit`].
async fn bring_up<R, D>(radio: &mut R, display: &mut D) -> Result<(), Error>
where
    R: Radio,
    D: TextDisplay,
{
    let _ = screen::draw_splash(display);
    radio.init().await.map_err(Error::RadioInit)
}
