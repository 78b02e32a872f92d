//! User interface subsystem - text status screen on the OLED.
//!
//! ## Components
//!
//! - **TextDisplay**: the display driver seam (clear / draw text / flip)
//! - **Screen**: what each receiver loop puts on the display
//! - **Display**: SSD1306 128×64 OLED via I²C (`oled` feature)

#[cfg(feature = "oled")]
pub mod display;
pub mod screen;

/// Display driver errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// Bus transaction to the display failed.
    Communication,
    /// Text could not be placed in the frame buffer.
    Draw,
}

/// Text-only view of a buffered display.
///
/// Drawing goes to an off-screen buffer; [`TextDisplay::flush`] makes it
/// visible.
pub trait TextDisplay {
    /// Blank the off-screen buffer.
    fn clear(&mut self);

    /// Draw `text` with its top-left corner at pixel (`x`, `y`).
    fn draw_text(&mut self, x: i32, y: i32, text: &str) -> Result<(), DisplayError>;

    /// Send the buffer to the panel.
    fn flush(&mut self) -> Result<(), DisplayError>;
}
