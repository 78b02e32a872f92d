//! SSD1306 OLED display wrapper.

use embedded_graphics::mono_font::ascii::FONT_6X10;
use embedded_graphics::mono_font::{MonoTextStyle, MonoTextStyleBuilder};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::text::{Baseline, Text};
use ssd1306::mode::BufferedGraphicsMode;
use ssd1306::prelude::*;
use ssd1306::I2CDisplayInterface;
use ssd1306::Ssd1306;

use crate::ui::{DisplayError, TextDisplay};

/// Type alias for the concrete display driver.
///
/// Generic over the I²C implementation so callers pass in their HAL's
/// I²C peripheral.
pub type Display<I2C> =
    Ssd1306<I2CInterface<I2C>, DisplaySize128x64, BufferedGraphicsMode<DisplaySize128x64>>;

/// Buffered 128×64 OLED, mounted upside down on the base board.
pub struct Oled<I2C> {
    display: Display<I2C>,
}

impl<I2C> Oled<I2C>
where
    I2C: embedded_hal::i2c::I2c,
{
    /// Initialise the SSD1306 (flipped vertically) and clear the screen.
    pub fn new(i2c: I2C) -> Result<Self, DisplayError> {
        let interface = I2CDisplayInterface::new(i2c);
        let mut display = Ssd1306::new(interface, DisplaySize128x64, DisplayRotation::Rotate180)
            .into_buffered_graphics_mode();
        display.init().map_err(|_| DisplayError::Communication)?;
        display.clear_buffer();
        display.flush().map_err(|_| DisplayError::Communication)?;
        Ok(Self { display })
    }
}

fn text_style() -> MonoTextStyle<'static, BinaryColor> {
    MonoTextStyleBuilder::new()
        .font(&FONT_6X10)
        .text_color(BinaryColor::On)
        .build()
}

impl<I2C> TextDisplay for Oled<I2C>
where
    I2C: embedded_hal::i2c::I2c,
{
    fn clear(&mut self) {
        self.display.clear_buffer();
    }

    fn draw_text(&mut self, x: i32, y: i32, text: &str) -> Result<(), DisplayError> {
        Text::with_baseline(text, Point::new(x, y), text_style(), Baseline::Top)
            .draw(&mut self.display)
            .map(|_| ())
            .map_err(|_| DisplayError::Draw)
    }

    fn flush(&mut self) -> Result<(), DisplayError> {
        self.display.flush().map_err(|_| DisplayError::Communication)
    }
}
