//! SSD1306 OLED display wrapper.
//!
//! Screens are composed off-screen into a [`Frame`] and copied to the
//! driver's buffer in one go, so a failed render never leaves a
//! half-drawn panel.

use defmt::warn;
use embedded_graphics::framebuffer::{buffer_size, Framebuffer};
use embedded_graphics::image::Image;
use embedded_graphics::mono_font::ascii::{FONT_10X20, FONT_6X10};
use embedded_graphics::mono_font::{MonoTextStyle, MonoTextStyleBuilder};
use embedded_graphics::pixelcolor::raw::{BigEndian, RawU1};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use ssd1306::mode::BufferedGraphicsMode;
use ssd1306::prelude::*;
use ssd1306::I2CDisplayInterface;
use ssd1306::Ssd1306;
use wxframe::config::{DISPLAY_HEIGHT, DISPLAY_WIDTH};
use wxframe::controller::DisplaySink;

const WIDTH: usize = DISPLAY_WIDTH as usize;
const HEIGHT: usize = DISPLAY_HEIGHT as usize;

/// Off-screen 1-bit canvas the size of the panel.
pub type Frame = Framebuffer<
    BinaryColor,
    RawU1,
    BigEndian,
    WIDTH,
    HEIGHT,
    { buffer_size::<BinaryColor>(WIDTH, HEIGHT) },
>;

/// Type alias for the concrete display driver.
///
/// Generic over the I²C implementation so callers pass in their HAL's
/// I²C peripheral.
pub type Display<I2C> =
    Ssd1306<I2CInterface<I2C>, DisplaySize128x64, BufferedGraphicsMode<DisplaySize128x64>>;

/// Initialise the SSD1306 display and clear the screen.
pub fn init<I2C>(i2c: I2C) -> Display<I2C>
where
    I2C: embedded_hal::i2c::I2c,
{
    let interface = I2CDisplayInterface::new(i2c);
    let mut display = Ssd1306::new(interface, DisplaySize128x64, DisplayRotation::Rotate0)
        .into_buffered_graphics_mode();
    if display.init().is_err() {
        warn!("OLED init failed");
    }
    display.clear_buffer();
    let _ = display.flush();
    display
}

pub fn small_text() -> MonoTextStyle<'static, BinaryColor> {
    MonoTextStyleBuilder::new()
        .font(&FONT_6X10)
        .text_color(BinaryColor::On)
        .build()
}

pub fn large_text() -> MonoTextStyle<'static, BinaryColor> {
    MonoTextStyle::new(&FONT_10X20, BinaryColor::On)
}

/// The panel as a [`DisplaySink`].
pub struct Oled<I2C> {
    display: Display<I2C>,
}

impl<I2C> Oled<I2C>
where
    I2C: embedded_hal::i2c::I2c,
{
    pub fn new(display: Display<I2C>) -> Self {
        Self { display }
    }

    /// Copy a composed frame to the panel.
    pub fn show(&mut self, frame: &Frame) {
        self.display.clear_buffer();
        let _ = Image::new(&frame.as_image(), Point::zero()).draw(&mut self.display);
        if self.display.flush().is_err() {
            warn!("OLED flush failed");
        }
    }
}

impl<I2C> DisplaySink<Frame> for Oled<I2C>
where
    I2C: embedded_hal::i2c::I2c,
{
    fn present(&mut self, frame: Frame) {
        self.show(&frame);
    }
}
