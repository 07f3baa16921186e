//! Built-in picture table.
//!
//! Pictures are 32×32, 1 bit per pixel, MSB first, rows packed in 4 bytes.

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::Pixel;

use super::display::Frame;

pub const PICTURE_SIZE: u32 = 32;

pub struct Picture {
    pub name: &'static str,
    bits: &'static [u8; 128],
    /// Drawn flipped left to right.
    mirrored: bool,
}

pub static PICTURES: [Picture; 4] = [
    Picture {
        name: "moon",
        bits: &MOON,
        mirrored: true,
    },
    Picture {
        name: "sun",
        bits: &SUN,
        mirrored: false,
    },
    Picture {
        name: "cloud",
        bits: &CLOUD,
        mirrored: false,
    },
    Picture {
        name: "rain",
        bits: &RAIN,
        mirrored: false,
    },
];

impl Picture {
    /// Blit with the top-left corner at `origin`.
    pub fn draw(&self, frame: &mut Frame, origin: Point) {
        let size = PICTURE_SIZE as i32;
        for y in 0..size {
            for x in 0..size {
                let byte = self.bits[(y * size / 8 + x / 8) as usize];
                if byte & (0x80 >> (x % 8)) == 0 {
                    continue;
                }
                let dx = if self.mirrored { size - 1 - x } else { x };
                Pixel(origin + Point::new(dx, y), BinaryColor::On)
                    .draw(frame)
                    .ok();
            }
        }
    }
}

const MOON: [u8; 128] = [
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x0E, 0x00, 0x00,
    0x00, 0x3C, 0x00, 0x00, 0x00, 0xF8, 0x00, 0x00,
    0x01, 0xF0, 0x00, 0x00, 0x03, 0xF0, 0x00, 0x00,
    0x07, 0xF0, 0x00, 0x00, 0x07, 0xE0, 0x00, 0x00,
    0x0F, 0xE0, 0x00, 0x00, 0x0F, 0xE0, 0x00, 0x00,
    0x1F, 0xE0, 0x00, 0x00, 0x1F, 0xE0, 0x00, 0x00,
    0x1F, 0xE0, 0x00, 0x00, 0x1F, 0xF0, 0x00, 0x00,
    0x1F, 0xF0, 0x00, 0x00, 0x1F, 0xF0, 0x00, 0x00,
    0x1F, 0xF8, 0x00, 0x00, 0x1F, 0xFC, 0x00, 0x00,
    0x0F, 0xFE, 0x00, 0x00, 0x0F, 0xFF, 0x00, 0x00,
    0x07, 0xFF, 0xE0, 0x60, 0x07, 0xFF, 0xFF, 0xE0,
    0x03, 0xFF, 0xFF, 0xC0, 0x01, 0xFF, 0xFF, 0x80,
    0x00, 0xFF, 0xFF, 0x00, 0x00, 0x3F, 0xFC, 0x00,
    0x00, 0x0F, 0xF0, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
];

const SUN: [u8; 128] = [
    0x00, 0x00, 0x00, 0x00, 0x00, 0x01, 0x80, 0x00,
    0x00, 0x01, 0x80, 0x00, 0x00, 0x01, 0x80, 0x00,
    0x00, 0x01, 0x80, 0x00, 0x06, 0x01, 0x80, 0x60,
    0x07, 0x00, 0x00, 0xE0, 0x03, 0x80, 0x01, 0xC0,
    0x01, 0x80, 0x01, 0x80, 0x00, 0x07, 0xE0, 0x00,
    0x00, 0x0F, 0xF0, 0x00, 0x00, 0x1F, 0xF8, 0x00,
    0x00, 0x3F, 0xFC, 0x00, 0x00, 0x7F, 0xFE, 0x00,
    0x00, 0x7F, 0xFE, 0x00, 0x7C, 0x7F, 0xFE, 0x3E,
    0x7C, 0x7F, 0xFE, 0x3E, 0x00, 0x7F, 0xFE, 0x00,
    0x00, 0x7F, 0xFE, 0x00, 0x00, 0x3F, 0xFC, 0x00,
    0x00, 0x1F, 0xF8, 0x00, 0x00, 0x0F, 0xF0, 0x00,
    0x00, 0x07, 0xE0, 0x00, 0x01, 0x80, 0x01, 0x80,
    0x03, 0x80, 0x01, 0xC0, 0x07, 0x00, 0x00, 0xE0,
    0x06, 0x01, 0x80, 0x60, 0x00, 0x01, 0x80, 0x00,
    0x00, 0x01, 0x80, 0x00, 0x00, 0x01, 0x80, 0x00,
    0x00, 0x01, 0x80, 0x00, 0x00, 0x00, 0x00, 0x00,
];

const CLOUD: [u8; 128] = [
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xFC, 0x00,
    0x00, 0x03, 0xFF, 0x00, 0x00, 0x07, 0xFF, 0x80,
    0x00, 0x0F, 0xFF, 0xC0, 0x00, 0x1F, 0xFF, 0xE0,
    0x00, 0x1F, 0xFF, 0xE0, 0x00, 0xFF, 0xFF, 0xF0,
    0x01, 0xFF, 0xFF, 0xF0, 0x03, 0xFF, 0xFF, 0xF0,
    0x07, 0xFF, 0xFF, 0xF0, 0x0F, 0xFF, 0xFF, 0xF0,
    0x0F, 0xFF, 0xFF, 0xF8, 0x0F, 0xFF, 0xFF, 0xFC,
    0x0F, 0xFF, 0xFF, 0xFC, 0x0F, 0xFF, 0xFF, 0xFC,
    0x0F, 0xFF, 0xFF, 0xFC, 0x07, 0xFF, 0xFF, 0xFC,
    0x03, 0xFF, 0xFF, 0xFC, 0x03, 0xFF, 0xFF, 0xF8,
    0x03, 0xFF, 0xFF, 0xF0, 0x03, 0xFF, 0xFF, 0xC0,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
];

const RAIN: [u8; 128] = [
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0xFC, 0x00, 0x00, 0x01, 0xFE, 0x00,
    0x00, 0x03, 0xFF, 0x00, 0x00, 0x3F, 0xFF, 0x80,
    0x00, 0xFF, 0xFF, 0xC0, 0x01, 0xFF, 0xFF, 0xC0,
    0x01, 0xFF, 0xFF, 0xC0, 0x03, 0xFF, 0xFF, 0xC0,
    0x03, 0xFF, 0xFF, 0xC0, 0x03, 0xFF, 0xFF, 0xC0,
    0x03, 0xFF, 0xFF, 0x80, 0x01, 0xFF, 0xFF, 0x80,
    0x01, 0xFF, 0xFF, 0x80, 0x01, 0xFF, 0xFF, 0x80,
    0x00, 0x3C, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0xC0, 0x03, 0x00, 0x00, 0xC0, 0x03, 0x00,
    0x00, 0xC1, 0x83, 0x00, 0x00, 0xC1, 0x83, 0x00,
    0x00, 0x01, 0x80, 0x00, 0x00, 0x01, 0x80, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x18, 0x00, 0x00,
    0x00, 0x18, 0x18, 0x00, 0x00, 0x18, 0x18, 0x00,
    0x00, 0x18, 0x18, 0x00, 0x00, 0x00, 0x18, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
];
