//! User interface subsystem - OLED display + physical buttons.
//!
//! ## Components
//!
//! - **Display**: SSD1306 128×64 OLED via I²C
//! - **Buttons**: 2 tactile switches, sampled once per tick
//! - **Render**: composes the weather, info and plot screens
//! - **Sub-mode**: the settings menu, run while it owns the buttons

pub mod buttons;
pub mod display;
pub mod pictures;
pub mod render;
pub mod sub_mode;
