//! Host-testable core of wxframe.
//!
//! Everything here is `no_std` and hardware-free: gesture counting,
//! refresh scheduling, gesture dispatch, session state, the settings menu
//! and the weather record parser. The firmware in `main.rs` wires these to
//! GPIO, the OLED, USB serial and flash.
//!
//! Usage: `cargo test --lib` (or `cargo test` for the integration tests too)

#![cfg_attr(not(test), no_std)]

// Must come first so the logging macros are visible in every module.
#[macro_use]
mod fmt;

pub mod config;
pub mod controller;
pub mod dispatch;
pub mod error;
pub mod gesture;
pub mod scheduler;
pub mod session;
pub mod settings_menu;
pub mod weather;

pub use controller::{Controller, TickReport};
pub use error::Error;

// ═══════════════════════════════════════════════════════════════════════════
// Scenario Tests
// ═══════════════════════════════════════════════════════════════════════════
