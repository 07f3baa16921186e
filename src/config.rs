//! Application-wide constants and the persisted startup settings.
//!
//! All hardware pin assignments, timing parameters, and protocol
//! constants live here so they can be tuned in one place.

use crate::error::ConfigError;
use crate::session::ViewMode;

// Timing

/// Main loop cadence (ms). Buttons are sampled once per tick.
pub const TICK_MS: u64 = 100;

/// Default gesture window: a gap longer than this closes a burst of presses.
pub const DEFAULT_RESETTING_WINDOW_MS: u32 = 2000;

/// Gesture windows the settings menu cycles through.
pub const RESETTING_WINDOW_CHOICES_MS: [u32; 3] = [1000, 1500, 2000];

/// Default content refresh interval (seconds). 300 = 5 min.
pub const DEFAULT_REFRESH_INTERVAL_SECS: u32 = 300;

/// Pause after a transient render failure before the next attempt (ms).
pub const RETRY_DELAY_MS: u64 = 3000;

/// A frame that took longer than this to produce is discarded and counted as
/// a transient failure. The producer call itself is not interrupted.
pub const RENDER_TIMEOUT_MS: u64 = 10_000;

// Display

/// SSD1306 panel size in pixels.
pub const DISPLAY_WIDTH: u32 = 128;
pub const DISPLAY_HEIGHT: u32 = 64;

// Weather feed

/// Longest CSV line accepted from the serial feed (bytes, without newline).
pub const MAX_LINE_LEN: usize = 96;

/// Number of temperature samples kept for the plot.
pub const TEMPERATURE_HISTORY_LEN: usize = 32;

// USB

/// USB VID/PID - use the "pid.codes" open-source test VID.
/// Replace with your own allocated VID/PID for production.
pub const USB_VID: u16 = 0x1209;
pub const USB_PID: u16 = 0x0002;

/// USB device strings.
pub const USB_MANUFACTURER: &str = "wxframe";
pub const USB_PRODUCT: &str = "Weather Frame";
pub const USB_SERIAL_NUMBER: &str = "000001";

/// CDC-ACM bulk packet size.
pub const USB_SERIAL_PACKET_SIZE: u16 = 64;

// GPIO pin assignments (nRF52840-DK defaults)
//
// These are logical names; actual `embassy_nrf::peripherals::*` types are
// selected in `main.rs`.  Adjust for your custom PCB.
//
//   Button 1       → P0.11  (view / info)
//   Button 2       → P0.12  (picture)
//   I²C SDA        → P0.26
//   I²C SCL        → P0.27

// Settings storage

/// Flash page index where settings storage starts (4 KB per page on nRF52840).
pub const STORAGE_FLASH_PAGE_START: u32 = 240;

/// Number of flash pages reserved for settings storage.
pub const STORAGE_FLASH_PAGE_COUNT: u32 = 4;

/// Encoded size of a [`Settings`] record.
pub const SETTINGS_RECORD_SIZE: usize = 12;

const SETTINGS_VERSION: u8 = 1;

const FLAG_RANDOMIZE: u8 = 0x01;

/// Startup configuration, persisted in flash and edited from the settings menu.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Settings {
    /// Gesture window (ms).
    pub resetting_window_ms: u32,
    /// Content refresh interval (seconds).
    pub refresh_interval_secs: u32,
    /// Picture shown after boot.
    pub default_picture: u8,
    /// View shown after boot.
    pub default_view: ViewMode,
    /// Pick a random picture on every scheduled refresh.
    pub randomize_every_refresh: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            resetting_window_ms: DEFAULT_RESETTING_WINDOW_MS,
            refresh_interval_secs: DEFAULT_REFRESH_INTERVAL_SECS,
            default_picture: 0,
            default_view: ViewMode::Primary,
            randomize_every_refresh: false,
        }
    }
}

impl Settings {
    /// Check the settings against the available picture table.
    pub fn validate(&self, total_pictures: usize) -> Result<(), ConfigError> {
        if total_pictures == 0 {
            return Err(ConfigError::NoPictures);
        }
        if usize::from(self.default_picture) >= total_pictures {
            return Err(ConfigError::DefaultPictureOutOfRange {
                index: self.default_picture,
                total: total_pictures.min(u8::MAX as usize) as u8,
            });
        }
        if self.resetting_window_ms == 0 {
            return Err(ConfigError::ZeroResettingWindow);
        }
        if self.refresh_interval_secs == 0 {
            return Err(ConfigError::ZeroRefreshInterval);
        }
        Ok(())
    }

    /// Serialize for flash storage.
    ///
    /// Format: `[version][window u32 LE][interval u32 LE][picture][view][flags]`.
    /// Returns the number of bytes written, or 0 if `buf` is too small.
    pub fn serialize(&self, buf: &mut [u8]) -> usize {
        if buf.len() < SETTINGS_RECORD_SIZE {
            return 0;
        }

        buf[0] = SETTINGS_VERSION;
        buf[1..5].copy_from_slice(&self.resetting_window_ms.to_le_bytes());
        buf[5..9].copy_from_slice(&self.refresh_interval_secs.to_le_bytes());
        buf[9] = self.default_picture;
        buf[10] = self.default_view.to_byte();
        buf[11] = if self.randomize_every_refresh {
            FLAG_RANDOMIZE
        } else {
            0
        };
        SETTINGS_RECORD_SIZE
    }

    /// Deserialize a record written by [`Settings::serialize`].
    ///
    /// Unknown versions and truncated records yield `None` so the caller
    /// falls back to defaults.
    pub fn deserialize(data: &[u8]) -> Option<Self> {
        if data.len() < SETTINGS_RECORD_SIZE || data[0] != SETTINGS_VERSION {
            return None;
        }

        Some(Self {
            resetting_window_ms: u32::from_le_bytes([data[1], data[2], data[3], data[4]]),
            refresh_interval_secs: u32::from_le_bytes([data[5], data[6], data[7], data[8]]),
            default_picture: data[9],
            default_view: ViewMode::from_byte(data[10])?,
            randomize_every_refresh: data[11] & FLAG_RANDOMIZE != 0,
        })
    }

    /// Refresh interval in milliseconds.
    pub fn refresh_interval_ms(&self) -> u64 {
        u64::from(self.refresh_interval_secs) * 1000
    }
}
