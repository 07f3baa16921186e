//! Unified error types for wxframe.
//!
//! We avoid `alloc` - all error variants carry only fixed-size data.
//! Implements `defmt::Format` (behind the `defmt` feature) for efficient
//! on-target logging.

use core::fmt;

/// Top-level error type used across the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Startup configuration is unusable; the main loop must not start.
    Config(ConfigError),

    /// A collaborator broke its contract; the loop terminates.
    Contract(ContractViolation),
}

/// Configuration errors, fatal at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// The picture table is empty.
    NoPictures,
    /// The configured default picture does not exist.
    DefaultPictureOutOfRange { index: u8, total: u8 },
    /// A zero-length gesture window would close before any second press.
    ZeroResettingWindow,
    /// A zero refresh interval would re-render on every tick.
    ZeroRefreshInterval,
}

/// Recoverable frame-production failures.
///
/// The scheduler absorbs these and the loop retries after a short delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransientError {
    /// No weather record has been received yet.
    SourceUnavailable,
    /// The data source is being written right now.
    SourceBusy,
    /// Frame production exceeded the render timeout.
    Timeout,
    /// The latest data could not be interpreted.
    Malformed,
}

/// Programmer errors reported by a frame producer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ContractViolation {
    /// The session asked for a picture the producer does not have.
    PictureOutOfRange { index: u8 },
    /// The producer claimed success without composing a frame.
    EmptyFrame,
}

/// Error returned by [`crate::controller::FrameProducer::produce`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RenderError {
    Transient(TransientError),
    Contract(ContractViolation),
}

// Convenience conversions

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}

impl From<ContractViolation> for Error {
    fn from(e: ContractViolation) -> Self {
        Error::Contract(e)
    }
}

impl From<TransientError> for RenderError {
    fn from(e: TransientError) -> Self {
        RenderError::Transient(e)
    }
}

impl From<ContractViolation> for RenderError {
    fn from(e: ContractViolation) -> Self {
        RenderError::Contract(e)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(e) => write!(f, "configuration error: {}", e),
            Error::Contract(e) => write!(f, "contract violation: {}", e),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NoPictures => f.write_str("no pictures available"),
            ConfigError::DefaultPictureOutOfRange { index, total } => {
                write!(f, "default picture {} out of range (have {})", index, total)
            }
            ConfigError::ZeroResettingWindow => f.write_str("gesture window must be non-zero"),
            ConfigError::ZeroRefreshInterval => f.write_str("refresh interval must be non-zero"),
        }
    }
}

impl fmt::Display for TransientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TransientError::SourceUnavailable => "data source unavailable",
            TransientError::SourceBusy => "data source busy",
            TransientError::Timeout => "render timed out",
            TransientError::Malformed => "malformed data",
        })
    }
}

impl fmt::Display for ContractViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContractViolation::PictureOutOfRange { index } => {
                write!(f, "picture {} out of range", index)
            }
            ContractViolation::EmptyFrame => f.write_str("producer returned an empty frame"),
        }
    }
}
