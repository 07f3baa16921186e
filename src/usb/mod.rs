//! USB Device subsystem - a CDC-ACM serial port for the weather feed.
//!
//! The nRF52840's built-in USB 2.0 Full-Speed controller is driven by
//! `embassy-usb`. The station logger on the host writes one CSV line per
//! record; the serial task reassembles lines and appends them to the
//! shared weather log.

pub mod serial;
