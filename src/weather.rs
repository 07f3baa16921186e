//! Weather records received as CSV lines from the station logger.
//!
//! Line format (header line starts with `date`):
//! ```text
//! date,time,out_humidity,out_temperature,_,_,in_humidity,in_temperature[,...]
//! 2024-03-01,12:35,81.0,-2.5,0,0,38.5,21.7
//! ```
//! Bytes arrive over USB serial in arbitrary chunks; [`LineAssembler`]
//! rebuilds lines and [`WeatherLog`] keeps the latest record plus a short
//! temperature history for the plot.

use heapless::{HistoryBuffer, String, Vec};

use crate::config::{MAX_LINE_LEN, TEMPERATURE_HISTORY_LEN};
use crate::session::ViewMode;

const COLUMN_COUNT: usize = 8;
const COL_DATE: usize = 0;
const COL_TIME: usize = 1;
const COL_OUT_HUMIDITY: usize = 2;
const COL_OUT_TEMPERATURE: usize = 3;
const COL_IN_HUMIDITY: usize = 6;
const COL_IN_TEMPERATURE: usize = 7;

/// Why a line was not accepted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Column header line.
    Header,
    /// Fewer columns than the format requires; carries the count found.
    MissingColumns(u8),
    /// A numeric column did not parse.
    BadNumber(u8),
    /// A text column does not fit its buffer.
    ColumnTooLong(u8),
}

/// One temperature/humidity pair.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Sample {
    /// Degrees Celsius.
    pub temperature: f32,
    /// Relative humidity, percent.
    pub humidity: f32,
}

/// One parsed logger line.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WeatherRecord {
    pub date: String<12>,
    pub time: String<10>,
    pub outdoor: Sample,
    pub indoor: Sample,
}

impl WeatherRecord {
    pub fn parse(line: &str) -> Result<Self, ParseError> {
        let mut cols: Vec<&str, COLUMN_COUNT> = Vec::new();
        for col in line.trim_end_matches(['\r', '\n']).split(',') {
            if cols.push(col.trim()).is_err() {
                break;
            }
        }

        if cols
            .first()
            .is_some_and(|c| c.eq_ignore_ascii_case("date"))
        {
            return Err(ParseError::Header);
        }
        if cols.len() < COLUMN_COUNT {
            return Err(ParseError::MissingColumns(cols.len() as u8));
        }

        Ok(Self {
            date: text(cols[COL_DATE], COL_DATE)?,
            time: text(cols[COL_TIME], COL_TIME)?,
            outdoor: Sample {
                temperature: number(cols[COL_OUT_TEMPERATURE], COL_OUT_TEMPERATURE)?,
                humidity: number(cols[COL_OUT_HUMIDITY], COL_OUT_HUMIDITY)?,
            },
            indoor: Sample {
                temperature: number(cols[COL_IN_TEMPERATURE], COL_IN_TEMPERATURE)?,
                humidity: number(cols[COL_IN_HUMIDITY], COL_IN_HUMIDITY)?,
            },
        })
    }

    /// The sample shown for a view.
    pub fn sample(&self, view: ViewMode) -> Sample {
        match view {
            ViewMode::Primary => self.outdoor,
            ViewMode::Secondary => self.indoor,
        }
    }
}

fn text<const N: usize>(col: &str, index: usize) -> Result<String<N>, ParseError> {
    String::try_from(col).map_err(|_| ParseError::ColumnTooLong(index as u8))
}

fn number(col: &str, index: usize) -> Result<f32, ParseError> {
    col.parse::<f32>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or(ParseError::BadNumber(index as u8))
}

/// Rebuilds newline-terminated lines from a byte stream.
///
/// Lines longer than [`MAX_LINE_LEN`] are discarded up to the next newline.
pub struct LineAssembler {
    buf: Vec<u8, MAX_LINE_LEN>,
    overflowed: bool,
}

impl LineAssembler {
    pub const fn new() -> Self {
        Self {
            buf: Vec::new(),
            overflowed: false,
        }
    }

    /// Feed a chunk; `on_line` runs once for every completed line.
    pub fn push(&mut self, bytes: &[u8], mut on_line: impl FnMut(&str)) {
        for &b in bytes {
            if b == b'\n' {
                if !self.overflowed && !self.buf.is_empty() {
                    match core::str::from_utf8(&self.buf) {
                        Ok(line) => on_line(line.trim_end_matches('\r')),
                        Err(_) => warn!("weather: dropping non-UTF-8 line"),
                    }
                }
                self.buf.clear();
                self.overflowed = false;
            } else if !self.overflowed && self.buf.push(b).is_err() {
                warn!("weather: line longer than {} bytes dropped", MAX_LINE_LEN);
                self.overflowed = true;
            }
        }
    }
}

impl Default for LineAssembler {
    fn default() -> Self {
        Self::new()
    }
}

/// Latest record and recent temperatures.
pub struct WeatherLog {
    latest: Option<WeatherRecord>,
    outdoor_history: HistoryBuffer<f32, TEMPERATURE_HISTORY_LEN>,
    indoor_history: HistoryBuffer<f32, TEMPERATURE_HISTORY_LEN>,
    received: u32,
}

impl WeatherLog {
    pub const fn new() -> Self {
        Self {
            latest: None,
            outdoor_history: HistoryBuffer::new(),
            indoor_history: HistoryBuffer::new(),
            received: 0,
        }
    }

    /// Parse and store one line. The log is unchanged on error.
    pub fn ingest_line(&mut self, line: &str) -> Result<(), ParseError> {
        let record = WeatherRecord::parse(line)?;
        self.outdoor_history.write(record.outdoor.temperature);
        self.indoor_history.write(record.indoor.temperature);
        self.latest = Some(record);
        self.received = self.received.wrapping_add(1);
        Ok(())
    }

    pub fn latest(&self) -> Option<&WeatherRecord> {
        self.latest.as_ref()
    }

    /// Records accepted since boot.
    pub fn received(&self) -> u32 {
        self.received
    }

    /// Temperatures for a view, oldest first.
    pub fn temperatures(&self, view: ViewMode) -> impl Iterator<Item = f32> + '_ {
        let history = match view {
            ViewMode::Primary => &self.outdoor_history,
            ViewMode::Secondary => &self.indoor_history,
        };
        history.oldest_ordered().copied()
    }

    /// Lowest and highest temperature in the history of a view.
    pub fn temperature_range(&self, view: ViewMode) -> Option<(f32, f32)> {
        self.temperatures(view).fold(None, |acc, t| match acc {
            None => Some((t, t)),
            Some((lo, hi)) => Some((lo.min(t), hi.max(t))),
        })
    }
}

impl Default for WeatherLog {
    fn default() -> Self {
        Self::new()
    }
}
