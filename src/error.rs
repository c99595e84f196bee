//! Error kinds raised by the prayer-time core.
//!
//! The core reports typed errors; the host and configuration layers wrap them
//! in `anyhow` with context like everything else that touches the filesystem.

use chrono::NaiveDate;
use thiserror::Error;

/// A time-of-day string that matched neither accepted shape.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("unrecognized time format: '{0}' (expected HH:MM or H:MM am/pm)")]
    Unrecognized(String),

    #[error("hour {hour} is out of range in '{text}'")]
    HourOutOfRange { text: String, hour: u32 },

    #[error("minute {minute} is out of range in '{text}'")]
    MinuteOutOfRange { text: String, minute: u32 },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PrayerError {
    /// A field of an astronomical record is missing or unparseable.
    #[error("invalid astronomical record for {date}: {field} {reason}")]
    InvalidRecord {
        date: NaiveDate,
        field: &'static str,
        reason: String,
    },

    /// The reference table has no record for the requested date.
    #[error("no astronomical record for {location} on {date}")]
    LookupMiss { location: String, date: NaiveDate },

    /// A reference table file could not be interpreted.
    #[error("reference table error: {0}")]
    Reference(String),
}

pub type PrayerResult<T> = Result<T, PrayerError>;
