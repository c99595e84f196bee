//! # Abadaat
//!
//! Daily prayer times derived from a location's sun events.
//!
//! Given one day's sunrise, sunset, solar noon and nautical twilight, the
//! deriver produces Fajr, Sunrise, Dhuhr, Asr, Sunset, Maghrib, Isha and solar
//! midnight using fixed midpoint and offset rules. A resolver then picks the
//! next prayer and classifies each time as upcoming, current or passed for a
//! given "now".
//!
//! ## Architecture
//!
//! - **clock**: Minutes-since-midnight arithmetic and the two accepted clock formats
//! - **prayer_times**: The derivation rules and the fallback policy
//! - **schedule**: Next-prayer and status resolution
//! - **reference**: Astronomical records, built-in and file-backed tables, fallback times
//! - **locations**: Fixed per-city times
//! - **source**: Location + date to displayable times, absorbing lookup and derivation failures
//! - **config**: TOML configuration loading and validation
//! - **display**: Terminal rendering of the prayer board
//! - **logger**: Structured logging with visual formatting

pub mod args;
pub mod clock;
pub mod config;
pub mod constants;
pub mod display;
pub mod error;
pub mod locations;
pub mod logger;
pub mod prayer_times;
pub mod reference;
pub mod schedule;
pub mod source;
pub mod utils;

pub use config::Config;
pub use error::{ParseError, PrayerError};
pub use logger::{Log, LogLevel};
pub use prayer_times::{PrayerTimeSet, derive_or_fallback, derive_prayer_times};
pub use reference::{DailyAstronomicalRecord, ReferenceTable};
pub use schedule::{NextPrayer, Prayer, PrayerStatus, next_prayer, prayer_status};
pub use source::{DailyTimes, PrayerSource, TimesOrigin};
