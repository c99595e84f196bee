//! Resolve a configured location and a date into the day's prayer times.
//!
//! This is where the core's error kinds meet the display: a missing record,
//! an unparseable field or an empty table never reaches the caller as an
//! error. Each degraded path is logged and reported through [`TimesOrigin`]
//! so the host can say what it is showing.

use anyhow::Result;
use chrono::NaiveDate;

use crate::config::Config;
use crate::locations::static_times_for;
use crate::logger::Log;
use crate::prayer_times::{PrayerTimeSet, derive_logged};
use crate::reference::ReferenceTable;

/// Where a day's prayer times come from.
#[derive(Debug, Clone)]
pub enum PrayerSource {
    /// Derived from an astronomical table.
    Astronomical {
        table: ReferenceTable,
        exact_date: bool,
    },
    /// Fixed per-city times.
    Static { city: String },
}

/// How the times in a [`DailyTimes`] were obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimesOrigin {
    /// Derived from the record for the requested date.
    Derived,
    /// Derived from the closest record the table had.
    NearestDay(NaiveDate),
    /// Static city table.
    Static,
    /// Derivation or lookup failed; the fixed fallback set is shown.
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyTimes {
    pub date: NaiveDate,
    pub times: PrayerTimeSet,
    pub origin: TimesOrigin,
}

impl PrayerSource {
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(match config.reference_table()? {
            Some(table) => PrayerSource::Astronomical {
                table,
                exact_date: config.exact_date(),
            },
            None => PrayerSource::Static {
                city: config.location().to_string(),
            },
        })
    }

    /// Human-readable location name.
    pub fn location_label(&self) -> &str {
        match self {
            PrayerSource::Astronomical { table, .. } => &table.location,
            PrayerSource::Static { city } => city,
        }
    }

    pub fn times_for(&self, date: NaiveDate) -> DailyTimes {
        match self {
            PrayerSource::Static { city } => DailyTimes {
                date,
                times: static_times_for(city),
                origin: TimesOrigin::Static,
            },
            PrayerSource::Astronomical { table, exact_date } => {
                let (record, origin) = match table.lookup(date) {
                    Ok(record) => (Some(record), TimesOrigin::Derived),
                    Err(e) if *exact_date => {
                        Log::log_warning(&e.to_string());
                        (None, TimesOrigin::Fallback)
                    }
                    Err(_) => match table.lookup_nearest(date) {
                        Some(record) => {
                            Log::log_warning(&format!(
                                "No record for {} on {}; using {}",
                                table.location, date, record.date
                            ));
                            (Some(record), TimesOrigin::NearestDay(record.date))
                        }
                        None => {
                            Log::log_warning(&format!(
                                "Reference table for {} is empty",
                                table.location
                            ));
                            (None, TimesOrigin::Fallback)
                        }
                    },
                };

                match record.and_then(derive_logged) {
                    Some(times) => DailyTimes { date, times, origin },
                    None => DailyTimes {
                        date,
                        times: PrayerTimeSet::fallback(),
                        origin: TimesOrigin::Fallback,
                    },
                }
            }
        }
    }
}
