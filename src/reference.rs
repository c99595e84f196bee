//! Astronomical reference data for the prayer-time deriver.
//!
//! A [`ReferenceTable`] holds one [`DailyAstronomicalRecord`] per calendar date
//! for a single location. Tables come from three places:
//!
//! - the built-in Milton Keynes table ([`ReferenceTable::milton_keynes`])
//! - a TOML file with `[[day]]` entries
//! - a CSV export of a sun table, where cells may carry decorations such as
//!   `06:48↑(101°)`; only the clock token (with any am/pm) is kept
//!
//! Time fields are kept as the text the source supplied. They are validated
//! when the record is derived, so a bad cell surfaces as an invalid record
//! rather than aborting the whole table load.
//!
//! This module also owns the fixed fallback time set that callers show when a
//! record cannot be derived.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::clock::clean_time_string;
use crate::error::{PrayerError, PrayerResult};
use crate::prayer_times::PrayerTimeSet;

/// Sun events for one date at one location, as supplied by a reference table.
///
/// `None` (or blank text) means the source had no value for that field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyAstronomicalRecord {
    pub date: NaiveDate,
    pub sunrise: Option<String>,
    pub sunset: Option<String>,
    pub solar_noon: Option<String>,
    pub nautical_twilight_start: Option<String>,
    pub nautical_twilight_end: Option<String>,
}

impl DailyAstronomicalRecord {
    /// Build a record with every field present.
    pub fn new(
        date: NaiveDate,
        sunrise: &str,
        sunset: &str,
        solar_noon: &str,
        nautical_twilight_start: &str,
        nautical_twilight_end: &str,
    ) -> Self {
        Self {
            date,
            sunrise: Some(sunrise.to_string()),
            sunset: Some(sunset.to_string()),
            solar_noon: Some(solar_noon.to_string()),
            nautical_twilight_start: Some(nautical_twilight_start.to_string()),
            nautical_twilight_end: Some(nautical_twilight_end.to_string()),
        }
    }
}

/// Fixed time strings, used for the fallback set and the static city tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaticTimes {
    pub fajr: &'static str,
    pub sunrise: &'static str,
    pub dhuhr: &'static str,
    pub asr: &'static str,
    pub sunset: &'static str,
    pub maghrib: &'static str,
    pub isha: &'static str,
    pub solar_midnight: &'static str,
}

impl StaticTimes {
    pub fn to_time_set(&self) -> PrayerTimeSet {
        PrayerTimeSet {
            fajr: self.fajr.to_string(),
            sunrise: self.sunrise.to_string(),
            dhuhr: self.dhuhr.to_string(),
            asr: self.asr.to_string(),
            sunset: self.sunset.to_string(),
            maghrib: self.maghrib.to_string(),
            isha: self.isha.to_string(),
            solar_midnight: self.solar_midnight.to_string(),
        }
    }
}

/// Shown in place of derived times when a record cannot be derived.
pub const FALLBACK_TIMES: StaticTimes = StaticTimes {
    fajr: "5:15 am",
    sunrise: "6:45 am",
    dhuhr: "12:30 pm",
    asr: "3:45 pm",
    sunset: "5:42 pm",
    maghrib: "6:50 pm",
    isha: "8:00 pm",
    solar_midnight: "12:15 am",
};

// (day of March 2025, sunrise, sunset, solar noon, nautical twilight start, nautical twilight end)
type BuiltinRow = (u32, &'static str, &'static str, &'static str, &'static str, &'static str);

const MILTON_KEYNES_ROWS: &[BuiltinRow] = &[
    (1, "06:48", "17:42", "12:15", "05:35", "18:56"),
    (2, "06:46", "17:44", "12:15", "05:33", "18:57"),
    (3, "06:44", "17:46", "12:14", "05:31", "18:59"),
    (4, "06:41", "17:48", "12:14", "05:29", "19:01"),
    (5, "06:39", "17:50", "12:14", "05:26", "19:03"),
];

/// All records for one location, keyed by date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceTable {
    pub location: String,
    records: BTreeMap<NaiveDate, DailyAstronomicalRecord>,
}

#[derive(Debug, Deserialize)]
struct RawTable {
    location: Option<String>,
    #[serde(default)]
    day: Vec<RawDay>,
}

#[derive(Debug, Deserialize)]
struct RawDay {
    date: String,
    sunrise: Option<String>,
    sunset: Option<String>,
    solar_noon: Option<String>,
    nautical_twilight_start: Option<String>,
    nautical_twilight_end: Option<String>,
}

const CSV_COLUMNS: [&str; 6] = [
    "date",
    "sunrise",
    "sunset",
    "solar_noon",
    "nautical_twilight_start",
    "nautical_twilight_end",
];

impl ReferenceTable {
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            records: BTreeMap::new(),
        }
    }

    /// The built-in table for Milton Keynes, UK (early March 2025).
    pub fn milton_keynes() -> Self {
        let mut table = Self::new(crate::constants::DEFAULT_LOCATION_DISPLAY);
        let march = MILTON_KEYNES_ROWS
            .iter()
            .filter_map(|&(day, sunrise, sunset, noon, start, end)| {
                NaiveDate::from_ymd_opt(2025, 3, day)
                    .map(|date| DailyAstronomicalRecord::new(date, sunrise, sunset, noon, start, end))
            });
        for record in march {
            table.records.insert(record.date, record);
        }
        table
    }

    /// The built-in table for a location identifier, if one ships with the crate.
    pub fn builtin(location: &str) -> Option<Self> {
        match location {
            "milton-keynes" => Some(Self::milton_keynes()),
            _ => None,
        }
    }

    /// Add a record; a second record for the same date is rejected.
    pub fn insert(&mut self, record: DailyAstronomicalRecord) -> PrayerResult<()> {
        if self.records.contains_key(&record.date) {
            return Err(PrayerError::Reference(format!(
                "duplicate record for {}",
                record.date
            )));
        }
        self.records.insert(record.date, record);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> impl Iterator<Item = &DailyAstronomicalRecord> {
        self.records.values()
    }

    /// The record for exactly `date`.
    pub fn lookup(&self, date: NaiveDate) -> PrayerResult<&DailyAstronomicalRecord> {
        self.records.get(&date).ok_or_else(|| PrayerError::LookupMiss {
            location: self.location.clone(),
            date,
        })
    }

    /// The record closest to `date`; the earlier date wins a tie.
    pub fn lookup_nearest(&self, date: NaiveDate) -> Option<&DailyAstronomicalRecord> {
        self.records
            .values()
            .min_by_key(|record| ((record.date - date).num_days().abs(), record.date))
    }

    /// Parse a TOML table:
    ///
    /// ```toml
    /// location = "Milton Keynes, UK"
    ///
    /// [[day]]
    /// date = "2025-03-01"
    /// sunrise = "06:48"
    /// sunset = "17:42"
    /// solar_noon = "12:15"
    /// nautical_twilight_start = "05:35"
    /// nautical_twilight_end = "18:56"
    /// ```
    pub fn from_toml_str(content: &str, default_location: &str) -> PrayerResult<Self> {
        let raw: RawTable = toml::from_str(content)
            .map_err(|e| PrayerError::Reference(format!("malformed TOML table: {}", e)))?;

        let mut table = Self::new(
            raw.location
                .unwrap_or_else(|| default_location.to_string()),
        );
        for (index, day) in raw.day.into_iter().enumerate() {
            let date = parse_date(&day.date)
                .map_err(|reason| PrayerError::Reference(format!("day #{}: {}", index + 1, reason)))?;
            table.insert(DailyAstronomicalRecord {
                date,
                sunrise: non_blank(day.sunrise),
                sunset: non_blank(day.sunset),
                solar_noon: non_blank(day.solar_noon),
                nautical_twilight_start: non_blank(day.nautical_twilight_start),
                nautical_twilight_end: non_blank(day.nautical_twilight_end),
            })?;
        }
        Ok(table)
    }

    /// Parse a CSV table whose header names the columns
    /// `date, sunrise, sunset, solar_noon, nautical_twilight_start,
    /// nautical_twilight_end` in any order. Fields may be quoted, blank lines
    /// are skipped and lines starting with `#` are comments.
    pub fn from_csv_str(content: &str, location: &str) -> PrayerResult<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .comment(Some(b'#'))
            .from_reader(content.as_bytes());

        let header: Vec<String> = reader
            .headers()
            .map_err(|e| PrayerError::Reference(format!("malformed CSV header: {}", e)))?
            .iter()
            .map(str::to_ascii_lowercase)
            .collect();
        if header.iter().all(|h| h.is_empty()) {
            return Err(PrayerError::Reference("CSV table is empty".to_string()));
        }

        let mut positions = [0usize; CSV_COLUMNS.len()];
        for (slot, column) in positions.iter_mut().zip(CSV_COLUMNS) {
            *slot = header
                .iter()
                .position(|h| h == column)
                .ok_or_else(|| PrayerError::Reference(format!("CSV header is missing '{}'", column)))?;
        }
        let [date_col, sunrise_col, sunset_col, noon_col, start_col, end_col] = positions;

        let mut table = Self::new(location);
        for row in reader.records() {
            let row = row.map_err(|e| PrayerError::Reference(format!("malformed CSV row: {}", e)))?;
            let line_number = row.position().map_or(0, |p| p.line());
            let cell = |col: usize| row.get(col).unwrap_or("");

            let date = parse_date(cell(date_col))
                .map_err(|reason| PrayerError::Reference(format!("line {}: {}", line_number, reason)))?;
            table.insert(DailyAstronomicalRecord {
                date,
                sunrise: time_cell(cell(sunrise_col)),
                sunset: time_cell(cell(sunset_col)),
                solar_noon: time_cell(cell(noon_col)),
                nautical_twilight_start: time_cell(cell(start_col)),
                nautical_twilight_end: time_cell(cell(end_col)),
            })?;
        }
        Ok(table)
    }

    /// Load a table from disk; `.csv` files are read as CSV, anything else as TOML.
    pub fn load_from_path(path: &Path, location: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read reference table from {}", path.display()))?;

        let is_csv = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
        let table = if is_csv {
            Self::from_csv_str(&content, location)
        } else {
            Self::from_toml_str(&content, location)
        };

        table.with_context(|| format!("Failed to parse reference table {}", path.display()))
    }
}

fn parse_date(text: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d")
        .map_err(|_| format!("invalid date '{}' (expected YYYY-MM-DD)", text.trim()))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Keep only the clock token of a decorated cell. A non-empty cell without
/// one is kept verbatim so the deriver reports it as unparseable.
fn time_cell(cell: &str) -> Option<String> {
    if cell.is_empty() {
        return None;
    }
    Some(clean_time_string(cell).unwrap_or(cell).to_string())
}
