//! Derivation of the daily prayer times from one astronomical record.
//!
//! The rules, in computation order:
//!
//! | Output | Rule |
//! |---|---|
//! | Fajr | nautical twilight start |
//! | Sunrise | sunrise |
//! | Dhuhr | solar noon |
//! | Solar midnight | solar noon + 12h |
//! | Asr | midpoint of solar noon and sunset |
//! | Maghrib | sunset + 20 min |
//! | Isha | midpoint of sunset and solar midnight |
//! | Sunset | sunset |
//!
//! Solar midnight is compared against sunset on the raw (unreduced) minute
//! counts; when it is numerically earlier it is moved into the next day before
//! the Isha midpoint is taken. Everything is formatted as `H:MM am|pm` at the
//! end, which is the only place values are reduced modulo 1440.

use chrono::NaiveDate;

use crate::clock::{add_minutes, format_clock_time, midpoint, parse_minutes};
use crate::constants::{HALF_DAY_MINUTES, MAGHRIB_OFFSET_MINUTES, MINUTES_PER_DAY};
use crate::error::{PrayerError, PrayerResult};
use crate::logger::Log;
use crate::reference::{DailyAstronomicalRecord, FALLBACK_TIMES};

/// The formatted times for one day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrayerTimeSet {
    pub fajr: String,
    pub sunrise: String,
    pub dhuhr: String,
    pub asr: String,
    pub sunset: String,
    pub maghrib: String,
    pub isha: String,
    pub solar_midnight: String,
}

impl PrayerTimeSet {
    /// The fixed set shown when derivation fails.
    pub fn fallback() -> Self {
        FALLBACK_TIMES.to_time_set()
    }
}

/// Unformatted derivation results, in minutes since midnight.
///
/// `solar_midnight` and `isha` may exceed 1440 when they fall after midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrayerMinutes {
    pub fajr: i32,
    pub sunrise: i32,
    pub dhuhr: i32,
    pub asr: i32,
    pub sunset: i32,
    pub maghrib: i32,
    pub isha: i32,
    pub solar_midnight: i32,
}

impl PrayerMinutes {
    pub fn format(&self) -> PrayerTimeSet {
        PrayerTimeSet {
            fajr: format_clock_time(self.fajr),
            sunrise: format_clock_time(self.sunrise),
            dhuhr: format_clock_time(self.dhuhr),
            asr: format_clock_time(self.asr),
            sunset: format_clock_time(self.sunset),
            maghrib: format_clock_time(self.maghrib),
            isha: format_clock_time(self.isha),
            solar_midnight: format_clock_time(self.solar_midnight),
        }
    }
}

fn field_minutes(
    date: NaiveDate,
    field: &'static str,
    value: Option<&str>,
) -> PrayerResult<i32> {
    let text = value
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .ok_or_else(|| PrayerError::InvalidRecord {
            date,
            field,
            reason: "is missing".to_string(),
        })?;

    parse_minutes(text).map_err(|e| PrayerError::InvalidRecord {
        date,
        field,
        reason: format!("is invalid: {}", e),
    })
}

/// Derive the raw minute values for a record.
pub fn derive_minutes(record: &DailyAstronomicalRecord) -> PrayerResult<PrayerMinutes> {
    let date = record.date;
    let sunrise = field_minutes(date, "sunrise", record.sunrise.as_deref())?;
    let sunset = field_minutes(date, "sunset", record.sunset.as_deref())?;
    let solar_noon = field_minutes(date, "solar_noon", record.solar_noon.as_deref())?;
    let twilight_start = field_minutes(
        date,
        "nautical_twilight_start",
        record.nautical_twilight_start.as_deref(),
    )?;
    // Not used by any rule, but a record is only accepted whole.
    field_minutes(
        date,
        "nautical_twilight_end",
        record.nautical_twilight_end.as_deref(),
    )?;

    let fajr = twilight_start;
    let dhuhr = solar_noon;
    let solar_midnight = add_minutes(solar_noon, HALF_DAY_MINUTES);
    let asr = midpoint(dhuhr, sunset);
    let maghrib = add_minutes(sunset, MAGHRIB_OFFSET_MINUTES);

    let mut midnight_abs = solar_midnight;
    if midnight_abs < sunset {
        midnight_abs += MINUTES_PER_DAY;
    }
    let isha = midpoint(sunset, midnight_abs);

    Ok(PrayerMinutes {
        fajr,
        sunrise,
        dhuhr,
        asr,
        sunset,
        maghrib,
        isha,
        solar_midnight,
    })
}

/// Derive the formatted prayer times for a record.
///
/// # Examples
/// ```
/// use abadaat::prayer_times::derive_prayer_times;
/// use abadaat::reference::DailyAstronomicalRecord;
/// use chrono::NaiveDate;
///
/// let date = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
/// let record = DailyAstronomicalRecord::new(date, "06:48", "17:42", "12:15", "05:35", "18:56");
/// let times = derive_prayer_times(&record).unwrap();
/// assert_eq!(times.asr, "2:58 pm");
/// assert_eq!(times.isha, "8:58 pm");
/// ```
pub fn derive_prayer_times(record: &DailyAstronomicalRecord) -> PrayerResult<PrayerTimeSet> {
    derive_minutes(record).map(|minutes| minutes.format())
}

/// Derive the prayer times, logging the outcome.
///
/// Returns `None` after logging a warning when the record cannot be derived;
/// the caller decides what to show instead.
pub fn derive_logged(record: &DailyAstronomicalRecord) -> Option<PrayerTimeSet> {
    match derive_minutes(record) {
        Ok(minutes) => {
            Log::log_debug(&format!("Derived minutes for {}: {:?}", record.date, minutes));
            Some(minutes.format())
        }
        Err(e) => {
            Log::log_warning(&format!("{}. Showing default prayer times.", e));
            None
        }
    }
}

/// Derive the prayer times, substituting the fallback set on failure.
///
/// The failure is logged; callers always get something to display.
pub fn derive_or_fallback(record: &DailyAstronomicalRecord) -> PrayerTimeSet {
    derive_logged(record).unwrap_or_else(PrayerTimeSet::fallback)
}
