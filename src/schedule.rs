//! Next-prayer resolution and per-prayer status classification.
//!
//! Both operations take "now" as an explicit argument and hold no state, so a
//! host can re-run them on every refresh tick.

use chrono::{NaiveTime, Timelike};
use std::fmt;

use crate::clock::{minutes_of, parse_minutes};
use crate::constants::{CURRENT_WINDOW_MINUTES, FAJR_TOMORROW_LABEL};
use crate::prayer_times::PrayerTimeSet;

/// The named entries of a day's schedule, in canonical order.
///
/// Solar midnight is not a prayer and never appears here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Prayer {
    Fajr,
    Sunrise,
    Dhuhr,
    Asr,
    Sunset,
    Maghrib,
    Isha,
}

impl Prayer {
    pub const ALL: [Prayer; 7] = [
        Prayer::Fajr,
        Prayer::Sunrise,
        Prayer::Dhuhr,
        Prayer::Asr,
        Prayer::Sunset,
        Prayer::Maghrib,
        Prayer::Isha,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            Prayer::Fajr => "Fajr",
            Prayer::Sunrise => "Sunrise",
            Prayer::Dhuhr => "Dhuhr",
            Prayer::Asr => "Asr",
            Prayer::Sunset => "Sunset",
            Prayer::Maghrib => "Maghrib",
            Prayer::Isha => "Isha",
        }
    }

    /// Sunrise and Sunset are shown for reference only and carry no status badge.
    pub fn tracks_status(&self) -> bool {
        !matches!(self, Prayer::Sunrise | Prayer::Sunset)
    }

    /// The formatted time of this entry in a time set.
    pub fn time_in<'a>(&self, times: &'a PrayerTimeSet) -> &'a str {
        match self {
            Prayer::Fajr => &times.fajr,
            Prayer::Sunrise => &times.sunrise,
            Prayer::Dhuhr => &times.dhuhr,
            Prayer::Asr => &times.asr,
            Prayer::Sunset => &times.sunset,
            Prayer::Maghrib => &times.maghrib,
            Prayer::Isha => &times.isha,
        }
    }
}

impl fmt::Display for Prayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrayerStatus {
    Upcoming,
    Current,
    Passed,
    Unknown,
}

impl PrayerStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PrayerStatus::Upcoming => "upcoming",
            PrayerStatus::Current => "current",
            PrayerStatus::Passed => "passed",
            PrayerStatus::Unknown => "unknown",
        }
    }
}

impl fmt::Display for PrayerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What comes next after "now".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextPrayer {
    Today(Prayer),
    /// Every entry of the day has passed.
    FajrTomorrow,
    /// The time set contained an unparseable entry.
    Unknown,
}

impl fmt::Display for NextPrayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NextPrayer::Today(prayer) => f.write_str(prayer.display_name()),
            NextPrayer::FajrTomorrow => f.write_str(FAJR_TOMORROW_LABEL),
            NextPrayer::Unknown => f.write_str("Unknown"),
        }
    }
}

/// One row of the status board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrayerEntry {
    pub prayer: Prayer,
    pub time: String,
    pub status: PrayerStatus,
}

/// The seven entries as `(prayer, minutes)`, stably sorted by time.
///
/// Ties keep canonical order. Fails if any entry does not parse.
pub fn sorted_entries(times: &PrayerTimeSet) -> Option<Vec<(Prayer, i32)>> {
    let mut entries = Prayer::ALL
        .iter()
        .map(|&prayer| parse_minutes(prayer.time_in(times)).ok().map(|m| (prayer, m)))
        .collect::<Option<Vec<_>>>()?;
    entries.sort_by_key(|&(_, minutes)| minutes);
    Some(entries)
}

/// The first entry strictly later than `now` (at minute resolution).
///
/// # Examples
/// ```
/// use abadaat::reference::FALLBACK_TIMES;
/// use abadaat::schedule::{next_prayer, NextPrayer, Prayer};
/// use chrono::NaiveTime;
///
/// let times = FALLBACK_TIMES.to_time_set();
/// let noon = NaiveTime::from_hms_opt(12, 0, 0).unwrap();
/// assert_eq!(next_prayer(&times, noon), NextPrayer::Today(Prayer::Dhuhr));
///
/// let late = NaiveTime::from_hms_opt(23, 50, 0).unwrap();
/// assert_eq!(next_prayer(&times, late).to_string(), "Fajr (tomorrow)");
/// ```
pub fn next_prayer(times: &PrayerTimeSet, now: NaiveTime) -> NextPrayer {
    let Some(entries) = sorted_entries(times) else {
        return NextPrayer::Unknown;
    };
    let now_minutes = minutes_of(now);

    entries
        .into_iter()
        .find(|&(_, minutes)| minutes > now_minutes)
        .map_or(NextPrayer::FajrTomorrow, |(prayer, _)| NextPrayer::Today(prayer))
}

/// Classify a formatted prayer time against `now`.
///
/// `now` keeps its seconds: a prayer at 12:15 is current from 12:15:00 through
/// 12:30:00 inclusive and passed from 12:30:01.
pub fn prayer_status(time_text: &str, now: NaiveTime) -> PrayerStatus {
    let Ok(start) = parse_minutes(time_text) else {
        return PrayerStatus::Unknown;
    };

    let now_secs = now.num_seconds_from_midnight() as i64;
    let start_secs = start as i64 * 60;
    let end_secs = (start + CURRENT_WINDOW_MINUTES) as i64 * 60;

    if now_secs < start_secs {
        PrayerStatus::Upcoming
    } else if now_secs <= end_secs {
        PrayerStatus::Current
    } else {
        PrayerStatus::Passed
    }
}

/// Every entry in canonical order with its time and status at `now`.
pub fn status_board(times: &PrayerTimeSet, now: NaiveTime) -> Vec<PrayerEntry> {
    Prayer::ALL
        .iter()
        .map(|&prayer| {
            let time = prayer.time_in(times).to_string();
            let status = prayer_status(&time, now);
            PrayerEntry { prayer, time, status }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::FALLBACK_TIMES;

    fn at(h: u32, m: u32, s: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, s).unwrap()
    }

    fn milton_keynes_times() -> PrayerTimeSet {
        PrayerTimeSet {
            fajr: "5:35 am".to_string(),
            sunrise: "6:48 am".to_string(),
            dhuhr: "12:15 pm".to_string(),
            asr: "2:58 pm".to_string(),
            sunset: "5:42 pm".to_string(),
            maghrib: "6:02 pm".to_string(),
            isha: "8:58 pm".to_string(),
            solar_midnight: "12:15 am".to_string(),
        }
    }

    #[test]
    fn test_next_prayer_before_dhuhr() {
        let times = milton_keynes_times();
        assert_eq!(next_prayer(&times, at(12, 0, 0)), NextPrayer::Today(Prayer::Dhuhr));
        assert_eq!(prayer_status(&times.fajr, at(12, 0, 0)), PrayerStatus::Passed);
        assert_eq!(prayer_status(&times.dhuhr, at(12, 0, 0)), PrayerStatus::Upcoming);
    }

    #[test]
    fn test_next_prayer_is_strictly_later() {
        let times = milton_keynes_times();
        // At exactly 12:15 Dhuhr is no longer "next".
        assert_eq!(next_prayer(&times, at(12, 15, 0)), NextPrayer::Today(Prayer::Asr));
        // Seconds are ignored when picking the next prayer.
        assert_eq!(next_prayer(&times, at(12, 14, 59)), NextPrayer::Today(Prayer::Dhuhr));
    }

    #[test]
    fn test_next_prayer_early_morning() {
        let times = milton_keynes_times();
        assert_eq!(next_prayer(&times, at(0, 0, 0)), NextPrayer::Today(Prayer::Fajr));
        assert_eq!(next_prayer(&times, at(6, 0, 0)), NextPrayer::Today(Prayer::Sunrise));
    }

    #[test]
    fn test_next_prayer_after_isha() {
        let times = milton_keynes_times();
        let next = next_prayer(&times, at(23, 50, 0));
        assert_eq!(next, NextPrayer::FajrTomorrow);
        assert_eq!(next.to_string(), "Fajr (tomorrow)");
    }

    #[test]
    fn test_next_prayer_sorts_by_time() {
        // Maghrib numerically before Asr: chronological order wins.
        let mut times = milton_keynes_times();
        times.maghrib = "2:30 pm".to_string();
        assert_eq!(next_prayer(&times, at(14, 0, 0)), NextPrayer::Today(Prayer::Maghrib));
        assert_eq!(next_prayer(&times, at(14, 30, 0)), NextPrayer::Today(Prayer::Asr));
    }

    #[test]
    fn test_sorted_entries_is_stable() {
        let mut times = milton_keynes_times();
        times.sunset = times.asr.clone();
        let entries = sorted_entries(&times).unwrap();
        let asr = entries.iter().position(|(p, _)| *p == Prayer::Asr).unwrap();
        let sunset = entries.iter().position(|(p, _)| *p == Prayer::Sunset).unwrap();
        assert_eq!(sunset, asr + 1);
    }

    #[test]
    fn test_next_prayer_unknown_on_bad_entry() {
        let mut times = milton_keynes_times();
        times.isha = "late".to_string();
        let next = next_prayer(&times, at(12, 0, 0));
        assert_eq!(next, NextPrayer::Unknown);
        assert_eq!(next.to_string(), "Unknown");
    }

    #[test]
    fn test_status_current_window() {
        let dhuhr = "12:15 pm";
        assert_eq!(prayer_status(dhuhr, at(12, 14, 59)), PrayerStatus::Upcoming);
        assert_eq!(prayer_status(dhuhr, at(12, 15, 0)), PrayerStatus::Current);
        assert_eq!(prayer_status(dhuhr, at(12, 20, 0)), PrayerStatus::Current);
        assert_eq!(prayer_status(dhuhr, at(12, 30, 0)), PrayerStatus::Current);
        assert_eq!(prayer_status(dhuhr, at(12, 30, 1)), PrayerStatus::Passed);
        assert_eq!(prayer_status(dhuhr, at(12, 31, 0)), PrayerStatus::Passed);
    }

    #[test]
    fn test_status_accepts_twenty_four_hour_input() {
        assert_eq!(prayer_status("12:15", at(12, 20, 0)), PrayerStatus::Current);
    }

    #[test]
    fn test_status_unknown() {
        assert_eq!(prayer_status("", at(12, 0, 0)), PrayerStatus::Unknown);
        assert_eq!(prayer_status("Dawn", at(12, 0, 0)), PrayerStatus::Unknown);
        assert_eq!(PrayerStatus::Unknown.to_string(), "unknown");
    }

    #[test]
    fn test_status_late_window_does_not_wrap() {
        // Window runs past midnight but "now" is a same-day clock reading.
        assert_eq!(prayer_status("11:50 pm", at(23, 59, 59)), PrayerStatus::Current);
        assert_eq!(prayer_status("11:50 pm", at(0, 1, 0)), PrayerStatus::Upcoming);
    }

    #[test]
    fn test_status_board() {
        let board = status_board(&FALLBACK_TIMES.to_time_set(), at(12, 40, 0));
        assert_eq!(board.len(), 7);
        assert_eq!(board[0].prayer, Prayer::Fajr);
        assert_eq!(board[0].status, PrayerStatus::Passed);
        assert_eq!(board[2].prayer, Prayer::Dhuhr);
        assert_eq!(board[2].time, "12:30 pm");
        assert_eq!(board[2].status, PrayerStatus::Current);
        assert_eq!(board[6].prayer, Prayer::Isha);
        assert_eq!(board[6].status, PrayerStatus::Upcoming);
    }

    #[test]
    fn test_tracks_status() {
        let tracked: Vec<_> = Prayer::ALL.iter().filter(|p| p.tracks_status()).collect();
        assert_eq!(
            tracked,
            [&Prayer::Fajr, &Prayer::Dhuhr, &Prayer::Asr, &Prayer::Maghrib, &Prayer::Isha]
        );
    }
}
