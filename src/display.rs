//! Terminal rendering of a day's prayer board.

use chrono::{Datelike, NaiveDate, NaiveTime};

use crate::logger::Log;
use crate::schedule::{PrayerStatus, next_prayer, status_board};
use crate::source::{DailyTimes, TimesOrigin};

const NAME_WIDTH: usize = 16;
const TIME_WIDTH: usize = 9;

/// `Saturday, March 1st, 2025`
pub fn long_date(date: NaiveDate) -> String {
    format!(
        "{}, {} {}{}, {}",
        date.format("%A"),
        date.format("%B"),
        date.day(),
        ordinal_suffix(date.day()),
        date.year()
    )
}

fn ordinal_suffix(day: u32) -> &'static str {
    match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    }
}

fn status_badge(status: PrayerStatus) -> &'static str {
    match status {
        PrayerStatus::Current => "● current",
        PrayerStatus::Upcoming => "○ upcoming",
        PrayerStatus::Passed => "· passed",
        PrayerStatus::Unknown => "",
    }
}

/// One line per entry, then the solar midnight line.
pub fn board_lines(daily: &DailyTimes, now: NaiveTime) -> Vec<String> {
    let mut lines: Vec<String> = status_board(&daily.times, now)
        .into_iter()
        .map(|entry| {
            let badge = if entry.prayer.tracks_status() {
                status_badge(entry.status)
            } else {
                ""
            };
            format!(
                "{:<name$}{:>time$}  {}",
                entry.prayer.display_name(),
                entry.time,
                badge,
                name = NAME_WIDTH,
                time = TIME_WIDTH
            )
            .trim_end()
            .to_string()
        })
        .collect();

    lines.push(format!(
        "{:<name$}{:>time$}",
        "Solar Midnight",
        daily.times.solar_midnight,
        name = NAME_WIDTH,
        time = TIME_WIDTH
    ));
    lines
}

/// A note on where the times came from, when they are not a direct derivation.
pub fn origin_note(origin: TimesOrigin) -> Option<String> {
    match origin {
        TimesOrigin::Derived => None,
        TimesOrigin::NearestDay(date) => Some(format!("Using astronomical data for {}", date)),
        TimesOrigin::Static => Some("Fixed times for this city".to_string()),
        TimesOrigin::Fallback => Some("Showing default prayer times".to_string()),
    }
}

/// Print the full board for `daily` at `now`.
pub fn log_board(location: &str, daily: &DailyTimes, now: NaiveTime) {
    Log::log_block_start(&format!("Prayer times for {}", location));
    Log::log_indented(&long_date(daily.date));
    if let Some(note) = origin_note(daily.origin) {
        Log::log_indented(&note);
    }

    Log::log_block_start(&format!(
        "Now {} · Next: {}",
        now.format("%-I:%M:%S %P"),
        next_prayer(&daily.times, now)
    ));
    Log::log_pipe();
    for line in board_lines(daily, now) {
        Log::log_indented(&line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prayer_times::PrayerTimeSet;

    fn at(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_long_date() {
        let date = |d| NaiveDate::from_ymd_opt(2025, 3, d).unwrap();
        assert_eq!(long_date(date(1)), "Saturday, March 1st, 2025");
        assert_eq!(long_date(date(2)), "Sunday, March 2nd, 2025");
        assert_eq!(long_date(date(3)), "Monday, March 3rd, 2025");
        assert_eq!(long_date(date(11)), "Tuesday, March 11th, 2025");
        assert_eq!(long_date(date(22)), "Saturday, March 22nd, 2025");
    }

    #[test]
    fn test_board_lines() {
        let daily = DailyTimes {
            date: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            times: PrayerTimeSet::fallback(),
            origin: TimesOrigin::Fallback,
        };
        let lines = board_lines(&daily, at(12, 40));
        assert_eq!(lines.len(), 8);
        assert_eq!(lines[0], "Fajr              5:15 am  · passed");
        // Sunrise carries no badge.
        assert_eq!(lines[1], "Sunrise           6:45 am");
        assert_eq!(lines[2], "Dhuhr            12:30 pm  ● current");
        assert_eq!(lines[6], "Isha              8:00 pm  ○ upcoming");
        assert_eq!(lines[7], "Solar Midnight   12:15 am");
    }

    #[test]
    fn test_origin_note() {
        assert_eq!(origin_note(TimesOrigin::Derived), None);
        assert_eq!(
            origin_note(TimesOrigin::NearestDay(NaiveDate::from_ymd_opt(2025, 3, 5).unwrap())),
            Some("Using astronomical data for 2025-03-05".to_string())
        );
    }
}
