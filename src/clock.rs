//! Time-of-day arithmetic on minutes since midnight.
//!
//! Every clock value in the core is an `i32` count of minutes since midnight.
//! Intermediate results are allowed to run past 1440 (or below zero); they are
//! only reduced to a wall-clock time when formatted, so ordering comparisons
//! between derived values stay correct across midnight.
//!
//! Two textual shapes are accepted:
//! - **24-hour** `HH:MM`, as found in astronomical reference tables
//! - **12-hour** `H:MM am/pm`, as produced by [`format_clock_time`]
//!
//! The parser reports which shape matched instead of guessing silently.

use chrono::{NaiveTime, Timelike};
use regex::Regex;
use std::sync::LazyLock;

use crate::constants::{MINUTES_PER_DAY, MINUTES_PER_HOUR};
use crate::error::ParseError;

static TWENTY_FOUR_HOUR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,2}):(\d{2})$").expect("valid 24-hour regex"));

static TWELVE_HOUR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(\d{1,2}):(\d{2})\s?(am|pm)$").expect("valid 12-hour regex")
});

static EMBEDDED_TIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d{1,2}:\d{2}(?:\s?[ap]m\b)?)").expect("valid embedded time regex")
});

/// Which textual shape a clock string was written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockFormat {
    /// `HH:MM`, hours 0-23.
    TwentyFourHour,
    /// `H:MM am/pm`, hours 1-12.
    TwelveHour,
}

/// Result of [`parse_clock_time`]: the minute value plus the matched shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedClockTime {
    pub minutes: i32,
    pub format: ClockFormat,
}

/// Parse a 24-hour or 12-hour clock string into minutes since midnight.
///
/// Leading and trailing whitespace is ignored and the meridiem is matched
/// case-insensitively.
///
/// # Examples
/// ```
/// use abadaat::clock::{parse_clock_time, ClockFormat};
/// let parsed = parse_clock_time("05:35").unwrap();
/// assert_eq!(parsed.minutes, 335);
/// assert_eq!(parsed.format, ClockFormat::TwentyFourHour);
///
/// let parsed = parse_clock_time("2:58 pm").unwrap();
/// assert_eq!(parsed.minutes, 898);
/// assert_eq!(parsed.format, ClockFormat::TwelveHour);
/// ```
pub fn parse_clock_time(text: &str) -> Result<ParsedClockTime, ParseError> {
    let trimmed = text.trim();

    if let Some(caps) = TWENTY_FOUR_HOUR.captures(trimmed) {
        let (hour, minute) = hour_and_minute(trimmed, &caps[1], &caps[2])?;
        if hour > 23 {
            return Err(ParseError::HourOutOfRange {
                text: trimmed.to_string(),
                hour,
            });
        }
        return Ok(ParsedClockTime {
            minutes: to_minutes(hour, minute),
            format: ClockFormat::TwentyFourHour,
        });
    }

    if let Some(caps) = TWELVE_HOUR.captures(trimmed) {
        let (hour, minute) = hour_and_minute(trimmed, &caps[1], &caps[2])?;
        if !(1..=12).contains(&hour) {
            return Err(ParseError::HourOutOfRange {
                text: trimmed.to_string(),
                hour,
            });
        }
        let is_pm = caps[3].eq_ignore_ascii_case("pm");
        let hour24 = match (hour, is_pm) {
            (12, false) => 0,
            (12, true) => 12,
            (h, false) => h,
            (h, true) => h + 12,
        };
        return Ok(ParsedClockTime {
            minutes: to_minutes(hour24, minute),
            format: ClockFormat::TwelveHour,
        });
    }

    Err(ParseError::Unrecognized(trimmed.to_string()))
}

/// Shorthand for `parse_clock_time(text).map(|p| p.minutes)`.
pub fn parse_minutes(text: &str) -> Result<i32, ParseError> {
    parse_clock_time(text).map(|parsed| parsed.minutes)
}

fn hour_and_minute(text: &str, hour: &str, minute: &str) -> Result<(u32, u32), ParseError> {
    // Both groups are one or two ASCII digits, so these parses cannot fail.
    let hour: u32 = hour
        .parse()
        .map_err(|_| ParseError::Unrecognized(text.to_string()))?;
    let minute: u32 = minute
        .parse()
        .map_err(|_| ParseError::Unrecognized(text.to_string()))?;
    if minute > 59 {
        return Err(ParseError::MinuteOutOfRange {
            text: text.to_string(),
            minute,
        });
    }
    Ok((hour, minute))
}

fn to_minutes(hour: u32, minute: u32) -> i32 {
    (hour * 60 + minute) as i32
}

/// Format minutes since midnight as `H:MM am|pm`.
///
/// The value is reduced modulo 1440 first, so a time computed past midnight
/// shows up as an early-morning time with no day marker.
///
/// # Examples
/// ```
/// use abadaat::clock::format_clock_time;
/// assert_eq!(format_clock_time(0), "12:00 am");
/// assert_eq!(format_clock_time(735), "12:15 pm");
/// assert_eq!(format_clock_time(1455), "12:15 am");
/// ```
pub fn format_clock_time(minutes: i32) -> String {
    let wrapped = minutes.rem_euclid(MINUTES_PER_DAY);
    let hour24 = wrapped / MINUTES_PER_HOUR;
    let minute = wrapped % MINUTES_PER_HOUR;
    let hour12 = match hour24 % 12 {
        0 => 12,
        h => h,
    };
    let meridiem = if hour24 < 12 { "am" } else { "pm" };
    format!("{}:{:02} {}", hour12, minute, meridiem)
}

/// Halfway point between `a` and `b`, rounded toward `a`.
///
/// No wraparound is applied: when `b` belongs to the following day the
/// caller must add 1440 to it first.
pub fn midpoint(a: i32, b: i32) -> i32 {
    a + (b - a).div_euclid(2)
}

/// Plain addition; the result is not reduced modulo 1440.
pub fn add_minutes(t: i32, delta: i32) -> i32 {
    t + delta
}

/// Minutes since midnight of a chrono time, seconds discarded.
pub fn minutes_of(time: NaiveTime) -> i32 {
    (time.hour() * 60 + time.minute()) as i32
}

/// Pull the first clock token out of a decorated table cell.
///
/// Sun tables often annotate times with direction arrows and azimuths,
/// e.g. `06:48↑(101°)`. A trailing meridiem stays attached to the token so
/// `5:42 pm` is not read back as a 24-hour `5:42`.
pub fn clean_time_string(cell: &str) -> Option<&str> {
    EMBEDDED_TIME.find(cell).map(|m| m.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_twenty_four_hour() {
        let parsed = parse_clock_time("17:42").unwrap();
        assert_eq!(parsed.minutes, 1062);
        assert_eq!(parsed.format, ClockFormat::TwentyFourHour);

        assert_eq!(parse_minutes("00:00").unwrap(), 0);
        assert_eq!(parse_minutes("23:59").unwrap(), 1439);
        assert_eq!(parse_minutes("5:07").unwrap(), 307);
    }

    #[test]
    fn test_parse_twelve_hour() {
        assert_eq!(parse_minutes("5:35 am").unwrap(), 335);
        assert_eq!(parse_minutes("12:15 pm").unwrap(), 735);
        assert_eq!(parse_minutes("12:15 am").unwrap(), 15);
        assert_eq!(parse_minutes("8:58 pm").unwrap(), 1258);

        let parsed = parse_clock_time("11:05PM").unwrap();
        assert_eq!(parsed.minutes, 23 * 60 + 5);
        assert_eq!(parsed.format, ClockFormat::TwelveHour);
    }

    #[test]
    fn test_parse_ignores_surrounding_whitespace() {
        assert_eq!(parse_minutes("  06:48 ").unwrap(), 408);
        assert_eq!(parse_minutes("\t6:48 am\n").unwrap(), 408);
    }

    #[test]
    fn test_parse_rejects_out_of_range() {
        assert!(matches!(
            parse_clock_time("24:00"),
            Err(ParseError::HourOutOfRange { hour: 24, .. })
        ));
        assert!(matches!(
            parse_clock_time("13:00 pm"),
            Err(ParseError::HourOutOfRange { hour: 13, .. })
        ));
        assert!(matches!(
            parse_clock_time("0:30 am"),
            Err(ParseError::HourOutOfRange { hour: 0, .. })
        ));
        assert!(matches!(
            parse_clock_time("12:60"),
            Err(ParseError::MinuteOutOfRange { minute: 60, .. })
        ));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for text in ["", "noon", "12", "12:5", "12:345", "12:15 xm", "-1:00", "06:48:00"] {
            assert!(
                matches!(parse_clock_time(text), Err(ParseError::Unrecognized(_))),
                "expected Unrecognized for {:?}",
                text
            );
        }
    }

    #[test]
    fn test_format_clock_time() {
        assert_eq!(format_clock_time(335), "5:35 am");
        assert_eq!(format_clock_time(720), "12:00 pm");
        assert_eq!(format_clock_time(898), "2:58 pm");
        assert_eq!(format_clock_time(1439), "11:59 pm");
    }

    #[test]
    fn test_format_wraps_around_midnight() {
        assert_eq!(format_clock_time(1440), "12:00 am");
        assert_eq!(format_clock_time(1455), "12:15 am");
        assert_eq!(format_clock_time(1440 * 2 + 61), "1:01 am");
        assert_eq!(format_clock_time(-5), "11:55 pm");
    }

    #[test]
    fn test_midpoint_rounds_toward_earlier() {
        assert_eq!(midpoint(735, 1062), 898);
        assert_eq!(midpoint(1062, 1455), 1258);
        assert_eq!(midpoint(10, 10), 10);
        assert_eq!(midpoint(10, 11), 10);
    }

    #[test]
    fn test_midpoint_does_not_wrap() {
        // Caller forgot the cross-midnight adjustment: result lands before `a`.
        assert_eq!(midpoint(1062, 15), 538);
    }

    #[test]
    fn test_add_minutes_is_unreduced() {
        assert_eq!(add_minutes(1430, 20), 1450);
        assert_eq!(add_minutes(10, -20), -10);
    }

    #[test]
    fn test_minutes_of_discards_seconds() {
        let time = NaiveTime::from_hms_opt(12, 20, 59).unwrap();
        assert_eq!(minutes_of(time), 740);
    }

    #[test]
    fn test_clean_time_string() {
        assert_eq!(clean_time_string("06:48↑(101°)"), Some("06:48"));
        assert_eq!(clean_time_string("  17:42 ↑ (259°)"), Some("17:42"));
        assert_eq!(clean_time_string("05:35"), Some("05:35"));
        assert_eq!(clean_time_string("-"), None);
        assert_eq!(clean_time_string("5:42 pm"), Some("5:42 pm"));
        assert_eq!(clean_time_string("6:48AM↑(101°)"), Some("6:48AM"));
        assert_eq!(clean_time_string("12:15 (26.2°)"), Some("12:15"));
        assert_eq!(clean_time_string("17:42 amber"), Some("17:42"));
        assert_eq!(clean_time_string(""), None);
    }
}
