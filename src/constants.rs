//! Application constants and default values for abadaat.
//!
//! This module contains the fixed offsets used by the prayer-time rules,
//! configuration defaults, validation limits and a few operational values.

// ═══ Clock Arithmetic ═══

pub const MINUTES_PER_HOUR: i32 = 60;
pub const MINUTES_PER_DAY: i32 = 24 * MINUTES_PER_HOUR;
pub const HALF_DAY_MINUTES: i32 = 12 * MINUTES_PER_HOUR; // solar noon -> solar midnight

// ═══ Prayer Rules ═══
// Fixed by the method; not configurable.

pub const MAGHRIB_OFFSET_MINUTES: i32 = 20; // after sunset
pub const CURRENT_WINDOW_MINUTES: i32 = 15; // a prayer stays "current" this long

/// Display label used when every prayer of the day has passed.
pub const FAJR_TOMORROW_LABEL: &str = "Fajr (tomorrow)";

// ═══ Application Configuration Defaults ═══

pub const DEFAULT_LOCATION: &str = "milton-keynes";
pub const DEFAULT_LOCATION_DISPLAY: &str = "Milton Keynes, UK";
pub const DEFAULT_TIMEZONE: &str = "Europe/London";
pub const DEFAULT_EXACT_DATE: bool = false;
pub const DEFAULT_REFRESH_INTERVAL: u64 = 1; // seconds

// ═══ Validation Limits ═══

pub const MINIMUM_REFRESH_INTERVAL: u64 = 1; // seconds
pub const MAXIMUM_REFRESH_INTERVAL: u64 = 60; // seconds

// ═══ Operational Timing Constants ═══

pub const CHECK_INTERVAL_MS: u64 = 100; // how often the watch loop checks the running flag

// ═══ Exit Codes ═══

pub const EXIT_FAILURE: i32 = 1;

// ═══ Test Constants ═══
#[cfg(test)]
pub mod test_constants {
    pub const TEST_SUNRISE: &str = "06:48";
    pub const TEST_SUNSET: &str = "17:42";
    pub const TEST_SOLAR_NOON: &str = "12:15";
    pub const TEST_NAUTICAL_START: &str = "05:35";
    pub const TEST_NAUTICAL_END: &str = "18:56";
}
