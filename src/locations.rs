//! Fixed prayer times for locations without an astronomical table.
//!
//! These are static per-city values; nothing is derived from sun data. An
//! unknown city resolves to London. Each city's sunset sits 20 minutes before
//! its Maghrib and its solar midnight 12 hours after its Dhuhr, the same
//! relations the deriver uses.

use crate::prayer_times::PrayerTimeSet;
use crate::reference::StaticTimes;

/// A country/city identifier pair, both lowercase and hyphenated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub country: &'static str,
    pub city: &'static str,
}

const CITY_TABLE: &[(Location, StaticTimes)] = &[
    (
        Location { country: "uk", city: "london" },
        StaticTimes {
            fajr: "5:15 am",
            sunrise: "6:45 am",
            dhuhr: "12:30 pm",
            asr: "3:45 pm",
            sunset: "6:30 pm",
            maghrib: "6:50 pm",
            isha: "8:00 pm",
            solar_midnight: "12:30 am",
        },
    ),
    (
        Location { country: "usa", city: "new-york" },
        StaticTimes {
            fajr: "5:30 am",
            sunrise: "7:00 am",
            dhuhr: "12:15 pm",
            asr: "3:30 pm",
            sunset: "6:50 pm",
            maghrib: "7:10 pm",
            isha: "8:30 pm",
            solar_midnight: "12:15 am",
        },
    ),
    (
        Location { country: "saudi-arabia", city: "mecca" },
        StaticTimes {
            fajr: "4:45 am",
            sunrise: "6:15 am",
            dhuhr: "12:10 pm",
            asr: "3:15 pm",
            sunset: "6:10 pm",
            maghrib: "6:30 pm",
            isha: "7:45 pm",
            solar_midnight: "12:10 am",
        },
    ),
    (
        Location { country: "pakistan", city: "karachi" },
        StaticTimes {
            fajr: "5:00 am",
            sunrise: "6:30 am",
            dhuhr: "12:20 pm",
            asr: "4:00 pm",
            sunset: "6:25 pm",
            maghrib: "6:45 pm",
            isha: "8:15 pm",
            solar_midnight: "12:20 am",
        },
    ),
    (
        Location { country: "india", city: "mumbai" },
        StaticTimes {
            fajr: "5:10 am",
            sunrise: "6:40 am",
            dhuhr: "12:25 pm",
            asr: "3:55 pm",
            sunset: "6:35 pm",
            maghrib: "6:55 pm",
            isha: "8:20 pm",
            solar_midnight: "12:25 am",
        },
    ),
    (
        Location { country: "turkey", city: "istanbul" },
        StaticTimes {
            fajr: "5:20 am",
            sunrise: "6:50 am",
            dhuhr: "12:35 pm",
            asr: "3:50 pm",
            sunset: "6:45 pm",
            maghrib: "7:05 pm",
            isha: "8:25 pm",
            solar_midnight: "12:35 am",
        },
    ),
    (
        Location { country: "egypt", city: "cairo" },
        StaticTimes {
            fajr: "4:50 am",
            sunrise: "6:20 am",
            dhuhr: "12:05 pm",
            asr: "3:40 pm",
            sunset: "6:15 pm",
            maghrib: "6:35 pm",
            isha: "7:50 pm",
            solar_midnight: "12:05 am",
        },
    ),
    (
        Location { country: "malaysia", city: "kuala-lumpur" },
        StaticTimes {
            fajr: "5:25 am",
            sunrise: "6:55 am",
            dhuhr: "12:40 pm",
            asr: "4:05 pm",
            sunset: "6:55 pm",
            maghrib: "7:15 pm",
            isha: "8:35 pm",
            solar_midnight: "12:40 am",
        },
    ),
    (
        Location { country: "indonesia", city: "jakarta" },
        StaticTimes {
            fajr: "5:05 am",
            sunrise: "6:35 am",
            dhuhr: "12:15 pm",
            asr: "3:35 pm",
            sunset: "6:20 pm",
            maghrib: "6:40 pm",
            isha: "8:05 pm",
            solar_midnight: "12:15 am",
        },
    ),
    (
        Location { country: "canada", city: "toronto" },
        StaticTimes {
            fajr: "5:35 am",
            sunrise: "7:05 am",
            dhuhr: "12:45 pm",
            asr: "4:10 pm",
            sunset: "7:00 pm",
            maghrib: "7:20 pm",
            isha: "8:40 pm",
            solar_midnight: "12:45 am",
        },
    ),
];

const DEFAULT_CITY: &str = "london";

/// Every city with a static table.
pub fn default_locations() -> Vec<Location> {
    CITY_TABLE.iter().map(|(location, _)| *location).collect()
}

pub fn is_known_city(city: &str) -> bool {
    CITY_TABLE.iter().any(|(location, _)| location.city == city)
}

/// Static times for a city; unknown cities get London's.
pub fn static_times_for(city: &str) -> PrayerTimeSet {
    CITY_TABLE
        .iter()
        .find(|(location, _)| location.city == city)
        .or_else(|| CITY_TABLE.iter().find(|(location, _)| location.city == DEFAULT_CITY))
        .map_or_else(PrayerTimeSet::fallback, |(_, times)| times.to_time_set())
}
