//! Small helpers shared by the configuration layer and the host binary.

use chrono::{DateTime, NaiveDateTime, Utc};
use chrono_tz::Tz;
use std::path::Path;

/// Render a path for log output, shortening the home directory to `~`.
///
/// # Examples
/// ```
/// use abadaat::utils::path_for_display;
/// use std::path::Path;
/// assert_eq!(path_for_display(Path::new("/etc/abadaat.toml")), "/etc/abadaat.toml");
/// ```
pub fn path_for_display(path: &Path) -> String {
    if let Some(home) = dirs::home_dir() {
        if let Ok(rest) = path.strip_prefix(&home) {
            return format!("~/{}", rest.display());
        }
    }
    path.display().to_string()
}

/// The current wall-clock date and time in `zone`.
pub fn now_in(zone: Tz) -> NaiveDateTime {
    local_time_of(Utc::now(), zone)
}

/// Convert a UTC instant into the civil time of `zone`.
pub fn local_time_of(instant: DateTime<Utc>, zone: Tz) -> NaiveDateTime {
    instant.with_timezone(&zone).naive_local()
}
