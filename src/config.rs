//! Configuration loading, validation and default generation.
//!
//! The configuration lives at `$XDG_CONFIG_HOME/abadaat/abadaat.toml` and is
//! created with commented defaults the first time it is needed:
//!
//! ```toml
//! location = "milton-keynes"   # Built-in table, a static city, or any name with reference_table
//! timezone = "Europe/London"   # IANA zone used to read the current time
//! exact_date = false           # true: a date missing from the table is an error
//! refresh_interval = 1         # Seconds between --watch refreshes
//! # reference_table = "sun.csv" # Optional .csv or .toml sun table
//! ```
//!
//! A relative `reference_table` is resolved against the directory holding the
//! configuration file.

use anyhow::{Context, Result};
use chrono_tz::Tz;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants::*;
use crate::locations::is_known_city;
use crate::logger::Log;
use crate::reference::ReferenceTable;
use crate::utils::path_for_display;

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Location identifier, e.g. `milton-keynes` or `cairo`.
    pub location: Option<String>,
    pub timezone: Option<String>,
    pub reference_table: Option<PathBuf>,
    pub exact_date: Option<bool>,
    pub refresh_interval: Option<u64>, // seconds
}

impl Default for Config {
    fn default() -> Self {
        Self {
            location: Some(DEFAULT_LOCATION.to_string()),
            timezone: Some(DEFAULT_TIMEZONE.to_string()),
            reference_table: None,
            exact_date: Some(DEFAULT_EXACT_DATE),
            refresh_interval: Some(DEFAULT_REFRESH_INTERVAL),
        }
    }
}

impl Config {
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().context("Could not determine config directory")?;
        Ok(config_dir.join("abadaat").join("abadaat.toml"))
    }

    /// Write a commented default configuration to `path`.
    pub fn create_default_config(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory {}", parent.display())
            })?;
        }

        let content = ConfigBuilder::new()
            .add_section("Location")
            .add_setting(
                "location",
                &format!("\"{}\"", DEFAULT_LOCATION),
                "Built-in table, a static city, or any name with reference_table",
            )
            .add_setting(
                "timezone",
                &format!("\"{}\"", DEFAULT_TIMEZONE),
                "IANA zone used to read the current time",
            )
            .add_section("Reference data")
            .add_setting(
                "exact_date",
                &DEFAULT_EXACT_DATE.to_string(),
                "true: a date missing from the table is an error, false: use the nearest day",
            )
            .add_comment("reference_table = \"sun.csv\"  # Optional .csv or .toml sun table")
            .add_section("Display")
            .add_setting(
                "refresh_interval",
                &DEFAULT_REFRESH_INTERVAL.to_string(),
                &format!(
                    "Seconds between --watch refreshes ({}-{})",
                    MINIMUM_REFRESH_INTERVAL, MAXIMUM_REFRESH_INTERVAL
                ),
            )
            .build();

        fs::write(path, content)
            .with_context(|| format!("Failed to write default config to {}", path.display()))?;

        Log::log_decorated(&format!(
            "Created default configuration at {}",
            path_for_display(path)
        ));
        Ok(())
    }

    fn apply_defaults_and_validate_fields(config: &mut Config, config_path: &Path) -> Result<()> {
        if config.location.is_none() {
            config.location = Some(DEFAULT_LOCATION.to_string());
        }
        if config.timezone.is_none() {
            config.timezone = Some(DEFAULT_TIMEZONE.to_string());
        }
        if config.exact_date.is_none() {
            config.exact_date = Some(DEFAULT_EXACT_DATE);
        }

        if let Some(interval) = config.refresh_interval {
            if !(MINIMUM_REFRESH_INTERVAL..=MAXIMUM_REFRESH_INTERVAL).contains(&interval) {
                anyhow::bail!(
                    "refresh_interval must be between {} and {} seconds",
                    MINIMUM_REFRESH_INTERVAL,
                    MAXIMUM_REFRESH_INTERVAL
                );
            }
        } else {
            config.refresh_interval = Some(DEFAULT_REFRESH_INTERVAL);
        }

        if let Some(table) = &config.reference_table {
            if table.is_relative() {
                if let Some(dir) = config_path.parent() {
                    config.reference_table = Some(dir.join(table));
                }
            }
        }

        Ok(())
    }

    /// Load from a specific path. Does not create a file if none exists.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            anyhow::bail!(
                "Configuration file not found at specified path: {}",
                path.display()
            );
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        let mut config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;

        Self::apply_defaults_and_validate_fields(&mut config, path)?;
        validate_config(&config)?;

        Ok(config)
    }

    /// Load the user's configuration, creating the default file first if needed.
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)
                .context("Failed to create default config during load")?;
        }

        Self::load_from_path(&config_path).with_context(|| {
            format!(
                "Failed to load configuration from {}",
                config_path.display()
            )
        })
    }

    pub fn location(&self) -> &str {
        self.location.as_deref().unwrap_or(DEFAULT_LOCATION)
    }

    /// The configured zone. Validated on load, so only a hand-built config can fail here.
    pub fn timezone(&self) -> Result<Tz> {
        let name = self.timezone.as_deref().unwrap_or(DEFAULT_TIMEZONE);
        name.parse::<Tz>()
            .map_err(|e| anyhow::anyhow!("Unknown timezone '{}': {}", name, e))
    }

    pub fn refresh_interval(&self) -> u64 {
        self.refresh_interval.unwrap_or(DEFAULT_REFRESH_INTERVAL)
    }

    pub fn exact_date(&self) -> bool {
        self.exact_date.unwrap_or(DEFAULT_EXACT_DATE)
    }

    /// The astronomical table for this configuration, if there is one:
    /// an explicit `reference_table` file wins over a built-in table.
    pub fn reference_table(&self) -> Result<Option<ReferenceTable>> {
        if let Some(path) = &self.reference_table {
            return ReferenceTable::load_from_path(path, self.location()).map(Some);
        }
        Ok(ReferenceTable::builtin(self.location()))
    }

    pub fn log_config(&self, path: Option<&Path>) {
        if let Some(path) = path {
            Log::log_block_start(&format!(
                "Loaded configuration from {}",
                path_for_display(path)
            ));
        } else {
            Log::log_block_start("Using default configuration");
        }
        Log::log_indented(&format!("Location: {}", self.location()));
        Log::log_indented(&format!(
            "Timezone: {}",
            self.timezone.as_deref().unwrap_or(DEFAULT_TIMEZONE)
        ));
        if let Some(table) = &self.reference_table {
            Log::log_indented(&format!("Reference table: {}", path_for_display(table)));
        }
        Log::log_indented(&format!(
            "Missing dates: {}",
            if self.exact_date() { "error" } else { "use nearest day" }
        ));
    }
}

/// Cross-field checks run after defaults are applied.
pub fn validate_config(config: &Config) -> Result<()> {
    config.timezone()?;

    if let Some(path) = &config.reference_table {
        if !path.exists() {
            anyhow::bail!("Reference table not found: {}", path.display());
        }
    }

    let location = config.location();
    if location.trim().is_empty() {
        anyhow::bail!("location must not be empty");
    }
    if config.reference_table.is_none()
        && ReferenceTable::builtin(location).is_none()
        && !is_known_city(location)
    {
        anyhow::bail!(
            "Unknown location '{}'. Use a built-in location (see --locations) or set reference_table",
            location
        );
    }

    Ok(())
}

/// Builds the default config file with aligned trailing comments.
struct ConfigBuilder {
    entries: Vec<ConfigEntry>,
}

enum ConfigEntry {
    Section(String),
    Setting { line: String, comment: String },
    Comment(String),
}

impl ConfigBuilder {
    fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    fn add_section(mut self, title: &str) -> Self {
        self.entries.push(ConfigEntry::Section(format!("#[{}]", title)));
        self
    }

    fn add_setting(mut self, key: &str, value: &str, comment: &str) -> Self {
        self.entries.push(ConfigEntry::Setting {
            line: format!("{} = {}", key, value),
            comment: format!("# {}", comment),
        });
        self
    }

    fn add_comment(mut self, text: &str) -> Self {
        self.entries.push(ConfigEntry::Comment(format!("# {}", text)));
        self
    }

    fn build(self) -> String {
        let max_width = self
            .entries
            .iter()
            .filter_map(|entry| match entry {
                ConfigEntry::Setting { line, .. } => Some(line.len()),
                _ => None,
            })
            .max()
            .unwrap_or(0)
            + 1;

        let mut result = Vec::new();
        let mut first_section = true;

        for entry in self.entries {
            match entry {
                ConfigEntry::Section(title) => {
                    if !first_section {
                        result.push(String::new());
                    }
                    result.push(title);
                    first_section = false;
                }
                ConfigEntry::Setting { line, comment } => {
                    let padding = " ".repeat(max_width - line.len());
                    result.push(format!("{}{}{}", line, padding, comment));
                }
                ConfigEntry::Comment(text) => result.push(text),
            }
        }

        result.push(String::new());
        result.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::tempdir;

    fn write_config(dir: &Path, content: &str) -> PathBuf {
        let path = dir.join("abadaat.toml");
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    #[serial]
    fn test_config_load_default_creation() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("abadaat").join("abadaat.toml");

        let original = std::env::var("XDG_CONFIG_HOME").ok();
        unsafe {
            std::env::set_var("XDG_CONFIG_HOME", temp_dir.path());
        }

        Log::set_enabled(false);
        let result = Config::load();
        Log::set_enabled(true);

        unsafe {
            match original {
                Some(val) => std::env::set_var("XDG_CONFIG_HOME", val),
                None => std::env::remove_var("XDG_CONFIG_HOME"),
            }
        }

        let config = result.unwrap();
        assert!(config_path.exists());
        assert_eq!(config.location(), DEFAULT_LOCATION);
        assert_eq!(config.refresh_interval(), DEFAULT_REFRESH_INTERVAL);
    }

    #[test]
    fn test_default_config_file_round_trips() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("nested").join("abadaat.toml");

        Log::set_enabled(false);
        Config::create_default_config(&path).unwrap();
        Log::set_enabled(true);

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("location = \"milton-keynes\""));
        assert!(content.contains("# reference_table"));

        let config = Config::load_from_path(&path).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_config_defaults_applied() {
        let temp_dir = tempdir().unwrap();
        let path = write_config(temp_dir.path(), "");
        let config = Config::load_from_path(&path).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.timezone().unwrap(), chrono_tz::Europe::London);
    }

    #[test]
    fn test_config_static_city() {
        let temp_dir = tempdir().unwrap();
        let path = write_config(
            temp_dir.path(),
            "location = \"cairo\"\ntimezone = \"Africa/Cairo\"\n",
        );
        let config = Config::load_from_path(&path).unwrap();
        assert_eq!(config.location(), "cairo");
        assert!(config.reference_table().unwrap().is_none());
    }

    #[test]
    fn test_config_rejects_unknown_location() {
        let temp_dir = tempdir().unwrap();
        let path = write_config(temp_dir.path(), "location = \"atlantis\"\n");
        let err = Config::load_from_path(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("Unknown location 'atlantis'"));
    }

    #[test]
    fn test_config_rejects_bad_timezone() {
        let temp_dir = tempdir().unwrap();
        let path = write_config(temp_dir.path(), "timezone = \"Mars/Olympus_Mons\"\n");
        assert!(Config::load_from_path(&path).is_err());
    }

    #[test]
    fn test_config_refresh_interval_limits() {
        let temp_dir = tempdir().unwrap();
        for (value, ok) in [(0, false), (1, true), (60, true), (61, false)] {
            let path = write_config(temp_dir.path(), &format!("refresh_interval = {}\n", value));
            assert_eq!(
                Config::load_from_path(&path).is_ok(),
                ok,
                "refresh_interval = {}",
                value
            );
        }
    }

    #[test]
    fn test_config_relative_reference_table() {
        let temp_dir = tempdir().unwrap();
        fs::write(
            temp_dir.path().join("sun.csv"),
            "date,sunrise,sunset,solar_noon,nautical_twilight_start,nautical_twilight_end\n\
             2025-03-01,06:55,17:41,12:18,05:39,18:57\n",
        )
        .unwrap();
        let path = write_config(
            temp_dir.path(),
            "location = \"leeds\"\nreference_table = \"sun.csv\"\n",
        );

        let config = Config::load_from_path(&path).unwrap();
        assert_eq!(config.reference_table, Some(temp_dir.path().join("sun.csv")));

        let table = config.reference_table().unwrap().unwrap();
        assert_eq!(table.location, "leeds");
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_config_missing_reference_table() {
        let temp_dir = tempdir().unwrap();
        let path = write_config(temp_dir.path(), "reference_table = \"nope.csv\"\n");
        let err = Config::load_from_path(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("Reference table not found"));
    }

    #[test]
    fn test_config_malformed_toml() {
        let temp_dir = tempdir().unwrap();
        let path = write_config(temp_dir.path(), "location = [unterminated");
        assert!(Config::load_from_path(&path).is_err());
    }

    #[test]
    fn test_config_missing_file() {
        let temp_dir = tempdir().unwrap();
        assert!(Config::load_from_path(&temp_dir.path().join("absent.toml")).is_err());
    }
}
