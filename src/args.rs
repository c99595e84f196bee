//! Command-line argument parsing and processing.
//!
//! Options that take a value consume the next argument. Bad values and
//! unknown options are reported as warnings and turn the action into
//! [`CliAction::ShowHelpDueToError`].

use chrono::{NaiveDate, NaiveTime};
use std::path::PathBuf;

use crate::clock::parse_minutes;
use crate::logger::Log;

/// Settings for a normal run.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RunOptions {
    pub debug_enabled: bool,
    /// Show this date instead of today.
    pub date: Option<NaiveDate>,
    /// Evaluate statuses at this time instead of now.
    pub at: Option<NaiveTime>,
    pub config_path: Option<PathBuf>,
    pub watch: bool,
}

#[derive(Debug, PartialEq)]
pub enum CliAction {
    Run(RunOptions),
    ListLocations,
    ShowHelp,
    ShowVersion,
    ShowHelpDueToError,
}

pub struct ParsedArgs {
    pub action: CliAction,
}

impl ParsedArgs {
    /// Parse arguments; the first item is the program name and is skipped.
    pub fn parse<I, S>(args: I) -> ParsedArgs
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut options = RunOptions::default();
        let mut display_help = false;
        let mut display_version = false;
        let mut list_locations = false;
        let mut unknown_arg_found = false;

        let args_vec: Vec<String> = args
            .into_iter()
            .skip(1)
            .map(|s| s.as_ref().to_string())
            .collect();

        let mut i = 0;
        while i < args_vec.len() {
            let arg_str = args_vec[i].as_str();
            match arg_str {
                "--help" | "-h" => display_help = true,
                "--version" | "-V" | "-v" => display_version = true,
                "--debug" | "-d" => options.debug_enabled = true,
                "--watch" | "-w" => options.watch = true,
                "--locations" | "-l" => list_locations = true,
                "--date" | "-D" | "--at" | "-a" | "--config" | "-c" => {
                    let Some(value) = args_vec.get(i + 1) else {
                        Log::log_warning(&format!("Missing value for {}", arg_str));
                        unknown_arg_found = true;
                        i += 1;
                        continue;
                    };
                    match arg_str {
                        "--date" | "-D" => match NaiveDate::parse_from_str(value, "%Y-%m-%d") {
                            Ok(date) => options.date = Some(date),
                            Err(_) => {
                                Log::log_warning(&format!(
                                    "Invalid date: {} (expected YYYY-MM-DD)",
                                    value
                                ));
                                unknown_arg_found = true;
                            }
                        },
                        "--at" | "-a" => match parse_time_arg(value) {
                            Some(time) => options.at = Some(time),
                            None => {
                                Log::log_warning(&format!(
                                    "Invalid time: {} (expected HH:MM or H:MM am/pm)",
                                    value
                                ));
                                unknown_arg_found = true;
                            }
                        },
                        _ => options.config_path = Some(PathBuf::from(value)),
                    }
                    i += 1; // Skip the consumed value
                }
                _ => {
                    if arg_str.starts_with('-') {
                        Log::log_warning(&format!("Unknown option: {}", arg_str));
                        unknown_arg_found = true;
                    }
                    // Non-option arguments are ignored
                }
            }
            i += 1;
        }

        let action = if display_version {
            CliAction::ShowVersion
        } else if unknown_arg_found {
            CliAction::ShowHelpDueToError
        } else if display_help {
            CliAction::ShowHelp
        } else if list_locations {
            CliAction::ListLocations
        } else {
            CliAction::Run(options)
        };

        ParsedArgs { action }
    }

    pub fn from_env() -> ParsedArgs {
        Self::parse(std::env::args())
    }
}

fn parse_time_arg(value: &str) -> Option<NaiveTime> {
    let minutes = parse_minutes(value).ok()?;
    NaiveTime::from_hms_opt((minutes / 60) as u32, (minutes % 60) as u32, 0)
}

pub fn display_version_info() {
    Log::log_version();
    Log::log_pipe();
    println!("┗ {}", env!("CARGO_PKG_DESCRIPTION"));
}

pub fn display_help() {
    Log::log_version();
    Log::log_block_start(env!("CARGO_PKG_DESCRIPTION"));
    Log::log_block_start("Usage: abadaat [OPTIONS]");
    Log::log_block_start("Options:");
    Log::log_indented("-a, --at <HH:MM>          Evaluate prayer status at this time");
    Log::log_indented("-c, --config <PATH>       Use this configuration file");
    Log::log_indented("-d, --debug               Enable detailed debug output");
    Log::log_indented("-D, --date <YYYY-MM-DD>   Show prayer times for this date");
    Log::log_indented("-h, --help                Print help information");
    Log::log_indented("-l, --locations           List built-in locations");
    Log::log_indented("-V, --version             Print version information");
    Log::log_indented("-w, --watch               Keep refreshing until interrupted");
    Log::log_end();
}
