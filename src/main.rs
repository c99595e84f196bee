use anyhow::Result;
use chrono::{NaiveDate, NaiveTime};
use chrono_tz::Tz;
use signal_hook::{
    consts::signal::{SIGINT, SIGTERM},
    iterator::Signals,
};
use std::{
    path::PathBuf,
    sync::Arc,
    sync::atomic::{AtomicBool, Ordering},
    thread,
    time::Duration,
};

use abadaat::args::{CliAction, ParsedArgs, RunOptions, display_help, display_version_info};
use abadaat::constants::{CHECK_INTERVAL_MS, EXIT_FAILURE};
use abadaat::display::log_board;
use abadaat::locations::default_locations;
use abadaat::schedule::{NextPrayer, PrayerStatus, next_prayer, status_board};
use abadaat::utils::now_in;
use abadaat::{Config, DailyTimes, Log, PrayerSource, ReferenceTable};

fn main() -> Result<()> {
    match ParsedArgs::from_env().action {
        CliAction::ShowVersion => display_version_info(),
        CliAction::ShowHelp => display_help(),
        CliAction::ShowHelpDueToError => {
            display_help();
            std::process::exit(EXIT_FAILURE);
        }
        CliAction::ListLocations => list_locations(),
        CliAction::Run(options) => run(options)?,
    }
    Ok(())
}

fn list_locations() {
    Log::log_version();
    Log::log_block_start("Astronomical tables:");
    let table = ReferenceTable::milton_keynes();
    Log::log_indented(&format!("milton-keynes    {} ({} days)", table.location, table.len()));
    Log::log_block_start("Fixed city times:");
    for location in default_locations() {
        Log::log_indented(&format!("{:<16} {}", location.city, location.country));
    }
    Log::log_end();
}

fn load_config(path: Option<&PathBuf>) -> Result<(Config, Option<PathBuf>)> {
    match path {
        Some(path) => Ok((Config::load_from_path(path)?, Some(path.clone()))),
        None => Ok((Config::load()?, Config::get_config_path().ok())),
    }
}

fn run(options: RunOptions) -> Result<()> {
    Log::set_debug(options.debug_enabled);
    Log::log_version();

    let (config, config_path) = load_config(options.config_path.as_ref())?;
    config.log_config(config_path.as_deref());

    let zone = config.timezone()?;
    let source = PrayerSource::from_config(&config)?;

    if options.watch {
        watch(&source, zone, &options, config.refresh_interval())?;
    } else {
        let (date, now) = resolve_now(zone, &options);
        let daily = source.times_for(date);
        log_board(source.location_label(), &daily, now);
    }

    Log::log_end();
    Ok(())
}

/// The date and time to evaluate, honoring `--date` and `--at`.
fn resolve_now(zone: Tz, options: &RunOptions) -> (NaiveDate, NaiveTime) {
    let now = now_in(zone);
    (
        options.date.unwrap_or(now.date()),
        options.at.unwrap_or(now.time()),
    )
}

/// Redraw the board whenever the next prayer or any status changes.
fn watch(source: &PrayerSource, zone: Tz, options: &RunOptions, interval_secs: u64) -> Result<()> {
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();

    let mut signals = Signals::new([SIGTERM, SIGINT])?;
    thread::spawn(move || {
        if let Some(signal) = signals.forever().next() {
            Log::log_pipe();
            Log::log_info(&format!("Shutdown signal received: {:?}", signal));
            r.store(false, Ordering::SeqCst);
        }
    });

    let mut daily: Option<DailyTimes> = None;
    let mut last_seen: Option<(NextPrayer, Vec<PrayerStatus>)> = None;
    let mut initial_render = true;

    while running.load(Ordering::SeqCst) {
        let (date, now) = resolve_now(zone, options);

        if daily.as_ref().is_none_or(|d| d.date != date) {
            daily = Some(source.times_for(date));
            last_seen = None;
        }
        let Some(today) = daily.as_ref() else {
            break;
        };

        let next = next_prayer(&today.times, now);
        let statuses: Vec<PrayerStatus> = status_board(&today.times, now)
            .into_iter()
            .map(|entry| entry.status)
            .collect();

        let changed = last_seen
            .as_ref()
            .is_none_or(|(prev_next, prev_statuses)| *prev_next != next || *prev_statuses != statuses);
        if changed {
            let next_changed = last_seen.as_ref().is_some_and(|(prev_next, _)| *prev_next != next);
            if next_changed && !initial_render {
                Log::log_block_start(&format!("Next prayer is now {}", next));
            }
            initial_render = false;
            log_board(source.location_label(), today, now);
            last_seen = Some((next, statuses));
        }

        // Sleep in short chunks so a shutdown signal is noticed promptly.
        let total = Duration::from_secs(interval_secs);
        let chunk = Duration::from_millis(CHECK_INTERVAL_MS);
        let mut slept = Duration::ZERO;
        while slept < total && running.load(Ordering::SeqCst) {
            thread::sleep(chunk);
            slept += chunk;
        }
    }

    Ok(())
}
