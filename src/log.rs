//! The `log` module provides initialisation and configuration of the application's logging
//! system.
//!
//! Messages at info level and below go to stdout and warnings and errors go to stderr. When an
//! output directory is given, messages are also written to log files in that folder. The log
//! level can be set in the settings file or overridden with the
//! `BIOGAS_FEASIBILITY_LOG_LEVEL` environment variable.
use anyhow::{Context, Result, anyhow, bail};
use chrono::Local;
use fern::colors::{Color, ColoredLevelConfig};
use fern::{Dispatch, FormatCallback};
use log::{LevelFilter, Record};
use std::env;
use std::fmt::{Arguments, Display};
use std::io::IsTerminal;
use std::path::Path;
use std::sync::Mutex;

/// The default log level for the program.
///
/// Used as a fallback if the user hasn't specified something else with the
/// `BIOGAS_FEASIBILITY_LOG_LEVEL` environment variable or the settings file.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Environment variable which overrides the configured log level
const LOG_LEVEL_ENV_VAR: &str = "BIOGAS_FEASIBILITY_LOG_LEVEL";

/// The file name for the log file containing messages about the ordinary operation of the program
const LOG_INFO_FILE_NAME: &str = "feasibility_info.log";

/// The file name for the log file containing warnings and error messages
const LOG_ERROR_FILE_NAME: &str = "feasibility_error.log";

/// Set once the logger has been installed
static LOGGER_INIT: Mutex<bool> = Mutex::new(false);

/// Whether the program logger has been initialised
pub fn is_logger_initialised() -> bool {
    LOGGER_INIT.lock().is_ok_and(|init| *init)
}

/// Parse a log level string, accepting the names used by the `log` crate (case-insensitive)
fn parse_log_level(level: &str) -> Result<LevelFilter> {
    let Ok(level) = level.trim().parse::<LevelFilter>() else {
        bail!(
            "Unknown log level: {level}. Valid options are: off, error, warn, info, debug, trace"
        );
    };

    Ok(level)
}

/// Initialise the program logger using the `fern` logging library.
///
/// Calling this function more than once has no further effect: the first configuration wins.
///
/// # Arguments
///
/// * `log_level_from_settings`: The log level specified in the settings file
/// * `log_file_path`: The folder in which to save log files, if any
pub fn init(log_level_from_settings: &str, log_file_path: Option<&Path>) -> Result<()> {
    // Held until the logger is installed, so concurrent callers cannot both install one
    let mut initialised = LOGGER_INIT
        .lock()
        .map_err(|_| anyhow!("Logger state poisoned"))?;
    if *initialised {
        return Ok(());
    }

    // The environment variable takes precedence over the settings file
    let log_level = env::var(LOG_LEVEL_ENV_VAR)
        .unwrap_or_else(|_| log_level_from_settings.to_string());
    let log_level = parse_log_level(&log_level)?;

    let stdout_colours = level_colours();
    let stderr_colours = level_colours();
    let stdout_colour = std::io::stdout().is_terminal();
    let stderr_colour = std::io::stderr().is_terminal();

    let mut dispatch = Dispatch::new()
        .chain(
            Dispatch::new()
                .filter(|metadata| metadata.level() > log::Level::Warn)
                .level(log_level)
                .format(move |out, message, record| {
                    if stdout_colour {
                        write_log(out, stdout_colours.color(record.level()), message, record);
                    } else {
                        write_log(out, record.level(), message, record);
                    }
                })
                .chain(std::io::stdout()),
        )
        .chain(
            Dispatch::new()
                .level(log_level.min(LevelFilter::Warn))
                .format(move |out, message, record| {
                    if stderr_colour {
                        write_log(out, stderr_colours.color(record.level()), message, record);
                    } else {
                        write_log(out, record.level(), message, record);
                    }
                })
                .chain(std::io::stderr()),
        );

    if let Some(log_file_path) = log_file_path {
        let info_file = fern::log_file(log_file_path.join(LOG_INFO_FILE_NAME))
            .context("Could not create info log file")?;
        let error_file = fern::log_file(log_file_path.join(LOG_ERROR_FILE_NAME))
            .context("Could not create error log file")?;

        dispatch = dispatch
            .chain(
                Dispatch::new()
                    .level(log_level.max(LevelFilter::Info))
                    .format(|out, message, record| write_log(out, record.level(), message, record))
                    .chain(info_file),
            )
            .chain(
                Dispatch::new()
                    .level(LevelFilter::Warn)
                    .format(|out, message, record| write_log(out, record.level(), message, record))
                    .chain(error_file),
            );
    }

    dispatch.apply().context("Logger already set")?;
    *initialised = true;

    Ok(())
}

/// Colours used for each log level on a terminal
fn level_colours() -> ColoredLevelConfig {
    ColoredLevelConfig::new()
        .error(Color::Red)
        .warn(Color::Yellow)
        .info(Color::Green)
        .debug(Color::Blue)
        .trace(Color::Magenta)
}

/// Write a single log message with a timestamp, level and target
fn write_log<T: Display>(out: FormatCallback, level: T, message: &Arguments, record: &Record) {
    let timestamp = Local::now().format("%H:%M:%S");
    out.finish(format_args!(
        "[{timestamp} {level} {}] {message}",
        record.target()
    ));
}
