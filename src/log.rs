//! Initialisation of the program logger.
//!
//! Messages go to the console (coloured when attached to a terminal) and, when an output folder is
//! in use, to a pair of log files within it. Informational messages go to stdout and
//! `ecostat_info.log`; warnings and errors go to stderr and `ecostat_error.log`.
use anyhow::{Context, Result, bail};
use chrono::Local;
use fern::colors::{Color, ColoredLevelConfig};
use fern::{Dispatch, FormatCallback};
use log::{LevelFilter, Record};
use std::env;
use std::fmt::{Arguments, Display};
use std::fs::File;
use std::io::IsTerminal;
use std::path::Path;
use std::str::FromStr;
use std::sync::OnceLock;

/// A flag indicating whether the logger has been initialised
static LOGGER_INIT: OnceLock<()> = OnceLock::new();

/// The environment variable used to override the log level
pub const LOG_LEVEL_ENV_VAR: &str = "ECOSTAT_LOG_LEVEL";

/// The default log level for the program.
///
/// Used as a fallback if the user hasn't specified something else with the `ECOSTAT_LOG_LEVEL`
/// environment variable or the settings.toml file.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// The file name for the log file containing informational messages
pub(crate) const LOG_INFO_FILE_NAME: &str = "ecostat_info.log";

/// The file name for the log file containing warnings and error messages
pub(crate) const LOG_ERROR_FILE_NAME: &str = "ecostat_error.log";

/// Whether the program logger has been initialised
pub fn is_logger_initialised() -> bool {
    LOGGER_INIT.get().is_some()
}

/// Work out which log level to use.
///
/// The `ECOSTAT_LOG_LEVEL` environment variable takes precedence over the level from the
/// settings file, which in turn takes precedence over [`DEFAULT_LOG_LEVEL`].
fn get_log_level(log_level_from_settings: Option<&str>) -> Result<LevelFilter> {
    let log_level = env::var(LOG_LEVEL_ENV_VAR).unwrap_or_else(|_| {
        log_level_from_settings
            .unwrap_or(DEFAULT_LOG_LEVEL)
            .to_string()
    });

    match LevelFilter::from_str(log_level.trim()) {
        Ok(level) => Ok(level),
        Err(_) => bail!("Unknown log level: {log_level}"),
    }
}

/// Initialise the program logger.
///
/// Possible log level options are `off`, `error`, `warn`, `info`, `debug` and `trace`.
///
/// # Arguments
///
/// * `log_level_from_settings`: The log level specified in `settings.toml`
/// * `log_file_dir`: The folder to save log files in (if Some, log files will be created)
pub fn init(log_level_from_settings: Option<&str>, log_file_dir: Option<&Path>) -> Result<()> {
    let log_level = get_log_level(log_level_from_settings)?;

    let colours = ColoredLevelConfig::new()
        .error(Color::Red)
        .warn(Color::Yellow)
        .info(Color::Green)
        .debug(Color::Blue)
        .trace(Color::Magenta);
    let use_colour_stdout = std::io::stdout().is_terminal();
    let use_colour_stderr = std::io::stderr().is_terminal();

    let mut dispatch = Dispatch::new()
        .chain(
            // Informational messages to stdout
            Dispatch::new()
                .filter(|metadata| metadata.level() > LevelFilter::Warn)
                .format(move |out, message, record| {
                    write_log_colour(out, message, record, use_colour_stdout, &colours);
                })
                .level(log_level)
                .chain(std::io::stdout()),
        )
        .chain(
            // Warnings and errors to stderr
            Dispatch::new()
                .format(move |out, message, record| {
                    write_log_colour(out, message, record, use_colour_stderr, &colours);
                })
                .level(log_level.min(LevelFilter::Warn))
                .chain(std::io::stderr()),
        );

    if let Some(log_file_dir) = log_file_dir {
        let new_log_file = |file_name: &str| {
            let file_path = log_file_dir.join(file_name);
            File::create(&file_path)
                .with_context(|| format!("Could not create log file {}", file_path.display()))
        };

        dispatch = dispatch
            .chain(
                Dispatch::new()
                    .filter(|metadata| metadata.level() > LevelFilter::Warn)
                    .format(write_log_plain)
                    .level(log_level.max(LevelFilter::Info))
                    .chain(new_log_file(LOG_INFO_FILE_NAME)?),
            )
            .chain(
                Dispatch::new()
                    .format(write_log_plain)
                    .level(LevelFilter::Warn)
                    .chain(new_log_file(LOG_ERROR_FILE_NAME)?),
            );
    }

    dispatch.apply().context("Logger already initialised")?;
    LOGGER_INIT.get_or_init(|| ());

    Ok(())
}

/// Write a single log message with a timestamp, level and source
fn write_log<T: Display>(out: FormatCallback, level: T, target: &str, message: &Arguments) {
    let timestamp = Local::now().format("%H:%M:%S");

    out.finish(format_args!("[{timestamp} {level} {target}] {message}"));
}

/// Write to the log with no colours
fn write_log_plain(out: FormatCallback, message: &Arguments, record: &Record) {
    write_log(out, record.level(), record.target(), message);
}

/// Write to the log with optional colours
fn write_log_colour(
    out: FormatCallback,
    message: &Arguments,
    record: &Record,
    use_colour: bool,
    colours: &ColoredLevelConfig,
) {
    if use_colour {
        write_log(out, colours.color(record.level()), record.target(), message);
    } else {
        write_log_plain(out, message, record);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Some("warn"), LevelFilter::Warn)]
    #[case(Some("DEBUG"), LevelFilter::Debug)]
    #[case(Some("off"), LevelFilter::Off)]
    #[case(None, LevelFilter::Info)]
    fn test_get_log_level(#[case] from_settings: Option<&str>, #[case] expected: LevelFilter) {
        // NB: assumes the environment variable isn't set when running tests
        if env::var(LOG_LEVEL_ENV_VAR).is_ok() {
            return;
        }

        assert_eq!(get_log_level(from_settings).unwrap(), expected);
    }

    #[test]
    fn test_get_log_level_unknown() {
        if env::var(LOG_LEVEL_ENV_VAR).is_ok() {
            return;
        }

        assert_eq!(
            get_log_level(Some("loud")).unwrap_err().to_string(),
            "Unknown log level: loud"
        );
    }
}
