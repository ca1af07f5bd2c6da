/*
 * Logging setup for the application. Log records go to the terminal at the
 * requested level and, at `Debug`, to a dated file in the app's local config
 * directory, e.g. `player_info_bar_2026-10-16.log`.
 */
use crate::core::path_utils;

use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, LevelFilter, SharedLogger, TermLogger,
    TerminalMode, WriteLogger,
};
use std::fs::OpenOptions;
use std::path::PathBuf;
use time::{Date, OffsetDateTime};

pub fn log_file_name(app_name: &str, date: Date) -> String {
    format!(
        "{app_name}_{:04}-{:02}-{:02}.log",
        date.year(),
        u8::from(date.month()),
        date.day()
    )
}

fn log_config() -> Config {
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_thread_level(LevelFilter::Off)
        .set_target_level(LevelFilter::Error)
        .build()
}

/*
 * Installs the global logger. Returns the path of the log file, or `None` if
 * only terminal logging could be set up. Calling it again after a logger is
 * installed leaves the first logger in place.
 */
pub fn initialize_logging(app_name: &str, level: LevelFilter) -> Option<PathBuf> {
    let config = log_config();
    let mut loggers: Vec<Box<dyn SharedLogger>> = Vec::new();
    loggers.push(TermLogger::new(
        level,
        config.clone(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    ));

    let file_name = log_file_name(app_name, OffsetDateTime::now_utc().date());
    let mut log_path = None;
    if let Some(path) = path_utils::app_config_file(app_name, &file_name) {
        match OpenOptions::new().create(true).append(true).open(&path) {
            Ok(file) => {
                loggers.push(WriteLogger::new(LevelFilter::Debug, config, file));
                log_path = Some(path);
            }
            Err(e) => eprintln!("Logging: Could not open log file {path:?}: {e}"),
        }
    }

    if CombinedLogger::init(loggers).is_err() {
        log::debug!("Logging: A logger is already installed; keeping it");
        return None;
    }
    log::info!("Logging: Initialized for '{app_name}', log file {log_path:?}");
    log_path
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::Month;

    #[test]
    fn test_log_file_name_is_zero_padded() {
        let date = Date::from_calendar_date(2026, Month::March, 7).unwrap();
        assert_eq!(log_file_name("player", date), "player_2026-03-07.log");
    }

    #[test]
    fn test_log_file_name_keeps_app_name() {
        let date = Date::from_calendar_date(2025, Month::December, 31).unwrap();
        assert_eq!(
            log_file_name("player_info_bar", date),
            "player_info_bar_2025-12-31.log"
        );
    }
}
