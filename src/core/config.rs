/*
 * Persists the info bar settings (`InfoBarConfig`) as JSON in the user's
 * local configuration directory. A missing or empty file is not an error;
 * the built-in defaults are returned instead, and any field absent from the
 * file keeps its default value.
 *
 * `ConfigManagerOperations` is the seam used by the application so tests and
 * alternative storage can replace the file-backed `CoreConfigManager`.
 */
use crate::core::path_utils;
use crate::info_bar::InfoBarConfig;

use std::fs;
use std::io;
use std::path::PathBuf;

pub const INFO_BAR_CONFIG_FILENAME: &str = "info_bar.json";

#[derive(Debug)]
pub enum ConfigError {
    Io(io::Error),
    NoProjectDirectory,
    Utf8Error(std::string::FromUtf8Error),
    Json(serde_json::Error),
}

impl From<io::Error> for ConfigError {
    fn from(err: io::Error) -> Self {
        ConfigError::Io(err)
    }
}

impl From<std::string::FromUtf8Error> for ConfigError {
    fn from(err: std::string::FromUtf8Error) -> Self {
        ConfigError::Utf8Error(err)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Json(err)
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "Configuration I/O error: {e}"),
            ConfigError::NoProjectDirectory => {
                write!(f, "Could not determine project directory for configuration")
            }
            ConfigError::Utf8Error(e) => write!(f, "Configuration file UTF-8 error: {e}"),
            ConfigError::Json(e) => write!(f, "Configuration file is not valid JSON: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Utf8Error(e) => Some(e),
            ConfigError::Json(e) => Some(e),
            ConfigError::NoProjectDirectory => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ConfigError>;

pub trait ConfigManagerOperations: Send + Sync {
    fn load_info_bar_config(&self, app_name: &str) -> Result<InfoBarConfig>;
    fn save_info_bar_config(&self, app_name: &str, config: &InfoBarConfig) -> Result<()>;
}

/*
 * File-backed configuration store. By default the file lives in the
 * directory returned by `path_utils::get_base_app_config_local_dir`; a fixed
 * directory can be given instead with `with_config_dir`, in which case the
 * app name no longer affects the location.
 */
#[derive(Debug, Default)]
pub struct CoreConfigManager {
    config_dir: Option<PathBuf>,
}

impl CoreConfigManager {
    pub fn new() -> Self {
        CoreConfigManager { config_dir: None }
    }

    pub fn with_config_dir(config_dir: impl Into<PathBuf>) -> Self {
        CoreConfigManager {
            config_dir: Some(config_dir.into()),
        }
    }

    fn config_file_path(&self, app_name: &str) -> Result<PathBuf> {
        match &self.config_dir {
            Some(dir) => {
                fs::create_dir_all(dir)?;
                Ok(dir.join(INFO_BAR_CONFIG_FILENAME))
            }
            None => path_utils::app_config_file(app_name, INFO_BAR_CONFIG_FILENAME)
                .ok_or(ConfigError::NoProjectDirectory),
        }
    }
}

impl ConfigManagerOperations for CoreConfigManager {
    fn load_info_bar_config(&self, app_name: &str) -> Result<InfoBarConfig> {
        log::trace!("CoreConfigManager: Loading info bar config for app '{app_name}'");
        let file_path = self.config_file_path(app_name)?;

        if !file_path.exists() {
            log::debug!("CoreConfigManager: Config file {file_path:?} does not exist; using defaults.");
            return Ok(InfoBarConfig::default());
        }

        let contents = String::from_utf8(fs::read(&file_path)?)?;
        if contents.trim().is_empty() {
            log::debug!("CoreConfigManager: Config file {file_path:?} is empty; using defaults.");
            return Ok(InfoBarConfig::default());
        }

        let config: InfoBarConfig = serde_json::from_str(&contents)?;
        log::debug!("CoreConfigManager: Loaded info bar config from {file_path:?}.");
        Ok(config)
    }

    fn save_info_bar_config(&self, app_name: &str, config: &InfoBarConfig) -> Result<()> {
        let file_path = self.config_file_path(app_name)?;
        let json = serde_json::to_string_pretty(config)?;
        fs::write(&file_path, json)?;
        log::debug!("CoreConfigManager: Saved info bar config to {file_path:?}.");
        Ok(())
    }
}
