/*
 * This module consolidates the platform-agnostic services of the application
 * that sit next to the info bar: persisting the `InfoBarConfig` and locating
 * the per-user directories used for configuration and log files.
 */
pub mod config;
pub mod path_utils;

// Re-export config related items
pub use config::{ConfigError, ConfigManagerOperations, CoreConfigManager};
