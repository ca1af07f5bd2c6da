/*
 * Demo host for the player info bar: a resizable frame window with the bar
 * docked at its bottom edge, showing a few lines of media information.
 *
 * Keys: C clears all lines, R restores them, F11 toggles the simulated full
 * screen state (the bar then stops forwarding window drags).
 */

#[cfg(target_os = "windows")]
mod demo_frame;

use player_info_bar::core::{ConfigManagerOperations, CoreConfigManager};
use player_info_bar::info_bar::InfoBarConfig;
use player_info_bar::logging::initialize_logging;

use simplelog::LevelFilter;

const APP_NAME: &str = "PlayerInfoBar";

fn load_config() -> InfoBarConfig {
    let config_manager = CoreConfigManager::new();
    match config_manager.load_info_bar_config(APP_NAME) {
        Ok(config) => config,
        Err(e) => {
            log::error!("Main: Failed to load info bar config, using defaults: {e}");
            InfoBarConfig::default()
        }
    }
}

#[cfg(target_os = "windows")]
fn main() {
    initialize_logging(APP_NAME, LevelFilter::Debug);
    log::info!("Main: Starting {APP_NAME} demo");

    let config = load_config();
    if let Err(e) = demo_frame::run(config) {
        log::error!("Main: Demo failed: {e}");
        std::process::exit(1);
    }
    log::info!("Main: Demo finished");
}

#[cfg(not(target_os = "windows"))]
fn main() {
    initialize_logging(APP_NAME, LevelFilter::Info);
    let config = load_config();
    log::info!(
        "Main: Loaded info bar config (row height {}, tooltip width {})",
        config.metrics.row_height,
        config.tooltip.max_width
    );
    eprintln!("The {APP_NAME} demo window is only available on Windows.");
}
