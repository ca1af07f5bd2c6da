/*
 * Locates the per-user directory that holds the info bar configuration and
 * the application's log files, creating it on first use.
 */
use directories::ProjectDirs;
use std::fs;
use std::path::PathBuf;

/*
 * Returns the local (non-roaming) configuration directory for `app_name`,
 * e.g. `AppData/Local/<app_name>/config` on Windows. No organization
 * qualifier is used. The directory is created if it is missing; `None` is
 * returned if no home directory is known or creation fails.
 */
pub fn get_base_app_config_local_dir(app_name: &str) -> Option<PathBuf> {
    let proj_dirs = ProjectDirs::from("", "", app_name)?;
    let config_path = proj_dirs.config_local_dir();
    if config_path.is_dir() {
        return Some(config_path.to_path_buf());
    }
    match fs::create_dir_all(config_path) {
        Ok(()) => {
            log::debug!("PathUtils: Created config directory {config_path:?} for '{app_name}'");
            Some(config_path.to_path_buf())
        }
        Err(e) => {
            log::error!("PathUtils: Failed to create config directory {config_path:?}: {e}");
            None
        }
    }
}

/// Path of a file named `file_name` inside the app's config directory.
pub fn app_config_file(app_name: &str, file_name: &str) -> Option<PathBuf> {
    get_base_app_config_local_dir(app_name).map(|dir| dir.join(file_name))
}
