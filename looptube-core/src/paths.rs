//! Path constants for configuration and preference files.

use std::path::PathBuf;

/// The name of the configuration directory under ~/.config/
pub const CONFIG_DIR_NAME: &str = "looptube";

/// The name of the main configuration file
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// The name of the theme preference file (prefixed with . for hidden)
pub const THEME_FILE_NAME: &str = ".theme.json";

/// The name of the log file written when file logging is enabled
pub const LOG_FILE_NAME: &str = "looptube.log";

/// Get the configuration directory path (~/.config/looptube/)
#[must_use]
pub fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join(CONFIG_DIR_NAME)
}

/// Get the config file path (~/.config/looptube/config.toml)
#[must_use]
pub fn config_path() -> PathBuf {
    config_dir().join(CONFIG_FILE_NAME)
}

/// Get the theme preference file path (`~/.config/looptube/.theme.json`)
#[must_use]
pub fn theme_path() -> PathBuf {
    config_dir().join(THEME_FILE_NAME)
}

/// Get the log file path (`~/.config/looptube/looptube.log`)
#[must_use]
pub fn log_file_path() -> PathBuf {
    config_dir().join(LOG_FILE_NAME)
}
