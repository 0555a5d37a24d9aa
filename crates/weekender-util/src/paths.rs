//! Default paths for weekender components
//!
//! Paths are user-writable by default (no root required):
//! - Config: `$XDG_CONFIG_HOME/weekender/config.toml` or `~/.config/weekender/config.toml`
//! - Data: `$XDG_DATA_HOME/weekender` or `~/.local/share/weekender`

use std::path::PathBuf;

/// Environment variable for overriding the config file path
pub const WEEKENDER_CONFIG_ENV: &str = "WEEKENDER_CONFIG";

/// Environment variable for overriding the data directory
pub const WEEKENDER_DATA_DIR_ENV: &str = "WEEKENDER_DATA_DIR";

/// Application subdirectory name
const APP_DIR: &str = "weekender";

/// Ledger database filename within the data directory
pub const LEDGER_FILENAME: &str = "messages.db";

/// Get the default config file path.
///
/// Order of precedence:
/// 1. `$XDG_CONFIG_HOME/weekender/config.toml`
/// 2. `~/.config/weekender/config.toml`
/// 3. `/etc/weekender/config.toml`
pub fn default_config_path() -> PathBuf {
    if let Ok(config_home) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(config_home).join(APP_DIR).join("config.toml");
    }

    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home)
            .join(".config")
            .join(APP_DIR)
            .join("config.toml");
    }

    PathBuf::from("/etc").join(APP_DIR).join("config.toml")
}

/// Get the default data directory.
///
/// Order of precedence:
/// 1. `$WEEKENDER_DATA_DIR` environment variable (if set)
/// 2. `$XDG_DATA_HOME/weekender` (if XDG_DATA_HOME is set)
/// 3. `~/.local/share/weekender` (fallback)
pub fn default_data_dir() -> PathBuf {
    if let Ok(path) = std::env::var(WEEKENDER_DATA_DIR_ENV) {
        return PathBuf::from(path);
    }

    data_dir_without_env()
}

fn data_dir_without_env() -> PathBuf {
    if let Ok(data_home) = std::env::var("XDG_DATA_HOME") {
        return PathBuf::from(data_home).join(APP_DIR);
    }

    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home)
            .join(".local")
            .join("share")
            .join(APP_DIR);
    }

    PathBuf::from("/tmp").join(APP_DIR).join("data")
}

/// Default location of the message ledger database
pub fn default_ledger_path() -> PathBuf {
    default_data_dir().join(LEDGER_FILENAME)
}
