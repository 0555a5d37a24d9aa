//! Raw configuration schema (as parsed from TOML)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw configuration as parsed from TOML
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawConfig {
    /// Config schema version
    pub config_version: u32,

    /// Nextcloud Polls connection
    pub nextcloud: RawNextcloudConfig,

    /// Telegram bot settings
    #[serde(default)]
    pub telegram: RawTelegramConfig,

    /// Poll maintenance settings
    #[serde(default)]
    pub schedule: RawScheduleConfig,

    /// Which chat talks about which poll
    #[serde(default)]
    pub channels: Vec<RawChannel>,
}

/// Nextcloud server and credentials
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawNextcloudConfig {
    /// Base URL, e.g. `https://cloud.example.org`
    pub server: String,

    pub username: String,

    /// App password. Falls back to `NEXTCLOUD_TOKEN` when absent.
    pub token: Option<String>,
}

/// Telegram bot settings
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawTelegramConfig {
    /// Bot token. Falls back to `TELEGRAM_TOKEN` when absent.
    pub token: Option<String>,

    /// Message ledger location (default: data dir)
    pub database_path: Option<PathBuf>,

    /// Long-poll timeout for getUpdates
    pub long_poll_seconds: Option<u64>,
}

/// Poll maintenance settings
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawScheduleConfig {
    /// Friday/Saturday pairs added by /extendpoll
    pub extend_count: Option<u32>,

    /// Derive "no" votes from the voter total (default true)
    pub derive_no_votes: Option<bool>,
}

/// Chat to poll mapping
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawChannel {
    pub chat_id: i64,
    pub poll_id: i64,
}
