//! Validated settings structures

use crate::schema::{RawChannel, RawConfig, RawNextcloudConfig, RawScheduleConfig, RawTelegramConfig};
use std::path::PathBuf;
use std::time::Duration;
use weekender_util::{ChatId, PollId, default_ledger_path};

/// Environment variable consulted when `nextcloud.token` is absent
pub const NEXTCLOUD_TOKEN_ENV: &str = "NEXTCLOUD_TOKEN";

/// Environment variable consulted when `telegram.token` is absent
pub const TELEGRAM_TOKEN_ENV: &str = "TELEGRAM_TOKEN";

pub const DEFAULT_EXTEND_COUNT: usize = 4;
pub const DEFAULT_LONG_POLL: Duration = Duration::from_secs(30);

/// Validated settings ready for use by the bot
#[derive(Debug, Clone)]
pub struct Settings {
    pub nextcloud: NextcloudSettings,
    pub telegram: TelegramSettings,
    pub schedule: ScheduleSettings,
    pub channels: Vec<Channel>,
}

impl Settings {
    /// Convert from raw config (after validation)
    pub fn from_raw(raw: RawConfig) -> Self {
        Self {
            nextcloud: NextcloudSettings::from_raw(raw.nextcloud),
            telegram: TelegramSettings::from_raw(raw.telegram),
            schedule: ScheduleSettings::from_raw(raw.schedule),
            channels: raw.channels.into_iter().map(Channel::from_raw).collect(),
        }
    }

    /// Fill missing tokens from the environment.
    ///
    /// `lookup` is `std::env::var` in production; tests pass a closure.
    pub fn resolve_secrets(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if self.nextcloud.token.is_none() {
            self.nextcloud.token = lookup(NEXTCLOUD_TOKEN_ENV).filter(|t| !t.is_empty());
        }
        if self.telegram.token.is_none() {
            self.telegram.token = lookup(TELEGRAM_TOKEN_ENV).filter(|t| !t.is_empty());
        }
    }
}

/// Nextcloud Polls connection
#[derive(Debug, Clone)]
pub struct NextcloudSettings {
    /// Server root without trailing slash
    pub server: String,
    pub username: String,
    pub token: Option<String>,
}

impl NextcloudSettings {
    fn from_raw(raw: RawNextcloudConfig) -> Self {
        Self {
            server: raw.server.trim_end_matches('/').to_string(),
            username: raw.username,
            token: raw.token.filter(|t| !t.is_empty()),
        }
    }
}

/// Telegram bot settings
#[derive(Debug, Clone)]
pub struct TelegramSettings {
    pub token: Option<String>,
    pub database_path: PathBuf,
    pub long_poll: Duration,
}

impl TelegramSettings {
    fn from_raw(raw: RawTelegramConfig) -> Self {
        Self {
            token: raw.token.filter(|t| !t.is_empty()),
            database_path: raw.database_path.unwrap_or_else(default_ledger_path),
            long_poll: raw
                .long_poll_seconds
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_LONG_POLL),
        }
    }
}

/// Poll maintenance settings
#[derive(Debug, Clone)]
pub struct ScheduleSettings {
    /// Friday/Saturday pairs generated per /extendpoll
    pub extend_count: usize,
    /// When false, the poll service's own "no" counts are used as reported
    pub derive_no_votes: bool,
}

impl ScheduleSettings {
    fn from_raw(raw: RawScheduleConfig) -> Self {
        Self {
            extend_count: raw
                .extend_count
                .map(|c| c as usize)
                .unwrap_or(DEFAULT_EXTEND_COUNT),
            derive_no_votes: raw.derive_no_votes.unwrap_or(true),
        }
    }
}

impl Default for ScheduleSettings {
    fn default() -> Self {
        Self {
            extend_count: DEFAULT_EXTEND_COUNT,
            derive_no_votes: true,
        }
    }
}

/// One chat and the poll it maintains
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Channel {
    pub chat_id: ChatId,
    pub poll_id: PollId,
}

impl Channel {
    fn from_raw(raw: RawChannel) -> Self {
        Self {
            chat_id: ChatId::new(raw.chat_id),
            poll_id: PollId::new(raw.poll_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_config;

    const MINIMAL: &str = r#"
        config_version = 1

        [nextcloud]
        server = "https://cloud.example.org/"
        username = "weekender"

        [[channels]]
        chat_id = -1001
        poll_id = 42
    "#;

    #[test]
    fn defaults_are_applied() {
        let settings = parse_config(MINIMAL).unwrap();

        assert_eq!(settings.nextcloud.server, "https://cloud.example.org");
        assert_eq!(settings.schedule.extend_count, DEFAULT_EXTEND_COUNT);
        assert!(settings.schedule.derive_no_votes);
        assert_eq!(settings.telegram.long_poll, DEFAULT_LONG_POLL);
        assert!(settings.telegram.database_path.ends_with("messages.db"));
    }

    #[test]
    fn secrets_fall_back_to_environment() {
        let mut settings = parse_config(MINIMAL).unwrap();
        settings.resolve_secrets(|name| match name {
            NEXTCLOUD_TOKEN_ENV => Some("nc-secret".into()),
            TELEGRAM_TOKEN_ENV => Some(String::new()),
            _ => None,
        });

        assert_eq!(settings.nextcloud.token.as_deref(), Some("nc-secret"));
        assert!(settings.telegram.token.is_none());
    }

    #[test]
    fn configured_secrets_win_over_environment() {
        let config = MINIMAL.replace(
            "username = \"weekender\"",
            "username = \"weekender\"\ntoken = \"from-file\"",
        );
        let mut settings = parse_config(&config).unwrap();
        settings.resolve_secrets(|_| Some("from-env".into()));

        assert_eq!(settings.nextcloud.token.as_deref(), Some("from-file"));
        assert_eq!(settings.telegram.token.as_deref(), Some("from-env"));
    }
}
