//! Configuration validation

use crate::schema::{RawChannel, RawConfig};
use std::collections::HashSet;
use thiserror::Error;

/// Largest number of pairs /extendpoll may add in one go (a year of weekends)
pub const MAX_EXTEND_COUNT: u32 = 52;

/// Telegram rejects getUpdates timeouts above this
pub const MAX_LONG_POLL_SECONDS: u64 = 50;

/// Validation error
#[derive(Debug, Clone, Error)]
pub enum ValidationError {
    #[error("Channel {chat_id}: {message}")]
    ChannelError { chat_id: i64, message: String },

    #[error("Duplicate chat ID: {0}")]
    DuplicateChatId(i64),

    #[error("Invalid Nextcloud server '{value}': {message}")]
    InvalidServer { value: String, message: String },

    #[error("Global config error: {0}")]
    GlobalError(String),
}

/// Validate a raw configuration
pub fn validate_config(config: &RawConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if let Err(message) = validate_server(&config.nextcloud.server) {
        errors.push(ValidationError::InvalidServer {
            value: config.nextcloud.server.clone(),
            message,
        });
    }

    if config.nextcloud.username.trim().is_empty() {
        errors.push(ValidationError::GlobalError(
            "nextcloud.username cannot be empty".into(),
        ));
    }

    if let Some(count) = config.schedule.extend_count
        && !(1..=MAX_EXTEND_COUNT).contains(&count)
    {
        errors.push(ValidationError::GlobalError(format!(
            "schedule.extend_count must be between 1 and {MAX_EXTEND_COUNT}, got {count}"
        )));
    }

    if let Some(secs) = config.telegram.long_poll_seconds
        && secs > MAX_LONG_POLL_SECONDS
    {
        errors.push(ValidationError::GlobalError(format!(
            "telegram.long_poll_seconds must be at most {MAX_LONG_POLL_SECONDS}, got {secs}"
        )));
    }

    // Check for duplicate chat IDs
    let mut seen = HashSet::new();
    for channel in &config.channels {
        if !seen.insert(channel.chat_id) {
            errors.push(ValidationError::DuplicateChatId(channel.chat_id));
        }
    }

    for channel in &config.channels {
        errors.extend(validate_channel(channel));
    }

    errors
}

fn validate_channel(channel: &RawChannel) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if channel.chat_id == 0 {
        errors.push(ValidationError::ChannelError {
            chat_id: channel.chat_id,
            message: "chat_id cannot be 0".into(),
        });
    }

    if channel.poll_id <= 0 {
        errors.push(ValidationError::ChannelError {
            chat_id: channel.chat_id,
            message: format!("poll_id must be positive, got {}", channel.poll_id),
        });
    }

    errors
}

/// Check that the server is an absolute http(s) URL without a trailing path
/// component the client would double up on.
pub fn validate_server(server: &str) -> Result<(), String> {
    let rest = server
        .strip_prefix("https://")
        .or_else(|| server.strip_prefix("http://"))
        .ok_or_else(|| "Expected an http:// or https:// URL".to_string())?;

    if rest.trim_end_matches('/').is_empty() {
        return Err("Missing host".into());
    }
    if rest.contains("index.php") {
        return Err("Use the server root, not the index.php path".into());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{RawNextcloudConfig, RawScheduleConfig, RawTelegramConfig};

    fn config_with(channels: Vec<RawChannel>) -> RawConfig {
        RawConfig {
            config_version: 1,
            nextcloud: RawNextcloudConfig {
                server: "https://cloud.example.org".into(),
                username: "weekender".into(),
                token: None,
            },
            telegram: RawTelegramConfig::default(),
            schedule: RawScheduleConfig::default(),
            channels,
        }
    }

    #[test]
    fn test_validate_server() {
        assert!(validate_server("https://cloud.example.org").is_ok());
        assert!(validate_server("http://localhost:8080/").is_ok());

        assert!(validate_server("cloud.example.org").is_err());
        assert!(validate_server("https://").is_err());
        assert!(validate_server("https://cloud.example.org/index.php/apps/polls").is_err());
    }

    #[test]
    fn test_valid_config_has_no_errors() {
        let config = config_with(vec![RawChannel {
            chat_id: -1001,
            poll_id: 42,
        }]);
        assert!(validate_config(&config).is_empty());
    }

    #[test]
    fn test_duplicate_chat_detection() {
        let config = config_with(vec![
            RawChannel {
                chat_id: -1001,
                poll_id: 1,
            },
            RawChannel {
                chat_id: -1001,
                poll_id: 2,
            },
        ]);

        let errors = validate_config(&config);
        assert!(errors.iter().any(|e| matches!(e, ValidationError::DuplicateChatId(-1001))));
    }

    #[test]
    fn test_bad_channel_and_limits_are_all_reported() {
        let mut config = config_with(vec![RawChannel {
            chat_id: 0,
            poll_id: -3,
        }]);
        config.schedule.extend_count = Some(0);
        config.telegram.long_poll_seconds = Some(120);
        config.nextcloud.username = " ".into();

        let errors = validate_config(&config);
        assert_eq!(errors.len(), 5);
    }
}
