//! Chat transport traits

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;
use weekender_util::{ChatId, MessageId};

use crate::{Message, Update, User};

/// Errors from chat transport operations
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Telegram API error {code:?}: {description}")]
    Api {
        code: Option<i64>,
        description: String,
    },

    #[error("Malformed response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Transport unavailable: {0}")]
    Unavailable(String),
}

pub type TransportResult<T> = Result<T, TransportError>;

/// How outgoing text should be interpreted by the chat client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextFormat {
    #[default]
    Plain,
    MarkdownV2,
}

/// Connection to the chat service
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Identity of the bot account
    async fn get_me(&self) -> TransportResult<User>;

    /// Wait up to `timeout` for updates with `update_id >= offset`
    async fn get_updates(&self, offset: i64, timeout: Duration) -> TransportResult<Vec<Update>>;

    /// Post a message, returning it as the service stored it
    async fn send_message(
        &self,
        chat: ChatId,
        text: &str,
        format: TextFormat,
    ) -> TransportResult<Message>;

    /// Remove a message from a chat
    async fn delete_message(&self, chat: ChatId, message: MessageId) -> TransportResult<()>;
}
