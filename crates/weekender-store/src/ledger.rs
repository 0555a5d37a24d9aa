//! Ledger entry types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use weekender_util::{ChatId, MessageId};

/// Direction of a ledger message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    /// Posted by the bot
    Sent,
    /// Posted by a chat member
    Received,
}

impl MessageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageKind::Sent => "sent",
            MessageKind::Received => "received",
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MessageKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sent" => Ok(MessageKind::Sent),
            "received" => Ok(MessageKind::Received),
            other => Err(format!("unknown message kind '{other}'")),
        }
    }
}

/// A chat message remembered by the bot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerMessage {
    /// Row ID, 0 until stored
    pub id: i64,

    /// Telegram's ID for the message
    pub message_id: MessageId,

    pub chat_id: ChatId,

    /// When Telegram says the message was posted
    pub date: DateTime<Utc>,

    /// Username of the author, if Telegram reported one
    pub user: Option<String>,

    pub text: Option<String>,

    pub kind: MessageKind,
}

impl LedgerMessage {
    pub fn new(
        message_id: MessageId,
        chat_id: ChatId,
        date: DateTime<Utc>,
        kind: MessageKind,
    ) -> Self {
        Self {
            id: 0, // Will be set by store
            message_id,
            chat_id,
            date,
            user: None,
            text: None,
            kind,
        }
    }

    pub fn with_user(mut self, user: Option<String>) -> Self {
        self.user = user;
        self
    }

    pub fn with_text(mut self, text: Option<String>) -> Self {
        self.text = text;
        self
    }
}
