//! Telegram Bot API objects, reduced to the fields the bot reads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use weekender_util::{ChatId, MessageId};

/// An incoming update from `getUpdates`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Update {
    pub update_id: i64,

    /// Absent for update kinds the bot does not subscribe to
    #[serde(default)]
    pub message: Option<Message>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub message_id: i64,

    /// Unix time the message was sent
    pub date: i64,

    pub chat: Chat,

    #[serde(default)]
    pub from: Option<User>,

    #[serde(default)]
    pub text: Option<String>,
}

impl Message {
    pub fn id(&self) -> MessageId {
        MessageId::new(self.message_id)
    }

    pub fn chat_id(&self) -> ChatId {
        ChatId::new(self.chat.id)
    }

    pub fn sent_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.date, 0).unwrap_or(DateTime::UNIX_EPOCH)
    }

    pub fn username(&self) -> Option<String> {
        self.from.as_ref().and_then(|u| u.username.clone())
    }

    /// Sender's first name, or empty for channel posts
    pub fn first_name(&self) -> &str {
        self.from.as_ref().map(|u| u.first_name.as_str()).unwrap_or("")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chat {
    pub id: i64,

    /// "private", "group", "supergroup" or "channel"
    #[serde(rename = "type", default)]
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,

    #[serde(default)]
    pub is_bot: bool,

    #[serde(default)]
    pub first_name: String,

    #[serde(default)]
    pub username: Option<String>,
}

/// Envelope around every Bot API response
#[derive(Debug, Deserialize)]
pub(crate) struct ApiResponse<T> {
    pub ok: bool,

    pub result: Option<T>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub error_code: Option<i64>,
}
