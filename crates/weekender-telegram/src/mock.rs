//! Mock chat transport for testing

use async_trait::async_trait;
use std::collections::{HashSet, VecDeque};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use weekender_util::{ChatId, MessageId};

use crate::{
    Chat, ChatTransport, Message, TextFormat, TransportError, TransportResult, Update, User,
};

/// A message the bot posted through the mock
#[derive(Debug, Clone, PartialEq)]
pub struct SentMessage {
    pub chat: ChatId,
    pub message_id: MessageId,
    pub text: String,
    pub format: TextFormat,
}

/// In-memory chat transport for unit/integration testing
pub struct MockTransport {
    next_message_id: AtomicI64,
    pending: Mutex<VecDeque<Update>>,
    sent: Mutex<Vec<SentMessage>>,
    deleted: Mutex<Vec<(ChatId, MessageId)>>,
    offsets: Mutex<Vec<i64>>,

    /// Configure sends to fail
    pub fail_send: Mutex<bool>,

    /// Messages whose deletion fails
    pub fail_delete: Mutex<HashSet<MessageId>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            next_message_id: AtomicI64::new(1),
            pending: Mutex::new(VecDeque::new()),
            sent: Mutex::new(Vec::new()),
            deleted: Mutex::new(Vec::new()),
            offsets: Mutex::new(Vec::new()),
            fail_send: Mutex::new(false),
            fail_delete: Mutex::new(HashSet::new()),
        }
    }

    /// The bot account the mock reports from `get_me`
    pub fn bot_user() -> User {
        User {
            id: 1,
            is_bot: true,
            first_name: "Weekender".into(),
            username: Some("weekender_bot".into()),
        }
    }

    /// Build an incoming text message as a chat member would send it
    pub fn incoming(&self, chat: ChatId, first_name: &str, text: &str) -> Message {
        Message {
            message_id: self.next_message_id.fetch_add(1, Ordering::SeqCst),
            date: weekender_util::now().timestamp(),
            chat: Chat {
                id: chat.get(),
                kind: "group".into(),
            },
            from: Some(User {
                id: 100,
                is_bot: false,
                first_name: first_name.into(),
                username: Some(first_name.to_lowercase()),
            }),
            text: Some(text.into()),
        }
    }

    /// Queue an update for the next `get_updates`
    pub fn push_update(&self, update: Update) {
        lock(&self.pending).push_back(update);
    }

    pub fn sent(&self) -> Vec<SentMessage> {
        lock(&self.sent).clone()
    }

    pub fn last_sent(&self) -> Option<SentMessage> {
        lock(&self.sent).last().cloned()
    }

    pub fn deleted(&self) -> Vec<(ChatId, MessageId)> {
        lock(&self.deleted).clone()
    }

    /// Offsets passed to `get_updates`, in call order
    pub fn requested_offsets(&self) -> Vec<i64> {
        lock(&self.offsets).clone()
    }

    pub fn set_fail_send(&self, fail: bool) {
        *lock(&self.fail_send) = fail;
    }

    pub fn fail_delete_of(&self, message: MessageId) {
        lock(&self.fail_delete).insert(message);
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChatTransport for MockTransport {
    async fn get_me(&self) -> TransportResult<User> {
        Ok(Self::bot_user())
    }

    async fn get_updates(&self, offset: i64, _timeout: Duration) -> TransportResult<Vec<Update>> {
        lock(&self.offsets).push(offset);
        let mut pending = lock(&self.pending);
        pending.retain(|u| u.update_id >= offset);
        Ok(pending.drain(..).collect())
    }

    async fn send_message(
        &self,
        chat: ChatId,
        text: &str,
        format: TextFormat,
    ) -> TransportResult<Message> {
        if *lock(&self.fail_send) {
            return Err(TransportError::Unavailable("Mock send failure".into()));
        }

        let bot = Self::bot_user();
        let message = Message {
            message_id: self.next_message_id.fetch_add(1, Ordering::SeqCst),
            date: weekender_util::now().timestamp(),
            chat: Chat {
                id: chat.get(),
                kind: "group".into(),
            },
            from: Some(bot),
            text: Some(text.into()),
        };

        lock(&self.sent).push(SentMessage {
            chat,
            message_id: message.id(),
            text: text.into(),
            format,
        });
        Ok(message)
    }

    async fn delete_message(&self, chat: ChatId, message: MessageId) -> TransportResult<()> {
        if lock(&self.fail_delete).contains(&message) {
            return Err(TransportError::Api {
                code: Some(400),
                description: "Bad Request: message can't be deleted".into(),
            });
        }
        lock(&self.deleted).push((chat, message));
        Ok(())
    }
}
