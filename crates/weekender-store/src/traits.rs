//! Store trait definitions

use weekender_util::ChatId;

use crate::{LedgerMessage, MessageKind, StoreResult};

/// Ledger of chat messages the bot has seen
pub trait MessageLedger: Send + Sync {
    /// Remember a message, returning its row ID
    fn record_message(&self, message: &LedgerMessage) -> StoreResult<i64>;

    /// Messages in a chat, oldest first, optionally of one kind only
    fn messages_for_chat(
        &self,
        chat_id: ChatId,
        kind: Option<MessageKind>,
    ) -> StoreResult<Vec<LedgerMessage>>;

    /// Forget a message by row ID. Returns whether a row was removed.
    fn forget_message(&self, id: i64) -> StoreResult<bool>;

    /// Check if store is healthy
    fn is_healthy(&self) -> bool;
}
