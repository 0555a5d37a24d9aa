//! SQLite-based ledger implementation

use chrono::{DateTime, Utc};
use rusqlite::{Connection, params};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, warn};
use weekender_util::{ChatId, MessageId};

use crate::{LedgerMessage, MessageKind, MessageLedger, StoreError, StoreResult};

/// SQLite-based message ledger
pub struct SqliteLedger {
    conn: Mutex<Connection>,
}

impl SqliteLedger {
    /// Open or create a ledger at the given path, creating parent directories
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        let ledger = Self {
            conn: Mutex::new(conn),
        };
        ledger.init_schema()?;
        debug!(path = %path.display(), "Ledger opened");
        Ok(ledger)
    }

    /// Create an in-memory ledger (for testing)
    pub fn in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        let ledger = Self {
            conn: Mutex::new(conn),
        };
        ledger.init_schema()?;
        Ok(ledger)
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| StoreError::Database("ledger lock poisoned".into()))
    }

    fn init_schema(&self) -> StoreResult<()> {
        let conn = self.lock()?;

        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS messages (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                msg_id INTEGER NOT NULL,
                chat_id INTEGER NOT NULL,
                date TEXT NOT NULL,
                user TEXT,
                text TEXT,
                type TEXT NOT NULL CHECK (type IN ('sent', 'received'))
            );

            CREATE INDEX IF NOT EXISTS idx_messages_chat ON messages(chat_id);
            "#,
        )?;

        debug!("Ledger schema initialized");
        Ok(())
    }
}

struct Row {
    id: i64,
    msg_id: i64,
    chat_id: i64,
    date: String,
    user: Option<String>,
    text: Option<String>,
    kind: String,
}

impl Row {
    fn into_message(self) -> StoreResult<LedgerMessage> {
        let date = DateTime::parse_from_rfc3339(&self.date)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| StoreError::Corrupt {
                id: self.id,
                message: format!("bad date '{}': {e}", self.date),
            })?;
        let kind: MessageKind = self
            .kind
            .parse()
            .map_err(|message| StoreError::Corrupt { id: self.id, message })?;

        Ok(LedgerMessage {
            id: self.id,
            message_id: MessageId::new(self.msg_id),
            chat_id: ChatId::new(self.chat_id),
            date,
            user: self.user,
            text: self.text,
            kind,
        })
    }
}

impl MessageLedger for SqliteLedger {
    fn record_message(&self, message: &LedgerMessage) -> StoreResult<i64> {
        let conn = self.lock()?;

        conn.execute(
            "INSERT INTO messages (msg_id, chat_id, date, user, text, type) VALUES (?, ?, ?, ?, ?, ?)",
            params![
                message.message_id.get(),
                message.chat_id.get(),
                message.date.to_rfc3339(),
                message.user,
                message.text,
                message.kind.as_str(),
            ],
        )?;

        let id = conn.last_insert_rowid();
        debug!(
            id,
            chat_id = %message.chat_id,
            message_id = %message.message_id,
            kind = %message.kind,
            "Message recorded"
        );
        Ok(id)
    }

    fn messages_for_chat(
        &self,
        chat_id: ChatId,
        kind: Option<MessageKind>,
    ) -> StoreResult<Vec<LedgerMessage>> {
        let conn = self.lock()?;

        let mut stmt = conn.prepare(
            "SELECT id, msg_id, chat_id, date, user, text, type FROM messages \
             WHERE chat_id = ?1 AND (?2 IS NULL OR type = ?2) ORDER BY id ASC",
        )?;

        let rows = stmt.query_map(params![chat_id.get(), kind.map(|k| k.as_str())], |row| {
            Ok(Row {
                id: row.get(0)?,
                msg_id: row.get(1)?,
                chat_id: row.get(2)?,
                date: row.get(3)?,
                user: row.get(4)?,
                text: row.get(5)?,
                kind: row.get(6)?,
            })
        })?;

        let mut messages = Vec::new();
        for row in rows {
            messages.push(row?.into_message()?);
        }

        Ok(messages)
    }

    fn forget_message(&self, id: i64) -> StoreResult<bool> {
        let conn = self.lock()?;
        let removed = conn.execute("DELETE FROM messages WHERE id = ?", [id])?;
        debug!(id, removed, "Message forgotten");
        Ok(removed > 0)
    }

    fn is_healthy(&self) -> bool {
        match self.conn.lock() {
            Ok(conn) => conn.query_row("SELECT 1", [], |_| Ok(())).is_ok(),
            Err(_) => {
                warn!("Ledger lock poisoned");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn message(msg_id: i64, chat_id: i64, kind: MessageKind) -> LedgerMessage {
        let date = Utc.with_ymd_and_hms(2024, 1, 10, 12, 0, 0).unwrap();
        LedgerMessage::new(MessageId::new(msg_id), ChatId::new(chat_id), date, kind)
    }

    #[test]
    fn test_in_memory_ledger() {
        let ledger = SqliteLedger::in_memory().unwrap();
        assert!(ledger.is_healthy());
    }

    #[test]
    fn test_record_and_list() {
        let ledger = SqliteLedger::in_memory().unwrap();

        let sent = message(10, -1, MessageKind::Sent).with_text(Some("hello".into()));
        let received = message(11, -1, MessageKind::Received)
            .with_user(Some("alice".into()))
            .with_text(Some("hi bot".into()));
        let id_sent = ledger.record_message(&sent).unwrap();
        let id_received = ledger.record_message(&received).unwrap();
        assert!(id_received > id_sent);

        let all = ledger.messages_for_chat(ChatId::new(-1), None).unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, id_sent);
        assert_eq!(all[0].message_id, MessageId::new(10));
        assert_eq!(all[0].date, sent.date);
        assert_eq!(all[1].user.as_deref(), Some("alice"));
        assert_eq!(all[1].kind, MessageKind::Received);
    }

    #[test]
    fn test_filter_by_chat_and_kind() {
        let ledger = SqliteLedger::in_memory().unwrap();
        ledger.record_message(&message(1, -1, MessageKind::Sent)).unwrap();
        ledger.record_message(&message(2, -1, MessageKind::Received)).unwrap();
        ledger.record_message(&message(3, -2, MessageKind::Sent)).unwrap();

        let sent = ledger
            .messages_for_chat(ChatId::new(-1), Some(MessageKind::Sent))
            .unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].message_id, MessageId::new(1));

        let other = ledger.messages_for_chat(ChatId::new(-2), None).unwrap();
        assert_eq!(other.len(), 1);

        let empty = ledger.messages_for_chat(ChatId::new(-3), None).unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn test_forget_message() {
        let ledger = SqliteLedger::in_memory().unwrap();
        let id = ledger.record_message(&message(1, -1, MessageKind::Sent)).unwrap();

        assert!(ledger.forget_message(id).unwrap());
        assert!(!ledger.forget_message(id).unwrap());
        assert!(ledger.messages_for_chat(ChatId::new(-1), None).unwrap().is_empty());
    }

    #[test]
    fn test_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("messages.db");

        {
            let ledger = SqliteLedger::open(&path).unwrap();
            ledger.record_message(&message(5, -9, MessageKind::Sent)).unwrap();
        }

        let ledger = SqliteLedger::open(&path).unwrap();
        let messages = ledger.messages_for_chat(ChatId::new(-9), None).unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].message_id, MessageId::new(5));
    }
}
