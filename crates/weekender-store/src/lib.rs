//! Persistence layer for weekender
//!
//! Provides the message ledger: every message the bot sent or received, per
//! chat, so that a chat can later be cleared in bulk.

mod ledger;
mod sqlite;
mod traits;

pub use ledger::*;
pub use sqlite::*;
pub use traits::*;

use thiserror::Error;

/// Store errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Corrupt row {id}: {message}")]
    Corrupt { id: i64, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        StoreError::Database(e.to_string())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
