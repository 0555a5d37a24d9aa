//! Chat transport for weekender
//!
//! The bot reads commands and posts replies through [`ChatTransport`].
//! [`TelegramClient`] speaks the Telegram Bot API over HTTPS long polling;
//! [`MockTransport`] keeps everything in memory for tests.

mod client;
mod mock;
mod traits;
mod types;

pub use client::*;
pub use mock::*;
pub use traits::*;
pub use types::*;
