//! Chat front end for weekender
//!
//! Wires the poll lifecycle engine to a chat:
//! - [`Bot`] answers commands and keeps the message ledger
//! - [`render`] formats summaries as tables and log lines
//! - [`batch_report`] runs one maintenance pass without a chat

mod batch;
mod bot;
mod replies;
pub mod render;

pub use batch::*;
pub use bot::*;
pub use replies::*;
