//! Shared utilities for weekender
//!
//! This crate provides:
//! - ID types (PollId, OptionId, ChatId, MessageId)
//! - Time utilities (mockable wall clock, day arithmetic constants)
//! - Default paths for config and data directories

mod ids;
mod paths;
mod time;

pub use ids::*;
pub use paths::*;
pub use time::*;
