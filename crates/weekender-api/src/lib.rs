//! Shared types for weekender
//!
//! This crate defines the vocabulary every other crate speaks:
//! - Poll options, tallies and drafts (engine input/output)
//! - Voters (the tally denominator)
//! - Bot commands (what chat users can ask for)

mod commands;
mod types;

pub use commands::*;
pub use types::*;
