//! Poll lifecycle engine for weekender
//!
//! Everything in this crate is a pure function over its inputs:
//! - Vote reconciliation (derive the "no" count from the voter total)
//! - Weekend selection (options in the next seven days)
//! - Expiry (options already in the past)
//! - Recurrence (new Friday/Saturday pairs after the latest option)
//! - Summaries (attendance percentage and highlighting)
//!
//! None of it performs I/O. Callers fetch poll data, hand it in, and carry
//! out whatever creations or deletions the results call for.

mod reconcile;
mod recurrence;
mod summary;
mod window;

pub use reconcile::*;
pub use recurrence::*;
pub use summary::*;
pub use window::*;
