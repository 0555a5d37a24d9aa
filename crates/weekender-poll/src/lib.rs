//! Poll data source interfaces for weekender
//!
//! Defines the [`PollSource`] trait the bot talks to, plus:
//! - [`NextcloudPolls`], the Nextcloud Polls REST client
//! - [`MockPollSource`], an in-memory poll for tests

mod mock;
mod nextcloud;
mod traits;

pub use mock::*;
pub use nextcloud::*;
pub use traits::*;
