//! Poll source traits

use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;
use weekender_api::{OptionDraft, PollOption, Voter};
use weekender_core::{count_distinct_voters, reconcile};
use weekender_util::{OptionId, PollId};

/// Errors from poll source operations
#[derive(Debug, Error)]
pub enum PollError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Poll service returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Option {0} not found")]
    OptionNotFound(OptionId),

    #[error("Poll service unavailable: {0}")]
    Unavailable(String),
}

pub type PollResult<T> = Result<T, PollError>;

/// A remote poll the bot reads and maintains
#[async_trait]
pub trait PollSource: Send + Sync {
    /// Every option of the poll, with the tallies the service reports
    async fn fetch_options(&self, poll: PollId) -> PollResult<Vec<PollOption>>;

    /// One entry per cast vote; the same participant may appear repeatedly
    async fn fetch_voters(&self, poll: PollId) -> PollResult<Vec<Voter>>;

    /// Add an option to the poll
    async fn create_option(&self, poll: PollId, draft: OptionDraft) -> PollResult<()>;

    /// Remove an option from the poll
    async fn delete_option(&self, poll: PollId, option: OptionId) -> PollResult<()>;

    /// Fetch options and voters, then derive "no" counts when `derive_no` is set.
    ///
    /// With `derive_no` unset the service's own tallies are returned untouched.
    async fn load_poll(&self, poll: PollId, derive_no: bool) -> PollResult<Vec<PollOption>> {
        let options = self.fetch_options(poll).await?;
        if !derive_no {
            return Ok(options);
        }

        let voters = self.fetch_voters(poll).await?;
        let total = count_distinct_voters(&voters);
        debug!(poll_id = %poll, options = options.len(), voters = total, "Poll loaded");
        Ok(reconcile(&options, total))
    }
}
