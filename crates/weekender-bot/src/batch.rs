//! One-shot poll maintenance without a chat

use chrono::{DateTime, Local};
use tracing::{info, warn};
use weekender_api::{OptionDraft, PollOption};
use weekender_config::ScheduleSettings;
use weekender_core::{generate_next, next_weekend, past_options, summarize};
use weekender_poll::{PollResult, PollSource};
use weekender_util::PollId;

use crate::render::summary_line;

/// Outcome of one batch pass over a poll
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    /// Upcoming weekend, one rendered line per option
    pub weekend: Vec<String>,
    /// Options in the past
    pub expired: Vec<PollOption>,
    /// Options that would extend the poll
    pub drafts: Vec<OptionDraft>,
    /// Set only when changes were applied
    pub deleted: usize,
    pub created: usize,
    pub failures: usize,
}

/// Load a poll, summarize the coming weekend and work out maintenance.
///
/// With `apply` the expired options are deleted and the drafts created,
/// best effort. Without it nothing on the poll changes.
pub async fn batch_report(
    polls: &dyn PollSource,
    poll: PollId,
    schedule: &ScheduleSettings,
    apply: bool,
    now: &DateTime<Local>,
) -> PollResult<BatchReport> {
    let options = polls.load_poll(poll, schedule.derive_no_votes).await?;
    let tz = now.timezone();

    let mut report = BatchReport {
        weekend: next_weekend(&options, now)
            .iter()
            .map(|o| summary_line(&summarize(o, &tz)))
            .collect(),
        expired: past_options(&options, now),
        drafts: generate_next(&options, schedule.extend_count, now),
        ..Default::default()
    };

    for line in &report.weekend {
        info!(poll_id = %poll, "{line}");
    }

    for option in &report.expired {
        info!(poll_id = %poll, option_id = ?option.id, timestamp = option.timestamp, apply, "Expired option");
        if !apply {
            continue;
        }
        let Some(id) = option.id else {
            report.failures += 1;
            continue;
        };
        match polls.delete_option(poll, id).await {
            Ok(()) => report.deleted += 1,
            Err(e) => {
                warn!(poll_id = %poll, option_id = %id, error = %e, "Failed to delete option");
                report.failures += 1;
            }
        }
    }

    for draft in &report.drafts {
        info!(
            poll_id = %poll,
            date = %draft.datetime_in(&tz).format("%Y-%m-%d %A"),
            apply,
            "New option"
        );
        if !apply {
            continue;
        }
        match polls.create_option(poll, *draft).await {
            Ok(()) => report.created += 1,
            Err(e) => {
                warn!(poll_id = %poll, timestamp = draft.timestamp, error = %e, "Failed to create option");
                report.failures += 1;
            }
        }
    }

    Ok(report)
}
