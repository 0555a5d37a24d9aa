//! Time-window selection over poll options

use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use weekender_api::PollOption;
use weekender_util::{LOOKAHEAD_SECONDS, datetime_from_timestamp};

fn offset_from<Tz: TimeZone>(option: &PollOption, now: &DateTime<Tz>) -> TimeDelta {
    datetime_from_timestamp(option.timestamp, &Utc).signed_duration_since(now.with_timezone(&Utc))
}

/// Options strictly in the future and strictly less than a week away.
///
/// An option exactly at `now` or exactly seven days out is excluded. Input
/// order is preserved.
pub fn next_weekend<Tz: TimeZone>(options: &[PollOption], now: &DateTime<Tz>) -> Vec<PollOption> {
    let lookahead = TimeDelta::seconds(LOOKAHEAD_SECONDS);
    options
        .iter()
        .filter(|option| {
            let ahead = offset_from(option, now);
            ahead > TimeDelta::zero() && ahead < lookahead
        })
        .cloned()
        .collect()
}

/// Options that started strictly before `now`.
///
/// Only identifies candidates for deletion; removing them is up to the caller.
pub fn past_options<Tz: TimeZone>(options: &[PollOption], now: &DateTime<Tz>) -> Vec<PollOption> {
    options
        .iter()
        .filter(|option| offset_from(option, now) < TimeDelta::zero())
        .cloned()
        .collect()
}
