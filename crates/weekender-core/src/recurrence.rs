//! Recurring option generation
//!
//! New options always come in (Friday, Saturday) pairs. The first pair is
//! placed relative to whatever weekday the anchor falls on; every pair after
//! that is a fixed step from the previous Saturday.

use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveTime, TimeZone, Weekday};
use tracing::debug;
use weekender_api::{OptionDraft, PollOption};
use weekender_util::{DAY_SECONDS, datetime_from_timestamp};

/// Days until the next Friday, indexed by days from Monday
static FRIDAY_OFFSETS: [u64; 7] = [
    4, // Monday
    3, // Tuesday
    2, // Wednesday
    1, // Thursday
    7, // Friday
    6, // Saturday
    5, // Sunday
];

/// Days until the next Saturday, indexed by days from Monday
static SATURDAY_OFFSETS: [u64; 7] = [
    5, // Monday
    4, // Tuesday
    3, // Wednesday
    2, // Thursday
    1, // Friday
    7, // Saturday
    6, // Sunday
];

/// Saturday to the following Friday
pub const STEADY_FRIDAY_STEP: u64 = 6;

/// Saturday to the following Saturday
pub const STEADY_SATURDAY_STEP: u64 = 7;

/// Days from `weekday` until the next Friday (a Friday maps to 7)
pub fn friday_offset(weekday: Weekday) -> u64 {
    FRIDAY_OFFSETS[weekday.num_days_from_monday() as usize]
}

/// Days from `weekday` until the next Saturday (a Saturday maps to 7)
pub fn saturday_offset(weekday: Weekday) -> u64 {
    SATURDAY_OFFSETS[weekday.num_days_from_monday() as usize]
}

/// Generate `count` new (Friday, Saturday) pairs after the latest option.
///
/// The anchor is the latest option's start, or `now` when there are no
/// options, taken as a calendar date in `now`'s timezone. Every draft starts
/// at local midnight and lasts a full day. The result holds `2 * count`
/// drafts in chronological order.
pub fn generate_next<Tz: TimeZone>(
    options: &[PollOption],
    count: usize,
    now: &DateTime<Tz>,
) -> Vec<OptionDraft> {
    let tz = now.timezone();
    let anchor = match options.iter().map(|o| o.timestamp).max() {
        Some(latest) => datetime_from_timestamp(latest, &tz),
        None => now.clone(),
    };
    let mut anchor_date = anchor.date_naive();

    // First pair: offsets depend on the anchor's weekday. From a Friday the
    // next Saturday would come before the next Friday, so take the one after.
    let weekday = anchor_date.weekday();
    let mut friday_step = friday_offset(weekday);
    let mut saturday_step = saturday_offset(weekday);
    if saturday_step < friday_step {
        saturday_step += 7;
    }

    let mut drafts = Vec::with_capacity(count.saturating_mul(2));
    for _ in 0..count {
        let (Some(friday), Some(saturday)) = (
            anchor_date.checked_add_days(Days::new(friday_step)),
            anchor_date.checked_add_days(Days::new(saturday_step)),
        ) else {
            break;
        };

        for date in [friday, saturday] {
            let start = local_midnight(date, &tz);
            debug!(date = %date, weekday = ?date.weekday(), "Generated poll option");
            drafts.push(OptionDraft {
                timestamp: start,
                duration: DAY_SECONDS,
            });
        }

        // Steady state: the anchor is now always a Saturday
        anchor_date = saturday;
        friday_step = STEADY_FRIDAY_STEP;
        saturday_step = STEADY_SATURDAY_STEP;
    }

    drafts
}

/// Epoch seconds of midnight on `date` in `tz`.
///
/// Where midnight does not exist locally (a DST gap), the earliest valid
/// instant of that naive time interpreted as UTC is used instead.
fn local_midnight<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> i64 {
    let naive = date.and_time(NaiveTime::MIN);
    tz.from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.timestamp())
        .unwrap_or_else(|| naive.and_utc().timestamp())
}
