//! Per-option attendance summaries

use chrono::{Datelike, NaiveDate, TimeZone, Weekday};
use serde::{Deserialize, Serialize};
use weekender_api::PollOption;

/// Attendance percentage above which an option is highlighted (exclusive)
pub const HIGHLIGHT_THRESHOLD: f64 = 75.0;

/// Display-ready view of one poll option
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionSummary {
    pub weekday: Weekday,
    pub date: NaiveDate,
    pub yes: i64,
    pub maybe: i64,
    pub no: i64,
    /// `(yes + maybe) / (yes + maybe + no) * 100`, or `None` when nobody voted
    pub percent: Option<f64>,
    pub highlighted: bool,
}

/// Summarize an option, reading its date in `tz`.
///
/// A zero denominator produces `percent: None` instead of NaN or a panic.
/// Negative tallies are passed through unchanged.
pub fn summarize<Tz: TimeZone>(option: &PollOption, tz: &Tz) -> OptionSummary {
    let tally = option.tally;
    let total = tally.total();
    let percent = (total != 0).then(|| tally.attending() as f64 / total as f64 * 100.0);
    let date = option.datetime_in(tz).date_naive();

    OptionSummary {
        weekday: date.weekday(),
        date,
        yes: tally.yes,
        maybe: tally.maybe,
        no: tally.no,
        percent,
        highlighted: percent.is_some_and(|p| p > HIGHLIGHT_THRESHOLD),
    }
}
