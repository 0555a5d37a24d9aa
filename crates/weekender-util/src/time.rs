//! Time utilities for weekender
//!
//! Poll options cross every boundary as epoch seconds; this module converts
//! them into zoned datetimes and provides the process-wide wall clock.
//!
//! # Mock Time for Development
//!
//! In debug builds, the `WEEKENDER_MOCK_TIME` environment variable can be set
//! to override the system time for everything that asks [`now`]. This makes it
//! possible to try `/schedule` or `/extendpoll` against a poll as if it were a
//! different day of the week.
//!
//! Format: `YYYY-MM-DD HH:MM:SS` (e.g., `2024-01-10 18:00:00`)
//!
//! Example:
//! ```bash
//! WEEKENDER_MOCK_TIME="2024-01-10 18:00:00" weekenderd --batch
//! ```

use chrono::{DateTime, Local, NaiveDateTime, TimeDelta, TimeZone};
use std::sync::OnceLock;

/// Environment variable name for mock time (debug builds only)
pub const MOCK_TIME_ENV_VAR: &str = "WEEKENDER_MOCK_TIME";

/// Length of one full-day poll option
pub const DAY_SECONDS: i64 = 24 * 60 * 60;

/// Width of the "upcoming weekend" lookahead window
pub const LOOKAHEAD_SECONDS: i64 = 7 * DAY_SECONDS;

/// Offset between mock time and real time at process start.
static MOCK_TIME_OFFSET: OnceLock<Option<TimeDelta>> = OnceLock::new();

fn mock_time_offset() -> Option<TimeDelta> {
    *MOCK_TIME_OFFSET.get_or_init(|| {
        #[cfg(debug_assertions)]
        {
            let raw = std::env::var(MOCK_TIME_ENV_VAR).ok()?;
            match parse_mock_time(&raw) {
                Some(mock_dt) => {
                    let offset = mock_dt.signed_duration_since(Local::now());
                    tracing::info!(
                        mock_time = %raw,
                        offset_secs = offset.num_seconds(),
                        "Mock time enabled"
                    );
                    Some(offset)
                }
                None => {
                    tracing::warn!(
                        mock_time = %raw,
                        expected_format = "%Y-%m-%d %H:%M:%S",
                        "Invalid mock time, using the system clock"
                    );
                    None
                }
            }
        }
        #[cfg(not(debug_assertions))]
        {
            None
        }
    })
}

fn parse_mock_time(raw: &str) -> Option<DateTime<Local>> {
    let naive = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").ok()?;
    Local.from_local_datetime(&naive).single()
}

/// Returns whether mock time is currently active.
pub fn is_mock_time_active() -> bool {
    mock_time_offset().is_some()
}

/// Get the current local time, respecting mock time settings in debug builds.
pub fn now() -> DateTime<Local> {
    let real_now = Local::now();
    match mock_time_offset() {
        Some(offset) => real_now + offset,
        None => real_now,
    }
}

/// Convert epoch seconds into a datetime in the given timezone.
///
/// Out-of-range timestamps clamp to the epoch; no poll service hands out
/// dates anywhere near chrono's limits.
pub fn datetime_from_timestamp<Tz: TimeZone>(timestamp: i64, tz: &Tz) -> DateTime<Tz> {
    DateTime::from_timestamp(timestamp, 0)
        .unwrap_or(DateTime::UNIX_EPOCH)
        .with_timezone(tz)
}
