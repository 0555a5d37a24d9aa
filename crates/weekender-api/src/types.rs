//! Poll data types shared between the engine and its collaborators

use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};
use weekender_util::{OptionId, datetime_from_timestamp};

/// Vote counts for a single option.
///
/// `yes` and `maybe` come straight from the poll service. `no` is usually
/// derived from the voter count and is signed because inconsistent upstream
/// data can push it below zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    pub yes: i64,
    pub maybe: i64,
    pub no: i64,
}

impl Tally {
    pub fn new(yes: i64, maybe: i64, no: i64) -> Self {
        Self { yes, maybe, no }
    }

    /// Votes that count toward attending: yes plus maybe
    pub fn attending(&self) -> i64 {
        self.yes + self.maybe
    }

    pub fn total(&self) -> i64 {
        self.yes + self.maybe + self.no
    }
}

/// One candidate date in a poll
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollOption {
    /// Assigned by the poll service; absent until the option exists remotely
    pub id: Option<OptionId>,

    /// Proposed start, seconds since the epoch
    pub timestamp: i64,

    /// Slot length in seconds
    pub duration: i64,

    /// Free-form label from the poll service (often empty for date polls)
    #[serde(default)]
    pub text: String,

    pub tally: Tally,
}

impl PollOption {
    pub fn new(id: OptionId, timestamp: i64, duration: i64, tally: Tally) -> Self {
        Self {
            id: Some(id),
            timestamp,
            duration,
            text: String::new(),
            tally,
        }
    }

    /// Start of the option in the given timezone
    pub fn datetime_in<Tz: TimeZone>(&self, tz: &Tz) -> DateTime<Tz> {
        datetime_from_timestamp(self.timestamp, tz)
    }

    /// Copy of this option with a different tally
    pub fn with_tally(&self, tally: Tally) -> Self {
        Self {
            tally,
            ..self.clone()
        }
    }
}

/// A synthesized option that has not been created on the poll service yet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionDraft {
    pub timestamp: i64,
    pub duration: i64,
}

impl OptionDraft {
    pub fn datetime_in<Tz: TimeZone>(&self, tz: &Tz) -> DateTime<Tz> {
        datetime_from_timestamp(self.timestamp, tz)
    }
}

/// Stable identity of a poll participant
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum VoterKey {
    /// Registered account on the poll service
    User(String),
    /// Guest participant identified by the service's share/guest id
    Guest(String),
}

/// A distinct participant in a poll
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voter {
    pub key: VoterKey,
    pub display_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Utc, Weekday};

    #[test]
    fn tally_totals() {
        let tally = Tally::new(3, 1, 2);
        assert_eq!(tally.attending(), 4);
        assert_eq!(tally.total(), 6);
    }

    #[test]
    fn with_tally_keeps_identity() {
        let option = PollOption::new(OptionId::new(7), 1_705_017_600, 86_400, Tally::new(1, 0, 0));
        let updated = option.with_tally(Tally::new(1, 0, 4));

        assert_eq!(updated.id, Some(OptionId::new(7)));
        assert_eq!(updated.timestamp, option.timestamp);
        assert_eq!(updated.tally.no, 4);
        assert_eq!(option.tally.no, 0);
    }

    #[test]
    fn option_datetime_uses_requested_zone() {
        // 2024-01-12 00:00:00 UTC
        let option = PollOption::new(OptionId::new(1), 1_705_017_600, 86_400, Tally::default());
        let dt = option.datetime_in(&Utc);
        assert_eq!(dt.weekday(), Weekday::Fri);
        assert_eq!(dt.day(), 12);
    }

    #[test]
    fn voter_key_serialization() {
        let key = VoterKey::Guest("abc123".into());
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, r#"{"kind":"guest","id":"abc123"}"#);
    }
}
