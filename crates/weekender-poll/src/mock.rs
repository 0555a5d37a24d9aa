//! Mock poll source for testing

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Mutex, MutexGuard};
use weekender_api::{OptionDraft, PollOption, Tally, Voter};
use weekender_util::{OptionId, PollId};

use crate::{PollError, PollResult, PollSource};

#[derive(Debug, Clone, Default)]
struct MockPoll {
    options: Vec<PollOption>,
    voters: Vec<Voter>,
}

/// In-memory poll source for unit/integration testing
pub struct MockPollSource {
    next_id: AtomicI64,
    polls: Mutex<HashMap<PollId, MockPoll>>,
    created: Mutex<Vec<(PollId, OptionDraft)>>,
    deleted: Mutex<Vec<(PollId, OptionId)>>,

    /// Configure fetches to fail
    pub fail_fetch: Mutex<bool>,

    /// Configure every creation to fail
    pub fail_create: Mutex<bool>,

    /// Options whose deletion fails
    pub fail_delete: Mutex<HashSet<OptionId>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl MockPollSource {
    pub fn new() -> Self {
        Self {
            next_id: AtomicI64::new(1000),
            polls: Mutex::new(HashMap::new()),
            created: Mutex::new(Vec::new()),
            deleted: Mutex::new(Vec::new()),
            fail_fetch: Mutex::new(false),
            fail_create: Mutex::new(false),
            fail_delete: Mutex::new(HashSet::new()),
        }
    }

    /// Replace the contents of a poll
    pub fn set_poll(&self, poll: PollId, options: Vec<PollOption>, voters: Vec<Voter>) {
        lock(&self.polls).insert(poll, MockPoll { options, voters });
    }

    /// Current options of a poll
    pub fn options(&self, poll: PollId) -> Vec<PollOption> {
        lock(&self.polls)
            .get(&poll)
            .map(|p| p.options.clone())
            .unwrap_or_default()
    }

    /// Every successful creation so far, in call order
    pub fn created(&self) -> Vec<(PollId, OptionDraft)> {
        lock(&self.created).clone()
    }

    /// Every successful deletion so far, in call order
    pub fn deleted(&self) -> Vec<(PollId, OptionId)> {
        lock(&self.deleted).clone()
    }

    pub fn set_fail_fetch(&self, fail: bool) {
        *lock(&self.fail_fetch) = fail;
    }

    pub fn set_fail_create(&self, fail: bool) {
        *lock(&self.fail_create) = fail;
    }

    pub fn fail_delete_of(&self, option: OptionId) {
        lock(&self.fail_delete).insert(option);
    }

    fn check_fetch(&self) -> PollResult<()> {
        if *lock(&self.fail_fetch) {
            return Err(PollError::Unavailable("Mock fetch failure".into()));
        }
        Ok(())
    }
}

impl Default for MockPollSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PollSource for MockPollSource {
    async fn fetch_options(&self, poll: PollId) -> PollResult<Vec<PollOption>> {
        self.check_fetch()?;
        Ok(self.options(poll))
    }

    async fn fetch_voters(&self, poll: PollId) -> PollResult<Vec<Voter>> {
        self.check_fetch()?;
        Ok(lock(&self.polls)
            .get(&poll)
            .map(|p| p.voters.clone())
            .unwrap_or_default())
    }

    async fn create_option(&self, poll: PollId, draft: OptionDraft) -> PollResult<()> {
        if *lock(&self.fail_create) {
            return Err(PollError::Unavailable("Mock create failure".into()));
        }

        let id = OptionId::new(self.next_id.fetch_add(1, Ordering::SeqCst));
        let option = PollOption::new(id, draft.timestamp, draft.duration, Tally::default());
        lock(&self.polls).entry(poll).or_default().options.push(option);
        lock(&self.created).push((poll, draft));
        Ok(())
    }

    async fn delete_option(&self, poll: PollId, option: OptionId) -> PollResult<()> {
        if lock(&self.fail_delete).contains(&option) {
            return Err(PollError::Unavailable("Mock delete failure".into()));
        }

        let mut polls = lock(&self.polls);
        let options = &mut polls.entry(poll).or_default().options;
        let before = options.len();
        options.retain(|o| o.id != Some(option));
        if options.len() == before {
            return Err(PollError::OptionNotFound(option));
        }
        drop(polls);

        lock(&self.deleted).push((poll, option));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use weekender_api::VoterKey;

    fn voter(name: &str) -> Voter {
        Voter {
            key: VoterKey::User(name.into()),
            display_name: name.into(),
        }
    }

    fn option(id: i64, yes: i64, maybe: i64, no: i64) -> PollOption {
        PollOption::new(OptionId::new(id), 1_700_000_000 + id, 86400, Tally::new(yes, maybe, no))
    }

    #[tokio::test]
    async fn load_poll_derives_no_from_distinct_voters() {
        let source = MockPollSource::new();
        let poll = PollId::new(1);
        source.set_poll(
            poll,
            vec![option(1, 2, 1, 9), option(2, 0, 0, 9)],
            vec![voter("a"), voter("b"), voter("a"), voter("c"), voter("d")],
        );

        let options = source.load_poll(poll, true).await.unwrap();
        assert_eq!(options[0].tally, Tally::new(2, 1, 1));
        assert_eq!(options[1].tally, Tally::new(0, 0, 4));
    }

    #[tokio::test]
    async fn load_poll_keeps_service_tallies_when_not_deriving() {
        let source = MockPollSource::new();
        let poll = PollId::new(1);
        source.set_poll(poll, vec![option(1, 2, 1, 9)], vec![voter("a")]);

        let options = source.load_poll(poll, false).await.unwrap();
        assert_eq!(options[0].tally, Tally::new(2, 1, 9));
    }

    #[tokio::test]
    async fn create_then_delete() {
        let source = MockPollSource::new();
        let poll = PollId::new(1);
        let draft = OptionDraft {
            timestamp: 1_705_017_600,
            duration: 86400,
        };

        source.create_option(poll, draft).await.unwrap();
        let options = source.fetch_options(poll).await.unwrap();
        assert_eq!(options.len(), 1);
        assert_eq!(options[0].timestamp, draft.timestamp);

        let id = options[0].id.unwrap();
        source.delete_option(poll, id).await.unwrap();
        assert!(source.options(poll).is_empty());
        assert_eq!(source.deleted(), vec![(poll, id)]);

        let again = source.delete_option(poll, id).await;
        assert!(matches!(again, Err(PollError::OptionNotFound(_))));
    }

    #[tokio::test]
    async fn injected_failures() {
        let source = MockPollSource::new();
        let poll = PollId::new(1);
        source.set_poll(poll, vec![option(1, 0, 0, 0)], vec![]);

        source.fail_delete_of(OptionId::new(1));
        assert!(source.delete_option(poll, OptionId::new(1)).await.is_err());
        assert_eq!(source.options(poll).len(), 1);

        source.set_fail_fetch(true);
        assert!(source.load_poll(poll, true).await.is_err());
    }
}
