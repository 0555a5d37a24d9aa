//! Vote reconciliation
//!
//! The poll service reports yes and maybe counts per option but not "no".
//! Anybody who voted somewhere in the poll and did not say yes or maybe to a
//! given option is counted as a no for that option.

use std::collections::HashSet;
use weekender_api::{PollOption, Tally, Voter};

/// Fill in the derived "no" count for every option.
///
/// `no = total_voters - (yes + maybe)`. The result is not clamped: a negative
/// value means the upstream voter list and tallies disagree, and callers
/// should treat it as a data-quality signal rather than an error.
pub fn reconcile(options: &[PollOption], total_voters: usize) -> Vec<PollOption> {
    let total = i64::try_from(total_voters).unwrap_or(i64::MAX);
    options
        .iter()
        .map(|option| {
            let Tally { yes, maybe, .. } = option.tally;
            option.with_tally(Tally {
                yes,
                maybe,
                no: total - (yes + maybe),
            })
        })
        .collect()
}

/// Number of distinct participants across the whole poll
pub fn count_distinct_voters(voters: &[Voter]) -> usize {
    voters.iter().map(|v| &v.key).collect::<HashSet<_>>().len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use weekender_api::VoterKey;
    use weekender_util::OptionId;

    fn option(id: i64, yes: i64, maybe: i64) -> PollOption {
        PollOption::new(OptionId::new(id), 1_705_017_600, 86_400, Tally::new(yes, maybe, 0))
    }

    fn voter(key: VoterKey) -> Voter {
        Voter {
            key,
            display_name: String::new(),
        }
    }

    #[test]
    fn derives_no_from_voter_total() {
        let options = vec![option(1, 3, 1), option(2, 0, 2), option(3, 0, 0)];
        let reconciled = reconcile(&options, 5);

        assert_eq!(reconciled[0].tally, Tally::new(3, 1, 1));
        assert_eq!(reconciled[1].tally, Tally::new(0, 2, 3));
        assert_eq!(reconciled[2].tally, Tally::new(0, 0, 5));
    }

    #[test]
    fn tally_always_sums_to_voter_total() {
        let options: Vec<_> = (0..6).map(|i| option(i, i, 6 - i)).collect();
        for total in [0usize, 3, 6, 9] {
            for reconciled in reconcile(&options, total) {
                let Tally { yes, maybe, no } = reconciled.tally;
                assert_eq!(no, total as i64 - yes - maybe);
                assert_eq!(reconciled.tally.total(), total as i64);
            }
        }
    }

    #[test]
    fn inconsistent_data_goes_negative() {
        let reconciled = reconcile(&[option(1, 4, 2)], 3);
        assert_eq!(reconciled[0].tally.no, -3);
    }

    #[test]
    fn reported_no_is_overwritten_and_input_untouched() {
        let mut reported = option(1, 1, 1);
        reported.tally.no = 40;
        let input = vec![reported];

        let reconciled = reconcile(&input, 4);

        assert_eq!(reconciled[0].tally.no, 2);
        assert_eq!(input[0].tally.no, 40);
        assert_eq!(reconciled[0].id, input[0].id);
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert!(reconcile(&[], 10).is_empty());
    }

    #[test]
    fn distinct_voters_deduplicate_by_key() {
        let voters = vec![
            voter(VoterKey::User("alice".into())),
            voter(VoterKey::User("bob".into())),
            voter(VoterKey::User("alice".into())),
            voter(VoterKey::Guest("alice".into())),
        ];
        assert_eq!(count_distinct_voters(&voters), 3);
        assert_eq!(count_distinct_voters(&[]), 0);
    }
}
