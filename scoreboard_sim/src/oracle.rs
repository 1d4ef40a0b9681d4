//! Ground truth oracle for scenario checks.
//!
//! The oracle ignores the freeze entirely: it replays every team's ledger
//! in arrival order against fresh problem states. Once a scroll has
//! disclosed everything, the contest's standing must equal this replay.

use scoreboard_core::{Contest, ProblemState, RankEntry, Standing, Team};
use scoreboard_env::ProblemId;
use std::collections::BTreeMap;

/// Unfrozen replay of a contest's ledgers.
pub struct Oracle {
    standing: Standing,
}

impl Oracle {
    /// Replays every ledger of `contest`.
    pub fn replay(contest: &Contest) -> Self {
        let entries = contest
            .teams()
            .map(|team| Self::replay_team(team, contest.problems()))
            .collect();
        Self {
            standing: Standing::from_entries(entries),
        }
    }

    fn replay_team(team: &Team, problems: &[ProblemId]) -> RankEntry {
        let mut states: BTreeMap<ProblemId, ProblemState> = BTreeMap::new();
        for submission in team.ledger() {
            if problems.contains(&submission.problem) {
                states.entry(submission.problem).or_default().apply(submission);
            }
        }

        let mut penalty: u64 = 0;
        let mut times = Vec::new();
        for state in states.values() {
            if let (Some(time), Some(p)) = (state.solve_time(), state.penalty()) {
                times.push(time);
                penalty += p;
            }
        }
        RankEntry::new(team.name(), penalty, times)
    }

    /// The expected standing.
    pub fn standing(&self) -> &Standing {
        &self.standing
    }

    /// Compares the expected standing with `actual`.
    ///
    /// Returns a description of the first mismatch, if any.
    pub fn verify(&self, actual: &Standing) -> Result<(), String> {
        if self.standing.len() != actual.len() {
            return Err(format!(
                "standing has {} teams, oracle expects {}",
                actual.len(),
                self.standing.len()
            ));
        }
        for (expected, got) in self.standing.placements().iter().zip(actual.placements()) {
            if expected != got {
                return Err(format!(
                    "rank {}: expected {} ({} solved, {} penalty), got {} ({} solved, {} penalty)",
                    expected.rank,
                    expected.entry.team(),
                    expected.entry.solved(),
                    expected.entry.penalty(),
                    got.entry.team(),
                    got.entry.solved(),
                    got.entry.penalty(),
                ));
            }
        }
        Ok(())
    }
}
