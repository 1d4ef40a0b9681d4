//! The Rank Engine.
//!
//! Maps the visible state of every team to a totally ordered standing.
//! Ordering, best first:
//!
//! 1. more solved problems
//! 2. lower penalty
//! 3. smaller descending-sorted solve-time sequence (lexicographic)
//! 4. team name ascending
//!
//! Step 3 compares sequences of equal length, since it is only reached
//! when solved counts are equal. Step 4 makes the order total, so the
//! result never depends on input order.

use serde::Serialize;
use std::cmp::Ordering;

use crate::team::Team;

/// Ranking key derived from a team's visibly solved problems.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankEntry {
    team: String,
    /// Sum of `time + 20 * wrong` over solved problems
    penalty: u64,
    /// Solve times, largest first
    solve_times: Vec<u32>,
}

impl RankEntry {
    /// Builds an entry; `solve_times` may be in any order.
    pub fn new(team: impl Into<String>, penalty: u64, mut solve_times: Vec<u32>) -> Self {
        solve_times.sort_unstable_by(|a, b| b.cmp(a));
        Self {
            team: team.into(),
            penalty,
            solve_times,
        }
    }

    pub fn team(&self) -> &str {
        &self.team
    }

    pub fn solved(&self) -> usize {
        self.solve_times.len()
    }

    pub fn penalty(&self) -> u64 {
        self.penalty
    }

    pub fn solve_times(&self) -> &[u32] {
        &self.solve_times
    }
}

/// Total order over rank entries; `Less` means ranked higher.
pub fn compare(a: &RankEntry, b: &RankEntry) -> Ordering {
    b.solved()
        .cmp(&a.solved())
        .then_with(|| a.penalty.cmp(&b.penalty))
        .then_with(|| a.solve_times.cmp(&b.solve_times))
        .then_with(|| a.team.cmp(&b.team))
}

/// One row of a standing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Placement {
    /// 1-based rank
    pub rank: usize,
    pub entry: RankEntry,
}

/// Teams in rank order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Standing {
    placements: Vec<Placement>,
}

impl Standing {
    /// Builds a standing from unordered entries.
    pub fn from_entries(mut entries: Vec<RankEntry>) -> Self {
        entries.sort_by(compare);
        let placements = entries
            .into_iter()
            .enumerate()
            .map(|(i, entry)| Placement { rank: i + 1, entry })
            .collect();
        Self { placements }
    }

    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    pub fn len(&self) -> usize {
        self.placements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    /// Rank of the named team.
    pub fn rank_of(&self, team: &str) -> Option<usize> {
        self.placement_of(team).map(|p| p.rank)
    }

    pub fn placement_of(&self, team: &str) -> Option<&Placement> {
        self.placements.iter().find(|p| p.entry.team() == team)
    }

    /// Team holding the given rank.
    pub fn team_at(&self, rank: usize) -> Option<&str> {
        rank.checked_sub(1)
            .and_then(|i| self.placements.get(i))
            .map(|p| p.entry.team())
    }
}

/// Computes the standing of the given teams.
pub fn compute<'a>(teams: impl IntoIterator<Item = &'a Team>) -> Standing {
    Standing::from_entries(teams.into_iter().map(Team::rank_entry).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn entry(team: &str, penalty: u64, times: &[u32]) -> RankEntry {
        RankEntry::new(team, penalty, times.to_vec())
    }

    #[test]
    fn test_more_solved_wins() {
        let a = entry("a", 500, &[100, 100]);
        let b = entry("b", 5, &[5]);
        assert_eq!(compare(&a, &b), Ordering::Less);
    }

    #[test]
    fn test_lower_penalty_wins() {
        // a: solved at 10 after one wrong attempt; b: solved at 5 clean
        let a = entry("a", 30, &[10]);
        let b = entry("b", 5, &[5]);
        let standing = Standing::from_entries(vec![a, b]);
        assert_eq!(standing.team_at(1), Some("b"));
        assert_eq!(standing.team_at(2), Some("a"));
    }

    #[test]
    fn test_solve_time_profile_breaks_penalty_tie() {
        // Same penalty; descending times [60, 40] vs [70, 30]
        let a = entry("zed", 100, &[40, 60]);
        let b = entry("amy", 100, &[30, 70]);
        assert_eq!(a.solve_times(), &[60, 40]);
        assert_eq!(compare(&a, &b), Ordering::Less);
    }

    #[test]
    fn test_name_is_final_tiebreak() {
        let a = entry("beta", 20, &[20]);
        let b = entry("alpha", 20, &[20]);
        assert_eq!(compare(&b, &a), Ordering::Less);
        assert_eq!(compare(&a, &a), Ordering::Equal);
    }

    #[test]
    fn test_empty_standing() {
        let standing = compute(std::iter::empty());
        assert!(standing.is_empty());
        assert_eq!(standing.team_at(0), None);
        assert_eq!(standing.team_at(1), None);
    }

    #[test]
    fn test_compute_is_idempotent_and_order_independent() {
        let entries = vec![
            entry("c", 0, &[]),
            entry("a", 40, &[40]),
            entry("b", 40, &[40]),
        ];
        let mut reversed = entries.clone();
        reversed.reverse();

        let first = Standing::from_entries(entries.clone());
        let again = Standing::from_entries(entries);
        let shuffled = Standing::from_entries(reversed);
        assert_eq!(first, again);
        assert_eq!(first, shuffled);
        assert_eq!(first.rank_of("b"), Some(2));
        assert_eq!(first.rank_of("nobody"), None);
    }

    fn arb_entry() -> impl Strategy<Value = RankEntry> {
        (
            "[a-d]{1,2}",
            prop::collection::vec(0u32..300, 0..4),
            0u32..4,
        )
            .prop_map(|(name, times, wrong)| {
                let penalty = times.iter().map(|&t| u64::from(t)).sum::<u64>()
                    + 20 * u64::from(wrong) * times.len() as u64;
                RankEntry::new(name, penalty, times)
            })
    }

    proptest! {
        #[test]
        fn prop_compare_is_antisymmetric(a in arb_entry(), b in arb_entry()) {
            prop_assert_eq!(compare(&a, &b), compare(&b, &a).reverse());
        }

        #[test]
        fn prop_compare_is_transitive(a in arb_entry(), b in arb_entry(), c in arb_entry()) {
            if compare(&a, &b) != Ordering::Greater && compare(&b, &c) != Ordering::Greater {
                prop_assert_ne!(compare(&a, &c), Ordering::Greater);
            }
        }

        #[test]
        fn prop_equal_only_when_identical(a in arb_entry(), b in arb_entry()) {
            if compare(&a, &b) == Ordering::Equal {
                prop_assert_eq!(a, b);
            }
        }
    }
}
