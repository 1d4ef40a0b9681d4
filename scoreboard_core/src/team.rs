//! Team records: submission ledger plus per-problem state.

use scoreboard_env::{Filter, ProblemId, Submission, Verdict};
use std::collections::BTreeMap;

use crate::board::ProblemCell;
use crate::problem::ProblemState;
use crate::rank::RankEntry;

/// A registered team.
#[derive(Debug, Clone)]
pub struct Team {
    name: String,

    /// Every submission ever received, in arrival order. Append-only.
    ledger: Vec<Submission>,

    /// Problem states, created on first submission to that problem.
    problems: BTreeMap<ProblemId, ProblemState>,
}

impl Team {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ledger: Vec::new(),
            problems: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Full submission history, oldest first.
    pub fn ledger(&self) -> &[Submission] {
        &self.ledger
    }

    /// Appends a submission to the ledger.
    pub(crate) fn record(&mut self, submission: Submission) {
        self.ledger.push(submission);
    }

    /// Returns the state of a problem, if the team has touched it.
    pub fn problem(&self, id: ProblemId) -> Option<&ProblemState> {
        self.problems.get(&id)
    }

    pub(crate) fn problem_mut(&mut self, id: ProblemId) -> &mut ProblemState {
        self.problems.entry(id).or_default()
    }

    /// Newest submission matching both filters.
    pub fn find_submission(
        &self,
        problem: Filter<ProblemId>,
        verdict: Filter<Verdict>,
    ) -> Option<&Submission> {
        self.ledger
            .iter()
            .rev()
            .find(|s| problem.matches(&s.problem) && verdict.matches(&s.verdict))
    }

    /// Smallest problem id that still holds withheld submissions.
    pub fn first_withheld_problem(&self) -> Option<ProblemId> {
        self.problems
            .iter()
            .find(|(_, state)| state.has_withheld())
            .map(|(id, _)| *id)
    }

    pub fn has_withheld(&self) -> bool {
        self.problems.values().any(ProblemState::has_withheld)
    }

    /// Total number of withheld submissions across problems.
    pub fn withheld_count(&self) -> usize {
        self.problems.values().map(|p| p.withheld().len()).sum()
    }

    /// Derives the ranking key from visibly solved problems.
    pub fn rank_entry(&self) -> RankEntry {
        let mut solve_times: Vec<u32> = Vec::new();
        let mut penalty: u64 = 0;
        for state in self.problems.values() {
            if let (Some(time), Some(p)) = (state.solve_time(), state.penalty()) {
                solve_times.push(time);
                penalty += p;
            }
        }
        RankEntry::new(self.name.clone(), penalty, solve_times)
    }

    /// Board cells for the given problem set, in order.
    pub fn cells(&self, problems: &[ProblemId]) -> Vec<ProblemCell> {
        problems
            .iter()
            .map(|id| {
                self.problems
                    .get(id)
                    .map(ProblemState::cell)
                    .unwrap_or(ProblemCell::Untouched)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(index: usize) -> ProblemId {
        ProblemId::from_index(index).unwrap()
    }

    fn submit(team: &mut Team, problem: usize, verdict: Verdict, time: u32) {
        let sub = Submission::new(p(problem), verdict, time);
        team.record(sub);
        team.problem_mut(sub.problem).apply(&sub);
    }

    #[test]
    fn test_find_submission_newest_first() {
        let mut team = Team::new("alpha");
        submit(&mut team, 0, Verdict::WrongAnswer, 1);
        submit(&mut team, 1, Verdict::Accepted, 5);
        submit(&mut team, 0, Verdict::Accepted, 9);

        let latest = team.find_submission(Filter::Any, Filter::Any).unwrap();
        assert_eq!(latest.time, 9);

        let wrong = team
            .find_submission(Filter::Any, Filter::Only(Verdict::WrongAnswer))
            .unwrap();
        assert_eq!(wrong.time, 1);

        let b = team.find_submission(Filter::Only(p(1)), Filter::Any).unwrap();
        assert_eq!(b.verdict, Verdict::Accepted);

        assert!(team
            .find_submission(Filter::Only(p(2)), Filter::Any)
            .is_none());
    }

    #[test]
    fn test_rank_entry_counts_only_solved() {
        let mut team = Team::new("alpha");
        submit(&mut team, 0, Verdict::WrongAnswer, 1);
        submit(&mut team, 0, Verdict::Accepted, 10);
        submit(&mut team, 1, Verdict::WrongAnswer, 12);
        submit(&mut team, 2, Verdict::Accepted, 50);

        let entry = team.rank_entry();
        assert_eq!(entry.solved(), 2);
        assert_eq!(entry.penalty(), 80);
        assert_eq!(entry.solve_times(), &[50, 10]);
    }

    #[test]
    fn test_first_withheld_problem_is_smallest() {
        let mut team = Team::new("alpha");
        team.problem_mut(p(3))
            .withhold(Submission::new(p(3), Verdict::Accepted, 5));
        team.problem_mut(p(1))
            .withhold(Submission::new(p(1), Verdict::WrongAnswer, 6));

        assert_eq!(team.first_withheld_problem(), Some(p(1)));
        assert_eq!(team.withheld_count(), 2);
    }

    #[test]
    fn test_cells_for_untouched_problems() {
        let team = Team::new("alpha");
        let cells = team.cells(&ProblemId::first(2));
        assert_eq!(cells, vec![ProblemCell::Untouched, ProblemCell::Untouched]);
    }
}
