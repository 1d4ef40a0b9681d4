//! The Scroll Engine: discloses withheld results after a freeze.
//!
//! Disclosure proceeds one problem at a time. Each step picks the
//! worst-ranked team (in the most recent standing) that still holds
//! withheld submissions, discloses its lowest-lettered pending problem,
//! and re-ranks. A team whose rank strictly improves in that step yields
//! an [`Overtake`].
//!
//! Every step drains one non-empty buffer, so the loop ends after at most
//! as many steps as there were pending (team, problem) pairs.

use scoreboard_env::{BoardError, ProblemId};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, info};

use crate::board::BoardRow;
use crate::contest::Contest;
use crate::rank::{self, Standing};
use crate::team::Team;

/// A team climbing past others during a scroll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Overtake {
    /// Team whose result was disclosed
    pub team: String,

    /// Team now directly below it
    pub displaced: String,

    /// Updated solved count of `team`
    pub solved: usize,

    /// Updated penalty of `team`
    pub penalty: u64,
}

impl fmt::Display for Overtake {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} {}", self.team, self.displaced, self.solved, self.penalty)
    }
}

/// One disclosure step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Disclosure {
    pub team: String,
    pub problem: ProblemId,

    /// Number of withheld submissions replayed
    pub submissions: usize,

    pub old_rank: usize,
    pub new_rank: usize,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub overtake: Option<Overtake>,
}

/// Everything a scroll produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScrollReport {
    /// Board before any disclosure
    pub before: Vec<BoardRow>,

    /// Disclosure steps, in order
    pub steps: Vec<Disclosure>,

    /// Board after every withheld result was disclosed
    pub after: Vec<BoardRow>,
}

impl ScrollReport {
    pub fn overtakes(&self) -> impl Iterator<Item = &Overtake> {
        self.steps.iter().filter_map(|s| s.overtake.as_ref())
    }
}

/// Worst-ranked team with withheld submissions, its rank in `standing`,
/// and its first pending problem.
fn next_disclosure<'a>(
    teams: &'a mut BTreeMap<String, Team>,
    standing: &Standing,
) -> Option<(&'a mut Team, usize, ProblemId)> {
    teams
        .values_mut()
        .filter_map(|team| {
            let problem = team.first_withheld_problem()?;
            let rank = standing.rank_of(team.name())?;
            Some((team, rank, problem))
        })
        .max_by(|a, b| a.1.cmp(&b.1).then_with(|| b.0.name().cmp(a.0.name())))
}

impl Contest {
    /// Discloses every withheld result and unfreezes the board.
    pub fn scroll(&mut self) -> Result<ScrollReport, BoardError> {
        if !self.frozen {
            return Err(BoardError::NotFrozen);
        }
        info!("Scrolling {} withheld submissions", self.withheld_count());

        let mut standing = rank::compute(self.teams.values());
        let before = self.board(&standing);
        let mut steps = Vec::new();

        while let Some((team, old_rank, problem)) = next_disclosure(&mut self.teams, &standing) {
            let name = team.name().to_string();
            let submissions = team.problem_mut(problem).disclose();

            let next = rank::compute(self.teams.values());
            let new_rank = next.rank_of(&name).unwrap_or(old_rank);
            let overtake = next
                .placement_of(&name)
                .filter(|p| p.rank < old_rank)
                .map(|p| Overtake {
                    team: name.clone(),
                    displaced: next.team_at(p.rank + 1).unwrap_or_default().to_string(),
                    solved: p.entry.solved(),
                    penalty: p.entry.penalty(),
                });

            debug!(
                "Disclosed {} {} ({} submissions): rank {} -> {}",
                name, problem, submissions, old_rank, new_rank
            );
            steps.push(Disclosure {
                team: name,
                problem,
                submissions,
                old_rank,
                new_rank,
                overtake,
            });
            standing = next;
        }

        let after = self.board(&standing);
        self.standing = Some(standing);
        self.frozen = false;
        info!("Scroll finished after {} disclosures", steps.len());

        Ok(ScrollReport { before, steps, after })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scoreboard_env::Verdict;

    fn p(letter: char) -> ProblemId {
        letter.to_string().parse().unwrap()
    }

    fn contest(teams: &[&str], problems: usize) -> Contest {
        let mut contest = Contest::new();
        for team in teams {
            contest.add_team(team).unwrap();
        }
        contest.start(300, problems).unwrap();
        contest
    }

    #[test]
    fn test_scroll_requires_freeze() {
        let mut contest = contest(&["alpha"], 1);
        assert_eq!(contest.scroll(), Err(BoardError::NotFrozen));

        contest.freeze().unwrap();
        contest.scroll().unwrap();
        assert!(!contest.is_frozen());
        assert_eq!(contest.scroll(), Err(BoardError::NotFrozen));
    }

    #[test]
    fn test_withheld_problem_disclosed_in_one_step() {
        let mut contest = contest(&["T1"], 1);
        contest.freeze().unwrap();
        contest.submit(p('A'), "T1", Verdict::WrongAnswer, 30).unwrap();
        contest.submit(p('A'), "T1", Verdict::Accepted, 40).unwrap();

        let report = contest.scroll().unwrap();
        assert_eq!(report.before[0].to_string(), "T1 1 0 0 0/2");
        assert_eq!(report.steps.len(), 1);
        assert_eq!(report.steps[0].submissions, 2);

        let state = contest.team("T1").unwrap().problem(p('A')).unwrap();
        assert_eq!(state.solve_time(), Some(40));
        assert_eq!(state.wrong_attempts(), 1);
        assert_eq!(report.after[0].to_string(), "T1 1 1 60 +1");
    }

    #[test]
    fn test_worst_ranked_team_first() {
        let mut contest = contest(&["alpha", "beta", "gamma"], 2);
        contest.submit(p('A'), "alpha", Verdict::Accepted, 10).unwrap();
        contest.freeze().unwrap();
        contest.submit(p('B'), "beta", Verdict::Accepted, 100).unwrap();
        contest.submit(p('A'), "gamma", Verdict::Accepted, 50).unwrap();
        contest.submit(p('B'), "gamma", Verdict::WrongAnswer, 60).unwrap();

        let report = contest.scroll().unwrap();
        let order: Vec<(&str, ProblemId)> = report
            .steps
            .iter()
            .map(|s| (s.team.as_str(), s.problem))
            .collect();
        assert_eq!(order, vec![("gamma", p('A')), ("beta", p('B')), ("gamma", p('B'))]);

        let overtakes: Vec<String> = report.overtakes().map(|o| o.to_string()).collect();
        assert_eq!(overtakes, vec!["gamma beta 1 50"]);

        let after: Vec<String> = report.after.iter().map(|r| r.to_string()).collect();
        assert_eq!(
            after,
            vec!["alpha 1 1 10 + .", "gamma 2 1 50 + -1", "beta 3 1 100 . +"]
        );
    }

    #[test]
    fn test_next_disclosure_picks_worst_pending_team() {
        let mut contest = contest(&["alpha", "beta", "gamma"], 3);
        contest.submit(p('A'), "gamma", Verdict::Accepted, 10).unwrap();
        contest.freeze().unwrap();
        contest.submit(p('C'), "alpha", Verdict::Accepted, 100).unwrap();
        contest.submit(p('B'), "alpha", Verdict::WrongAnswer, 110).unwrap();
        contest.submit(p('B'), "gamma", Verdict::Accepted, 120).unwrap();

        // gamma 1, alpha 2, beta 3 (nothing pending)
        let standing = rank::compute(contest.teams.values());
        let (team, rank, problem) = next_disclosure(&mut contest.teams, &standing).unwrap();
        assert_eq!((team.name(), rank, problem), ("alpha", 2, p('B')));

        // The returned team is the live one
        assert_eq!(team.problem_mut(problem).disclose(), 1);
        assert_eq!(contest.team("alpha").unwrap().withheld_count(), 1);

        contest.scroll().unwrap();
        let standing = rank::compute(contest.teams.values());
        assert!(next_disclosure(&mut contest.teams, &standing).is_none());
    }

    #[test]
    fn test_overtake_names_team_directly_below() {
        let mut contest = contest(&["alpha", "beta", "gamma"], 2);
        contest.submit(p('A'), "alpha", Verdict::Accepted, 100).unwrap();
        contest.submit(p('A'), "beta", Verdict::Accepted, 120).unwrap();
        contest.freeze().unwrap();
        contest.submit(p('A'), "gamma", Verdict::Accepted, 5).unwrap();
        contest.submit(p('B'), "gamma", Verdict::Accepted, 6).unwrap();

        let report = contest.scroll().unwrap();
        assert_eq!(report.steps.len(), 2);

        let first = report.steps[0].overtake.as_ref().unwrap();
        assert_eq!(first.to_string(), "gamma alpha 1 5");
        assert_eq!((report.steps[0].old_rank, report.steps[0].new_rank), (3, 1));

        // Already first: no further overtake
        assert!(report.steps[1].overtake.is_none());
        assert_eq!(report.overtakes().count(), 1);
    }

    #[test]
    fn test_overtake_only_on_strict_improvement() {
        let mut contest = contest(&["alpha", "beta"], 1);
        contest.submit(p('A'), "alpha", Verdict::Accepted, 10).unwrap();
        contest.freeze().unwrap();
        contest.submit(p('A'), "beta", Verdict::Accepted, 20).unwrap();

        let report = contest.scroll().unwrap();
        assert_eq!(report.steps[0].old_rank, 2);
        assert_eq!(report.steps[0].new_rank, 2);
        assert_eq!(report.overtakes().count(), 0);
    }

    #[test]
    fn test_scroll_clears_all_buffers_and_caches_standing() {
        let mut contest = contest(&["alpha", "beta"], 3);
        contest.freeze().unwrap();
        for (i, team) in ["alpha", "beta"].iter().enumerate() {
            for letter in ['A', 'B', 'C'] {
                contest
                    .submit(p(letter), team, Verdict::TimeLimitExceed, 10 + i as u32)
                    .unwrap();
            }
        }
        assert_eq!(contest.withheld_count(), 6);

        let report = contest.scroll().unwrap();
        assert_eq!(report.steps.len(), 6);
        assert_eq!(contest.withheld_count(), 0);
        assert!(!contest.is_frozen());
        assert!(contest.standing().is_some());
        assert_eq!(report.after[0].to_string(), "alpha 1 0 0 -1 -1 -1");
    }

    #[test]
    fn test_submissions_after_freeze_on_solved_problem_ignored() {
        let mut contest = contest(&["alpha"], 1);
        contest.submit(p('A'), "alpha", Verdict::Accepted, 10).unwrap();
        contest.freeze().unwrap();
        contest.submit(p('A'), "alpha", Verdict::WrongAnswer, 20).unwrap();

        let report = contest.scroll().unwrap();
        assert!(report.steps.is_empty());
        assert_eq!(report.after[0].to_string(), "alpha 1 1 10 +");
        assert_eq!(contest.team("alpha").unwrap().ledger().len(), 2);
    }

    #[test]
    fn test_refreeze_after_scroll() {
        let mut contest = contest(&["alpha"], 1);
        contest.freeze().unwrap();
        contest.scroll().unwrap();
        contest.freeze().unwrap();
        contest.submit(p('A'), "alpha", Verdict::Accepted, 250).unwrap();

        let report = contest.scroll().unwrap();
        assert_eq!(report.steps.len(), 1);
        assert_eq!(report.after[0].to_string(), "alpha 1 1 250 +");
    }
}
