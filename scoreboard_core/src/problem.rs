//! Per team-problem scoring state with freeze bookkeeping.

use scoreboard_env::Submission;

use crate::board::ProblemCell;

/// Penalty minutes charged per rejected attempt on a solved problem.
pub const WRONG_ATTEMPT_PENALTY: u32 = 20;

/// Scoring state of one problem for one team.
///
/// The visible fields are what the scoreboard shows. While the board is
/// frozen, submissions on an unsolved problem are parked in `withheld`
/// until a scroll discloses them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProblemState {
    solved: bool,
    solve_time: u32,
    wrong_attempts: u32,
    withheld: Vec<Submission>,
}

impl ProblemState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the problem is visibly solved.
    pub fn is_solved(&self) -> bool {
        self.solved
    }

    /// Minute of the first accepted submission, if visibly solved.
    pub fn solve_time(&self) -> Option<u32> {
        self.solved.then_some(self.solve_time)
    }

    /// Rejected attempts counted on the visible board.
    pub fn wrong_attempts(&self) -> u32 {
        self.wrong_attempts
    }

    /// Submissions waiting for disclosure.
    pub fn withheld(&self) -> &[Submission] {
        &self.withheld
    }

    pub fn has_withheld(&self) -> bool {
        !self.withheld.is_empty()
    }

    /// Penalty contributed by this problem, if visibly solved.
    pub fn penalty(&self) -> Option<u64> {
        self.solve_time().map(|t| {
            u64::from(t) + u64::from(WRONG_ATTEMPT_PENALTY) * u64::from(self.wrong_attempts)
        })
    }

    /// Applies a submission to the visible state.
    ///
    /// The first accepted submission solves the problem; anything after
    /// that has no effect. Rejections before the solve count as wrong
    /// attempts.
    pub fn apply(&mut self, submission: &Submission) {
        if self.solved {
            return;
        }
        if submission.verdict.is_accepted() {
            self.solved = true;
            self.solve_time = submission.time;
        } else {
            self.wrong_attempts += 1;
        }
    }

    /// Parks a submission received while frozen.
    pub fn withhold(&mut self, submission: Submission) {
        self.withheld.push(submission);
    }

    /// Replays every withheld submission in arrival order and clears the
    /// buffer. Returns how many submissions were disclosed.
    pub fn disclose(&mut self) -> usize {
        let pending = std::mem::take(&mut self.withheld);
        for submission in &pending {
            self.apply(submission);
        }
        pending.len()
    }

    /// Board cell for this state.
    pub fn cell(&self) -> ProblemCell {
        if self.solved {
            ProblemCell::Solved { wrong: self.wrong_attempts }
        } else if !self.withheld.is_empty() {
            ProblemCell::Pending {
                wrong: self.wrong_attempts,
                withheld: self.withheld.len(),
            }
        } else if self.wrong_attempts > 0 {
            ProblemCell::Failed { wrong: self.wrong_attempts }
        } else {
            ProblemCell::Untouched
        }
    }
}
