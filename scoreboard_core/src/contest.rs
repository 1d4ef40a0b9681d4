//! The contest engine: team registry, freeze controller and queries.

use scoreboard_env::{BoardError, Filter, ProblemId, Submission, Verdict};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, info};

use crate::board::BoardRow;
use crate::rank::{self, Standing};
use crate::team::Team;

/// Where a submission ended up after `Contest::submit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Routing {
    /// Applied to the visible problem state
    Applied,

    /// Parked until the next scroll
    Withheld,

    /// Recorded in the ledger only (problem already solved, or not part
    /// of the contest's problem set)
    LedgerOnly,
}

/// Answer to a ranking query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankQuery {
    pub team: String,
    pub rank: usize,

    /// True while frozen: withheld results are not reflected yet
    pub stale: bool,
}

/// A whole contest.
///
/// All operations run to completion on `&mut self`; there is no shared or
/// global state.
#[derive(Debug, Clone, Default)]
pub struct Contest {
    /// Teams keyed by name; iteration is alphabetical
    pub(crate) teams: BTreeMap<String, Team>,

    started: bool,
    ended: bool,
    pub(crate) frozen: bool,

    /// Contest length in minutes
    duration: u32,

    /// Problem set, assigned at start
    problems: Vec<ProblemId>,

    /// Most recently computed standing
    pub(crate) standing: Option<Standing>,
}

impl Contest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a team. Only allowed before the contest starts.
    pub fn add_team(&mut self, name: &str) -> Result<(), BoardError> {
        if self.started {
            return Err(BoardError::CompetitionAlreadyStarted);
        }
        if self.teams.contains_key(name) {
            return Err(BoardError::duplicate(name));
        }
        self.teams.insert(name.to_string(), Team::new(name));
        debug!("Registered team {}", name);
        Ok(())
    }

    /// Starts the contest with `problem_count` problems lettered from `A`.
    pub fn start(&mut self, duration: u32, problem_count: usize) -> Result<(), BoardError> {
        if self.started {
            return Err(BoardError::CompetitionAlreadyStarted);
        }
        self.started = true;
        self.duration = duration;
        self.problems = ProblemId::first(problem_count);
        info!(
            "Contest started: {} teams, {} problems, {} minutes",
            self.teams.len(),
            self.problems.len(),
            duration
        );
        Ok(())
    }

    /// Records a submission and routes it through the freeze controller.
    ///
    /// The ledger always receives the submission. Scoring state changes
    /// only when unfrozen or when the problem is already visibly solved
    /// (in which case nothing changes anyway); otherwise the submission
    /// is withheld.
    pub fn submit(
        &mut self,
        problem: ProblemId,
        team: &str,
        verdict: Verdict,
        time: u32,
    ) -> Result<Routing, BoardError> {
        let in_contest = self.problems.contains(&problem);
        let frozen = self.frozen;
        let entry = self
            .teams
            .get_mut(team)
            .ok_or_else(|| BoardError::not_found(team))?;

        let submission = Submission::new(problem, verdict, time);
        entry.record(submission);
        if !in_contest {
            debug!("{} submitted {} outside the problem set", team, problem);
            return Ok(Routing::LedgerOnly);
        }

        let state = entry.problem_mut(problem);
        let routing = if state.is_solved() {
            Routing::LedgerOnly
        } else if frozen {
            state.withhold(submission);
            Routing::Withheld
        } else {
            state.apply(&submission);
            Routing::Applied
        };
        debug!("{} {} {} at {} -> {:?}", team, problem, verdict, time, routing);
        Ok(routing)
    }

    /// Recomputes and caches the standing.
    pub fn flush(&mut self) -> &Standing {
        self.standing.insert(rank::compute(self.teams.values()))
    }

    /// Freezes the scoreboard.
    pub fn freeze(&mut self) -> Result<(), BoardError> {
        if self.frozen {
            return Err(BoardError::AlreadyFrozen);
        }
        self.frozen = true;
        info!("Scoreboard frozen");
        Ok(())
    }

    /// Rank of a team in the last computed standing.
    ///
    /// Teams the cached standing does not cover (none computed yet, or
    /// registered after the last flush) are ranked by name.
    pub fn query_ranking(&self, team: &str) -> Result<RankQuery, BoardError> {
        if !self.teams.contains_key(team) {
            return Err(BoardError::not_found(team));
        }
        let rank = self
            .standing
            .as_ref()
            .and_then(|standing| standing.rank_of(team))
            .unwrap_or_else(|| {
                self.teams.keys().take_while(|name| name.as_str() < team).count() + 1
            });

        Ok(RankQuery {
            team: team.to_string(),
            rank,
            stale: self.frozen,
        })
    }

    /// Newest submission of `team` matching both filters, `None` if none do.
    pub fn query_submission(
        &self,
        team: &str,
        problem: Filter<ProblemId>,
        verdict: Filter<Verdict>,
    ) -> Result<Option<Submission>, BoardError> {
        let entry = self
            .teams
            .get(team)
            .ok_or_else(|| BoardError::not_found(team))?;
        Ok(entry.find_submission(problem, verdict).copied())
    }

    /// Ends the contest.
    pub fn end(&mut self) {
        self.ended = true;
        info!("Contest ended");
    }

    /// Board rows for the given standing.
    pub fn board(&self, standing: &Standing) -> Vec<BoardRow> {
        standing
            .placements()
            .iter()
            .filter_map(|placement| {
                let team = self.teams.get(placement.entry.team())?;
                Some(BoardRow {
                    team: team.name().to_string(),
                    rank: placement.rank,
                    solved: placement.entry.solved(),
                    penalty: placement.entry.penalty(),
                    cells: team.cells(&self.problems),
                })
            })
            .collect()
    }

    /// Board rows for the cached standing, or a fresh one if none is cached.
    pub fn scoreboard(&self) -> Vec<BoardRow> {
        match &self.standing {
            Some(standing) => self.board(standing),
            None => self.board(&rank::compute(self.teams.values())),
        }
    }

    pub fn team(&self, name: &str) -> Option<&Team> {
        self.teams.get(name)
    }

    /// Teams in name order.
    pub fn teams(&self) -> impl Iterator<Item = &Team> {
        self.teams.values()
    }

    pub fn problems(&self) -> &[ProblemId] {
        &self.problems
    }

    pub fn duration(&self) -> u32 {
        self.duration
    }

    pub fn standing(&self) -> Option<&Standing> {
        self.standing.as_ref()
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    pub fn is_ended(&self) -> bool {
        self.ended
    }

    /// Total withheld submissions across all teams.
    pub fn withheld_count(&self) -> usize {
        self.teams.values().map(Team::withheld_count).sum()
    }
}
