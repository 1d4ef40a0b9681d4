//! Seeded contest scenarios.
//!
//! Each scenario turns a `ScenarioConfig` into a complete command script.
//! All randomness comes from a `ChaCha8Rng` seeded with the config seed, so
//! a failing run is reproducible from its seed alone.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use scoreboard_env::{Filter, ProblemId, Verdict, MAX_PROBLEMS};
use std::fmt;
use std::str::FromStr;

use crate::command::Command;

/// Scenario identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenarioId {
    /// No freeze at all; the final flush must match the oracle
    Quiet,

    /// Freeze for the last fifth of the contest, then a burst of accepts
    LateSurge,

    /// Few distinct solve minutes, so most ties fall through to names
    PhotoFinish,

    /// Freeze right after start; every submission is withheld
    FrozenWall,
}

impl ScenarioId {
    /// Returns a list of all scenarios.
    pub fn all() -> Vec<ScenarioId> {
        vec![
            ScenarioId::Quiet,
            ScenarioId::LateSurge,
            ScenarioId::PhotoFinish,
            ScenarioId::FrozenWall,
        ]
    }

    /// Returns the scenario name.
    pub fn name(&self) -> &'static str {
        match self {
            ScenarioId::Quiet => "quiet",
            ScenarioId::LateSurge => "late_surge",
            ScenarioId::PhotoFinish => "photo_finish",
            ScenarioId::FrozenWall => "frozen_wall",
        }
    }

    /// Returns a description of the scenario.
    pub fn description(&self) -> &'static str {
        match self {
            ScenarioId::Quiet => "Unfrozen contest, standings checked after a final flush",
            ScenarioId::LateSurge => "Freeze at 80% of the contest, accept rate triples afterwards",
            ScenarioId::PhotoFinish => "Solve minutes drawn from a tiny set to force deep tie-breaks",
            ScenarioId::FrozenWall => "Board frozen from the first minute, everything disclosed by scroll",
        }
    }

    /// Contest minute at which the board freezes, if it does.
    fn freeze_minute(&self, duration: u32) -> Option<u32> {
        match self {
            ScenarioId::Quiet => None,
            ScenarioId::LateSurge => Some(duration * 4 / 5),
            ScenarioId::PhotoFinish => Some(duration / 2),
            ScenarioId::FrozenWall => Some(0),
        }
    }

    /// Probability that a submission is accepted at `minute`.
    fn accept_rate(&self, minute: u32, freeze: Option<u32>) -> f64 {
        match (self, freeze) {
            (ScenarioId::LateSurge, Some(at)) if minute >= at => 0.75,
            (ScenarioId::PhotoFinish, _) => 0.5,
            _ => 0.25,
        }
    }
}

impl fmt::Display for ScenarioId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ScenarioId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ScenarioId::all()
            .into_iter()
            .find(|id| id.name() == s)
            .ok_or_else(|| format!("Unknown scenario: {}", s))
    }
}

/// Parameters for generating a scenario script.
#[derive(Debug, Clone)]
pub struct ScenarioConfig {
    /// Master seed for determinism
    pub seed: u64,

    /// Number of teams to register
    pub teams: usize,

    /// Number of problems (clamped to 1..=26)
    pub problems: usize,

    /// Contest length in minutes
    pub duration: u32,

    /// Number of submissions to generate
    pub submissions: usize,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            teams: 8,
            problems: 6,
            duration: 300,
            submissions: 150,
        }
    }
}

impl ScenarioConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_teams(mut self, teams: usize) -> Self {
        self.teams = teams;
        self
    }

    pub fn with_problems(mut self, problems: usize) -> Self {
        self.problems = problems;
        self
    }

    pub fn with_submissions(mut self, submissions: usize) -> Self {
        self.submissions = submissions;
        self
    }

    /// Name of the `index`-th generated team.
    pub fn team_name(index: usize) -> String {
        format!("team_{:02}", index + 1)
    }
}

/// Generates the full command script for a scenario.
///
/// The script registers teams, starts the contest, submits in
/// chronological order with a freeze at the scenario's freeze minute,
/// sprinkles queries in between, and finishes with `SCROLL` (or `FLUSH`
/// when nothing was frozen) followed by `END`.
pub fn generate(scenario: ScenarioId, config: &ScenarioConfig) -> Vec<Command> {
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    let teams = config.teams.max(1);
    let problems = config.problems.clamp(1, MAX_PROBLEMS);
    let duration = config.duration.max(1);
    let freeze = scenario.freeze_minute(duration);

    let mut script: Vec<Command> = (0..teams)
        .map(|i| Command::AddTeam {
            name: ScenarioConfig::team_name(i),
        })
        .collect();
    script.push(Command::Start { duration, problems });

    let mut times: Vec<u32> = match scenario {
        ScenarioId::PhotoFinish => {
            let slots = [duration / 5, duration / 3, duration / 2 + 1, duration - 1];
            (0..config.submissions)
                .map(|_| slots[rng.gen_range(0..slots.len())])
                .collect()
        }
        _ => (0..config.submissions)
            .map(|_| rng.gen_range(0..duration))
            .collect(),
    };
    times.sort_unstable();

    let mut frozen = false;
    for time in times {
        if let Some(at) = freeze {
            if !frozen && time >= at {
                script.push(Command::Freeze);
                frozen = true;
            }
        }

        let team = ScenarioConfig::team_name(rng.gen_range(0..teams));
        let problem = ProblemId::from_index(rng.gen_range(0..problems))
            .unwrap_or_else(|| ProblemId::first(1)[0]);
        let verdict = if rng.gen_bool(scenario.accept_rate(time, freeze)) {
            Verdict::Accepted
        } else {
            Verdict::all()[rng.gen_range(1..4)]
        };
        script.push(Command::Submit { problem, team: team.clone(), verdict, time });

        match rng.gen_range(0..20) {
            0 => script.push(Command::Flush),
            1 => script.push(Command::QueryRanking { team }),
            2 => script.push(Command::QuerySubmission {
                team,
                problem: Filter::Only(problem),
                verdict: Filter::Any,
            }),
            _ => {}
        }
    }

    if freeze.is_some() && !frozen {
        script.push(Command::Freeze);
        frozen = true;
    }
    script.push(if frozen { Command::Scroll } else { Command::Flush });
    script.push(Command::End);
    script
}
