//! Scenario runner - plays generated scripts and checks the results.

use scoreboard_core::{BoardRow, Contest, Overtake};
use scoreboard_env::BufferOutput;
use tracing::{debug, info, warn};

use crate::command::Command;
use crate::oracle::Oracle;
use crate::scenarios::{self, ScenarioConfig, ScenarioId};
use crate::session::{Flow, Session};

/// Results from running a scenario.
#[derive(Debug, Clone)]
pub struct ScenarioResult {
    /// Scenario that was run
    pub scenario: ScenarioId,

    /// Seed used
    pub seed: u64,

    /// Contest length in minutes
    pub duration: u32,

    /// Whether every check passed
    pub passed: bool,

    /// Failure message if any
    pub failure_reason: Option<String>,

    /// Metrics collected during the run
    pub metrics: ScenarioMetrics,

    /// Board after the last flush or scroll
    pub final_board: Vec<BoardRow>,

    /// Overtakes reported by the scroll
    pub overtakes: Vec<Overtake>,
}

/// Metrics collected during scenario execution.
#[derive(Debug, Clone, Default)]
pub struct ScenarioMetrics {
    /// Commands executed
    pub commands: u64,

    /// Submissions recorded
    pub submissions: u64,

    /// Scrolls completed
    pub scrolls: u64,

    /// Withheld submissions at the moment of scrolling
    pub withheld: usize,

    /// Disclosure steps taken by the scroll
    pub disclosures: usize,

    /// Overtakes reported
    pub overtakes: usize,

    /// Protocol lines written
    pub output_lines: usize,
}

/// Runs scenarios against a fresh contest each time.
pub struct ScenarioRunner {
    config: ScenarioConfig,
}

impl ScenarioRunner {
    /// Creates a new scenario runner.
    pub fn new(config: ScenarioConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScenarioConfig {
        &self.config
    }

    /// Runs a scenario and returns the result.
    pub fn run(&self, scenario: ScenarioId) -> ScenarioResult {
        info!("Starting scenario: {} (seed={})", scenario.name(), self.config.seed);

        let script = scenarios::generate(scenario, &self.config);
        let mut session = Session::new(BufferOutput::new());
        let mut metrics = ScenarioMetrics::default();
        let mut pending_pairs = 0;
        let mut failures: Vec<String> = Vec::new();

        for command in &script {
            if *command == Command::Scroll {
                metrics.withheld = session.contest().withheld_count();
                pending_pairs = pending_pairs_of(session.contest());
                debug!("Scrolling {} pending problems", pending_pairs);
            }
            match session.execute(command) {
                Ok(Flow::Continue) => {}
                Ok(Flow::Stop) => break,
                Err(e) => {
                    failures.push(format!("output error: {}", e));
                    break;
                }
            }
        }

        let stats = session.stats().clone();
        metrics.commands = stats.commands;
        metrics.submissions = stats.submissions;
        metrics.scrolls = stats.scrolls;
        metrics.output_lines = session.output().lines().len();
        if stats.rejected > 0 {
            failures.push(format!("{} commands rejected", stats.rejected));
        }
        let scripted_scrolls = script.iter().filter(|c| **c == Command::Scroll).count() as u64;
        if stats.scrolls != scripted_scrolls {
            failures.push(format!(
                "{} of {} scrolls completed",
                stats.scrolls, scripted_scrolls
            ));
        }

        let mut overtakes = Vec::new();
        if let Some(report) = session.last_scroll() {
            metrics.disclosures = report.steps.len();
            if report.steps.len() != pending_pairs {
                failures.push(format!(
                    "{} disclosures for {} pending problems",
                    report.steps.len(),
                    pending_pairs
                ));
            }
            for step in &report.steps {
                let improved = step.new_rank < step.old_rank;
                if improved != step.overtake.is_some() {
                    failures.push(format!(
                        "{} {}: rank {} -> {} but overtake reported = {}",
                        step.team,
                        step.problem,
                        step.old_rank,
                        step.new_rank,
                        step.overtake.is_some()
                    ));
                }
            }
            overtakes = report.overtakes().cloned().collect();
            metrics.overtakes = overtakes.len();
        }

        let contest = session.contest();
        if contest.is_frozen() {
            failures.push("board still frozen at end".to_string());
        }
        if contest.withheld_count() > 0 {
            failures.push(format!("{} submissions still withheld", contest.withheld_count()));
        }
        match contest.standing() {
            Some(standing) => {
                if let Err(e) = Oracle::replay(contest).verify(standing) {
                    failures.push(format!("oracle mismatch: {}", e));
                }
            }
            None => failures.push("no standing computed".to_string()),
        }

        for failure in &failures {
            warn!("{}: {}", scenario.name(), failure);
        }

        ScenarioResult {
            scenario,
            seed: self.config.seed,
            duration: contest.duration(),
            passed: failures.is_empty(),
            failure_reason: (!failures.is_empty()).then(|| failures.join("; ")),
            metrics,
            final_board: contest.scoreboard(),
            overtakes,
        }
    }
}

/// Number of (team, problem) pairs holding withheld submissions.
fn pending_pairs_of(contest: &Contest) -> usize {
    contest
        .teams()
        .map(|team| {
            contest
                .problems()
                .iter()
                .filter(|id| team.problem(**id).is_some_and(|s| s.has_withheld()))
                .count()
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_scenarios_pass() {
        for seed in [1, 42, 1234] {
            let runner = ScenarioRunner::new(ScenarioConfig::default().with_seed(seed));
            for scenario in ScenarioId::all() {
                let result = runner.run(scenario);
                assert!(
                    result.passed,
                    "{} seed={} failed: {:?}",
                    scenario.name(),
                    seed,
                    result.failure_reason
                );
                assert_eq!(result.final_board.len(), 8);
            }
        }
    }

    #[test]
    fn test_frozen_wall_discloses_everything() {
        let runner = ScenarioRunner::new(ScenarioConfig::default().with_submissions(60));
        let result = runner.run(ScenarioId::FrozenWall);

        assert!(result.passed, "{:?}", result.failure_reason);
        assert_eq!(result.metrics.submissions, 60);
        assert_eq!(result.metrics.withheld, 60);
        assert_eq!(result.metrics.scrolls, 1);
        assert_eq!(result.duration, runner.config().duration);
        assert!(result.metrics.disclosures > 0);
    }

    #[test]
    fn test_quiet_has_no_scroll() {
        let runner = ScenarioRunner::new(ScenarioConfig::default());
        let result = runner.run(ScenarioId::Quiet);

        assert!(result.passed, "{:?}", result.failure_reason);
        assert_eq!(result.metrics.disclosures, 0);
        assert_eq!(result.metrics.scrolls, 0);
        assert!(result.overtakes.is_empty());
    }
}
