//! Protocol session: executes commands against a contest and writes the
//! line-protocol responses.

use scoreboard_core::{Contest, ScrollReport};
use scoreboard_env::{BoardError, BoardOutput};
use std::io::{self, BufRead};
use tracing::{debug, warn};

use crate::command::Command;

const FROZEN_WARNING: &str =
    "[Warning]Scoreboard is frozen. The ranking may be inaccurate until it were scrolled.";

/// Whether the session should keep reading input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Stop,
}

/// Counters collected over a session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionStats {
    /// Commands executed
    pub commands: u64,

    /// Commands rejected by the contest
    pub rejected: u64,

    /// Input lines that failed to parse
    pub malformed: u64,

    /// Submissions accepted into a ledger
    pub submissions: u64,

    /// Completed scrolls
    pub scrolls: u64,

    /// Overtakes reported across all scrolls
    pub overtakes: u64,
}

/// Drives one contest from a command stream.
pub struct Session<O: BoardOutput> {
    contest: Contest,
    output: O,
    stats: SessionStats,
    last_scroll: Option<ScrollReport>,
}

impl<O: BoardOutput> Session<O> {
    pub fn new(output: O) -> Self {
        Self {
            contest: Contest::new(),
            output,
            stats: SessionStats::default(),
            last_scroll: None,
        }
    }

    pub fn contest(&self) -> &Contest {
        &self.contest
    }

    pub fn output(&self) -> &O {
        &self.output
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    /// Report of the most recent successful scroll.
    pub fn last_scroll(&self) -> Option<&ScrollReport> {
        self.last_scroll.as_ref()
    }

    pub fn into_parts(self) -> (Contest, O) {
        (self.contest, self.output)
    }

    /// Reads commands until `END` or end of input.
    ///
    /// Lines that fail to parse are logged and skipped.
    pub fn run<R: BufRead>(&mut self, input: R) -> io::Result<&SessionStats> {
        for (index, line) in input.lines().enumerate() {
            let line = line?;
            let command = match Command::parse_line(&line) {
                Ok(Some(command)) => command,
                Ok(None) => continue,
                Err(e) => {
                    warn!("line {}: {} ({:?})", index + 1, e, line);
                    self.stats.malformed += 1;
                    continue;
                }
            };
            if self.execute(&command)? == Flow::Stop {
                break;
            }
        }
        self.output.flush()?;
        Ok(&self.stats)
    }

    /// Executes one command and writes its response lines.
    pub fn execute(&mut self, command: &Command) -> io::Result<Flow> {
        debug!("> {}", command);
        self.stats.commands += 1;

        match command {
            Command::AddTeam { name } => match self.contest.add_team(name) {
                Ok(()) => self.output.line("[Info]Add successfully.")?,
                Err(BoardError::CompetitionAlreadyStarted) => {
                    self.reject("[Error]Add failed: competition has started.")?
                }
                Err(_) => self.reject("[Error]Add failed: duplicated team name.")?,
            },
            Command::Start { duration, problems } => {
                match self.contest.start(*duration, *problems) {
                    Ok(()) => self.output.line("[Info]Competition starts.")?,
                    Err(_) => self.reject("[Error]Start failed: competition has started.")?,
                }
            }
            Command::Submit { problem, team, verdict, time } => {
                match self.contest.submit(*problem, team, *verdict, *time) {
                    Ok(_) => self.stats.submissions += 1,
                    Err(e) => {
                        warn!("Submission ignored: {}", e);
                        self.stats.rejected += 1;
                    }
                }
            }
            Command::Flush => {
                self.contest.flush();
                self.output.line("[Info]Flush scoreboard.")?;
            }
            Command::Freeze => match self.contest.freeze() {
                Ok(()) => self.output.line("[Info]Freeze scoreboard.")?,
                Err(_) => self.reject("[Error]Freeze failed: scoreboard has been frozen.")?,
            },
            Command::Scroll => match self.contest.scroll() {
                Ok(report) => {
                    self.write_scroll(&report)?;
                    self.stats.scrolls += 1;
                    self.stats.overtakes += report.overtakes().count() as u64;
                    self.last_scroll = Some(report);
                }
                Err(_) => {
                    self.reject("[Error]Scroll failed: scoreboard has not been frozen.")?
                }
            },
            Command::QueryRanking { team } => match self.contest.query_ranking(team) {
                Ok(query) => {
                    self.output.line("[Info]Complete query ranking.")?;
                    if query.stale {
                        self.output.line(FROZEN_WARNING)?;
                    }
                    self.output
                        .line(&format!("{} NOW AT RANKING {}", query.team, query.rank))?;
                }
                Err(_) => {
                    self.reject("[Error]Query ranking failed: cannot find the team.")?
                }
            },
            Command::QuerySubmission { team, problem, verdict } => {
                match self.contest.query_submission(team, *problem, *verdict) {
                    Ok(found) => {
                        self.output.line("[Info]Complete query submission.")?;
                        match found {
                            Some(sub) => self.output.line(&format!(
                                "{} {} {} {}",
                                team, sub.problem, sub.verdict, sub.time
                            ))?,
                            None => self.output.line("Cannot find any submission.")?,
                        }
                    }
                    Err(_) => {
                        self.reject("[Error]Query submission failed: cannot find the team.")?
                    }
                }
            }
            Command::End => {
                self.contest.end();
                self.output.line("[Info]Competition ends.")?;
                return Ok(Flow::Stop);
            }
        }
        Ok(Flow::Continue)
    }

    fn reject(&mut self, message: &str) -> io::Result<()> {
        self.stats.rejected += 1;
        self.output.line(message)
    }

    fn write_scroll(&mut self, report: &ScrollReport) -> io::Result<()> {
        self.output.line("[Info]Scroll scoreboard.")?;
        for row in &report.before {
            self.output.line(&row.to_string())?;
        }
        for overtake in report.overtakes() {
            self.output.line(&overtake.to_string())?;
        }
        for row in &report.after {
            self.output.line(&row.to_string())?;
        }
        Ok(())
    }
}
