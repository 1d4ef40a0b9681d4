//! Text command protocol.
//!
//! One command per line, whitespace separated:
//!
//! ```text
//! ADDTEAM <name>
//! START DURATION <minutes> PROBLEM <count>
//! SUBMIT <problem> BY <team> WITH <verdict> AT <minute>
//! FLUSH
//! FREEZE
//! SCROLL
//! QUERY_RANKING <team>
//! QUERY_SUBMISSION <team> WHERE PROBLEM=<problem|ALL> AND STATUS=<verdict|ALL>
//! END
//! ```

use scoreboard_env::{Filter, ProblemId, Verdict};
use std::fmt;
use std::str::{FromStr, SplitWhitespace};
use thiserror::Error;

/// Errors raised while parsing a command line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("unknown command: {0}")]
    UnknownCommand(String),

    #[error("{command}: missing {what}")]
    MissingArgument {
        command: &'static str,
        what: &'static str,
    },

    #[error("expected {expected}, found {found:?}")]
    UnexpectedToken {
        expected: &'static str,
        found: String,
    },

    #[error("invalid number: {0:?}")]
    InvalidNumber(String),

    #[error("{0}")]
    InvalidValue(String),
}

impl CommandError {
    fn missing(command: &'static str, what: &'static str) -> Self {
        Self::MissingArgument { command, what }
    }
}

/// A parsed protocol command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    AddTeam {
        name: String,
    },
    Start {
        duration: u32,
        problems: usize,
    },
    Submit {
        problem: ProblemId,
        team: String,
        verdict: Verdict,
        time: u32,
    },
    Flush,
    Freeze,
    Scroll,
    QueryRanking {
        team: String,
    },
    QuerySubmission {
        team: String,
        problem: Filter<ProblemId>,
        verdict: Filter<Verdict>,
    },
    End,
}

impl Command {
    /// Parses one input line. Blank lines yield `None`.
    pub fn parse_line(line: &str) -> Result<Option<Command>, CommandError> {
        let mut args = Args::new(line);
        let Some(keyword) = args.tokens.next() else {
            return Ok(None);
        };

        let command = match keyword {
            "ADDTEAM" => Command::AddTeam {
                name: args.word("ADDTEAM", "team name")?,
            },
            "START" => {
                args.keyword("DURATION")?;
                let duration = args.number("START", "duration")?;
                args.keyword("PROBLEM")?;
                let problems = args.number("START", "problem count")?;
                Command::Start { duration, problems }
            }
            "SUBMIT" => {
                let problem = args.value("SUBMIT", "problem")?;
                args.keyword("BY")?;
                let team = args.word("SUBMIT", "team name")?;
                args.keyword("WITH")?;
                let verdict = args.value("SUBMIT", "status")?;
                args.keyword("AT")?;
                let time = args.number("SUBMIT", "time")?;
                Command::Submit { problem, team, verdict, time }
            }
            "FLUSH" => Command::Flush,
            "FREEZE" => Command::Freeze,
            "SCROLL" => Command::Scroll,
            "QUERY_RANKING" => Command::QueryRanking {
                team: args.word("QUERY_RANKING", "team name")?,
            },
            "QUERY_SUBMISSION" => {
                let team = args.word("QUERY_SUBMISSION", "team name")?;
                args.keyword("WHERE")?;
                let problem = args.assignment("QUERY_SUBMISSION", "PROBLEM=")?;
                args.keyword("AND")?;
                let verdict = args.assignment("QUERY_SUBMISSION", "STATUS=")?;
                Command::QuerySubmission { team, problem, verdict }
            }
            "END" => Command::End,
            other => return Err(CommandError::UnknownCommand(other.to_string())),
        };
        Ok(Some(command))
    }

    /// Protocol keyword of this command.
    pub fn keyword(&self) -> &'static str {
        match self {
            Command::AddTeam { .. } => "ADDTEAM",
            Command::Start { .. } => "START",
            Command::Submit { .. } => "SUBMIT",
            Command::Flush => "FLUSH",
            Command::Freeze => "FREEZE",
            Command::Scroll => "SCROLL",
            Command::QueryRanking { .. } => "QUERY_RANKING",
            Command::QuerySubmission { .. } => "QUERY_SUBMISSION",
            Command::End => "END",
        }
    }
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Command::parse_line(s)?.ok_or(CommandError::missing("line", "command"))
    }
}

fn filter_text<T: fmt::Display>(filter: &Filter<T>) -> String {
    match filter {
        Filter::Any => "ALL".to_string(),
        Filter::Only(value) => value.to_string(),
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::AddTeam { name } => write!(f, "ADDTEAM {}", name),
            Command::Start { duration, problems } => {
                write!(f, "START DURATION {} PROBLEM {}", duration, problems)
            }
            Command::Submit { problem, team, verdict, time } => {
                write!(f, "SUBMIT {} BY {} WITH {} AT {}", problem, team, verdict, time)
            }
            Command::QueryRanking { team } => write!(f, "QUERY_RANKING {}", team),
            Command::QuerySubmission { team, problem, verdict } => write!(
                f,
                "QUERY_SUBMISSION {} WHERE PROBLEM={} AND STATUS={}",
                team,
                filter_text(problem),
                filter_text(verdict)
            ),
            other => f.write_str(other.keyword()),
        }
    }
}

/// Token cursor over one line.
struct Args<'a> {
    tokens: SplitWhitespace<'a>,
}

impl<'a> Args<'a> {
    fn new(line: &'a str) -> Self {
        Self {
            tokens: line.split_whitespace(),
        }
    }

    fn word(&mut self, command: &'static str, what: &'static str) -> Result<String, CommandError> {
        self.tokens
            .next()
            .map(str::to_string)
            .ok_or(CommandError::missing(command, what))
    }

    fn keyword(&mut self, expected: &'static str) -> Result<(), CommandError> {
        match self.tokens.next() {
            Some(token) if token == expected => Ok(()),
            found => Err(CommandError::UnexpectedToken {
                expected,
                found: found.unwrap_or_default().to_string(),
            }),
        }
    }

    fn number<T: FromStr>(&mut self, command: &'static str, what: &'static str) -> Result<T, CommandError> {
        let token = self.tokens.next().ok_or(CommandError::missing(command, what))?;
        token
            .parse()
            .map_err(|_| CommandError::InvalidNumber(token.to_string()))
    }

    fn value<T>(&mut self, command: &'static str, what: &'static str) -> Result<T, CommandError>
    where
        T: FromStr<Err = String>,
    {
        let token = self.tokens.next().ok_or(CommandError::missing(command, what))?;
        token.parse().map_err(CommandError::InvalidValue)
    }

    /// Parses `KEY=value` into a filter.
    fn assignment<T>(&mut self, command: &'static str, key: &'static str) -> Result<Filter<T>, CommandError>
    where
        T: FromStr<Err = String>,
    {
        let token = self.tokens.next().ok_or(CommandError::missing(command, key))?;
        let value = token
            .strip_prefix(key)
            .ok_or_else(|| CommandError::UnexpectedToken {
                expected: key,
                found: token.to_string(),
            })?;
        value.parse().map_err(CommandError::InvalidValue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Command {
        Command::parse_line(line).unwrap().unwrap()
    }

    #[test]
    fn test_parse_all_commands() {
        assert_eq!(parse("ADDTEAM Team_A"), Command::AddTeam { name: "Team_A".into() });
        assert_eq!(
            parse("START DURATION 300 PROBLEM 5"),
            Command::Start { duration: 300, problems: 5 }
        );
        assert_eq!(
            parse("SUBMIT C BY Team_A WITH Runtime_Error AT 42"),
            Command::Submit {
                problem: "C".parse().unwrap(),
                team: "Team_A".into(),
                verdict: Verdict::RuntimeError,
                time: 42,
            }
        );
        assert_eq!(parse("FLUSH"), Command::Flush);
        assert_eq!(parse("FREEZE"), Command::Freeze);
        assert_eq!(parse("SCROLL"), Command::Scroll);
        assert_eq!(parse("QUERY_RANKING x"), Command::QueryRanking { team: "x".into() });
        assert_eq!(
            parse("QUERY_SUBMISSION x WHERE PROBLEM=ALL AND STATUS=Accepted"),
            Command::QuerySubmission {
                team: "x".into(),
                problem: Filter::Any,
                verdict: Filter::Only(Verdict::Accepted),
            }
        );
        assert_eq!(parse("END"), Command::End);
    }

    #[test]
    fn test_blank_line() {
        assert_eq!(Command::parse_line("   ").unwrap(), None);
        assert!("".parse::<Command>().is_err());
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            Command::parse_line("RESTART"),
            Err(CommandError::UnknownCommand("RESTART".into()))
        );
        assert!(matches!(
            Command::parse_line("START DURATION x PROBLEM 3"),
            Err(CommandError::InvalidNumber(_))
        ));
        assert!(matches!(
            Command::parse_line("SUBMIT A TO t WITH Accepted AT 1"),
            Err(CommandError::UnexpectedToken { expected: "BY", .. })
        ));
        assert!(matches!(
            Command::parse_line("SUBMIT A BY t WITH Compile_Error AT 1"),
            Err(CommandError::InvalidValue(_))
        ));
        assert!(matches!(
            Command::parse_line("ADDTEAM"),
            Err(CommandError::MissingArgument { .. })
        ));
        assert!(matches!(
            Command::parse_line("QUERY_SUBMISSION t WHERE STATUS=ALL AND PROBLEM=ALL"),
            Err(CommandError::UnexpectedToken { expected: "PROBLEM=", .. })
        ));
    }

    #[test]
    fn test_display_matches_protocol() {
        for line in [
            "ADDTEAM Team_A",
            "START DURATION 300 PROBLEM 5",
            "SUBMIT B BY Team_A WITH Time_Limit_Exceed AT 7",
            "SCROLL",
            "QUERY_SUBMISSION Team_A WHERE PROBLEM=B AND STATUS=ALL",
        ] {
            assert_eq!(parse(line).to_string(), line);
        }
    }
}
