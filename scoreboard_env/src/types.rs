//! Common types shared by the scoreboard engine and its command layer.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Largest number of problems a contest can carry (`A` through `Z`).
pub const MAX_PROBLEMS: usize = 26;

/// Identifier of a contest problem.
///
/// Problems are lettered `A`, `B`, ... in the order they are assigned at
/// contest start, so the derived ordering is the letter ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct ProblemId(u8);

impl ProblemId {
    /// Creates a problem id from its zero-based index (`0` is `A`).
    pub fn from_index(index: usize) -> Option<Self> {
        (index < MAX_PROBLEMS).then(|| Self(index as u8))
    }

    /// Returns the zero-based index of this problem.
    pub fn index(&self) -> usize {
        self.0 as usize
    }

    /// Returns the problem letter.
    pub fn letter(&self) -> char {
        (b'A' + self.0) as char
    }

    /// Returns the first `count` problem ids, clamped to `MAX_PROBLEMS`.
    pub fn first(count: usize) -> Vec<ProblemId> {
        (0..count.min(MAX_PROBLEMS)).map(|i| Self(i as u8)).collect()
    }
}

impl fmt::Display for ProblemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

impl FromStr for ProblemId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c @ 'A'..='Z'), None) => Ok(Self(c as u8 - b'A')),
            _ => Err(format!("invalid problem id: {s:?}")),
        }
    }
}

impl From<ProblemId> for String {
    fn from(id: ProblemId) -> Self {
        id.to_string()
    }
}

impl TryFrom<String> for ProblemId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Judge outcome of a single submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Verdict {
    #[serde(rename = "Accepted")]
    Accepted,
    #[serde(rename = "Wrong_Answer")]
    WrongAnswer,
    #[serde(rename = "Runtime_Error")]
    RuntimeError,
    #[serde(rename = "Time_Limit_Exceed")]
    TimeLimitExceed,
}

impl Verdict {
    /// Returns every verdict.
    pub fn all() -> [Verdict; 4] {
        [
            Verdict::Accepted,
            Verdict::WrongAnswer,
            Verdict::RuntimeError,
            Verdict::TimeLimitExceed,
        ]
    }

    /// Returns the wire spelling of the verdict.
    pub fn name(&self) -> &'static str {
        match self {
            Verdict::Accepted => "Accepted",
            Verdict::WrongAnswer => "Wrong_Answer",
            Verdict::RuntimeError => "Runtime_Error",
            Verdict::TimeLimitExceed => "Time_Limit_Exceed",
        }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, Verdict::Accepted)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Verdict {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Verdict::all()
            .into_iter()
            .find(|v| v.name() == s)
            .ok_or_else(|| format!("unknown verdict: {s:?}"))
    }
}

/// A single recorded submission. Immutable once recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    /// Problem the submission targets
    pub problem: ProblemId,

    /// Judge outcome
    pub verdict: Verdict,

    /// Contest minute at which it was submitted
    pub time: u32,
}

impl Submission {
    pub fn new(problem: ProblemId, verdict: Verdict, time: u32) -> Self {
        Self { problem, verdict, time }
    }
}

/// A query filter that either matches anything or one specific value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Filter<T> {
    #[default]
    Any,
    Only(T),
}

impl<T: PartialEq> Filter<T> {
    /// Returns true if `value` passes the filter.
    pub fn matches(&self, value: &T) -> bool {
        match self {
            Filter::Any => true,
            Filter::Only(expected) => expected == value,
        }
    }
}

impl<T: FromStr> FromStr for Filter<T> {
    type Err = T::Err;

    /// `ALL` is the wildcard spelling.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "ALL" {
            Ok(Filter::Any)
        } else {
            s.parse().map(Filter::Only)
        }
    }
}
