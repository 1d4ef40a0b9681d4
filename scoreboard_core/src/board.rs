//! Board rows and their text rendering.

use serde::{Serialize, Serializer};
use std::fmt;

/// Display state of one problem for one team.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProblemCell {
    /// Visibly solved after `wrong` rejected attempts
    Solved { wrong: u32 },

    /// Unsolved with submissions withheld by the freeze
    Pending { wrong: u32, withheld: usize },

    /// Unsolved, `wrong` rejected attempts, nothing withheld
    Failed { wrong: u32 },

    /// No attempts
    Untouched,
}

impl fmt::Display for ProblemCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            ProblemCell::Solved { wrong: 0 } => f.write_str("+"),
            ProblemCell::Solved { wrong } => write!(f, "+{}", wrong),
            ProblemCell::Pending { wrong: 0, withheld } => write!(f, "0/{}", withheld),
            ProblemCell::Pending { wrong, withheld } => write!(f, "-{}/{}", wrong, withheld),
            ProblemCell::Failed { wrong } => write!(f, "-{}", wrong),
            ProblemCell::Untouched => f.write_str("."),
        }
    }
}

impl Serialize for ProblemCell {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One rendered scoreboard row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardRow {
    pub team: String,
    pub rank: usize,
    pub solved: usize,
    pub penalty: u64,
    pub cells: Vec<ProblemCell>,
}

impl fmt::Display for BoardRow {
    /// `team rank solved penalty cell...`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} {}", self.team, self.rank, self.solved, self.penalty)?;
        for cell in &self.cells {
            write!(f, " {}", cell)?;
        }
        Ok(())
    }
}
