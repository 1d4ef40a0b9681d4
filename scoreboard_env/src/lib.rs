//! Scoreboard Environment Layer
//!
//! Shared vocabulary for the scoreboard engine (`scoreboard_core`) and its
//! command layer (`scoreboard_sim`):
//! - Problem ids, verdicts and submissions
//! - The `BoardError` taxonomy returned by every contest operation
//! - The `BoardOutput` line sink, so protocol output can go to stdout in
//!   production and to memory in simulations and tests
//!
//! # Example
//!
//! ```
//! use scoreboard_env::{BoardOutput, BufferOutput, ProblemId, Submission, Verdict};
//!
//! let sub = Submission::new(ProblemId::from_index(0).unwrap(), Verdict::Accepted, 12);
//! let mut out = BufferOutput::new();
//! out.line(&format!("{} {} {}", sub.problem, sub.verdict, sub.time)).unwrap();
//! assert_eq!(out.lines()[0], "A Accepted 12");
//! ```

mod error;
mod output;
mod types;

pub use error::BoardError;
pub use output::{BoardOutput, BufferOutput, StdoutOutput};
pub use types::{Filter, ProblemId, Submission, Verdict, MAX_PROBLEMS};
