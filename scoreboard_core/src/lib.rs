//! Scoreboard Core
//!
//! ICPC-style ranking with a freeze period and scroll disclosure.
//!
//! ```text
//! submit ──► Freeze Controller ──► ProblemState ──► Rank Engine ──► Standing
//!                  │                    ▲
//!                  └──► withheld ───────┘ (Scroll Engine)
//! ```
//!
//! - **Rank Engine** (`rank`): pure total order over teams
//! - **Freeze Controller** (`contest`): routes submissions to visible state
//!   or to the withheld buffer
//! - **Scroll Engine** (`scroll`): discloses withheld results worst-team
//!   first, re-ranking after each step
//!
//! # Example
//!
//! ```
//! use scoreboard_core::Contest;
//! use scoreboard_env::Verdict;
//!
//! let mut contest = Contest::new();
//! contest.add_team("alpha").unwrap();
//! contest.add_team("beta").unwrap();
//! contest.start(300, 2).unwrap();
//!
//! let a = "A".parse().unwrap();
//! contest.submit(a, "alpha", Verdict::Accepted, 30).unwrap();
//! contest.freeze().unwrap();
//! contest.submit(a, "beta", Verdict::Accepted, 20).unwrap();
//!
//! let report = contest.scroll().unwrap();
//! assert_eq!(report.overtakes().next().unwrap().to_string(), "beta alpha 1 20");
//! ```

pub mod board;
pub mod contest;
pub mod problem;
pub mod rank;
pub mod scroll;
pub mod team;

pub use board::{BoardRow, ProblemCell};
pub use contest::{Contest, RankQuery, Routing};
pub use problem::{ProblemState, WRONG_ATTEMPT_PENALTY};
pub use rank::{compare, compute, Placement, RankEntry, Standing};
pub use scroll::{Disclosure, Overtake, ScrollReport};
pub use team::Team;
