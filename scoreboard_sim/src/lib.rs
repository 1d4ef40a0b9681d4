//! Scoreboard Simulation Harness
//!
//! Wraps `scoreboard_core` with everything needed to run it:
//! - **Command protocol**: parse text commands, execute them, write the
//!   line-protocol responses (`command`, `session`)
//! - **Scenarios**: seeded contest scripts for freeze/scroll stress runs
//!   (`scenarios`, `runner`)
//! - **Oracle**: unfrozen ledger replay used as ground truth after a scroll
//! - **Exporter**: final boards and overtakes as JSON
//!
//! # Usage
//!
//! ```
//! use scoreboard_sim::{ScenarioConfig, ScenarioId, ScenarioRunner};
//!
//! let runner = ScenarioRunner::new(ScenarioConfig::default().with_seed(7));
//! let result = runner.run(ScenarioId::LateSurge);
//! assert!(result.passed);
//! ```

pub mod command;
mod exporter;
mod oracle;
mod runner;
pub mod scenarios;
mod session;

pub use command::{Command, CommandError};
pub use exporter::{BoardExport, ExportOvertake, ExportRow};
pub use oracle::Oracle;
pub use runner::{ScenarioMetrics, ScenarioResult, ScenarioRunner};
pub use scenarios::{ScenarioConfig, ScenarioId};
pub use session::{Flow, Session, SessionStats};
