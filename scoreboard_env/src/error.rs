//! Error types for scoreboard operations.

use thiserror::Error;

/// Errors returned by contest operations.
///
/// Every variant is non-fatal: the operation leaves the contest unchanged
/// and the caller decides how to report it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    /// A team with this name was already registered
    #[error("duplicated team name: {0}")]
    DuplicateTeam(String),

    /// Registration and start are closed once the contest is running
    #[error("competition has started")]
    CompetitionAlreadyStarted,

    /// No team with this name exists
    #[error("cannot find the team: {0}")]
    TeamNotFound(String),

    /// Freeze requested while the scoreboard is already frozen
    #[error("scoreboard has been frozen")]
    AlreadyFrozen,

    /// Scroll requested while the scoreboard is not frozen
    #[error("scoreboard has not been frozen")]
    NotFrozen,
}

impl BoardError {
    /// Creates a duplicate-team error.
    pub fn duplicate(name: impl Into<String>) -> Self {
        Self::DuplicateTeam(name.into())
    }

    /// Creates a team-not-found error.
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::TeamNotFound(name.into())
    }
}
