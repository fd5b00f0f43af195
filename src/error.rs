//! Error type shared by the whole crate.
//!
//! Only conditions the caller must act on are errors. Unresolved professor
//! conflicts, leftover room conflicts and "every trial was bad" outcomes are
//! reported as values on [`TrialResult`](crate::trials::TrialResult).

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, TimetableError>;

/// Errors raised by input building, configuration and result storage.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TimetableError {
    /// There is nothing to schedule: no professors or no sessions.
    #[error("no workload to schedule: {0}")]
    NoWorkload(String),

    /// A configuration parameter is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A room, class or gene violates a structural invariant.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A session references a room that is not in the loaded room set.
    #[error("unknown room: {0}")]
    UnknownRoom(String),

    /// A stored result id does not exist.
    #[error("schedule result {0} not found")]
    ResultNotFound(u64),

    /// The data or persistence collaborator failed.
    #[error("store error: {0}")]
    Store(String),
}
