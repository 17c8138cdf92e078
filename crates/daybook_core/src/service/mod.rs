//! Day and task engines.
//!
//! # Responsibility
//! - Own the "exactly one active day" invariant and day changes.
//! - Gate task lifecycle transitions against the active day.
//! - Classify failures for caller-facing layers via `ErrorKind`.
//!
//! # Invariants
//! - The active day is re-resolved from the store on every operation.
//! - Day changes and task writes each run as one store transaction.

pub mod day_service;
pub mod rollover;
pub mod task_service;

use crate::repo::RepoError;

/// Caller-facing classification of engine failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Year, season or day number out of range.
    InvalidDay,
    /// Task name is blank after trimming.
    InvalidTaskName,
    /// Referenced task does not exist.
    TaskNotFound,
    /// Task exists but does not belong to the active day.
    TaskNotInActiveDay,
    /// Requested transition is illegal for the task's type/status.
    InvalidTaskState,
    /// Uniqueness constraint violated.
    DuplicateName,
    /// Consistency fault or storage failure; details stay internal.
    Internal,
}

impl ErrorKind {
    /// Stable snake_case code for logs and caller payloads.
    pub fn code(self) -> &'static str {
        match self {
            Self::InvalidDay => "invalid_day",
            Self::InvalidTaskName => "invalid_task_name",
            Self::TaskNotFound => "task_not_found",
            Self::TaskNotInActiveDay => "task_not_in_active_day",
            Self::InvalidTaskState => "invalid_task_state",
            Self::DuplicateName => "duplicate_name",
            Self::Internal => "internal",
        }
    }

    pub fn is_client_error(self) -> bool {
        self != Self::Internal
    }
}

/// Generic message shown to callers in place of internal details.
pub const INTERNAL_ERROR_MESSAGE: &str = "internal error";

pub(crate) fn repo_error_kind(err: &RepoError) -> ErrorKind {
    match err {
        RepoError::TaskNotFound(_) => ErrorKind::TaskNotFound,
        RepoError::DuplicateTaskName(_) => ErrorKind::DuplicateName,
        RepoError::BlankTaskName => ErrorKind::InvalidTaskName,
        _ => ErrorKind::Internal,
    }
}
