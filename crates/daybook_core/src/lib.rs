//! Core day/task engine for the daybook calendar.
//! This crate is the single source of truth for the active-day and task
//! lifecycle invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::day::{CalendarDate, Day, DayId, DayValidationError, Season, DAYS_PER_SEASON};
pub use model::task::{normalize_task_name, NewTask, Task, TaskId, TaskStatus, TaskType};
pub use repo::day_repo::{DayRepository, SqliteDayRepository};
pub use repo::task_repo::{SqliteTaskRepository, TaskField, TaskRepository};
pub use repo::{RepoError, RepoResult};
pub use service::day_service::{
    CurrentState, DayChange, DayDetails, DayService, DayServiceError,
};
pub use service::rollover::{roll_over_tasks, RolloverSummary};
pub use service::task_service::{TaskRule, TaskService, TaskServiceError};
pub use service::ErrorKind;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
