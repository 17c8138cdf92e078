//! Task engine.
//!
//! # Responsibility
//! - Create tasks on the active day.
//! - Gate completion, reactivation, type changes and renames.
//!
//! # Invariants
//! - Every write re-resolves the active day inside its own transaction.
//! - Type changes and renames require an open task on the active day.
//! - Only open one-time tasks on the active day can be completed.
//! - Reactivation always relocates the task onto the active day.

use crate::model::day::{Day, DayId};
use crate::model::task::{normalize_task_name, NewTask, Task, TaskId, TaskStatus, TaskType};
use crate::repo::day_repo::DayRepository;
use crate::repo::task_repo::TaskRepository;
use crate::repo::RepoError;
use crate::service::day_service::{DayService, DayServiceError};
use crate::service::{repo_error_kind, ErrorKind, INTERNAL_ERROR_MESSAGE};
use log::{debug, info};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Lifecycle rule a rejected transition would have broken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskRule {
    OnlyOneTimeCanBeCompleted,
    AlreadyCompleted,
    AlreadyActive,
    CompletedCannotBecomeDaily,
    AlreadyDaily,
    CompletedCannotBecomeOneTime,
    AlreadyOneTime,
    CompletedCannotBeRenamed,
}

impl TaskRule {
    pub fn code(self) -> &'static str {
        match self {
            Self::OnlyOneTimeCanBeCompleted => "only_one_time_can_be_completed",
            Self::AlreadyCompleted => "already_completed",
            Self::AlreadyActive => "already_active",
            Self::CompletedCannotBecomeDaily => "completed_cannot_become_daily",
            Self::AlreadyDaily => "already_daily",
            Self::CompletedCannotBecomeOneTime => "completed_cannot_become_one_time",
            Self::AlreadyOneTime => "already_one_time",
            Self::CompletedCannotBeRenamed => "completed_cannot_be_renamed",
        }
    }
}

impl Display for TaskRule {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let message = match self {
            Self::OnlyOneTimeCanBeCompleted => "only one-time tasks can be completed",
            Self::AlreadyCompleted => "task is already completed",
            Self::AlreadyActive => "task is already active",
            Self::CompletedCannotBecomeDaily => {
                "task is completed; it must be made active first before becoming daily"
            }
            Self::AlreadyDaily => "task is already daily",
            Self::CompletedCannotBecomeOneTime => "task is completed and cannot change type",
            Self::AlreadyOneTime => "task is already one-time",
            Self::CompletedCannotBeRenamed => {
                "task is completed; it must be made active first before renaming"
            }
        };
        f.write_str(message)
    }
}

/// Errors from task engine operations.
#[derive(Debug)]
pub enum TaskServiceError {
    /// Task name is blank after trimming.
    InvalidName,
    /// Target task does not exist.
    TaskNotFound(TaskId),
    /// Target task exists on a day other than the active one.
    TaskNotInActiveDay { task_id: TaskId, day_id: DayId },
    /// Transition is illegal for the task's current type/status.
    InvalidState { task_id: TaskId, rule: TaskRule },
    /// Another task already holds the name.
    DuplicateName(String),
    /// Active-day resolution failed.
    Day(DayServiceError),
    /// Repository-level failure.
    Repo(RepoError),
}

impl TaskServiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidName => ErrorKind::InvalidTaskName,
            Self::TaskNotFound(_) => ErrorKind::TaskNotFound,
            Self::TaskNotInActiveDay { .. } => ErrorKind::TaskNotInActiveDay,
            Self::InvalidState { .. } => ErrorKind::InvalidTaskState,
            Self::DuplicateName(_) => ErrorKind::DuplicateName,
            Self::Day(err) => err.kind(),
            Self::Repo(err) => repo_error_kind(err),
        }
    }

    /// Message safe to show to callers.
    pub fn public_message(&self) -> String {
        match self.kind() {
            ErrorKind::Internal => INTERNAL_ERROR_MESSAGE.to_string(),
            _ => self.to_string(),
        }
    }
}

impl Display for TaskServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidName => write!(f, "task name must not be blank"),
            Self::TaskNotFound(id) => write!(f, "task with id {id} not found"),
            Self::TaskNotInActiveDay { task_id, day_id } => write!(
                f,
                "task with id {task_id} is not in the active day (belongs to day {day_id})"
            ),
            Self::InvalidState { task_id, rule } => write!(f, "task with id {task_id}: {rule}"),
            Self::DuplicateName(name) => write!(f, "task with name `{name}` already exists"),
            Self::Day(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for TaskServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Day(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for TaskServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::TaskNotFound(id) => Self::TaskNotFound(id),
            RepoError::DuplicateTaskName(name) => Self::DuplicateName(name),
            RepoError::BlankTaskName => Self::InvalidName,
            RepoError::MultipleActiveDays(count) => {
                Self::Day(DayServiceError::MultipleActiveDays(count))
            }
            other => Self::Repo(other),
        }
    }
}

impl From<DayServiceError> for TaskServiceError {
    fn from(value: DayServiceError) -> Self {
        Self::Day(value)
    }
}

/// Task engine facade.
///
/// Borrows the day engine to resolve the active day and share its
/// transaction boundary.
pub struct TaskService<'d, D: DayRepository, T: TaskRepository> {
    days: &'d DayService<D, T>,
    tasks: T,
}

impl<'d, D: DayRepository, T: TaskRepository> TaskService<'d, D, T> {
    pub fn new(days: &'d DayService<D, T>, tasks: T) -> Self {
        Self { days, tasks }
    }

    /// Creates an active one-time task on the active day.
    pub fn create_task(&self, name: &str) -> Result<Task, TaskServiceError> {
        let name = normalize_task_name(name).ok_or(TaskServiceError::InvalidName)?;
        self.days.atomically(|| {
            let day = self.days.get_active()?;
            let task = self.tasks.insert(&NewTask::one_time(name, day.id))?;
            info!(
                "event=task_create module=task_service status=ok task_id={} day_id={}",
                task.id, day.id
            );
            Ok(task)
        })
    }

    /// Loads one task.
    pub fn get_by_id(&self, id: TaskId) -> Result<Task, TaskServiceError> {
        self.tasks
            .get_by_id(id)?
            .ok_or(TaskServiceError::TaskNotFound(id))
    }

    /// Tasks attached to `day_id`, ascending by id.
    pub fn get_all_by_day_id(&self, day_id: DayId) -> Result<Vec<Task>, TaskServiceError> {
        Ok(self.tasks.get_all_by_day_id(day_id)?)
    }

    /// Completed tasks across all days, ascending by id.
    pub fn get_all_completed(&self) -> Result<Vec<Task>, TaskServiceError> {
        Ok(self.tasks.get_all_completed()?)
    }

    /// Completes an open one-time task on the active day.
    pub fn make_completed(&self, id: TaskId) -> Result<Task, TaskServiceError> {
        self.transition("complete", id, |task, day| {
            ensure_in_day(task, day)?;
            if task.kind != TaskType::OneTime {
                return Err(rejected(task, TaskRule::OnlyOneTimeCanBeCompleted));
            }
            if task.is_completed() {
                return Err(rejected(task, TaskRule::AlreadyCompleted));
            }
            self.tasks.make_completed(task.id)?;
            Ok(())
        })
    }

    /// Reopens a task and moves it onto the active day.
    ///
    /// Works for tasks on any day, which is how finished or archived tasks
    /// are recalled into today.
    pub fn make_active(&self, id: TaskId) -> Result<Task, TaskServiceError> {
        self.transition("activate", id, |task, day| {
            if task.is_active_on(day.id) {
                return Err(rejected(task, TaskRule::AlreadyActive));
            }
            self.tasks.make_active(task.id, day.id)?;
            Ok(())
        })
    }

    /// Turns an open one-time task on the active day into a daily task.
    pub fn make_daily(&self, id: TaskId) -> Result<Task, TaskServiceError> {
        self.transition("make_daily", id, |task, day| {
            ensure_in_day(task, day)?;
            if task.is_completed() {
                return Err(rejected(task, TaskRule::CompletedCannotBecomeDaily));
            }
            if task.kind == TaskType::Daily {
                return Err(rejected(task, TaskRule::AlreadyDaily));
            }
            self.tasks.make_daily(task.id)?;
            Ok(())
        })
    }

    /// Turns an open daily task on the active day into a one-time task.
    pub fn make_one_time(&self, id: TaskId) -> Result<Task, TaskServiceError> {
        self.transition("make_one_time", id, |task, day| {
            ensure_in_day(task, day)?;
            if task.is_completed() {
                return Err(rejected(task, TaskRule::CompletedCannotBecomeOneTime));
            }
            if task.kind == TaskType::OneTime {
                return Err(rejected(task, TaskRule::AlreadyOneTime));
            }
            self.tasks.make_one_time(task.id)?;
            Ok(())
        })
    }

    /// Renames an open task on the active day.
    pub fn edit_name(&self, id: TaskId, new_name: &str) -> Result<Task, TaskServiceError> {
        let new_name = normalize_task_name(new_name).ok_or(TaskServiceError::InvalidName)?;
        self.transition("rename", id, |task, day| {
            ensure_in_day(task, day)?;
            if task.status == TaskStatus::Completed {
                return Err(rejected(task, TaskRule::CompletedCannotBeRenamed));
            }
            self.tasks.edit_name(task.id, new_name)?;
            Ok(())
        })
    }

    /// Loads task and active day, applies `apply`, and returns the refreshed
    /// task, all inside one transaction.
    fn transition<F>(&self, op: &'static str, id: TaskId, apply: F) -> Result<Task, TaskServiceError>
    where
        F: FnOnce(&Task, &Day) -> Result<(), TaskServiceError>,
    {
        let result: Result<Task, TaskServiceError> = self.days.atomically(|| {
            let day = self.days.get_active()?;
            let task = self.get_by_id(id)?;
            apply(&task, &day)?;
            self.get_by_id(id)
        });

        match &result {
            Ok(task) => info!(
                "event=task_transition module=task_service status=ok op={op} task_id={} type={} task_status={} day_id={}",
                task.id, task.kind, task.status, task.day_id
            ),
            Err(err) => debug!(
                "event=task_transition module=task_service status=rejected op={op} task_id={id} error_code={} detail={}",
                err.kind().code(),
                rule_code(err)
            ),
        }
        result
    }
}

fn ensure_in_day(task: &Task, day: &Day) -> Result<(), TaskServiceError> {
    if task.day_id != day.id {
        return Err(TaskServiceError::TaskNotInActiveDay {
            task_id: task.id,
            day_id: task.day_id,
        });
    }
    Ok(())
}

fn rejected(task: &Task, rule: TaskRule) -> TaskServiceError {
    TaskServiceError::InvalidState {
        task_id: task.id,
        rule,
    }
}

fn rule_code(err: &TaskServiceError) -> &'static str {
    match err {
        TaskServiceError::InvalidState { rule, .. } => rule.code(),
        _ => "none",
    }
}
