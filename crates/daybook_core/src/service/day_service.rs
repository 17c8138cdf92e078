//! Day engine.
//!
//! # Responsibility
//! - Resolve the active day and fail loudly when none (or several) exist.
//! - Switch the active day to an explicit date or to the next calendar day.
//! - Trigger the task rollover for every effective day change.
//!
//! # Invariants
//! - Deactivate, activate-or-create and rollover run in one transaction, so
//!   callers never observe zero or two active days.
//! - Switching to the date that is already active performs no writes.

use crate::model::day::{CalendarDate, Day, DayValidationError};
use crate::model::task::Task;
use crate::repo::day_repo::DayRepository;
use crate::repo::task_repo::TaskRepository;
use crate::repo::RepoError;
use crate::service::rollover::{roll_over_tasks, RolloverSummary};
use crate::service::{repo_error_kind, ErrorKind, INTERNAL_ERROR_MESSAGE};
use log::{error, info};
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors from day engine operations.
#[derive(Debug)]
pub enum DayServiceError {
    /// Caller supplied an out-of-range or malformed date.
    InvalidDay(DayValidationError),
    /// The store holds no active day.
    NoActiveDay,
    /// The store holds more than one active day.
    MultipleActiveDays(usize),
    /// Repository-level failure.
    Repo(RepoError),
}

impl DayServiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidDay(_) => ErrorKind::InvalidDay,
            Self::NoActiveDay | Self::MultipleActiveDays(_) => ErrorKind::Internal,
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

impl Display for DayServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidDay(err) => write!(f, "invalid day: {err}"),
            Self::NoActiveDay => write!(f, "no active day"),
            Self::MultipleActiveDays(count) => {
                write!(f, "multiple active days: found {count}")
            }
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for DayServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidDay(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for DayServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::MultipleActiveDays(count) => Self::MultipleActiveDays(count),
            other => Self::Repo(other),
        }
    }
}

impl From<DayValidationError> for DayServiceError {
    fn from(value: DayValidationError) -> Self {
        Self::InvalidDay(value)
    }
}

/// Outcome of a day-change request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DayChange {
    /// Requested date was already active; nothing was written.
    Unchanged { day: Day },
    /// The active day moved.
    Switched {
        /// Day that was active before, now inactive.
        previous: Day,
        /// Newly active day.
        current: Day,
        /// Whether `current` was created by this change.
        created: bool,
        rollover: RolloverSummary,
    },
}

impl DayChange {
    /// Day that is active after the change.
    pub fn current(&self) -> &Day {
        match self {
            Self::Unchanged { day } => day,
            Self::Switched { current, .. } => current,
        }
    }
}

/// Active day together with the tasks attached to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayDetails {
    pub day: Day,
    pub tasks: Vec<Task>,
}

/// Current-day view plus the completed-task history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CurrentState {
    pub current_day: DayDetails,
    pub completed_tasks: Vec<Task>,
}

/// Day engine facade.
pub struct DayService<D: DayRepository, T: TaskRepository> {
    days: D,
    tasks: T,
}

impl<D: DayRepository, T: TaskRepository> DayService<D, T> {
    pub fn new(days: D, tasks: T) -> Self {
        Self { days, tasks }
    }

    /// Returns the active day.
    ///
    /// # Errors
    /// - `NoActiveDay` when the store was never seeded.
    /// - `MultipleActiveDays` when the singleton invariant is broken.
    pub fn get_active(&self) -> Result<Day, DayServiceError> {
        match self.days.get_active() {
            Ok(Some(day)) => Ok(day),
            Ok(None) => {
                error!(
                    "event=active_day_lookup module=day_service status=error error_code=no_active_day"
                );
                Err(DayServiceError::NoActiveDay)
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Activates the day `(year, season, number)`, creating it when unseen.
    ///
    /// Input is validated before any store access, so an invalid request
    /// leaves the active day unchanged.
    pub fn set_current_day(
        &self,
        year: i64,
        season: &str,
        number: i64,
    ) -> Result<DayChange, DayServiceError> {
        let date = CalendarDate::parse(year, season, number).map_err(|err| {
            info!(
                "event=day_change module=day_service status=rejected error_code=invalid_day reason=\"{err}\""
            );
            DayServiceError::InvalidDay(err)
        })?;
        self.set_current_date(date)
    }

    /// Activates an already validated date.
    pub fn set_current_date(&self, date: CalendarDate) -> Result<DayChange, DayServiceError> {
        self.days.with_transaction(|| {
            let previous = self.get_active()?;
            if previous.date == date {
                info!(
                    "event=day_change module=day_service status=noop day_id={} date=\"{}\"",
                    previous.id, previous.date
                );
                return Ok(DayChange::Unchanged { day: previous });
            }
            self.switch_to(previous, date)
        })
    }

    /// Advances the active day by one calendar day.
    ///
    /// Never a no-op: the successor always differs from the current date.
    pub fn set_next_day(&self) -> Result<DayChange, DayServiceError> {
        self.days.with_transaction(|| {
            let previous = self.get_active()?;
            let next = previous.date.successor()?;
            self.switch_to(previous, next)
        })
    }

    /// Active day and its tasks.
    pub fn current_day(&self) -> Result<DayDetails, DayServiceError> {
        let day = self.get_active()?;
        let tasks = self.tasks.get_all_by_day_id(day.id)?;
        Ok(DayDetails { day, tasks })
    }

    /// Active day, its tasks and every completed task.
    pub fn current_state(&self) -> Result<CurrentState, DayServiceError> {
        let current_day = self.current_day()?;
        let completed_tasks = self.tasks.get_all_completed()?;
        Ok(CurrentState {
            current_day,
            completed_tasks,
        })
    }

    /// Runs `work` in one store transaction shared with day changes.
    pub fn atomically<R, E, F>(&self, work: F) -> Result<R, E>
    where
        F: FnOnce() -> Result<R, E>,
        E: From<RepoError>,
    {
        self.days.with_transaction(work)
    }

    fn switch_to(&self, mut previous: Day, date: CalendarDate) -> Result<DayChange, DayServiceError> {
        self.days.set_active(previous.id, false)?;
        previous.active = false;

        let (current, created) = match self.days.get_by_attributes(&date)? {
            Some(mut existing) => {
                self.days.set_active(existing.id, true)?;
                existing.active = true;
                (existing, false)
            }
            None => (self.days.insert(&date, true)?, true),
        };

        let rollover = roll_over_tasks(&self.tasks, previous.id, current.id)?;

        info!(
            "event=day_change module=day_service status=ok from_day_id={} from=\"{}\" to_day_id={} to=\"{}\" created={} carried={} archived={}",
            previous.id,
            previous.date,
            current.id,
            current.date,
            created,
            rollover.carried,
            rollover.archived
        );

        Ok(DayChange::Switched {
            previous,
            current,
            created,
            rollover,
        })
    }
}
