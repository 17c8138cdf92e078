//! Task migration performed on every day change.
//!
//! For each task on the outgoing day: daily tasks move to the incoming day,
//! open one-time tasks are archived as completed on the outgoing day, and
//! completed one-time tasks stay where they were finished. Each task's
//! outcome depends only on its own type and status.

use crate::model::day::DayId;
use crate::model::task::{TaskStatus, TaskType};
use crate::repo::task_repo::TaskRepository;
use crate::repo::RepoResult;
use log::debug;
use serde::Serialize;

/// Counts of what a rollover did to the outgoing day's tasks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RolloverSummary {
    /// Daily tasks moved onto the new day.
    pub carried: usize,
    /// Open one-time tasks marked completed.
    pub archived: usize,
    /// Completed one-time tasks left in place.
    pub untouched: usize,
}

/// Migrates tasks from `previous_day` to `next_day`.
///
/// Callers run this inside the same transaction as the activation change.
pub fn roll_over_tasks<T: TaskRepository>(
    tasks: &T,
    previous_day: DayId,
    next_day: DayId,
) -> RepoResult<RolloverSummary> {
    let mut summary = RolloverSummary::default();

    for task in tasks.get_all_by_day_id(previous_day)? {
        match (task.kind, task.status) {
            (TaskType::Daily, _) => {
                tasks.move_to_day(task.id, next_day)?;
                summary.carried += 1;
            }
            (TaskType::OneTime, TaskStatus::Active) => {
                tasks.make_completed(task.id)?;
                summary.archived += 1;
            }
            (TaskType::OneTime, TaskStatus::Completed) => summary.untouched += 1,
        }
    }

    debug!(
        "event=rollover module=rollover status=ok from_day={} to_day={} carried={} archived={} untouched={}",
        previous_day, next_day, summary.carried, summary.archived, summary.untouched
    );
    Ok(summary)
}
