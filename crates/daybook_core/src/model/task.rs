//! Task model.
//!
//! # Responsibility
//! - Define day-scoped task records and their two lifecycle axes.
//!
//! # Invariants
//! - `name` is trimmed, non-empty and globally unique.
//! - `day_id` always references an existing day.
//! - New tasks start as `one-time` + `active`.

use crate::model::day::DayId;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Store-assigned task identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub i64);

impl Display for TaskId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Whether a task follows the active day or belongs to a single day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskType {
    /// Carried forward on every day change.
    #[serde(rename = "daily")]
    Daily,
    /// Scoped to one day; archived as completed when that day ends.
    #[serde(rename = "one-time")]
    OneTime,
}

impl TaskType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::OneTime => "one-time",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "daily" => Some(Self::Daily),
            "one-time" => Some(Self::OneTime),
            _ => None,
        }
    }
}

impl Display for TaskType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Task completion state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Active,
    Completed,
}

impl TaskStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "active" => Some(Self::Active),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }
}

impl Display for TaskStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Persisted task record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub name: String,
    pub day_id: DayId,
    /// Serialized as `type` to match the external naming.
    #[serde(rename = "type")]
    pub kind: TaskType,
    pub status: TaskStatus,
}

impl Task {
    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Completed
    }

    /// True when the task sits on `day_id` and is still open.
    pub fn is_active_on(&self, day_id: DayId) -> bool {
        self.status == TaskStatus::Active && self.day_id == day_id
    }
}

/// Insert payload for a task; the store assigns the identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub name: String,
    pub day_id: DayId,
    pub kind: TaskType,
    pub status: TaskStatus,
}

impl NewTask {
    /// Builds the default shape of a freshly created task: one-time and active.
    pub fn one_time(name: impl Into<String>, day_id: DayId) -> Self {
        Self {
            name: name.into(),
            day_id,
            kind: TaskType::OneTime,
            status: TaskStatus::Active,
        }
    }
}

/// Trims a raw task name; returns `None` when nothing is left.
pub fn normalize_task_name(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::{normalize_task_name, NewTask, TaskStatus, TaskType};
    use crate::model::day::DayId;

    #[test]
    fn normalize_task_name_trims_and_rejects_blank() {
        assert_eq!(normalize_task_name("  water plants \n"), Some("water plants"));
        assert_eq!(normalize_task_name(" \t "), None);
        assert_eq!(normalize_task_name(""), None);
    }

    #[test]
    fn new_task_defaults_to_active_one_time() {
        let task = NewTask::one_time("feed chickens", DayId(7));
        assert_eq!(task.kind, TaskType::OneTime);
        assert_eq!(task.status, TaskStatus::Active);
        assert_eq!(task.day_id, DayId(7));
    }

    #[test]
    fn parse_rejects_unknown_storage_values() {
        assert_eq!(TaskType::parse("weekly"), None);
        assert_eq!(TaskType::parse("one_time"), None);
        assert_eq!(TaskStatus::parse("done"), None);
    }
}
