//! Task repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist day-scoped tasks with globally unique names.
//! - Offer a closed set of typed single-field mutations.
//!
//! # Invariants
//! - Names are trimmed before they reach SQL.
//! - UNIQUE violations on `tasks.name` surface as `DuplicateTaskName`.
//! - List reads are ordered by `id ASC`.

use super::error::is_unique_violation;
use super::schema::ensure_connection_ready;
use super::{RepoError, RepoResult};
use crate::model::day::DayId;
use crate::model::task::{normalize_task_name, NewTask, Task, TaskId, TaskStatus, TaskType};
use rusqlite::types::Value;
use rusqlite::{params, Connection, OptionalExtension, Row};

const TASK_SELECT_SQL: &str = "SELECT
    id,
    name,
    day_id,
    type,
    status
FROM tasks";

const TASK_COLUMNS: &[&str] = &["id", "name", "day_id", "type", "status"];

/// One mutable task field together with its new value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskField {
    Name(String),
    Status(TaskStatus),
    Kind(TaskType),
    Day(DayId),
}

/// Repository interface for task persistence.
pub trait TaskRepository {
    /// Inserts a task and returns it with its assigned id.
    fn insert(&self, task: &NewTask) -> RepoResult<Task>;
    /// Loads one task by id.
    fn get_by_id(&self, id: TaskId) -> RepoResult<Option<Task>>;
    /// Lists tasks referencing `day_id`, ascending by id.
    fn get_all_by_day_id(&self, day_id: DayId) -> RepoResult<Vec<Task>>;
    /// Lists completed tasks across all days, ascending by id.
    fn get_all_completed(&self) -> RepoResult<Vec<Task>>;
    /// Writes one field of one task.
    fn update_field(&self, id: TaskId, field: TaskField) -> RepoResult<()>;
    /// Reopens a task and moves it onto `day_id` in a single write.
    fn make_active(&self, id: TaskId, day_id: DayId) -> RepoResult<()>;

    fn make_completed(&self, id: TaskId) -> RepoResult<()> {
        self.update_field(id, TaskField::Status(TaskStatus::Completed))
    }

    fn make_daily(&self, id: TaskId) -> RepoResult<()> {
        self.update_field(id, TaskField::Kind(TaskType::Daily))
    }

    fn make_one_time(&self, id: TaskId) -> RepoResult<()> {
        self.update_field(id, TaskField::Kind(TaskType::OneTime))
    }

    fn edit_name(&self, id: TaskId, name: &str) -> RepoResult<()> {
        self.update_field(id, TaskField::Name(name.to_string()))
    }

    fn move_to_day(&self, id: TaskId, day_id: DayId) -> RepoResult<()> {
        self.update_field(id, TaskField::Day(day_id))
    }
}

/// SQLite-backed task repository.
#[derive(Clone, Copy)]
pub struct SqliteTaskRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTaskRepository<'conn> {
    /// Creates repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, "tasks", TASK_COLUMNS)?;
        Ok(Self { conn })
    }

    fn list_where(&self, filter: &str, bind: Value) -> RepoResult<Vec<Task>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TASK_SELECT_SQL} WHERE {filter} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([bind])?;
        let mut tasks = Vec::new();
        while let Some(row) = rows.next()? {
            tasks.push(parse_task_row(row)?);
        }
        Ok(tasks)
    }
}

impl TaskRepository for SqliteTaskRepository<'_> {
    fn insert(&self, task: &NewTask) -> RepoResult<Task> {
        let name = normalize_task_name(&task.name).ok_or(RepoError::BlankTaskName)?;

        self.conn
            .execute(
                "INSERT INTO tasks (name, day_id, type, status)
                 VALUES (?1, ?2, ?3, ?4);",
                params![
                    name,
                    task.day_id.0,
                    task.kind.as_str(),
                    task.status.as_str()
                ],
            )
            .map_err(|err| duplicate_name_or(err, name))?;

        Ok(Task {
            id: TaskId(self.conn.last_insert_rowid()),
            name: name.to_string(),
            day_id: task.day_id,
            kind: task.kind,
            status: task.status,
        })
    }

    fn get_by_id(&self, id: TaskId) -> RepoResult<Option<Task>> {
        let task = self
            .conn
            .query_row(
                &format!("{TASK_SELECT_SQL} WHERE id = ?1;"),
                [id.0],
                |row| Ok(parse_task_row(row)),
            )
            .optional()?;
        task.transpose()
    }

    fn get_all_by_day_id(&self, day_id: DayId) -> RepoResult<Vec<Task>> {
        self.list_where("day_id = ?1", Value::Integer(day_id.0))
    }

    fn get_all_completed(&self) -> RepoResult<Vec<Task>> {
        self.list_where(
            "status = ?1",
            Value::Text(TaskStatus::Completed.as_str().to_string()),
        )
    }

    fn update_field(&self, id: TaskId, field: TaskField) -> RepoResult<()> {
        let changed = match field {
            TaskField::Name(raw) => {
                let name = normalize_task_name(&raw).ok_or(RepoError::BlankTaskName)?;
                self.conn
                    .execute(
                        "UPDATE tasks SET name = ?2 WHERE id = ?1;",
                        params![id.0, name],
                    )
                    .map_err(|err| duplicate_name_or(err, name))?
            }
            TaskField::Status(status) => self.conn.execute(
                "UPDATE tasks SET status = ?2 WHERE id = ?1;",
                params![id.0, status.as_str()],
            )?,
            TaskField::Kind(kind) => self.conn.execute(
                "UPDATE tasks SET type = ?2 WHERE id = ?1;",
                params![id.0, kind.as_str()],
            )?,
            TaskField::Day(day_id) => self.conn.execute(
                "UPDATE tasks SET day_id = ?2 WHERE id = ?1;",
                params![id.0, day_id.0],
            )?,
        };

        if changed == 0 {
            return Err(RepoError::TaskNotFound(id));
        }
        Ok(())
    }

    fn make_active(&self, id: TaskId, day_id: DayId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE tasks SET status = ?2, day_id = ?3 WHERE id = ?1;",
            params![id.0, TaskStatus::Active.as_str(), day_id.0],
        )?;
        if changed == 0 {
            return Err(RepoError::TaskNotFound(id));
        }
        Ok(())
    }
}

fn duplicate_name_or(err: rusqlite::Error, name: &str) -> RepoError {
    if is_unique_violation(&err) {
        RepoError::DuplicateTaskName(name.to_string())
    } else {
        err.into()
    }
}

fn parse_task_row(row: &Row<'_>) -> RepoResult<Task> {
    let type_text: String = row.get("type")?;
    let kind = TaskType::parse(&type_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid task type `{type_text}` in tasks.type"))
    })?;

    let status_text: String = row.get("status")?;
    let status = TaskStatus::parse(&status_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid task status `{status_text}` in tasks.status"
        ))
    })?;

    Ok(Task {
        id: TaskId(row.get("id")?),
        name: row.get("name")?,
        day_id: DayId(row.get("day_id")?),
        kind,
        status,
    })
}
