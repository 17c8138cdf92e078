//! Day repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist day records keyed by `(year, season, number)`.
//! - Expose the active-day lookup with a multiple-active fault check.
//!
//! # Invariants
//! - `insert` never duplicates a triple and never touches an existing row.
//! - `get_active` reports `MultipleActiveDays` instead of picking a row.
//! - `set_active` on an unknown id is a no-op.

use super::schema::ensure_connection_ready;
use super::{run_in_transaction, RepoError, RepoResult};
use crate::model::day::{CalendarDate, Day, DayId, Season};
use log::error;
use rusqlite::{params, Connection, OptionalExtension, Row};

const DAY_SELECT_SQL: &str = "SELECT
    id,
    year,
    season,
    number,
    active
FROM days";

const DAY_COLUMNS: &[&str] = &["id", "year", "season", "number", "active"];

/// Repository interface for day persistence.
pub trait DayRepository {
    /// Inserts a day, or returns the existing row for the same triple unchanged.
    fn insert(&self, date: &CalendarDate, active: bool) -> RepoResult<Day>;
    /// Loads the single active day, if any.
    fn get_active(&self) -> RepoResult<Option<Day>>;
    /// Loads one day by id.
    fn get_by_id(&self, id: DayId) -> RepoResult<Option<Day>>;
    /// Loads one day by its calendar triple.
    fn get_by_attributes(&self, date: &CalendarDate) -> RepoResult<Option<Day>>;
    /// Sets the active flag of one day.
    fn set_active(&self, id: DayId, active: bool) -> RepoResult<()>;
    /// Runs `work` as one atomic unit against the underlying store.
    fn with_transaction<T, E, F>(&self, work: F) -> Result<T, E>
    where
        F: FnOnce() -> Result<T, E>,
        E: From<RepoError>;
}

/// SQLite-backed day repository.
#[derive(Clone, Copy, Debug)]
pub struct SqliteDayRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteDayRepository<'conn> {
    /// Creates repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, "days", DAY_COLUMNS)?;
        Ok(Self { conn })
    }
}

impl DayRepository for SqliteDayRepository<'_> {
    fn insert(&self, date: &CalendarDate, active: bool) -> RepoResult<Day> {
        self.conn.execute(
            "INSERT INTO days (year, season, number, active)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT (year, season, number) DO NOTHING;",
            params![date.year, date.season.as_str(), date.number, active],
        )?;

        self.get_by_attributes(date)?.ok_or_else(|| {
            RepoError::InvalidData(format!("day `{date}` missing right after insert"))
        })
    }

    fn get_active(&self) -> RepoResult<Option<Day>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{DAY_SELECT_SQL} WHERE active = 1 ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut active = Vec::new();
        while let Some(row) = rows.next()? {
            active.push(parse_day_row(row)?);
        }

        if active.len() > 1 {
            let ids = active
                .iter()
                .map(|day| day.id.to_string())
                .collect::<Vec<_>>()
                .join(",");
            error!(
                "event=active_day_lookup module=day_repo status=error error_code=multiple_active_days count={} ids={}",
                active.len(),
                ids
            );
            return Err(RepoError::MultipleActiveDays(active.len()));
        }

        Ok(active.pop())
    }

    fn get_by_id(&self, id: DayId) -> RepoResult<Option<Day>> {
        let day = self
            .conn
            .query_row(
                &format!("{DAY_SELECT_SQL} WHERE id = ?1;"),
                [id.0],
                |row| Ok(parse_day_row(row)),
            )
            .optional()?;
        day.transpose()
    }

    fn get_by_attributes(&self, date: &CalendarDate) -> RepoResult<Option<Day>> {
        let day = self
            .conn
            .query_row(
                &format!("{DAY_SELECT_SQL} WHERE year = ?1 AND season = ?2 AND number = ?3;"),
                params![date.year, date.season.as_str(), date.number],
                |row| Ok(parse_day_row(row)),
            )
            .optional()?;
        day.transpose()
    }

    fn set_active(&self, id: DayId, active: bool) -> RepoResult<()> {
        self.conn.execute(
            "UPDATE days SET active = ?2 WHERE id = ?1;",
            params![id.0, active],
        )?;
        Ok(())
    }

    fn with_transaction<T, E, F>(&self, work: F) -> Result<T, E>
    where
        F: FnOnce() -> Result<T, E>,
        E: From<RepoError>,
    {
        run_in_transaction(self.conn, work)
    }
}

fn parse_day_row(row: &Row<'_>) -> RepoResult<Day> {
    let id = DayId(row.get("id")?);

    let raw_year: i64 = row.get("year")?;
    let year = u32::try_from(raw_year)
        .map_err(|_| RepoError::InvalidData(format!("invalid year `{raw_year}` in days.year")))?;

    let season_text: String = row.get("season")?;
    let season = Season::parse(&season_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid season `{season_text}` in days.season"))
    })?;

    let raw_number: i64 = row.get("number")?;
    let number = u8::try_from(raw_number).map_err(|_| {
        RepoError::InvalidData(format!("invalid number `{raw_number}` in days.number"))
    })?;

    let date = CalendarDate::new(year, season, number)
        .map_err(|err| RepoError::InvalidData(format!("day {id}: {err}")))?;

    let active = match row.get::<_, i64>("active")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid active value `{other}` in days.active"
            )));
        }
    };

    Ok(Day { id, date, active })
}
