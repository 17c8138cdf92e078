//! Domain model for the day calendar and day-scoped tasks.
//!
//! # Responsibility
//! - Define the records shared by stores and engines.
//! - Own pure calendar arithmetic (validation and successor computation).
//!
//! # Invariants
//! - `(year, season, number)` identifies at most one `Day`.
//! - Task type and status are independent axes; engines gate transitions.

pub mod day;
pub mod task;
