use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Day and task tracker backed by a local SQLite file.
#[derive(Debug, Parser)]
#[command(name = "daybook", version, about = "Fictional-calendar day and task tracker")]
pub struct Cli {
    /// Path to the SQLite database file.
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Log level: trace | debug | info | warn | error.
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Absolute directory for rolling log files. Logging is off without it.
    #[arg(long, global = true)]
    pub log_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show the active day and its tasks.
    Today,

    /// Show the active day, its tasks and every completed task.
    State,

    /// Activate a specific day, creating it if needed.
    SetDay {
        /// Year, starting at 1.
        year: i64,
        /// spring | summer | autumn | winter.
        season: String,
        /// Day of the season, 1 to 28.
        number: i64,
    },

    /// Advance to the next calendar day.
    NextDay,

    /// Add a one-time task to the active day.
    Add {
        name: String,
    },

    /// Show one task.
    Show {
        id: i64,
    },

    /// Complete a one-time task.
    Complete {
        id: i64,
    },

    /// Reopen a task and move it onto the active day.
    Activate {
        id: i64,
    },

    /// Turn a task into a daily task.
    Daily {
        id: i64,
    },

    /// Turn a task into a one-time task.
    OneTime {
        id: i64,
    },

    /// Rename a task.
    Rename {
        id: i64,
        name: String,
    },

    /// List every completed task.
    History,
}

#[cfg(test)]
mod tests {
    use super::{Cli, Commands};
    use clap::Parser;
    use daybook_core::Season;

    #[test]
    fn parses_set_day_with_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["daybook", "set-day", "2", "Autumn", "14", "--db", "/tmp/d.db"]);
        assert_eq!(cli.db.unwrap().to_str(), Some("/tmp/d.db"));
        match cli.command {
            Commands::SetDay {
                year,
                season,
                number,
            } => {
                assert_eq!(year, 2);
                assert_eq!(Season::parse(&season), Some(Season::Autumn));
                assert_eq!(number, 14);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn one_time_subcommand_is_kebab_case() {
        let cli = Cli::parse_from(["daybook", "one-time", "7"]);
        assert!(matches!(cli.command, Commands::OneTime { id: 7 }));
    }

    #[test]
    fn rejects_non_numeric_task_id() {
        assert!(Cli::try_parse_from(["daybook", "complete", "seven"]).is_err());
    }
}
