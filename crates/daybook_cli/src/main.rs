//! `daybook` command-line entry point.
//!
//! # Responsibility
//! - Resolve configuration, open the store and dispatch one engine call.
//! - Print results as JSON on stdout and failures as JSON on stderr.

mod cli;
mod config;

use clap::Parser;
use daybook_core::db::open_db;
use daybook_core::{
    normalize_task_name, DayService, DayServiceError, ErrorKind, RepoError, SqliteDayRepository,
    SqliteTaskRepository, TaskId, TaskService, TaskServiceError,
};
use log::error;
use serde::Serialize;
use serde_json::json;
use std::process::ExitCode;

use cli::{Cli, Commands};
use config::Config;

/// Failure ready to be reported to the user.
#[derive(Debug)]
struct CliError {
    code: &'static str,
    message: String,
    client: bool,
}

impl CliError {
    fn config(message: String) -> Self {
        Self {
            code: "invalid_config",
            message,
            client: true,
        }
    }

    fn internal() -> Self {
        Self::from_kind(ErrorKind::Internal, "internal error".to_string())
    }

    fn from_kind(kind: ErrorKind, message: String) -> Self {
        Self {
            code: kind.code(),
            message,
            client: kind.is_client_error(),
        }
    }

    fn exit_code(&self) -> ExitCode {
        if self.client {
            ExitCode::from(2)
        } else {
            ExitCode::from(1)
        }
    }
}

impl From<DayServiceError> for CliError {
    fn from(value: DayServiceError) -> Self {
        Self::from_kind(value.kind(), value.public_message())
    }
}

impl From<TaskServiceError> for CliError {
    fn from(value: TaskServiceError) -> Self {
        Self::from_kind(value.kind(), value.public_message())
    }
}

impl From<RepoError> for CliError {
    fn from(value: RepoError) -> Self {
        error!("event=store_init module=cli status=error error={value}");
        Self::internal()
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = Config::from_cli(&cli);

    match run(&config, cli.command) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{}", json!({ "error": err.code, "message": err.message }));
            err.exit_code()
        }
    }
}

fn run(config: &Config, command: Commands) -> Result<String, CliError> {
    if let Some(log_dir) = &config.log_dir {
        let log_dir = log_dir
            .to_str()
            .ok_or_else(|| CliError::config("log dir is not valid UTF-8".to_string()))?;
        daybook_core::init_logging(&config.log_level, log_dir).map_err(CliError::config)?;
    }

    let conn = open_db(&config.db_path).map_err(|err| {
        error!(
            "event=db_open module=cli status=error path={} error={err}",
            config.db_path.display()
        );
        CliError::internal()
    })?;
    let days = DayService::new(
        SqliteDayRepository::try_new(&conn)?,
        SqliteTaskRepository::try_new(&conn)?,
    );
    let tasks = TaskService::new(&days, SqliteTaskRepository::try_new(&conn)?);

    match command {
        Commands::Today => render(&days.current_day()?),
        Commands::State => render(&days.current_state()?),
        Commands::SetDay {
            year,
            season,
            number,
        } => render(&days.set_current_day(year, &season, number)?),
        Commands::NextDay => render(&days.set_next_day()?),
        Commands::Add { name } => {
            let name = require_name(&name)?;
            render(&tasks.create_task(name)?)
        }
        Commands::Show { id } => render(&tasks.get_by_id(TaskId(id))?),
        Commands::Complete { id } => render(&tasks.make_completed(TaskId(id))?),
        Commands::Activate { id } => render(&tasks.make_active(TaskId(id))?),
        Commands::Daily { id } => render(&tasks.make_daily(TaskId(id))?),
        Commands::OneTime { id } => render(&tasks.make_one_time(TaskId(id))?),
        Commands::Rename { id, name } => {
            let name = require_name(&name)?;
            render(&tasks.edit_name(TaskId(id), name)?)
        }
        Commands::History => render(&tasks.get_all_completed()?),
    }
}

fn require_name(raw: &str) -> Result<&str, CliError> {
    normalize_task_name(raw).ok_or_else(|| {
        CliError::from_kind(
            ErrorKind::InvalidTaskName,
            "task name must not be blank".to_string(),
        )
    })
}

fn render<T: Serialize>(value: &T) -> Result<String, CliError> {
    serde_json::to_string_pretty(value).map_err(|err| {
        error!("event=render module=cli status=error error={err}");
        CliError::internal()
    })
}

#[cfg(test)]
mod tests {
    use super::{require_name, CliError};
    use daybook_core::ErrorKind;

    #[test]
    fn require_name_trims_and_rejects_blank() {
        assert_eq!(require_name("  hoe field ").unwrap(), "hoe field");
        let err = require_name(" \t ").unwrap_err();
        assert_eq!(err.code, "invalid_task_name");
        assert!(err.client);
    }

    #[test]
    fn internal_errors_hide_details_and_exit_with_one() {
        let err = CliError::internal();
        assert_eq!(err.code, ErrorKind::Internal.code());
        assert_eq!(err.message, "internal error");
        assert!(!err.client);
    }
}
