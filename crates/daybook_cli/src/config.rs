//! Runtime configuration for the CLI.
//!
//! Precedence: command-line flag, then environment variable, then default.

use std::path::PathBuf;

use crate::cli::Cli;

pub const DB_PATH_ENV: &str = "DAYBOOK_DB_PATH";
pub const LOG_LEVEL_ENV: &str = "DAYBOOK_LOG_LEVEL";
pub const LOG_DIR_ENV: &str = "DAYBOOK_LOG_DIR";
const DEFAULT_DB_FILE_NAME: &str = "daybook.sqlite3";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub db_path: PathBuf,
    pub log_level: String,
    pub log_dir: Option<PathBuf>,
}

impl Config {
    /// Resolves configuration from parsed flags and the process environment.
    pub fn from_cli(cli: &Cli) -> Self {
        Self::resolve(
            cli.db.clone(),
            cli.log_level.clone(),
            cli.log_dir.clone(),
            |key| std::env::var(key).ok(),
        )
    }

    fn resolve<F>(
        db: Option<PathBuf>,
        log_level: Option<String>,
        log_dir: Option<PathBuf>,
        env: F,
    ) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| {
            env(key)
                .map(|raw| raw.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let db_path = db
            .or_else(|| non_empty(DB_PATH_ENV).map(PathBuf::from))
            .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_DB_FILE_NAME));
        let log_level = log_level
            .or_else(|| non_empty(LOG_LEVEL_ENV))
            .unwrap_or_else(|| daybook_core::default_log_level().to_string());
        let log_dir = log_dir.or_else(|| non_empty(LOG_DIR_ENV).map(PathBuf::from));

        Self {
            db_path,
            log_level,
            log_dir,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Config, DB_PATH_ENV, LOG_DIR_ENV, LOG_LEVEL_ENV};
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn flags_take_precedence_over_environment() {
        let env = env_of(&[(DB_PATH_ENV, "/env/db.sqlite3"), (LOG_LEVEL_ENV, "warn")]);
        let config = Config::resolve(
            Some(PathBuf::from("/flag/db.sqlite3")),
            Some("trace".to_string()),
            None,
            env,
        );
        assert_eq!(config.db_path, PathBuf::from("/flag/db.sqlite3"));
        assert_eq!(config.log_level, "trace");
        assert_eq!(config.log_dir, None);
    }

    #[test]
    fn environment_fills_missing_flags() {
        let env = env_of(&[
            (DB_PATH_ENV, " /env/db.sqlite3 "),
            (LOG_LEVEL_ENV, "error"),
            (LOG_DIR_ENV, "/var/log/daybook"),
        ]);
        let config = Config::resolve(None, None, None, env);
        assert_eq!(config.db_path, PathBuf::from("/env/db.sqlite3"));
        assert_eq!(config.log_level, "error");
        assert_eq!(config.log_dir, Some(PathBuf::from("/var/log/daybook")));
    }

    #[test]
    fn blank_environment_values_fall_back_to_defaults() {
        let env = env_of(&[(DB_PATH_ENV, "   "), (LOG_DIR_ENV, "")]);
        let config = Config::resolve(None, None, None, env);
        assert_eq!(
            config.db_path,
            std::env::temp_dir().join("daybook.sqlite3")
        );
        assert_eq!(config.log_level, daybook_core::default_log_level());
        assert_eq!(config.log_dir, None);
    }
}
