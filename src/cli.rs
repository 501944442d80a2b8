//! Command-line interface argument parsing for expense-tui.
//!
//! The only setting is where the expense database lives:
//! - `expense-tui`
//! - `expense-tui --db-path ./my-expenses.db`

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use clap::Parser;

/// Environment variable consulted when `--db-path` is not given
pub const DB_PATH_ENV: &str = "EXPENSE_DB";

const APP_DIR: &str = "expense-tui";
const DB_FILE: &str = "expenses.db";

/// A terminal dashboard for logging personal expenses.
#[derive(Parser, Debug)]
#[command(name = "expense-tui")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the expense database file
    /// Defaults to $EXPENSE_DB, then <data dir>/expense-tui/expenses.db
    #[arg(long)]
    pub db_path: Option<PathBuf>,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub log_path: PathBuf,
}

impl AppConfig {
    /// Resolve the database location: flag, then environment, then the per-user data dir
    pub fn from_args(db_path: Option<PathBuf>) -> Self {
        let env_path = std::env::var_os(DB_PATH_ENV).map(PathBuf::from);
        Self::resolve(db_path, env_path)
    }

    fn resolve(flag: Option<PathBuf>, env: Option<PathBuf>) -> Self {
        let db_path = flag
            .or(env)
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(default_db_path);
        let log_path = log_path_for(&db_path);

        AppConfig { db_path, log_path }
    }
}

/// `<store file name>.log` beside the store. Appending keeps the log distinct
/// from the store whatever extension the store has.
fn log_path_for(db_path: &Path) -> PathBuf {
    let mut name = db_path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from(DB_FILE));
    name.push(".log");
    db_path.with_file_name(name)
}

fn default_db_path() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join(APP_DIR).join(DB_FILE))
        .unwrap_or_else(|| PathBuf::from(DB_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_wins_over_env() {
        let config = AppConfig::resolve(
            Some(PathBuf::from("flag.db")),
            Some(PathBuf::from("env.db")),
        );
        assert_eq!(config.db_path, PathBuf::from("flag.db"));
        assert_eq!(config.log_path, PathBuf::from("flag.db.log"));
    }

    #[test]
    fn test_env_used_without_flag() {
        let config = AppConfig::resolve(None, Some(PathBuf::from("/tmp/env.db")));
        assert_eq!(config.db_path, PathBuf::from("/tmp/env.db"));
    }

    #[test]
    fn test_default_path() {
        let config = AppConfig::resolve(None, None);
        assert!(config.db_path.ends_with(DB_FILE));
        assert_eq!(config.log_path.extension().unwrap(), "log");
    }

    #[test]
    fn test_log_path_never_matches_store() {
        let config = AppConfig::resolve(Some(PathBuf::from("/data/expenses.log")), None);
        assert_eq!(config.db_path, PathBuf::from("/data/expenses.log"));
        assert_eq!(config.log_path, PathBuf::from("/data/expenses.log.log"));

        let config = AppConfig::resolve(None, Some(PathBuf::from("/data/expenses")));
        assert_eq!(config.log_path, PathBuf::from("/data/expenses.log"));
        assert_ne!(config.log_path, config.db_path);
    }

    #[test]
    fn test_empty_env_falls_back_to_default() {
        let config = AppConfig::resolve(None, Some(PathBuf::new()));
        assert!(config.db_path.ends_with(DB_FILE));
    }

    #[test]
    fn test_parse_db_path_flag() {
        let cli = Cli::try_parse_from(["expense-tui", "--db-path", "x.db"]).unwrap();
        assert_eq!(cli.db_path, Some(PathBuf::from("x.db")));

        let cli = Cli::try_parse_from(["expense-tui"]).unwrap();
        assert_eq!(cli.db_path, None);
    }
}
