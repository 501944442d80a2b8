//! expense-tui: a terminal dashboard for logging personal expenses.
//!
//! Records are kept in a local SQLite file. The dashboard adds, filters and
//! deletes records, shows running totals, charts spending per category, and
//! exports the log to a spreadsheet.

mod app;
mod cli;
mod data;
mod export;
mod form;
mod logging;
mod selection;
mod ui;

use anyhow::{Context, Result};
use cli::{AppConfig, Cli};

fn main() -> Result<()> {
    let cli = Cli::parse_args();
    let config = AppConfig::from_args(cli.db_path);

    if let Some(parent) = config.log_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create data directory: {parent:?}"))?;
    }
    logging::init(&config.log_path)?;
    tracing::info!(db_path = ?config.db_path, "starting expense-tui");

    app::run(config)
}
