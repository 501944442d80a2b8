//! File logging setup.
//!
//! The terminal belongs to the dashboard, so log output goes to a file next
//! to the database instead of stdout.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing_subscriber::{filter, layer::SubscriberExt, util::SubscriberInitExt, Layer};

/// Install a global subscriber appending DEBUG and above to `log_path`
pub fn init(log_path: &Path) -> Result<()> {
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
        .with_context(|| format!("Could not open log file: {log_path:?}"))?;

    let file_log = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .with_writer(Arc::new(log_file));

    tracing_subscriber::registry()
        .with(file_log.with_filter(filter::LevelFilter::DEBUG))
        .try_init()
        .context("Failed to install log subscriber")?;

    Ok(())
}
