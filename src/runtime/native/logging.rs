//! File logging. The terminal belongs to the TUI, so nothing is logged to it.

use crate::runtime::native::data::get_data_dir;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

pub const LOG_FILE_NAME: &str = "thunder-lineup.log";
/// Used when `RUST_LOG` is unset or invalid.
pub const DEFAULT_FILTER: &str = "thunder_lineup=info,warn";

pub fn log_path() -> Result<PathBuf> {
    Ok(get_data_dir()?.join(LOG_FILE_NAME))
}

/// Initialize tracing to append to the log file at `path`.
pub fn init_tracing(path: &Path) -> Result<()> {
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::fmt;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
        )
        .with_writer(Mutex::new(log_file))
        .with_ansi(false)
        .with_target(true)
        .with_thread_names(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
