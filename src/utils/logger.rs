use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

const LOG_FILE_STEM: &str = "bookmark_time_updater";

/// Log file for a run started at `started`, e.g. `logs/bookmark_time_updater_20240301_083000.log`.
pub fn log_file_path(log_dir: &Path, started: DateTime<Local>) -> PathBuf {
    log_dir.join(format!("{}_{}.log", LOG_FILE_STEM, started.format("%Y%m%d_%H%M%S")))
}

/// Installs a global subscriber writing to a timestamped file under `log_dir`.
///
/// Verbosity follows `RUST_LOG`, defaulting to `info`. Returns the path of the log file.
pub fn init_logger(log_dir: &str) -> Result<PathBuf> {
    let dir = Path::new(log_dir);
    fs::create_dir_all(dir).with_context(|| format!("creating log directory {}", dir.display()))?;

    let log_file = log_file_path(dir, Local::now());
    let writer = fs::File::create(&log_file)
        .with_context(|| format!("creating log file {}", log_file.display()))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let level = filter.to_string();
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_file(true)
        .with_line_number(true)
        .with_target(false)
        .with_ansi(false)
        .with_writer(writer)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        filter = %level,
        file = %log_file.display(),
        "bookmark_time_updater logging started"
    );

    Ok(log_file)
}
