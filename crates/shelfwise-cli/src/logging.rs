//! Logging setup
//!
//! Logging is off unless SHELFWISE_LOG is set. Its value is the level
//! (`debug`, `info`, ...) applied to both crates; output goes to a file so it
//! never mixes with command output.

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use tracing::info;
use tracing_subscriber::EnvFilter;

use shelfwise_core::Config;

const LOG_ENV: &str = "SHELFWISE_LOG";

/// Initialize file-based logging if SHELFWISE_LOG is set
///
/// Logs to config.log_file or {data_dir}/shelfwise.log.
pub fn init(config: &Config) {
    let Ok(log_level) = std::env::var(LOG_ENV) else {
        return;
    };

    let log_path: PathBuf = config.log_path();

    let log_file = match open_log_file(&log_path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Warning: Could not open log file {:?}: {}", log_path, e);
            return;
        }
    };

    // Ignore error if already initialized
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter_for(&log_level))
        .with_target(false)
        .with_ansi(false)
        .with_writer(log_file)
        .try_init();

    info!("Logging initialized to {:?}", log_path);
}

/// Open the log file for appending, creating missing parent directories
fn open_log_file(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    OpenOptions::new().create(true).append(true).open(path)
}

fn filter_for(level: &str) -> EnvFilter {
    EnvFilter::new(format!("shelfwise_core={},shelfwise={}", level, level))
}
