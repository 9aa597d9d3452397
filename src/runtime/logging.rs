use std::fs::{self, OpenOptions};
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::config::{LogSettings, default_log_path};

/// Send `tracing` output to the log file; the terminal belongs to the TUI.
/// `RUST_LOG` wins over the configured level. Returns the file in use, or
/// `None` when no log file could be opened (logging is then disabled).
pub fn init_logging(settings: &LogSettings) -> Option<std::path::PathBuf> {
    let path = settings.file.clone().or_else(default_log_path)?;
    if let Some(dir) = path.parent() {
        let _ = fs::create_dir_all(dir);
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .ok()?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .ok()?;
    Some(path)
}
