use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::config::{LoggingSettings, default_log_path};

/// Environment variable holding an `EnvFilter` directive.
pub const LOG_ENV: &str = "TAPEDECK_LOG";

/// Build the filter: `TAPEDECK_LOG` wins over `logging.level`.
pub fn filter(settings: &LoggingSettings) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(&settings.level))
}

/// Install the global subscriber writing to the log file.
///
/// The terminal belongs to the UI, so nothing is logged when no file can be
/// opened. Returns the file in use.
pub fn init(settings: &LoggingSettings) -> Option<PathBuf> {
    let path = settings.file.clone().or_else(default_log_path)?;
    if let Some(dir) = path.parent() {
        if let Err(e) = fs::create_dir_all(dir) {
            eprintln!("tapedeck: cannot create log directory {}: {e}", dir.display());
            return None;
        }
    }
    let file = match OpenOptions::new().create(true).append(true).open(&path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("tapedeck: cannot open log file {}: {e}", path.display());
            return None;
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter(settings))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .ok()?;
    Some(path)
}
