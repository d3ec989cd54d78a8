//! Logging setup.
//!
//! Events go to stderr and are appended to `~/.claude/logs/pushbullet-notify.log`
//! (or `logging.log_file`), which is rotated to `.log.old` at 1MB.

use std::fs::{self, File, OpenOptions};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;
use crate::error::{NotifyError, Result};

const LOG_FILE_NAME: &str = "pushbullet-notify.log";
const LOG_DIR_NAME: &str = "logs";
const MAX_LOG_SIZE: u64 = 1_048_576; // 1MB

/// Get the default log file path.
pub fn default_log_path() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| NotifyError::Config("Could not determine home directory".to_string()))?;
    Ok(home.join(".claude").join(LOG_DIR_NAME).join(LOG_FILE_NAME))
}

/// Filter directive for the configured verbosity.
pub fn default_directive(debug: bool) -> String {
    let level = if debug { "debug" } else { "info" };
    format!("{}={}", env!("CARGO_CRATE_NAME"), level)
}

/// Install the global subscriber. `RUST_LOG` overrides the configured level.
///
/// A log file that cannot be opened only disables the file output.
pub fn init(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(config.debug)));

    let path = match &config.log_file {
        Some(path) => Ok(path.clone()),
        None => default_log_path(),
    };

    let log_file = match path {
        Ok(path) => match open_log_file(&path) {
            Ok(file) => Some(file),
            Err(e) => {
                eprintln!("Cannot open log file {}: {}", path.display(), e);
                None
            }
        },
        Err(e) => {
            eprintln!("{}", e);
            None
        }
    };

    let file_layer = log_file.map(|file| {
        fmt::layer()
            .with_ansi(false)
            .with_target(false)
            .with_writer(Mutex::new(file))
    });

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_ansi(std::io::stderr().is_terminal())
                .with_writer(std::io::stderr),
        )
        .with(file_layer)
        .try_init();
}

/// Create the parent directory, rotate if needed and open for append.
pub fn open_log_file(path: &Path) -> Result<File> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() && !dir.exists() {
            fs::create_dir_all(dir)?;
        }
    }

    if needs_rotation(path) {
        rotate_log(path)?;
    }

    Ok(OpenOptions::new().create(true).append(true).open(path)?)
}

/// Check if log file needs rotation.
fn needs_rotation(path: &Path) -> bool {
    fs::metadata(path)
        .map(|m| m.len() >= MAX_LOG_SIZE)
        .unwrap_or(false)
}

/// Rotate log file (rename to .old, start fresh).
fn rotate_log(path: &Path) -> Result<()> {
    if !path.exists() {
        return Ok(());
    }

    let old_path = rotated_path(path);
    if old_path.exists() {
        fs::remove_file(&old_path)?;
    }
    fs::rename(path, &old_path)?;

    Ok(())
}

fn rotated_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".old");
    PathBuf::from(name)
}
