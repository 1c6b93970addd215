//! Logging setup
//!
//! - JSON file log on a daily rolling appender (optional)
//! - Human-readable stderr output; stdout is reserved for command output
//! - `log` macros from library code bridged into `tracing`
//! - Rolled-over log files gzipped in the background

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use flate2::write::GzEncoder;
use flate2::Compression;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::config::LoggingConfig;

/// Base file name of the rolling log.
pub const LOG_FILE_PREFIX: &str = "booksmith.log";

fn env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level))
}

/// Initialize logging.
///
/// Returns a `WorkerGuard` when file logging is enabled. It must be kept alive
/// for the duration of the program so buffered lines are flushed on exit.
pub fn init(config: &LoggingConfig, log_dir: &Path) -> Option<WorkerGuard> {
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stderr)
        .with_target(false)
        .with_filter(env_filter(config));

    let (file_layer, guard) = if config.file_logging {
        if let Err(e) = fs::create_dir_all(log_dir) {
            eprintln!("Failed to create logs directory {}: {e}", log_dir.display());
        }
        let file_appender = tracing_appender::rolling::daily(log_dir, LOG_FILE_PREFIX);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        let layer = tracing_subscriber::fmt::layer()
            .with_writer(non_blocking)
            .json()
            .with_file(true)
            .with_line_number(true)
            .with_thread_ids(true)
            .with_target(true)
            .with_filter(env_filter(config));
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    if let Err(e) = tracing_subscriber::registry()
        .with(file_layer)
        .with(stderr_layer)
        .try_init()
    {
        eprintln!("Failed to initialize tracing subscriber: {e}");
    }

    // Already installed when tracing-subscriber's own log bridge is active.
    if let Err(e) = tracing_log::LogTracer::init() {
        log::debug!("LogTracer not installed: {e}");
    }

    if config.file_logging {
        if config.compress_old_logs {
            let dir = log_dir.to_path_buf();
            std::thread::spawn(move || compress_old_logs(&dir));
        }
        log::debug!(
            "Logging initialized. Writing to: {} (daily rolling)",
            log_dir.join(LOG_FILE_PREFIX).display()
        );
    }

    guard
}

/// Rolled files that should be compressed: every dated file except the newest,
/// which may still be written to.
fn rolled_logs(log_dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = fs::read_dir(log_dir) else {
        return Vec::new();
    };

    let mut dated: Vec<PathBuf> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|name| {
                    name.starts_with(&format!("{LOG_FILE_PREFIX}.")) && !name.ends_with(".gz")
                })
        })
        .collect();

    // Dates are YYYY-MM-DD, so name order is chronological.
    dated.sort();
    dated.pop();
    dated
}

fn compress_old_logs(log_dir: &Path) {
    for path in rolled_logs(log_dir) {
        match compress_file(&path) {
            Ok(()) => log::info!("Compressed old log: {}", path.display()),
            Err(e) => log::warn!("Failed to compress old log {}: {e}", path.display()),
        }
    }
}

fn compress_file(path: &Path) -> io::Result<()> {
    let mut gz_name = path
        .file_name()
        .ok_or_else(|| io::Error::other("No filename"))?
        .to_os_string();
    gz_name.push(".gz");
    let gz_path = path.with_file_name(gz_name);

    if gz_path.exists() {
        return Ok(());
    }

    let mut reader = io::BufReader::new(fs::File::open(path)?);
    let mut encoder = GzEncoder::new(fs::File::create(&gz_path)?, Compression::default());
    io::copy(&mut reader, &mut encoder)?;
    encoder.finish()?;

    fs::remove_file(path)
}
