//! Tracing configuration and log routing.
//!
//! Requests are logged to stdout with a compact formatter and mirrored to a log file, either
//! `SIMPLIFIER_LOG_FILE` or `logs/lab-simplifier.log`. File output goes through a non-blocking
//! writer so that upload handlers never wait on disk I/O. Document contents and model output are
//! never logged, only sizes and classifications.
use std::{
    fs::OpenOptions,
    io,
    path::{Path, PathBuf},
    sync::OnceLock,
};

use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const LOG_FILE_ENV: &str = "SIMPLIFIER_LOG_FILE";
const DEFAULT_LOG_PATH: &str = "logs/lab-simplifier.log";
const DEFAULT_FILTER: &str = "info,tower_http=info";

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Install the global subscriber.
///
/// `RUST_LOG` overrides the default `info,tower_http=info` filter. When the log file cannot be
/// opened the service keeps running with stdout only.
pub fn init_tracing() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let stdout_layer = fmt::layer().with_target(false).compact();
    let registry = tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer);

    let path = log_file_path(std::env::var(LOG_FILE_ENV).ok());
    match open_log_writer(&path) {
        Ok((writer, guard)) => {
            // Dropping the guard stops the background worker and loses buffered lines.
            let _ = LOG_GUARD.set(guard);
            let file_layer = fmt::layer()
                .with_writer(writer)
                .with_target(true)
                .with_ansi(false)
                .compact();
            registry.with(file_layer).init();
        }
        Err(err) => {
            eprintln!("Failed to open log file {}: {err}", path.display());
            registry.init();
        }
    }
}

/// Resolve the log file from the configured override, ignoring blank values.
fn log_file_path(configured: Option<String>) -> PathBuf {
    configured
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .map_or_else(|| PathBuf::from(DEFAULT_LOG_PATH), PathBuf::from)
}

/// Open `path` for appending, creating missing parent directories, behind a non-blocking writer.
fn open_log_writer(path: &Path) -> io::Result<(NonBlocking, WorkerGuard)> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    Ok(tracing_appender::non_blocking(file))
}
