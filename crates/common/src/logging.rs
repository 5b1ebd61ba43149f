//! Logging and tracing initialization.

use std::fs::{File, OpenOptions};
use std::sync::Mutex;

use tracing_subscriber::fmt::writer::BoxMakeWriter;

use crate::config::LoggingConfig;
use crate::error::{AppshotError, AppshotResult};

/// Install the global tracing subscriber.
///
/// `RUST_LOG` overrides the configured level. When `config.file` is set,
/// events are appended to that file without ANSI colours; otherwise they go
/// to stderr. A subscriber installed earlier stays in place.
pub fn init_logging(config: &LoggingConfig) -> AppshotResult<()> {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let (writer, ansi) = match &config.file {
        Some(path) => (BoxMakeWriter::new(Mutex::new(open_log_file(path)?)), false),
        None => (BoxMakeWriter::new(std::io::stderr), true),
    };

    if config.json {
        let subscriber = fmt::Subscriber::builder()
            .with_env_filter(env_filter)
            .with_writer(writer)
            .json()
            .finish();
        tracing::subscriber::set_global_default(subscriber).ok();
    } else {
        let subscriber = fmt::Subscriber::builder()
            .with_env_filter(env_filter)
            .with_writer(writer)
            .with_ansi(ansi)
            .with_target(true)
            .with_file(false)
            .with_line_number(false)
            .finish();
        tracing::subscriber::set_global_default(subscriber).ok();
    }
    Ok(())
}

fn open_log_file(path: &std::path::Path) -> AppshotResult<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| {
            AppshotError::config(format!("Cannot create log directory {}: {e}", parent.display()))
        })?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| AppshotError::config(format!("Cannot open log file {}: {e}", path.display())))
}

/// Logging config for a CLI run: `debug` when verbose, `info` otherwise.
/// The configured destination and format are kept.
pub fn cli_logging(base: LoggingConfig, verbose: bool) -> LoggingConfig {
    if verbose {
        LoggingConfig {
            level: "debug".to_string(),
            ..base
        }
    } else {
        base
    }
}
