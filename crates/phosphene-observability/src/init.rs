// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Logging initialization
//!
//! Installs a console layer (text or JSON) filtered by the configured level
//! and the per-crate debug flags. With the `file-logging` feature and a
//! configured directory, a daily rotated JSON log file is written as well.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

use crate::cli::CrateDebugFlags;
use crate::options::{LogFormat, LoggingOptions};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Keeps the file writer alive; logs are flushed when this is dropped.
pub struct LoggingGuard {
    #[cfg(feature = "file-logging")]
    _file_guard: Option<tracing_appender::non_blocking::WorkerGuard>,
    log_dir: Option<PathBuf>,
}

impl LoggingGuard {
    /// Directory receiving log files, if file logging is active
    pub fn log_dir(&self) -> Option<&Path> {
        self.log_dir.as_deref()
    }
}

/// Initialize the global tracing subscriber
///
/// # Errors
///
/// Fails if the filter string is malformed, the log directory cannot be
/// created, or a global subscriber is already installed.
pub fn init_logging(debug_flags: &CrateDebugFlags, options: &LoggingOptions) -> Result<LoggingGuard> {
    let filter = debug_flags.to_filter_string(&options.level);

    #[allow(unused_mut)]
    let mut layers: Vec<BoxedLayer> = vec![console_layer(&filter, options.format)?];

    #[cfg(feature = "file-logging")]
    let file_guard = match &options.log_dir {
        Some(dir) => {
            let (layer, guard) = file_layer(&filter, dir)?;
            layers.push(layer);
            Some(guard)
        }
        None => None,
    };

    Registry::default()
        .with(layers)
        .try_init()
        .context("A global tracing subscriber is already installed")?;

    #[cfg(not(feature = "file-logging"))]
    warn_file_logging_disabled(options.log_dir.as_deref());

    Ok(LoggingGuard {
        #[cfg(feature = "file-logging")]
        _file_guard: file_guard,
        #[cfg(feature = "file-logging")]
        log_dir: options.log_dir.clone(),
        #[cfg(not(feature = "file-logging"))]
        log_dir: None,
    })
}

fn env_filter(filter: &str) -> Result<EnvFilter> {
    EnvFilter::try_new(filter).with_context(|| format!("Invalid log filter: {}", filter))
}

fn console_layer(filter: &str, format: LogFormat) -> Result<BoxedLayer> {
    let env_filter = env_filter(filter)?;
    let layer = match format {
        LogFormat::Text => tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_filter(env_filter)
            .boxed(),
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .with_filter(env_filter)
            .boxed(),
    };
    Ok(layer)
}

#[cfg(not(feature = "file-logging"))]
fn warn_file_logging_disabled(log_dir: Option<&Path>) {
    if let Some(dir) = log_dir {
        tracing::warn!(
            target: "phosphene-observability",
            "File logging to {} requested but the file-logging feature is disabled",
            dir.display()
        );
    }
}

#[cfg(feature = "file-logging")]
fn file_layer(
    filter: &str,
    log_dir: &Path,
) -> Result<(BoxedLayer, tracing_appender::non_blocking::WorkerGuard)> {
    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("Failed to create log directory: {}", log_dir.display()))?;

    let appender = tracing_appender::rolling::daily(log_dir, "phosphene.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(appender);

    let layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .json()
        .with_filter(env_filter(filter)?)
        .boxed();

    Ok((layer, guard))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_filter_is_rejected() {
        let options = LoggingOptions {
            level: "info,phosphene-engine=loud".to_string(),
            ..LoggingOptions::default()
        };
        assert!(console_layer(&options.level, options.format).is_err());
    }

    #[test]
    fn test_second_init_fails() {
        let flags = CrateDebugFlags::from_args(vec!["--debug-phosphene-engine".to_string()]);
        let guard = init_logging(&flags, &LoggingOptions::default()).unwrap();
        assert_eq!(guard.log_dir(), None);
        tracing::debug!(target: "phosphene-engine", "subscriber installed");

        let second = init_logging(&flags, &LoggingOptions::default());
        assert!(second.is_err());
    }
}
