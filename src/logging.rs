//! Logging setup: one append-mode log file per logger name, with an
//! optional console mirror.
//!
//! The file layer (`<name>.log` in the current directory, UTF-8) is always
//! installed at info level, or error level under `--quiet`. When the
//! verbose flag is set a second layer mirrors output to stderr at debug
//! (or trace) verbosity. `RUST_LOG` overrides the file filter.

use std::fs::OpenOptions;
use std::io;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing_subscriber::Layer;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Installs the global subscriber. Call once, before any log output.
///
/// # Errors
///
/// Returns an error if the log file cannot be opened for appending.
pub fn init(name: &str, verbose: u8, quiet: bool) -> Result<()> {
    let log_path = format!("{name}.log");
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("failed to open log file {log_path}"))?;

    let file_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if quiet { "error" } else { "info" }));
    let file_layer = fmt::layer()
        .with_writer(Arc::new(file))
        .with_ansi(false)
        .with_filter(file_filter);

    let registry = tracing_subscriber::registry().with(file_layer);

    if verbose > 0 {
        let console_filter = EnvFilter::new(if verbose > 1 { "trace" } else { "debug" });
        let console_layer = fmt::layer()
            .with_writer(io::stderr)
            .with_filter(console_filter);
        registry.with(console_layer).init();
    } else {
        registry.init();
    }

    Ok(())
}
