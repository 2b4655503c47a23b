//! Logging utilities for the Medibook application.
//!
//! This module provides a standardized approach to logging across all crates
//! in the workspace. Every crate logs through `tracing`; the backend binary calls
//! [`init`] once at startup to install the subscriber.

use tracing::{error, info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber at INFO level.
///
/// `RUST_LOG` takes precedence over the default level when it is set.
///
/// ```
/// use medibook_common::logging;
///
/// logging::init();
/// ```
pub fn init() {
    init_with_level(Level::INFO);
}

/// Initialize the tracing subscriber with a specific default log level.
///
/// The default filter covers every `medibook_*` crate plus the request traces
/// emitted by `tower_http`. Calling this twice is harmless.
fn init_with_level(level: Level) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("medibook={level},tower_http={level}")));

    let result = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_thread_ids(true),
        )
        .with(filter)
        .try_init();

    if result.is_ok() {
        info!("Logging initialized at level: {}", level);
    }
}

/// Log a result, with different messages for success and error cases.
///
/// Logs `success_message` at INFO if the result is Ok, or `error_context` and
/// the error at ERROR otherwise. Returns the result unchanged so it can be
/// used in a chain.
pub fn log_result<T, E: std::fmt::Display>(
    result: Result<T, E>,
    success_message: &str,
    error_context: &str,
) -> Result<T, E> {
    match &result {
        Ok(_) => info!("{}", success_message),
        Err(e) => error!("{}: {}", error_context, e),
    }
    result
}
