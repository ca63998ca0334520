//! Tracing configuration for rework-bot
//!
//! ## Architecture / 架构
//!
//! - **Filter**: `RUST_LOG` when set, otherwise debug in dev builds and info in release
//! - **Stdout**: fmt layer with UTC timestamps, file and line
//! - **File**: non-blocking appender in the platform data directory
//! - **Sentry**: only when `SENTRY_DSN` is set

use std::path::PathBuf;
use std::sync::OnceLock;
use std::{fs, io};

use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{fmt, fmt::writer::BoxMakeWriter, prelude::*, registry};

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();
static SENTRY_GUARD: OnceLock<sentry::ClientInitGuard> = OnceLock::new();

const LOG_FILE_NAME: &str = "rework-bot.log";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Check if running in development environment
fn is_development() -> bool {
    cfg!(debug_assertions)
}

/// Build the default filter directives for tracing
///
/// ## Behavior / 行为
/// - **Development**: debug level for the bot crates
/// - **Production**: info level
/// - Calculator stdout is logged at trace level and stays off unless asked for
fn build_filter_directives(is_dev: bool) -> Vec<String> {
    vec![
        if is_dev { "debug" } else { "info" }.to_string(),
        if is_dev { "rb_infra=debug" } else { "rb_infra=info" }.to_string(),
        "sentry=warn".to_string(),
    ]
}

/// Directory holding the log file.
///
/// `<data dir>/rework-bot/logs`, falling back to `./logs` when the platform
/// has no data directory.
pub fn logs_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join("rework-bot").join("logs"))
        .unwrap_or_else(|| PathBuf::from("logs"))
}

/// Initialize the tracing subscriber with appropriate configuration
///
/// Call once in `main`, before the runtime starts doing work.
///
/// ## Errors / 错误
///
/// Returns `Err` if a subscriber is already registered.
pub fn init_tracing_subscriber() -> anyhow::Result<()> {
    let is_dev = is_development();

    // Step 1: Build environment filter
    let filter_directives = build_filter_directives(is_dev);
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter_directives.join(",")));

    // Step 2: Initialize Sentry, guard must be kept alive
    let sentry_layer = if let Ok(dsn) = std::env::var("SENTRY_DSN") {
        let guard = sentry::init((
            dsn,
            sentry::ClientOptions {
                release: sentry::release_name!(),
                traces_sample_rate: 1.0,
                ..Default::default()
            },
        ));

        if SENTRY_GUARD.set(guard).is_err() {
            eprintln!("Sentry guard already initialized");
        }

        Some(sentry_tracing::layer())
    } else {
        None
    };

    // Step 3: Create writers
    let stdout_writer: BoxMakeWriter = BoxMakeWriter::new(io::stdout);
    let file_writer = match build_file_writer() {
        Ok(writer) => Some(writer),
        Err(err) => {
            eprintln!("Failed to initialize file logging, falling back to stdout: {err}");
            None
        }
    };

    // Step 4: Create fmt layers
    // "2025-01-15 10:30:45.123 INFO [file.rs:42] [target] message"
    let stdout_layer = fmt::layer()
        .with_timer(fmt::time::ChronoUtc::new(TIMESTAMP_FORMAT.to_string()))
        .with_level(true)
        .with_file(true)
        .with_line_number(true)
        .with_target(true)
        .with_ansi(cfg!(not(test)))
        .with_writer(stdout_writer);

    let file_layer = file_writer.map(|writer| {
        fmt::layer()
            .with_timer(fmt::time::ChronoUtc::new(TIMESTAMP_FORMAT.to_string()))
            .with_level(true)
            .with_file(true)
            .with_line_number(true)
            .with_target(true)
            .with_ansi(false)
            .with_writer(writer)
    });

    // Step 5: Register the global subscriber
    let subscriber = registry()
        .with(env_filter)
        .with(sentry_layer)
        .with(stdout_layer);

    if let Some(layer) = file_layer {
        subscriber.with(layer).try_init()?;
    } else {
        subscriber.try_init()?;
    }

    Ok(())
}

fn build_file_writer() -> anyhow::Result<NonBlocking> {
    let logs_dir = logs_dir();
    fs::create_dir_all(&logs_dir)?;

    let file_appender = tracing_appender::rolling::never(&logs_dir, LOG_FILE_NAME);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    LOG_GUARD
        .set(guard)
        .map_err(|_| anyhow::anyhow!("Tracing log guard already initialized"))?;

    Ok(non_blocking)
}
