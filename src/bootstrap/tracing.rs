//! Tracing configuration for cinesearch
//!
//! - **Console**: human-readable lines on stderr, so command output on
//!   stdout stays clean
//! - **File**: same format without colors, appended to
//!   `<logs_dir>/cinesearch.log` through a non-blocking writer
//! - **`log` bridge**: diesel pool messages emitted via `log` are forwarded
//!   into tracing

use std::{fs, io, path::Path, sync::OnceLock};

use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{fmt, fmt::writer::BoxMakeWriter, prelude::*, registry, EnvFilter};

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

fn is_development() -> bool {
    cfg!(debug_assertions)
}

/// Default filter directives when `RUST_LOG` is not set.
fn build_filter_directives(verbose: bool) -> Vec<String> {
    let level = if verbose { "debug" } else { "info" };
    vec![
        level.to_string(),
        format!("cs_app={level}"),
        format!("cs_infra={level}"),
        "hyper=warn".to_string(),
        "hyper_util=warn".to_string(),
        "reqwest=warn".to_string(),
        "rustls=warn".to_string(),
    ]
}

/// Register the global subscriber. Call once, before any use case runs.
///
/// `debug` forces debug level regardless of build profile. With no
/// `logs_dir`, or when the directory cannot be created, only the console
/// layer is installed.
///
/// # Errors
///
/// Fails if a global subscriber or `log` logger is already registered.
pub fn init_tracing_subscriber(debug: bool, logs_dir: Option<&Path>) -> anyhow::Result<()> {
    let verbose = debug || is_development();
    let directives = build_filter_directives(verbose);
    let env_filter = if debug {
        EnvFilter::new(directives.join(","))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directives.join(",")))
    };

    let console_layer = fmt::layer()
        .with_timer(fmt::time::ChronoUtc::new(TIMESTAMP_FORMAT.to_string()))
        .with_level(true)
        .with_target(true)
        .with_ansi(cfg!(not(test)))
        .with_writer(BoxMakeWriter::new(io::stderr));

    let file_layer = match logs_dir.map(build_file_writer).transpose() {
        Ok(writer) => writer.map(|writer| {
            fmt::layer()
                .with_timer(fmt::time::ChronoUtc::new(TIMESTAMP_FORMAT.to_string()))
                .with_level(true)
                .with_file(true)
                .with_line_number(true)
                .with_target(true)
                .with_ansi(false)
                .with_writer(writer)
        }),
        Err(err) => {
            eprintln!("Failed to initialize file logging, console only: {err}");
            None
        }
    };

    let subscriber = registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer);
    tracing::subscriber::set_global_default(subscriber)?;
    tracing_log::LogTracer::init()?;

    Ok(())
}

fn build_file_writer(logs_dir: &Path) -> anyhow::Result<NonBlocking> {
    fs::create_dir_all(logs_dir)?;

    let file_appender = tracing_appender::rolling::never(logs_dir, "cinesearch.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    LOG_GUARD
        .set(guard)
        .map_err(|_| anyhow::anyhow!("Tracing log guard already initialized"))?;

    Ok(non_blocking)
}
