//! Logging Infrastructure
//!
//! Structured logging setup: `RUST_LOG` wins over the configured level,
//! optional JSON output, optional daily-rolling file output.

use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Initialize the logger with optional file output
///
/// Returns the appender guard when logging to a file; keep it alive for the
/// lifetime of the process or buffered lines are lost.
pub fn init_logger_with_file(
    log_level: Option<&str>,
    json: bool,
    log_dir: Option<&str>,
) -> Option<WorkerGuard> {
    let level = log_level.unwrap_or("info");
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(false);

    let file_writer = log_dir.and_then(|dir| {
        let path = Path::new(dir);
        if let Err(e) = std::fs::create_dir_all(path) {
            eprintln!("Cannot create log dir {dir}: {e}; logging to stdout");
            return None;
        }
        let appender = tracing_appender::rolling::daily(path, "market-server.log");
        Some(tracing_appender::non_blocking(appender))
    });

    // try_init: a second call (tests) must not panic
    match (file_writer, json) {
        (Some((writer, guard)), true) => {
            let _ = builder.json().with_writer(writer).try_init();
            Some(guard)
        }
        (Some((writer, guard)), false) => {
            let _ = builder.with_ansi(false).with_writer(writer).try_init();
            Some(guard)
        }
        (None, true) => {
            let _ = builder.json().try_init();
            None
        }
        (None, false) => {
            let _ = builder.try_init();
            None
        }
    }
}
