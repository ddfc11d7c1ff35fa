//! Logging setup.
//!
//! Structured tracing to stderr, optionally mirrored to a file. Verbosity
//! comes from `RUST_LOG`, defaulting to `info`. Stderr keeps stdout clean
//! for machine-readable command output.

use std::io;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::time::OffsetTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Guard that must be kept alive for the duration of logging.
///
/// Dropping it flushes and closes the log file writer.
pub struct LoggingGuard {
    _file_guard: Option<WorkerGuard>,
}

/// Initialize the global tracing subscriber.
///
/// With `log_file` set, log lines are additionally appended to that file
/// (its parent directory is created if needed). Returns an error when the
/// directory cannot be created or the local UTC offset cannot be
/// determined.
pub fn init_logging(log_file: Option<&Path>) -> Result<LoggingGuard, io::Error> {
    let timer = OffsetTime::local_rfc_3339().map_err(io::Error::other)?;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stderr)
        .with_ansi(true)
        .with_timer(timer.clone());

    let (file_layer, file_guard) = match log_file {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            let dir = path.parent().unwrap_or_else(|| Path::new("."));
            let name = path.file_name().unwrap_or_else(|| "annotile.log".as_ref());
            let appender = tracing_appender::rolling::never(dir, name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_timer(timer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    Ok(LoggingGuard {
        _file_guard: file_guard,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    // The global subscriber can only be installed once per process, so the
    // init path itself is exercised by running the CLI. These cover the
    // guard plumbing.

    #[test]
    fn test_guard_without_file_writer() {
        let guard = LoggingGuard { _file_guard: None };
        drop(guard);
    }

    #[test]
    fn test_guard_with_file_writer() {
        let (writer, file_guard) = tracing_appender::non_blocking(std::io::sink());
        drop(writer);
        let guard = LoggingGuard {
            _file_guard: Some(file_guard),
        };
        drop(guard);
    }
}
