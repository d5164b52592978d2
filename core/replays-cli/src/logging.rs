//! Logging setup for the CLI.
//!
//! Human-readable output goes to stderr. When the storage root is writable, a
//! daily rolling file under `logs/` receives the same events, so failed saves
//! can be inspected after the fact.

use std::env;

use replays_core::StorageConfig;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

const DEBUG_ENV: &str = "SMART_REPLAYS_DEBUG_LOG";
const LOG_FILE_PREFIX: &str = "smart-replays.log";

/// Installs the global subscriber. Keep the returned guard alive until exit or
/// buffered file lines are lost.
pub fn init(storage: &StorageConfig) -> Option<WorkerGuard> {
    let filter = if debug_enabled() {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    let stderr_layer = fmt::layer().with_writer(std::io::stderr).with_target(false);

    let logs_dir = storage.logs_dir();
    match fs_err::create_dir_all(&logs_dir) {
        Ok(()) => {
            let appender = tracing_appender::rolling::daily(&logs_dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let file_layer = fmt::layer().with_writer(writer).with_ansi(false);

            tracing_subscriber::registry()
                .with(filter)
                .with(stderr_layer)
                .with(file_layer)
                .init();
            Some(guard)
        }
        Err(err) => {
            tracing_subscriber::registry()
                .with(filter)
                .with(stderr_layer)
                .init();
            tracing::warn!(error = %err, "File logging disabled");
            None
        }
    }
}

fn debug_enabled() -> bool {
    env::var(DEBUG_ENV)
        .map(|value| is_truthy(&value))
        .unwrap_or(false)
}

fn is_truthy(value: &str) -> bool {
    matches!(value, "1" | "true" | "TRUE" | "yes" | "YES")
}
