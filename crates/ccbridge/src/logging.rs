//! Tracing setup: human-readable console output plus an optional JSON log file.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

const CONSOLE_FILTER: &str = "ccbridge=info,ccbridge_core=info,ccbridge_server=info,warn";
const VERBOSE_FILTER: &str =
    "ccbridge=debug,ccbridge_core=debug,ccbridge_server=debug,tower_http=debug,info";
const FILE_FILTER: &str = "ccbridge=trace,ccbridge_core=trace,ccbridge_server=trace,info";

/// Install the global subscriber.
///
/// `RUST_LOG` overrides the console filter. The returned guard must be held
/// for the lifetime of the process or buffered file output is lost.
pub fn init(verbose: bool, log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let console_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if verbose { VERBOSE_FILTER } else { CONSOLE_FILTER })
    });

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "ccbridge.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .json()
                .with_writer(writer)
                .with_filter(EnvFilter::new(FILE_FILTER));
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr)
                .with_filter(console_filter),
        )
        .with(file_layer)
        .init();

    guard
}
