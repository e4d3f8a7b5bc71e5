//! Logging and observability helpers.

use std::fs;
use std::path::Path;

use tracing_subscriber::EnvFilter;

const LOG_FILE_PREFIX: &str = "dbdriver.log";
const DEFAULT_FILTER: &str = "dbdriver=info";

/// Installs the global subscriber. With a `log_dir`, output goes to a daily
/// rolling file there; otherwise to stderr. `RUST_LOG` overrides the filter.
/// Calling this more than once is a no-op.
pub fn init_tracing(log_dir: Option<&Path>) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let builder = tracing_subscriber::fmt().with_env_filter(env_filter);

    let _ = match log_dir {
        Some(dir) if fs::create_dir_all(dir).is_ok() => builder
            .with_writer(tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX))
            .with_ansi(false)
            .try_init(),
        _ => builder.with_writer(std::io::stderr).try_init(),
    };
}
