//! Logging setup for the orrery.
//!
//! Console output always; a JSON log file in debug builds when a log directory
//! is given. `RUST_LOG` wins over the configured level.

use orrery_config::Config;
use std::path::Path;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// File name of the JSON log written in debug builds.
pub const LOG_FILE_NAME: &str = "orrery.log";

const DEFAULT_FILTER: &str = "info,wgpu=warn,naga=warn";

/// Filter directive derived from the config, before any `RUST_LOG` override.
///
/// A bare level such as `debug` still keeps wgpu and naga at `warn`.
pub fn filter_directive(config: Option<&Config>) -> String {
    let level = config.map(|c| c.debug.log_level.trim()).unwrap_or("");
    if level.is_empty() {
        DEFAULT_FILTER.to_string()
    } else if level.contains('=') || level.contains(',') {
        level.to_string()
    } else {
        format!("{level},wgpu=warn,naga=warn")
    }
}

/// Install the global tracing subscriber.
///
/// `log` records from dependencies are forwarded to the same subscriber.
/// Panics if a global subscriber is already set.
pub fn init_logging(log_dir: Option<&Path>, debug_build: bool, config: Option<&Config>) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(config)));

    let console_layer = fmt::layer()
        .with_target(true)
        .with_thread_names(true)
        .with_level(true)
        .with_timer(fmt::time::uptime());

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer);

    if debug_build
        && let Some(log_dir) = log_dir
        && std::fs::create_dir_all(log_dir).is_ok()
        && let Ok(log_file) = std::fs::File::create(log_dir.join(LOG_FILE_NAME))
    {
        let file_layer = fmt::layer()
            .with_writer(log_file)
            .with_ansi(false)
            .with_target(true)
            .with_timer(fmt::time::uptime())
            .json();

        subscriber.with(file_layer).init();
        return;
    }

    subscriber.init();
}

/// `EnvFilter` with the default directive.
pub fn default_env_filter() -> EnvFilter {
    EnvFilter::new(DEFAULT_FILTER)
}
