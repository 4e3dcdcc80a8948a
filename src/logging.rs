//! Logging setup using `tracing` and `tracing-subscriber`.
//!
//! - `info`: run summary
//! - `debug`: cells added per masking stage
//! - `trace`: skipped groups and rows (column names and row ids only, never cell values)

use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Map CLI verbosity to a level: 0 warn, 1 info, 2 debug, 3+ trace
pub fn level_from_verbosity(verbosity: u8) -> Level {
    match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Install the global subscriber, writing compact lines to stderr.
///
/// `RUST_LOG` takes precedence over the verbosity level.
pub fn init_logging(verbosity: u8) {
    let level = level_from_verbosity(verbosity);
    let filter = build_env_filter(level);

    let layer = fmt::layer()
        .compact()
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time();

    // try_init only fails when a subscriber is already installed
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init();
}

fn build_env_filter(level: Level) -> EnvFilter {
    let level_str = level.as_str().to_lowercase();
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        // Dependencies stay at warn
        EnvFilter::new(format!("warn,small_cell_mask={}", level_str))
    })
}
