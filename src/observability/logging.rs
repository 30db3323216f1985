//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber once per process
//! - Map `-v` flags and the configured level onto an `EnvFilter`

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter directive for the configured level raised by `verbosity`.
pub fn directive(level: &str, verbosity: u8) -> String {
    let level = match verbosity {
        0 => level,
        1 => "debug",
        _ => "trace",
    };
    format!("chimera={}", level)
}

/// Install the global subscriber. Later calls are ignored.
pub fn init(level: &str, verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(directive(level, verbosity)));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .try_init();
}
