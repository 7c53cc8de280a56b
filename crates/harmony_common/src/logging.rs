//! Logging utilities shared by the Harmony crates.
//!
//! All crates log through `tracing`; binaries call one of the `init_*`
//! functions once at startup to install the subscriber.

use harmony_config::LoggingConfig;
use tracing::{error, info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber with a specific log level.
///
/// `RUST_LOG` directives are honoured; the given level is added for the
/// `harmony` targets on top of them.
pub fn init_with_level(level: Level) {
    // Target matching is by prefix, so this covers every harmony_* crate.
    let mut filter = EnvFilter::from_default_env();
    if let Ok(directive) = format!("harmony={}", level).parse() {
        filter = filter.add_directive(directive);
    }

    // try_init: a global subscriber may already be installed (tests).
    let result = tracing_subscriber::registry()
        .with(fmt::layer()
            .with_target(true)
            .with_file(true)
            .with_line_number(true))
        .with(filter)
        .try_init();

    if result.is_ok() {
        info!("Logging initialized at level: {}", level);
    }
}

/// Initialize from the `[logging]` config section; unknown or missing
/// levels fall back to INFO.
pub fn init_from_config(config: Option<&LoggingConfig>) {
    init_with_level(parse_level(config.and_then(|c| c.level.as_deref())));
}

pub fn parse_level(level: Option<&str>) -> Level {
    level
        .and_then(|l| l.trim().parse::<Level>().ok())
        .unwrap_or(Level::INFO)
}

/// Log a result, with different messages for success and error cases.
///
/// Returns the original result, allowing this function to be used in a chain.
pub fn log_result<T, E: std::fmt::Display>(
    result: Result<T, E>,
    success_message: &str,
    error_context: &str,
) -> Result<T, E> {
    match &result {
        Ok(_) => info!("{}", success_message),
        Err(e) => error!("{}: {}", error_context, e),
    }
    result
}
