// Logging module for structured logging using the tracing crate

use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;
use crate::error::{Error, Result};

/// Initialize the tracing subscriber for structured logging
///
/// `RUST_LOG` takes precedence over the configured level. With `json`
/// enabled every event is written as one JSON object per line, otherwise
/// the compact human-readable format is used. Output goes to stderr so
/// generated URLs on stdout stay pipeable.
///
/// # Errors
///
/// Returns a configuration error if the level directive cannot be parsed
/// or a global subscriber is already installed.
///
/// # Examples
///
/// ```
/// use thumbor_url::config::LoggingConfig;
/// use thumbor_url::logging::init_subscriber;
///
/// init_subscriber(&LoggingConfig::default()).expect("Failed to initialize logging");
/// tracing::info!("Application started");
/// ```
pub fn init_subscriber(config: &LoggingConfig) -> Result<()> {
    let filter = build_filter(config)?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    let result = if config.json {
        builder.json().try_init()
    } else {
        builder.compact().try_init()
    };

    result.map_err(|e| Error::Configuration(format!("Failed to initialize logging: {}", e)))
}

fn build_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(&config.level).map_err(|e| {
            Error::Configuration(format!("Invalid log level '{}': {}", config.level, e))
        }),
    }
}
