use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::LoggingConfig;
use crate::{err_msg, TheoryError};

/// Installs the global `tracing` subscriber, writing to stderr.
///
/// `RUST_LOG` takes precedence over `config.filter`. Calling this twice returns a `Config`
/// error rather than panicking.
pub fn init_tracing(config: &LoggingConfig) -> Result<(), TheoryError> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.filter).map_err(|e| {
            err_msg!(Config, "invalid log filter '{}'", config.filter).with_source(e)
        })?,
    };

    let result = if config.json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .try_init()
    };

    result.map_err(|e| err_msg!(Config, "logging already initialised").with_source(e))
}
