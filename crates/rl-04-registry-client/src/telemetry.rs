//! Tracing subscriber setup for applications embedding the client.
//!
//! Library code only emits events; call [`init_tracing`] once at startup to
//! see them.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LogConfig;
use crate::domain::ClientError;

/// Install a global subscriber for `config`.
///
/// `RUST_LOG` takes precedence over `config.level`.
///
/// # Errors
///
/// `ClientError::Config` for an invalid filter directive or if a global
/// subscriber is already installed.
pub fn init_tracing(config: &LogConfig) -> Result<(), ClientError> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| ClientError::Config(format!("log filter: {e}")))?;

    let installed = if config.json {
        let json_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .with_file(true)
            .with_line_number(true);
        tracing_subscriber::registry()
            .with(env_filter)
            .with(json_layer)
            .try_init()
    } else {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_thread_ids(false)
            .with_ansi(true);
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()
    };
    installed.map_err(|e| ClientError::Config(format!("tracing: {e}")))?;

    tracing::info!(level = %config.level, json = config.json, "Tracing initialized");
    Ok(())
}
