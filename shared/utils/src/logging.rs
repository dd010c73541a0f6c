use anyhow::Result;
use std::sync::Mutex;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;

/// Installs the global subscriber. Log lines go to stderr (or the configured
/// file) so that stdout carries only the operator progress lines.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let registry = tracing_subscriber::registry().with(env_filter);

    let file = match &config.file_path {
        Some(file_path) => Some(Mutex::new(
            std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(file_path)?,
        )),
        None => None,
    };

    match (config.format.as_str(), file) {
        ("json", Some(file)) => registry
            .with(fmt::layer().json().with_writer(file))
            .try_init()?,
        ("json", None) => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init()?,
        (_, Some(file)) => registry
            .with(fmt::layer().with_ansi(false).with_writer(file))
            .try_init()?,
        (_, None) => registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .try_init()?,
    }

    tracing::debug!("Logging initialized with level: {}", config.level);
    Ok(())
}

#[macro_export]
macro_rules! log_error {
    ($err:expr, $msg:expr) => {
        tracing::error!(error = %$err, $msg);
    };
    ($err:expr, $msg:expr, $($field:tt)*) => {
        tracing::error!(error = %$err, $msg, $($field)*);
    };
}
