use anyhow::Result;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

use crate::config::{Config, LogFormat};

/// Initialize logging and tracing subsystem
pub fn init(config: &Config) -> Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| level_filter(&config.log_level));

    let (pretty_layer, json_layer) = match config.log_format {
        LogFormat::Pretty => (Some(fmt::layer().with_target(false).compact()), None),
        LogFormat::Json => (
            None,
            Some(
                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true),
            ),
        ),
    };

    Registry::default()
        .with(env_filter)
        .with(pretty_layer)
        .with(json_layer)
        .try_init()?;

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "FGD generator starting");

    Ok(())
}

/// Filter for a configured level; an unparsable level falls back to `info`.
fn level_filter(level: &str) -> EnvFilter {
    EnvFilter::try_new(level).unwrap_or_else(|e| {
        eprintln!("Invalid log level \"{}\" ({}), using info", level, e);
        EnvFilter::new("info")
    })
}

/// Log the effective configuration
pub fn log_config(config: &Config) {
    tracing::info!(
        source_dir = %config.source_dir.display(),
        output_dir = %config.output_dir.display(),
        file_prefix = %config.file_prefix,
        "Configuration loaded"
    );
}
