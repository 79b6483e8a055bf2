//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber once per process
//! - Pick JSON or pretty output from config
//!
//! # Design Decisions
//! - `RUST_LOG` wins over the configured level
//! - JSON format for deployed functions, pretty format for development

use tracing_subscriber::fmt::{self, MakeWriter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{LogFormat, ObservabilityConfig};

pub use tracing_subscriber::util::TryInitError;

/// Filter used when `RUST_LOG` is unset.
pub fn default_filter(level: &str) -> EnvFilter {
    EnvFilter::try_new(format!("iris={level},iris_invoke={level},tower_http={level}"))
        .unwrap_or_else(|_| EnvFilter::new("iris=info,iris_invoke=info,tower_http=info"))
}

/// Log to stdout.
pub fn init_logging(config: &ObservabilityConfig) -> Result<(), TryInitError> {
    init_with_writer(config, std::io::stdout)
}

/// Log to stderr, leaving stdout for command output.
pub fn init_stderr_logging(config: &ObservabilityConfig) -> Result<(), TryInitError> {
    init_with_writer(config, std::io::stderr)
}

fn init_with_writer<W>(config: &ObservabilityConfig, writer: W) -> Result<(), TryInitError>
where
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(&config.log_level));
    let registry = tracing_subscriber::registry().with(filter);

    match config.log_format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_current_span(false).with_writer(writer))
            .try_init(),
        LogFormat::Pretty => registry.with(fmt::layer().with_writer(writer)).try_init(),
    }
}
