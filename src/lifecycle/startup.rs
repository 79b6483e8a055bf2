//! Startup orchestration.
//!
//! # Responsibilities
//! - Log the effective configuration and its validation warnings
//! - Start the metrics endpoint when enabled
//! - Build the shared gate
//!
//! # Design Decisions
//! - Only a broken HTTP client is fatal; everything else degrades
//! - The configuration is read once here and never again

use std::net::SocketAddr;
use std::sync::Arc;

use thiserror::Error;

use crate::config::validation::log_warnings;
use crate::config::IrisConfig;
use crate::gate::Gate;
use crate::observability::metrics;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("upstream client setup failed: {0}")]
    Client(#[from] reqwest::Error),
}

/// Prepare everything an entry point needs before serving requests.
pub fn start(config: &IrisConfig) -> Result<Arc<Gate>, StartupError> {
    let admission = &config.admission;
    let allowlist = admission.allowlist();
    tracing::info!(
        allowed_urls = ?allowlist.sorted(),
        header_check = !admission.expected_header_key.is_empty(),
        header_key = %admission.expected_header_key,
        header_key_case = ?admission.header_key_case,
        upstream_timeout_secs = config.upstream.timeout().as_secs(),
        "Configuration loaded"
    );
    log_warnings(config);

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse::<SocketAddr>() {
            Ok(addr) => {
                if let Err(e) = metrics::init_metrics(addr) {
                    tracing::error!(error = %e, "Failed to start metrics endpoint");
                }
            }
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let gate = Gate::from_config(config)?;
    Ok(Arc::new(gate))
}
