//! Configuration validation.
//!
//! # Responsibilities
//! - Point out settings that silently degrade admission
//! - Flag timeouts that will be replaced by defaults
//! - Flag an HTTP request timeout that would cut off the upstream call
//!
//! # Design Decisions
//! - Misconfiguration never stops startup; it degrades to "reject everything"
//! - Returns every finding, not just the first
//! - Pure function: IrisConfig → Vec<ValidationWarning>

use thiserror::Error;

use crate::config::schema::IrisConfig;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationWarning {
    #[error("allowlist is empty; every request will be refused")]
    EmptyAllowlist,

    #[error("allowlist contains an empty entry; a missing target will be fetched as `https://`")]
    EmptyAllowlistEntry,

    #[error("expected header value is set but the key is empty; the header check is skipped")]
    HeaderCheckBypassed,

    #[error("{field} is zero; the default will be used")]
    ZeroTimeout { field: &'static str },

    #[error("upstream timeout ({upstream_secs}s) is not shorter than the HTTP request timeout ({request_secs}s); slow upstreams will get 408 instead of a relayed status")]
    UpstreamOutlastsRequest { upstream_secs: u64, request_secs: u64 },
}

pub fn validate_config(config: &IrisConfig) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();
    let admission = &config.admission;

    if admission.allowed_urls.is_empty() {
        warnings.push(ValidationWarning::EmptyAllowlist);
    } else if admission.allowed_urls.iter().any(String::is_empty) {
        warnings.push(ValidationWarning::EmptyAllowlistEntry);
    }

    if admission.expected_header_key.is_empty() && !admission.expected_header_value.is_empty() {
        warnings.push(ValidationWarning::HeaderCheckBypassed);
    }

    if config.upstream.timeout_secs == 0 {
        warnings.push(ValidationWarning::ZeroTimeout {
            field: "upstream.timeout_secs",
        });
    }
    if config.upstream.connect_timeout_secs == 0 {
        warnings.push(ValidationWarning::ZeroTimeout {
            field: "upstream.connect_timeout_secs",
        });
    }

    if config.server.request_timeout_secs == 0 {
        warnings.push(ValidationWarning::ZeroTimeout {
            field: "server.request_timeout_secs",
        });
    }

    let upstream = config.upstream.timeout();
    let request = config.server.request_timeout();
    if upstream >= request {
        warnings.push(ValidationWarning::UpstreamOutlastsRequest {
            upstream_secs: upstream.as_secs(),
            request_secs: request.as_secs(),
        });
    }

    warnings
}

/// Log every finding at warn level and return how many there were.
pub fn log_warnings(config: &IrisConfig) -> usize {
    let warnings = validate_config(config);
    for warning in &warnings {
        tracing::warn!(warning = %warning, "Configuration warning");
    }
    warnings.len()
}
