//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gate.
//! All types derive Serde traits for deserialization from config files;
//! environment overrides are applied afterwards by the loader.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::adapters::EventSource;
use crate::gate::admission::{Allowlist, ExpectedHeader, HeaderKeyCase};

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct IrisConfig {
    /// Allowlist and shared-secret header.
    pub admission: AdmissionConfig,

    /// Outbound client settings.
    pub upstream: UpstreamConfig,

    /// Built-in HTTP server settings.
    pub server: ServerConfig,

    /// Lambda runtime loop settings.
    pub runtime: RuntimeConfig,

    /// Logging and metrics.
    pub observability: ObservabilityConfig,
}

/// Admission configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AdmissionConfig {
    /// Exact `host[:port]/path` tokens that may be fetched.
    pub allowed_urls: Vec<String>,

    /// Header every request must carry. Empty disables the check.
    pub expected_header_key: String,

    /// Value the header must have.
    pub expected_header_value: String,

    /// How the header key is matched.
    pub header_key_case: HeaderKeyCase,
}

impl AdmissionConfig {
    pub fn allowlist(&self) -> Allowlist {
        Allowlist::from_entries(self.allowed_urls.iter().cloned())
    }

    pub fn expected_header(&self) -> ExpectedHeader {
        ExpectedHeader::new(&*self.expected_header_key, &*self.expected_header_value)
            .with_key_case(self.header_key_case)
    }
}

pub const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_UPSTREAM_CONNECT_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Upstream client configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Total time allowed for the upstream GET, in seconds. Zero means default.
    pub timeout_secs: u64,

    /// Connection establishment timeout in seconds. Zero means default.
    pub connect_timeout_secs: u64,

    /// User-Agent sent upstream.
    pub user_agent: String,
}

impl UpstreamConfig {
    pub fn timeout(&self) -> Duration {
        non_zero_secs(self.timeout_secs, DEFAULT_UPSTREAM_TIMEOUT_SECS)
    }

    pub fn connect_timeout(&self) -> Duration {
        non_zero_secs(self.connect_timeout_secs, DEFAULT_UPSTREAM_CONNECT_TIMEOUT_SECS)
    }
}

fn non_zero_secs(secs: u64, default: u64) -> Duration {
    Duration::from_secs(if secs == 0 { default } else { secs })
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_UPSTREAM_TIMEOUT_SECS,
            connect_timeout_secs: DEFAULT_UPSTREAM_CONNECT_TIMEOUT_SECS,
            user_agent: format!("iris/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Where the HTTP server reads the target token from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetSource {
    /// The `url` query parameter.
    #[default]
    Query,
    /// The request path with one leading `/` removed.
    Path,
}

impl FromStr for TargetSource {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "query" => Ok(TargetSource::Query),
            "path" => Ok(TargetSource::Path),
            other => Err(UnknownVariant(other.to_string())),
        }
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Where the target token comes from.
    pub target_source: TargetSource,

    /// Refuse anything but GET and HEAD.
    pub restrict_methods: bool,

    /// Inbound request timeout in seconds. Zero means default.
    pub request_timeout_secs: u64,
}

impl ServerConfig {
    pub fn request_timeout(&self) -> Duration {
        non_zero_secs(self.request_timeout_secs, DEFAULT_REQUEST_TIMEOUT_SECS)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            target_source: TargetSource::Query,
            restrict_methods: true,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

/// Lambda runtime configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RuntimeConfig {
    /// `host:port` of the Lambda runtime API, from `AWS_LAMBDA_RUNTIME_API`.
    /// Selects lambda mode by default; the runtime itself reads the variable.
    pub api_address: Option<String>,

    /// Which event shape to expect.
    pub event_source: EventSource,
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Json,
    Pretty,
}

impl FromStr for LogFormat {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "json" => Ok(LogFormat::Json),
            "pretty" => Ok(LogFormat::Pretty),
            other => Err(UnknownVariant(other.to_string())),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Json,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// A string that names no known variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVariant(pub String);

impl fmt::Display for UnknownVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown variant `{}`", self.0)
    }
}

impl std::error::Error for UnknownVariant {}
