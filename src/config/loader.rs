//! Configuration loading from disk and the environment.
//!
//! The optional TOML file is read first; environment variables then override
//! individual fields. Environment lookups go through a caller-supplied
//! function so tests never touch the process environment. What the
//! environment pass notices is returned alongside the config, since loading
//! runs before logging is initialised.

use std::fs;
use std::path::Path;
use std::str::FromStr;

use thiserror::Error;

use crate::config::schema::IrisConfig;
use crate::gate::admission::{split_allowed_urls, HeaderKeyCase};

pub const ALLOWED_URLS: &str = "ALLOWED_URLS";
pub const EXPECTED_HEADER_KEY: &str = "EXPECTED_HEADER_KEY";
pub const EXPECTED_HEADER_VALUE: &str = "EXPECTED_HEADER_VALUE";
pub const EXPECTED_HEADER_IGNORE_CASE: &str = "EXPECTED_HEADER_IGNORE_CASE";
pub const UPSTREAM_TIMEOUT_SECS: &str = "UPSTREAM_TIMEOUT_SECS";
pub const UPSTREAM_CONNECT_TIMEOUT_SECS: &str = "UPSTREAM_CONNECT_TIMEOUT_SECS";
pub const BIND_ADDRESS: &str = "IRIS_BIND_ADDRESS";
pub const TARGET_SOURCE: &str = "IRIS_TARGET_SOURCE";
pub const EVENT_SOURCE: &str = "IRIS_EVENT_SOURCE";
pub const LOG_FORMAT: &str = "IRIS_LOG_FORMAT";
pub const LOG_LEVEL: &str = "IRIS_LOG_LEVEL";
pub const METRICS_ADDRESS: &str = "IRIS_METRICS_ADDRESS";
pub const RUNTIME_API: &str = "AWS_LAMBDA_RUNTIME_API";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Load configuration from a TOML file, without environment overrides.
pub fn load_config(path: &Path) -> Result<IrisConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: IrisConfig = toml::from_str(&content)?;
    Ok(config)
}

/// Something noticed while reading the environment.
///
/// Loading happens before the subscriber exists, so notices are collected and
/// logged by the caller once logging is up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvNotice {
    AllowedUrls {
        value: String,
    },
    Unparseable {
        env: &'static str,
        value: String,
        error: String,
    },
}

impl EnvNotice {
    pub fn log(&self) {
        match self {
            EnvNotice::AllowedUrls { value } => {
                tracing::info!(env = ALLOWED_URLS, value = %value, "Loading allowed URLs");
            }
            EnvNotice::Unparseable { env, value, error } => {
                tracing::warn!(env = %env, value = %value, error = %error, "Ignoring unparseable environment override");
            }
        }
    }
}

/// Configuration plus what was noticed while building it.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: IrisConfig,
    pub notices: Vec<EnvNotice>,
}

impl LoadedConfig {
    pub fn log_notices(&self) {
        for notice in &self.notices {
            notice.log();
        }
    }
}

/// Load the optional file, then apply overrides from the process environment.
pub fn load(path: Option<&Path>) -> Result<LoadedConfig, ConfigError> {
    load_with(path, |key| std::env::var(key).ok())
}

/// Load the optional file, then apply overrides from `lookup`.
pub fn load_with<F>(path: Option<&Path>, lookup: F) -> Result<LoadedConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match path {
        Some(path) => load_config(path)?,
        None => IrisConfig::default(),
    };
    let notices = apply_env_overrides(&mut config, lookup);
    Ok(LoadedConfig { config, notices })
}

/// Build configuration from environment lookups alone, logging notices immediately.
///
/// Never fails: absent variables leave defaults in place.
pub fn from_env<F>(lookup: F) -> IrisConfig
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = IrisConfig::default();
    for notice in apply_env_overrides(&mut config, lookup) {
        notice.log();
    }
    config
}

/// Override fields from environment lookups.
///
/// Values that fail to parse are ignored and reported as notices.
pub fn apply_env_overrides<F>(config: &mut IrisConfig, lookup: F) -> Vec<EnvNotice>
where
    F: Fn(&str) -> Option<String>,
{
    let mut notices = Vec::new();

    if let Some(raw) = lookup(ALLOWED_URLS) {
        config.admission.allowed_urls = split_allowed_urls(&raw);
        notices.push(EnvNotice::AllowedUrls { value: raw });
    }
    if let Some(key) = lookup(EXPECTED_HEADER_KEY) {
        config.admission.expected_header_key = key;
    }
    if let Some(value) = lookup(EXPECTED_HEADER_VALUE) {
        config.admission.expected_header_value = value;
    }
    if let Some(flag) = parse_var::<Flag, _>(&lookup, EXPECTED_HEADER_IGNORE_CASE, &mut notices) {
        config.admission.header_key_case = if flag.0 {
            HeaderKeyCase::Insensitive
        } else {
            HeaderKeyCase::Exact
        };
    }

    if let Some(secs) = parse_var(&lookup, UPSTREAM_TIMEOUT_SECS, &mut notices) {
        config.upstream.timeout_secs = secs;
    }
    if let Some(secs) = parse_var(&lookup, UPSTREAM_CONNECT_TIMEOUT_SECS, &mut notices) {
        config.upstream.connect_timeout_secs = secs;
    }

    if let Some(addr) = lookup(BIND_ADDRESS) {
        config.server.bind_address = addr;
    }
    if let Some(source) = parse_var(&lookup, TARGET_SOURCE, &mut notices) {
        config.server.target_source = source;
    }

    if let Some(api) = lookup(RUNTIME_API).filter(|api| !api.is_empty()) {
        config.runtime.api_address = Some(api);
    }
    if let Some(source) = parse_var(&lookup, EVENT_SOURCE, &mut notices) {
        config.runtime.event_source = source;
    }

    if let Some(format) = parse_var(&lookup, LOG_FORMAT, &mut notices) {
        config.observability.log_format = format;
    }
    if let Some(level) = lookup(LOG_LEVEL) {
        config.observability.log_level = level;
    }
    if let Some(addr) = lookup(METRICS_ADDRESS).filter(|addr| !addr.is_empty()) {
        config.observability.metrics_address = addr;
        config.observability.metrics_enabled = true;
    }

    notices
}

fn parse_var<T, F>(lookup: &F, key: &'static str, notices: &mut Vec<EnvNotice>) -> Option<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key)?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(e) => {
            notices.push(EnvNotice::Unparseable {
                env: key,
                value: raw,
                error: e.to_string(),
            });
            None
        }
    }
}

/// Boolean environment flag.
struct Flag(bool);

impl FromStr for Flag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(Flag(true)),
            "" | "0" | "false" | "no" | "off" => Ok(Flag(false)),
            other => Err(format!("not a boolean: {}", other)),
        }
    }
}
