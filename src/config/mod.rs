//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! optional config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → environment overrides (ALLOWED_URLS, EXPECTED_HEADER_*, ...)
//!     → validation.rs (warnings only)
//!     → IrisConfig (immutable for the process lifetime)
//!     → Gate built once, shared via Arc
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; there is no reload
//! - All fields have defaults so an empty environment is a valid config
//! - Misconfiguration degrades to refusing requests, never to a startup failure

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load, ConfigError, EnvNotice, LoadedConfig};
pub use schema::{
    AdmissionConfig, IrisConfig, LogFormat, ObservabilityConfig, RuntimeConfig, ServerConfig,
    TargetSource, UpstreamConfig,
};
