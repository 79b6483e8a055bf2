//! Iris: an allowlist-gated upstream status relay.

pub mod adapters;
pub mod config;
pub mod gate;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod runtime;

pub use adapters::EventSource;
pub use config::schema::IrisConfig;
pub use gate::{Gate, GateResponse, Surface};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use runtime::LambdaRuntime;
