//! Admission and status-relay core.
//!
//! # Data Flow
//! ```text
//! surface adapter (event JSON or HTTP request)
//!     → InboundRequest (method?, target, headers)
//!     → admission.rs (method → header → allowlist)
//!         refused  → 403 with surface wording
//!         admitted → upstream.rs (GET https://<target>)
//!                  → status N relayed with its reason phrase
//!     → GateResponse
//! ```
//!
//! # Design Decisions
//! - Configuration is injected once; nothing reads the environment here
//! - The upstream is a trait so tests can stand in for the network
//! - No outcome is an error; failures become status codes

pub mod admission;
pub mod handler;
pub mod response;
pub mod surface;
pub mod upstream;

pub use admission::{check_admission, Allowlist, ExpectedHeader, HeaderKeyCase, InboundRequest, Rejection};
pub use handler::Gate;
pub use response::GateResponse;
pub use surface::Surface;
pub use upstream::{HttpsUpstream, Upstream};
