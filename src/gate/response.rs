//! Response shaping.
//!
//! Every outcome, refused or relayed, ends up as a `GateResponse`. The
//! serialized form is the JSON object the event runtimes hand back to the
//! platform.

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

pub const CONTENT_TYPE_TEXT: &str = "text/plain";

/// Standard reason phrase for `status`, or an empty string for codes without one.
pub fn reason_phrase(status: StatusCode) -> &'static str {
    status.canonical_reason().unwrap_or("")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseHeaders {
    #[serde(rename = "Content-Type")]
    pub content_type: String,
}

impl Default for ResponseHeaders {
    fn default() -> Self {
        Self {
            content_type: CONTENT_TYPE_TEXT.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GateResponse {
    pub status_code: u16,
    pub status_description: String,
    pub headers: ResponseHeaders,
    pub body: String,
}

impl GateResponse {
    /// 403 with a rejection-specific body.
    pub fn forbidden(body: impl Into<String>) -> Self {
        Self {
            status_code: StatusCode::FORBIDDEN.as_u16(),
            status_description: reason_phrase(StatusCode::FORBIDDEN).to_string(),
            headers: ResponseHeaders::default(),
            body: body.into(),
        }
    }

    /// Relay the upstream status; body and description are its reason phrase.
    pub fn relayed(status: StatusCode) -> Self {
        let reason = reason_phrase(status);
        Self {
            status_code: status.as_u16(),
            status_description: reason.to_string(),
            headers: ResponseHeaders::default(),
            body: reason.to_string(),
        }
    }

    pub fn status(&self) -> StatusCode {
        StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}
