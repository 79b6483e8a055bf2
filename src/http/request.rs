//! Request handling and normalization.
//!
//! # Responsibilities
//! - Generate a UUID v4 request ID for every inbound request
//! - Translate an HTTP request into an `InboundRequest`
//!
//! # Design Decisions
//! - Header names arrive lowercased from hyper; the request is marked as folded
//! - The path target is not percent-decoded
//! - Header values that are not valid UTF-8 are dropped

use std::collections::HashMap;

use axum::extract::Query;
use axum::http::{request::Parts, HeaderValue, Request};
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

use crate::adapters::alb::strip_leading_slash;
use crate::adapters::TARGET_PARAM;
use crate::config::{ServerConfig, TargetSource};
use crate::gate::InboundRequest;

pub const X_REQUEST_ID: &str = "x-request-id";

/// Request ID generator backed by UUID v4.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestUuidV4;

impl MakeRequestId for MakeRequestUuidV4 {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// Request ID set by the request-id layer, or "unknown".
pub fn request_id(parts: &Parts) -> &str {
    parts
        .headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
}

/// Normalize an HTTP request for the gate.
pub fn inbound_from_parts(parts: &Parts, config: &ServerConfig) -> InboundRequest {
    let method = config
        .restrict_methods
        .then(|| parts.method.as_str().to_string());

    let target = match config.target_source {
        TargetSource::Query => Query::<HashMap<String, String>>::try_from_uri(&parts.uri)
            .ok()
            .and_then(|Query(mut params)| params.remove(TARGET_PARAM))
            .unwrap_or_default(),
        TargetSource::Path => strip_leading_slash(parts.uri.path()).to_string(),
    };

    let headers = parts
        .headers
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|value| (name.as_str().to_string(), value.to_string()))
        })
        .collect();

    InboundRequest {
        method,
        target,
        headers,
        header_names_folded: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    fn parts(request: Request<Body>) -> Parts {
        request.into_parts().0
    }

    #[test]
    fn test_query_target() {
        let req = Request::builder()
            .uri("http://gate.local/?url=www.facebook.com:1234/bar")
            .header("TEST-HEADER", "test-value-123")
            .body(Body::empty())
            .unwrap();
        let inbound = inbound_from_parts(&parts(req), &ServerConfig::default());

        assert_eq!(inbound.target, "www.facebook.com:1234/bar");
        assert_eq!(inbound.method.as_deref(), Some("GET"));
        // hyper normalizes header names to lowercase
        assert_eq!(inbound.headers.get("test-header").map(String::as_str), Some("test-value-123"));
        assert!(inbound.header_names_folded);
    }

    #[test]
    fn test_query_target_is_decoded_and_case_sensitive() {
        let req = Request::builder()
            .uri("/?url=www.google.com%2Ffoo&URL=other")
            .body(Body::empty())
            .unwrap();
        let inbound = inbound_from_parts(&parts(req), &ServerConfig::default());
        assert_eq!(inbound.target, "www.google.com/foo");

        let req = Request::builder().uri("/?URL=a.com").body(Body::empty()).unwrap();
        let inbound = inbound_from_parts(&parts(req), &ServerConfig::default());
        assert_eq!(inbound.target, "");
    }

    #[test]
    fn test_path_target() {
        let config = ServerConfig {
            target_source: TargetSource::Path,
            restrict_methods: false,
            ..ServerConfig::default()
        };
        let req = Request::builder()
            .method("POST")
            .uri("/www.google.com/foo?url=ignored")
            .body(Body::empty())
            .unwrap();
        let inbound = inbound_from_parts(&parts(req), &config);
        assert_eq!(inbound.target, "www.google.com/foo");
        assert_eq!(inbound.method, None);
    }

    #[test]
    fn test_request_id_fallback() {
        let req = Request::builder().uri("/").body(Body::empty()).unwrap();
        assert_eq!(request_id(&parts(req)), "unknown");
    }

    #[test]
    fn test_make_request_id_is_uuid() {
        let req = Request::builder().uri("/").body(Body::empty()).unwrap();
        let id = MakeRequestUuidV4.make_request_id(&req).unwrap();
        let text = id.header_value().to_str().unwrap();
        assert!(Uuid::parse_str(text).is_ok());
    }
}
