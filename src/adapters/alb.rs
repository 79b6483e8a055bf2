//! Application load balancer target group events.
//!
//! The target is carried in the path (`/www.example.com/foo`) and only GET
//! and HEAD are admitted.

use std::collections::HashMap;

use aws_lambda_events::event::alb::AlbTargetGroupRequest;

use crate::gate::InboundRequest;

pub fn into_inbound(event: AlbTargetGroupRequest, headers: HashMap<String, String>) -> InboundRequest {
    let path = event.path.as_deref().unwrap_or_default();
    InboundRequest {
        method: Some(event.http_method.as_str().to_string()),
        target: strip_leading_slash(path).to_string(),
        headers,
        header_names_folded: false,
    }
}

/// Remove at most one leading `/`.
pub fn strip_leading_slash(path: &str) -> &str {
    path.strip_prefix('/').unwrap_or(path)
}
