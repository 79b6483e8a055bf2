//! Event-source adapters.
//!
//! # Data Flow
//! ```text
//! invocation payload (JSON)
//!     → EventSource::resolve (configured, or detected from the payload)
//!     → aws_lambda_events (LambdaFunctionUrlRequest | ApiGatewayProxyRequest | AlbTargetGroupRequest)
//!     → function_url.rs | api_gateway.rs | alb.rs (to InboundRequest)
//!     → Gate
//! ```
//!
//! # Design Decisions
//! - Adapters only translate; every admission decision lives in the gate
//! - Event shapes are decoded by `aws_lambda_events`
//! - Header names are read from the raw payload: the decoded `HeaderMap`
//!   lowercases them and the header key check is case-sensitive
//! - Only payloads that are not JSON objects, or that the event type rejects,
//!   are adapter errors

pub mod alb;
pub mod api_gateway;
pub mod function_url;

use std::collections::HashMap;
use std::str::FromStr;

use aws_lambda_events::event::alb::AlbTargetGroupRequest;
use aws_lambda_events::event::apigw::ApiGatewayProxyRequest;
use aws_lambda_events::event::lambda_function_urls::LambdaFunctionUrlRequest;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::config::schema::UnknownVariant;
use crate::gate::{InboundRequest, Surface};


/// Query parameter carrying the target token. Case-sensitive.
pub const TARGET_PARAM: &str = "url";

/// Errors raised while translating an event.
#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("event is not a JSON object (got {0})")]
    NotAnObject(&'static str),

    #[error("invalid event: {0}")]
    Json(#[from] serde_json::Error),
}

impl AdapterError {
    /// Error type name reported to the runtime API.
    pub fn kind(&self) -> &'static str {
        match self {
            AdapterError::NotAnObject(_) => "InvalidEvent",
            AdapterError::Json(_) => "InvalidEventPayload",
        }
    }
}

/// Which event shape the runtime should expect.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventSource {
    /// Detect from the payload.
    #[default]
    Auto,
    FunctionUrl,
    ApiGateway,
    Alb,
}

impl EventSource {
    /// The surface a payload belongs to.
    pub fn resolve(&self, event: &Value) -> Surface {
        match self {
            EventSource::Auto => detect(event),
            EventSource::FunctionUrl => Surface::FunctionUrl,
            EventSource::ApiGateway => Surface::ApiGateway,
            EventSource::Alb => Surface::Alb,
        }
    }
}

impl FromStr for EventSource {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auto" => Ok(EventSource::Auto),
            "function_url" => Ok(EventSource::FunctionUrl),
            "api_gateway" => Ok(EventSource::ApiGateway),
            "alb" => Ok(EventSource::Alb),
            other => Err(UnknownVariant(other.to_string())),
        }
    }
}

/// Guess the surface from the payload's distinguishing fields.
pub fn detect(event: &Value) -> Surface {
    let has_elb = event
        .get("requestContext")
        .and_then(|ctx| ctx.get("elb"))
        .is_some();
    if has_elb {
        return Surface::Alb;
    }

    let is_v2 = event.get("version").and_then(Value::as_str) == Some("2.0");
    if is_v2 || event.get("rawPath").is_some() {
        return Surface::FunctionUrl;
    }

    if event.get("httpMethod").is_some() {
        return Surface::ApiGateway;
    }

    Surface::FunctionUrl
}

/// Translate a raw payload into the surface it came from and a normalized request.
pub fn adapt(source: EventSource, event: Value) -> Result<(Surface, InboundRequest), AdapterError> {
    if !event.is_object() {
        return Err(AdapterError::NotAnObject(json_kind(&event)));
    }

    let surface = source.resolve(&event);
    let headers = raw_headers(&event);
    let request = match surface {
        Surface::ApiGateway => {
            api_gateway::into_inbound(serde_json::from_value::<ApiGatewayProxyRequest>(event)?, headers)
        }
        Surface::Alb => alb::into_inbound(serde_json::from_value::<AlbTargetGroupRequest>(event)?, headers),
        Surface::FunctionUrl | Surface::Http => {
            function_url::into_inbound(serde_json::from_value::<LambdaFunctionUrlRequest>(event)?, headers)
        }
    };
    Ok((surface, request))
}

/// Same as [`adapt`], starting from raw bytes.
pub fn adapt_slice(source: EventSource, payload: &[u8]) -> Result<(Surface, InboundRequest), AdapterError> {
    let event: Value = serde_json::from_slice(payload)?;
    adapt(source, event)
}

/// Headers with their names as sent. For multi-value headers the last value
/// is used, unless the single-value map already has the name.
pub fn raw_headers(event: &Value) -> HashMap<String, String> {
    let mut headers: HashMap<String, String> = event
        .get("headers")
        .and_then(Value::as_object)
        .map(|map| {
            map.iter()
                .filter_map(|(name, value)| value.as_str().map(|v| (name.clone(), v.to_string())))
                .collect()
        })
        .unwrap_or_default();

    if let Some(multi) = event.get("multiValueHeaders").and_then(Value::as_object) {
        for (name, values) in multi {
            let last = values
                .as_array()
                .and_then(|values| values.last())
                .and_then(Value::as_str);
            if let Some(last) = last {
                headers
                    .entry(name.clone())
                    .or_insert_with(|| last.to_string());
            }
        }
    }
    headers
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
