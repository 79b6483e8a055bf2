//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::http::StatusCode;
use serde_json::{json, Value};
use tokio::net::TcpListener;

use iris::gate::{Allowlist, ExpectedHeader, Gate, Upstream};

/// Upstream stand-in that answers from a fixed table and records every target.
#[derive(Debug, Clone, Default)]
pub struct RecordingUpstream {
    statuses: HashMap<String, StatusCode>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl RecordingUpstream {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `status` for `target`. Unknown targets get 500.
    pub fn with(mut self, target: &str, status: u16) -> Self {
        let status = StatusCode::from_u16(status).expect("valid status");
        self.statuses.insert(target.to_string(), status);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl Upstream for RecordingUpstream {
    async fn fetch_status(&self, target: &str) -> StatusCode {
        self.calls.lock().unwrap().push(target.to_string());
        self.statuses
            .get(target)
            .copied()
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

/// Gate over a recording upstream; returns the upstream handle for inspection.
pub fn gate_with(
    allowed_urls: &str,
    header: ExpectedHeader,
    upstream: RecordingUpstream,
) -> (Arc<Gate<RecordingUpstream>>, RecordingUpstream) {
    let gate = Gate::new(Allowlist::parse(allowed_urls), header, upstream.clone());
    (Arc::new(gate), upstream)
}

/// Bind an ephemeral port on localhost.
pub async fn local_listener() -> (TcpListener, SocketAddr) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    (listener, addr)
}

/// Function URL event as Lambda delivers it. `target: None` omits the query.
pub fn function_url_event(target: Option<&str>, headers: Value) -> Value {
    let query = match target {
        Some(target) => json!({ "url": target }),
        None => Value::Null,
    };
    json!({
        "version": "2.0",
        "routeKey": "$default",
        "rawPath": "/",
        "rawQueryString": "",
        "headers": headers,
        "queryStringParameters": query,
        "requestContext": {
            "accountId": "123456789012",
            "apiId": "abcdefghij",
            "domainName": "abcdefghij.lambda-url.us-west-2.on.aws",
            "domainPrefix": "abcdefghij",
            "http": {
                "method": "GET",
                "path": "/",
                "protocol": "HTTP/1.1",
                "sourceIp": "203.0.113.10",
                "userAgent": "curl/8.4.0"
            },
            "requestId": "8f4c7b2e-0f0a-4c2b-9f43-1b2f3e4d5a6b",
            "routeKey": "$default",
            "stage": "$default",
            "time": "12/Mar/2024:19:03:58 +0000",
            "timeEpoch": 1710270238000u64
        },
        "body": null,
        "isBase64Encoded": false
    })
}

/// API Gateway REST proxy event.
pub fn api_gateway_event(method: &str, target: &str, headers: Value) -> Value {
    json!({
        "resource": "/{proxy+}",
        "path": "/check",
        "httpMethod": method,
        "headers": headers,
        "multiValueHeaders": null,
        "queryStringParameters": { "url": target },
        "multiValueQueryStringParameters": { "url": [target] },
        "pathParameters": { "proxy": "check" },
        "stageVariables": null,
        "requestContext": {
            "accountId": "123456789012",
            "resourceId": "us4z18",
            "stage": "prod",
            "requestId": "c6af9ac6-7b61-11e6-9a41-93e8deadbeef",
            "requestTime": "09/Apr/2024:12:34:56 +0000",
            "requestTimeEpoch": 1712666096000u64,
            "identity": {
                "sourceIp": "203.0.113.10",
                "userAgent": "curl/8.4.0"
            },
            "path": "/prod/check",
            "resourcePath": "/{proxy+}",
            "httpMethod": method,
            "apiId": "1234567890",
            "protocol": "HTTP/1.1"
        },
        "body": null,
        "isBase64Encoded": false
    })
}

/// ALB target group event; the target rides in the path.
pub fn alb_event(method: &str, path: &str, headers: Value) -> Value {
    json!({
        "requestContext": {
            "elb": {
                "targetGroupArn": "arn:aws:elasticloadbalancing:us-east-2:123456789012:targetgroup/iris/49e9d65c45c6791a"
            }
        },
        "httpMethod": method,
        "path": path,
        "queryStringParameters": {},
        "headers": headers,
        "body": "",
        "isBase64Encoded": false
    })
}

pub fn to_bytes(event: &Value) -> Vec<u8> {
    serde_json::to_vec(event).unwrap()
}
