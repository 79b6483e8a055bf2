//! Lambda invocations handed to the gate the way `lambda_runtime` delivers them.

use lambda_runtime::{Context, LambdaEvent};
use serde_json::json;

use iris::adapters::EventSource;
use iris::gate::ExpectedHeader;
use iris::runtime::invoke;

mod common;
use common::{alb_event, api_gateway_event, function_url_event, gate_with, RecordingUpstream};

fn invocation(payload: serde_json::Value) -> LambdaEvent<serde_json::Value> {
    LambdaEvent::new(payload, Context::default())
}

#[tokio::test]
async fn test_invocations_are_answered_independently() {
    let upstream = RecordingUpstream::new().with("www.google.com", 200);
    let (gate, upstream) = gate_with("www.google.com", ExpectedHeader::default(), upstream);

    let first = invoke(
        gate.as_ref(),
        EventSource::Auto,
        invocation(function_url_event(Some("www.google.com"), json!({}))),
    )
    .await
    .unwrap();
    let second = invoke(
        gate.as_ref(),
        EventSource::Auto,
        invocation(function_url_event(Some("www.bing.com"), json!({}))),
    )
    .await
    .unwrap();

    assert_eq!(
        serde_json::to_value(&first).unwrap(),
        json!({
            "statusCode": 200,
            "statusDescription": "OK",
            "headers": { "Content-Type": "text/plain" },
            "body": "OK"
        })
    );
    assert_eq!(second.status_code, 403);
    assert_eq!(second.body, "Forbidden");
    assert_eq!(upstream.calls(), vec!["www.google.com"]);
}

#[tokio::test]
async fn test_each_event_shape_is_served() {
    let upstream = RecordingUpstream::new().with("www.google.com", 404);
    let (gate, upstream) = gate_with("www.google.com", ExpectedHeader::default(), upstream);

    for payload in [
        function_url_event(Some("www.google.com"), json!({})),
        api_gateway_event("GET", "www.google.com", json!(null)),
        alb_event("GET", "/www.google.com", json!({})),
    ] {
        let response = invoke(gate.as_ref(), EventSource::Auto, invocation(payload))
            .await
            .unwrap();
        assert_eq!(response.status_code, 404);
        assert_eq!(response.status_description, "Not Found");
    }
    assert_eq!(upstream.calls().len(), 3);
}

#[tokio::test]
async fn test_case_sensitive_header_from_event() {
    let upstream = RecordingUpstream::new().with("www.google.com", 200);
    let (gate, _) = gate_with(
        "www.google.com",
        ExpectedHeader::new("TEST-HEADER", "test-value-123"),
        upstream,
    );

    let exact = function_url_event(
        Some("www.google.com"),
        json!({ "TEST-HEADER": "test-value-123" }),
    );
    let response = invoke(gate.as_ref(), EventSource::Auto, invocation(exact))
        .await
        .unwrap();
    assert_eq!(response.status_code, 200);

    let lowered = function_url_event(
        Some("www.google.com"),
        json!({ "test-header": "test-value-123" }),
    );
    let response = invoke(gate.as_ref(), EventSource::Auto, invocation(lowered))
        .await
        .unwrap();
    assert_eq!(response.status_code, 403);
}

#[tokio::test]
async fn test_unusable_payload_becomes_diagnostic() {
    let (gate, upstream) = gate_with(
        "www.google.com",
        ExpectedHeader::default(),
        RecordingUpstream::new(),
    );

    let diagnostic = invoke(gate.as_ref(), EventSource::Auto, invocation(json!([1, 2])))
        .await
        .unwrap_err();
    assert_eq!(diagnostic.error_type, "InvalidEvent");
    assert_eq!(diagnostic.error_message, "event is not a JSON object (got array)");

    let diagnostic = invoke(
        gate.as_ref(),
        EventSource::FunctionUrl,
        invocation(json!({ "queryStringParameters": 5 })),
    )
    .await
    .unwrap_err();
    assert_eq!(diagnostic.error_type, "InvalidEventPayload");
    assert!(upstream.calls().is_empty());
}
