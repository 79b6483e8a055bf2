//! Lambda hosting.
//!
//! # Data Flow
//! ```text
//! lambda_runtime (polls the runtime API, one invocation at a time)
//!     → LambdaEvent<Value>
//!     → adapters (payload → Surface + InboundRequest)
//!     → Gate
//!     → GateResponse JSON, or a Diagnostic when the payload is not an event
//! ```
//!
//! # Design Decisions
//! - The runtime API protocol belongs to `lambda_runtime`; this module only
//!   adapts events and maps adapter errors to diagnostics
//! - The payload is taken as a raw `Value` so the event shape can be detected
//! - Shutdown stops polling; an invocation in flight is abandoned with the process

use std::sync::Arc;

use lambda_runtime::{service_fn, Diagnostic, LambdaEvent};
use serde_json::Value;
use tokio::sync::broadcast;

use crate::adapters::{adapt, adapt_slice, AdapterError, EventSource};
use crate::gate::{Gate, GateResponse, Upstream};
use crate::lifecycle::shutdown;

/// Adapt a raw event payload and run it through the gate.
pub async fn handle_event<U: Upstream>(
    gate: &Gate<U>,
    source: EventSource,
    payload: &[u8],
) -> Result<GateResponse, AdapterError> {
    let (surface, request) = adapt_slice(source, payload)?;
    Ok(gate.handle(surface, &request).await)
}

impl From<AdapterError> for Diagnostic {
    fn from(error: AdapterError) -> Self {
        Diagnostic {
            error_type: error.kind().to_string(),
            error_message: error.to_string(),
        }
    }
}

/// Handle one invocation handed out by the runtime.
pub async fn invoke<U: Upstream>(
    gate: &Gate<U>,
    source: EventSource,
    event: LambdaEvent<Value>,
) -> Result<GateResponse, Diagnostic> {
    let (payload, context) = event.into_parts();
    tracing::debug!(
        request_id = %context.request_id,
        deadline_ms = context.deadline,
        event = %payload,
        "Invocation received"
    );

    match adapt(source, payload) {
        Ok((surface, request)) => {
            let response = gate.handle(surface, &request).await;
            tracing::info!(
                request_id = %context.request_id,
                status = response.status_code,
                "Invocation complete"
            );
            Ok(response)
        }
        Err(e) => {
            tracing::error!(request_id = %context.request_id, error = %e, "Unusable event payload");
            Err(e.into())
        }
    }
}

pub struct LambdaRuntime<U> {
    gate: Arc<Gate<U>>,
    event_source: EventSource,
}

impl<U: Upstream> LambdaRuntime<U> {
    pub fn new(gate: Arc<Gate<U>>, event_source: EventSource) -> Self {
        Self { gate, event_source }
    }

    /// Serve invocations until the runtime fails or `shutdown` fires.
    pub async fn run(self, shutdown: broadcast::Receiver<()>) -> Result<(), lambda_runtime::Error> {
        let Self { gate, event_source } = self;
        tracing::info!(event_source = ?event_source, "Lambda runtime starting");

        let handler = service_fn(move |event: LambdaEvent<Value>| {
            let gate = gate.clone();
            async move { invoke(gate.as_ref(), event_source, event).await }
        });

        tokio::select! {
            result = lambda_runtime::run(handler) => result,
            _ = shutdown::wait(shutdown) => {
                tracing::info!("Lambda runtime received shutdown signal");
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::fixtures;
    use crate::gate::{Allowlist, ExpectedHeader};
    use axum::http::StatusCode;
    use lambda_runtime::Context;
    use serde_json::json;

    struct AlwaysOk;

    impl Upstream for AlwaysOk {
        async fn fetch_status(&self, _target: &str) -> StatusCode {
            StatusCode::OK
        }
    }

    fn gate() -> Gate<AlwaysOk> {
        Gate::new(Allowlist::parse("a.com"), ExpectedHeader::default(), AlwaysOk)
    }

    #[tokio::test]
    async fn test_invoke_relays() {
        let event = LambdaEvent::new(
            fixtures::function_url(json!({"url": "a.com"}), json!({})),
            Context::default(),
        );
        let response = invoke(&gate(), EventSource::Auto, event).await.unwrap();
        assert_eq!(response, GateResponse::relayed(StatusCode::OK));
    }

    #[tokio::test]
    async fn test_invoke_reports_non_object() {
        let event = LambdaEvent::new(json!("a.com"), Context::default());
        let diagnostic = invoke(&gate(), EventSource::Auto, event).await.unwrap_err();
        assert_eq!(diagnostic.error_type, "InvalidEvent");
        assert_eq!(diagnostic.error_message, "event is not a JSON object (got string)");
    }

    #[tokio::test]
    async fn test_handle_event_from_bytes() {
        let payload = serde_json::to_vec(&fixtures::alb("GET", "/a.com", json!({}))).unwrap();
        let response = handle_event(&gate(), EventSource::Auto, &payload).await.unwrap();
        assert_eq!(response.status_code, 200);

        let err = handle_event(&gate(), EventSource::Auto, b"{").await.unwrap_err();
        assert_eq!(err.kind(), "InvalidEventPayload");
    }
}
