//! API Gateway REST proxy events (payload format 1.0).

use std::collections::HashMap;

use aws_lambda_events::event::apigw::ApiGatewayProxyRequest;

use crate::adapters::TARGET_PARAM;
use crate::gate::InboundRequest;

/// Same rules as function URLs: `url` query parameter, no method restriction.
pub fn into_inbound(event: ApiGatewayProxyRequest, headers: HashMap<String, String>) -> InboundRequest {
    InboundRequest {
        method: None,
        target: event
            .query_string_parameters
            .first(TARGET_PARAM)
            .unwrap_or_default()
            .to_string(),
        headers,
        header_names_folded: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{fixtures, raw_headers};
    use serde_json::{json, Value};

    fn inbound(event: Value) -> InboundRequest {
        let headers = raw_headers(&event);
        into_inbound(serde_json::from_value(event).unwrap(), headers)
    }

    #[test]
    fn test_target_from_query() {
        let request = inbound(fixtures::api_gateway(
            "POST",
            json!({"url": "www.google.com/foo"}),
            json!({"TEST-HEADER": "test-value-123"}),
        ));
        assert_eq!(request.target, "www.google.com/foo");
        assert_eq!(request.method, None);
        assert_eq!(request.headers.get("TEST-HEADER").map(String::as_str), Some("test-value-123"));
    }

    #[test]
    fn test_null_maps() {
        let request = inbound(fixtures::api_gateway("GET", json!(null), json!(null)));
        assert!(request.headers.is_empty());
        assert_eq!(request.target, "");
    }
}
