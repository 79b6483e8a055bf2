//! Lambda function URL events (payload format 2.0).

use std::collections::HashMap;

use aws_lambda_events::event::lambda_function_urls::LambdaFunctionUrlRequest;

use crate::adapters::TARGET_PARAM;
use crate::gate::InboundRequest;

/// The target comes from the `url` query parameter; methods are not restricted.
pub fn into_inbound(
    mut event: LambdaFunctionUrlRequest,
    headers: HashMap<String, String>,
) -> InboundRequest {
    InboundRequest {
        method: None,
        target: event
            .query_string_parameters
            .remove(TARGET_PARAM)
            .unwrap_or_default(),
        headers,
        header_names_folded: false,
    }
}
