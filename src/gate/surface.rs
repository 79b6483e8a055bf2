//! Hosting surfaces and their wording.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::gate::admission::Rejection;

/// The boundary a request arrived through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Surface {
    /// Lambda function URL event.
    FunctionUrl,
    /// API Gateway REST proxy event.
    ApiGateway,
    /// Application load balancer target group event.
    Alb,
    /// Plain HTTP request served by the built-in server.
    Http,
}

impl Surface {
    pub fn as_str(&self) -> &'static str {
        match self {
            Surface::FunctionUrl => "function_url",
            Surface::ApiGateway => "api_gateway",
            Surface::Alb => "alb",
            Surface::Http => "http",
        }
    }

    /// Body sent back for a refused request.
    pub fn rejection_body(&self, rejection: Rejection) -> &'static str {
        match (self, rejection) {
            (_, Rejection::MethodNotAllowed) => "method not allowed",
            (_, Rejection::Header) => "Forbidden",
            (Surface::Alb, Rejection::TargetNotAllowed) => "not allowed",
            (_, Rejection::TargetNotAllowed) => "Forbidden",
        }
    }
}

impl fmt::Display for Surface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
