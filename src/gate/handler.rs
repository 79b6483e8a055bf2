//! Per-invocation orchestration.

use std::time::Instant;

use crate::config::IrisConfig;
use crate::gate::admission::{check_admission, Allowlist, ExpectedHeader, InboundRequest};
use crate::gate::response::GateResponse;
use crate::gate::surface::Surface;
use crate::gate::upstream::{HttpsUpstream, Upstream};
use crate::observability::metrics;

/// Admission rules plus the upstream they guard.
///
/// Built once at startup and shared read-only between invocations.
#[derive(Debug)]
pub struct Gate<U = HttpsUpstream> {
    allowlist: Allowlist,
    expected_header: ExpectedHeader,
    upstream: U,
}

impl Gate<HttpsUpstream> {
    /// Build a gate that calls real upstreams over HTTPS.
    pub fn from_config(config: &IrisConfig) -> Result<Self, reqwest::Error> {
        let upstream = HttpsUpstream::new(&config.upstream)?;
        Ok(Self::new(
            config.admission.allowlist(),
            config.admission.expected_header(),
            upstream,
        ))
    }
}

impl<U: Upstream> Gate<U> {
    pub fn new(allowlist: Allowlist, expected_header: ExpectedHeader, upstream: U) -> Self {
        Self {
            allowlist,
            expected_header,
            upstream,
        }
    }

    pub fn allowlist(&self) -> &Allowlist {
        &self.allowlist
    }

    pub fn expected_header(&self) -> &ExpectedHeader {
        &self.expected_header
    }

    /// Admit or refuse `request`, then relay the upstream status.
    ///
    /// Never fails: every outcome is expressed as a status code.
    pub async fn handle(&self, surface: Surface, request: &InboundRequest) -> GateResponse {
        let start = Instant::now();

        if let Err(rejection) = check_admission(request, &self.allowlist, &self.expected_header) {
            tracing::warn!(
                surface = %surface,
                reason = rejection.as_str(),
                requested = %request.target,
                method = ?request.method,
                "Request refused"
            );
            tracing::debug!(allowed = ?self.allowlist.sorted(), header = %self.expected_header.name, "Admission settings");
            metrics::record_request(surface, rejection.as_str(), start);
            return GateResponse::forbidden(surface.rejection_body(rejection));
        }

        let upstream_start = Instant::now();
        let status = self.upstream.fetch_status(&request.target).await;
        metrics::record_upstream(status, upstream_start);
        metrics::record_request(surface, "relayed", start);

        GateResponse::relayed(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use std::sync::Mutex;

    struct FixedUpstream {
        status: StatusCode,
        calls: Mutex<Vec<String>>,
    }

    impl FixedUpstream {
        fn new(status: StatusCode) -> Self {
            Self {
                status,
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    impl Upstream for FixedUpstream {
        async fn fetch_status(&self, target: &str) -> StatusCode {
            self.calls.lock().unwrap().push(target.to_string());
            self.status
        }
    }

    #[tokio::test]
    async fn test_relays_upstream_status() {
        let gate = Gate::new(
            Allowlist::parse("www.facebook.com:1234/bar"),
            ExpectedHeader::default(),
            FixedUpstream::new(StatusCode::OK),
        );
        let res = gate
            .handle(Surface::FunctionUrl, &InboundRequest::new("www.facebook.com:1234/bar"))
            .await;
        assert_eq!(res, GateResponse::relayed(StatusCode::OK));
        assert_eq!(*gate.upstream.calls.lock().unwrap(), vec!["www.facebook.com:1234/bar"]);
    }

    #[tokio::test]
    async fn test_refused_request_never_reaches_upstream() {
        let gate = Gate::new(
            Allowlist::parse("www.google.com/foo"),
            ExpectedHeader::default(),
            FixedUpstream::new(StatusCode::OK),
        );
        let res = gate
            .handle(Surface::FunctionUrl, &InboundRequest::new("www.google.com/fo"))
            .await;
        assert_eq!(res, GateResponse::forbidden("Forbidden"));
        assert!(gate.upstream.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_alb_wording() {
        let gate = Gate::new(
            Allowlist::parse("a.com"),
            ExpectedHeader::default(),
            FixedUpstream::new(StatusCode::OK),
        );
        let res = gate.handle(Surface::Alb, &InboundRequest::new("b.com").with_method("GET")).await;
        assert_eq!(res.body, "not allowed");
        assert_eq!(res.status_description, "Forbidden");

        let res = gate.handle(Surface::Alb, &InboundRequest::new("a.com").with_method("POST")).await;
        assert_eq!(res.status_code, 403);
        assert_eq!(res.body, "method not allowed");
    }
}
