//! Outbound status fetch.
//!
//! # Responsibilities
//! - Build `https://<target>` from an admitted token
//! - Issue a single GET and report the upstream status code
//! - Collapse every transport failure into 500
//!
//! # Design Decisions
//! - One attempt only, no retries
//! - Total and connect timeouts are explicit and come from config
//! - The response body is never read

use std::future::Future;

use axum::http::StatusCode;
use url::Url;

use crate::config::UpstreamConfig;

/// Something that can report the status of `GET https://<target>`.
pub trait Upstream: Send + Sync + 'static {
    /// Returns the upstream status, or 500 on any transport failure.
    fn fetch_status(&self, target: &str) -> impl Future<Output = StatusCode> + Send;
}

/// Build the outbound URL for a target token.
pub fn upstream_url(target: &str) -> Result<Url, url::ParseError> {
    Url::parse(&format!("https://{}", target))
}

/// Upstream backed by a pooled `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpsUpstream {
    client: reqwest::Client,
}

impl HttpsUpstream {
    pub fn new(config: &UpstreamConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .connect_timeout(config.connect_timeout())
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self { client })
    }
}

impl Upstream for HttpsUpstream {
    async fn fetch_status(&self, target: &str) -> StatusCode {
        let url = match upstream_url(target) {
            Ok(url) => url,
            Err(e) => {
                tracing::error!(requested = %target, error = %e, "Cannot build upstream URL, returning 500");
                return StatusCode::INTERNAL_SERVER_ERROR;
            }
        };

        tracing::info!(url = %url, "Sending upstream GET");

        match self.client.get(url.clone()).send().await {
            Ok(response) => {
                let status = response.status();
                tracing::info!(url = %url, status = status.as_u16(), "Upstream responded");
                status
            }
            Err(e) => {
                tracing::error!(
                    url = %url,
                    error = %e,
                    timeout = e.is_timeout(),
                    connect = e.is_connect(),
                    "Upstream request failed, returning 500"
                );
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}
