//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with the gate handler on every path
//! - Wire up middleware (request ID, tracing, timeout)
//! - Normalize each request and hand it to the gate
//! - Stop accepting on the shutdown signal

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::ServerConfig;
use crate::gate::{Gate, Surface, Upstream};
use crate::http::request::{inbound_from_parts, request_id, MakeRequestUuidV4};
use crate::lifecycle::shutdown;

/// Application state injected into handlers.
pub struct AppState<U> {
    pub gate: Arc<Gate<U>>,
    pub config: Arc<ServerConfig>,
}

impl<U> Clone for AppState<U> {
    fn clone(&self) -> Self {
        Self {
            gate: self.gate.clone(),
            config: self.config.clone(),
        }
    }
}

/// HTTP surface for the gate.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    pub fn new<U: Upstream>(config: &ServerConfig, gate: Arc<Gate<U>>) -> Self {
        let state = AppState {
            gate,
            config: Arc::new(config.clone()),
        };
        Self {
            router: Self::build_router(config, state),
        }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router<U: Upstream>(config: &ServerConfig, state: AppState<U>) -> Router {
        Router::new()
            .route("/{*path}", any(gate_handler::<U>))
            .route("/", any(gate_handler::<U>))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV4))
                    .layer(TraceLayer::new_for_http())
                    .layer(TimeoutLayer::new(config.request_timeout()))
                    .layer(PropagateRequestIdLayer::x_request_id()),
            )
    }

    /// Serve until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown::wait(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

async fn gate_handler<U: Upstream>(
    State(state): State<AppState<U>>,
    request: Request<Body>,
) -> Response {
    let (parts, _body) = request.into_parts();
    let inbound = inbound_from_parts(&parts, &state.config);

    tracing::debug!(
        request_id = %request_id(&parts),
        method = %parts.method,
        requested = %inbound.target,
        "Gating request"
    );

    state.gate.handle(Surface::Http, &inbound).await.into_response()
}
