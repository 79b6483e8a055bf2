//! Iris (v1)
//!
//! Relays the HTTP status of an allowlisted upstream host back to the caller.
//!
//! # Architecture Overview
//!
//! ```text
//!   lambda_runtime ──────▶ runtime ──▶ adapters ─┐
//!                                                 ├──▶ gate ──▶ GET https://<target>
//!   HTTP client ─────────▶ http ─────────────────┘      │
//!                                                       ▼
//!                                     403 or relayed status + reason phrase
//!
//!   Cross-cutting: config, observability, lifecycle
//! ```
//!
//! # Modes
//! - `serve`: plain HTTP listener
//! - `lambda`: Lambda runtime (default when `AWS_LAMBDA_RUNTIME_API` is set)

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;

use iris::config::{self, IrisConfig};
use iris::http::HttpServer;
use iris::lifecycle::{self, wait_for_signal, Shutdown};
use iris::observability::init_logging;
use iris::runtime::LambdaRuntime;

#[derive(Parser)]
#[command(name = "iris")]
#[command(about = "Allowlist-gated upstream status relay", long_about = None)]
struct Cli {
    /// Optional TOML config file; environment variables override it.
    #[arg(short, long, env = "IRIS_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Clone, Copy)]
enum Command {
    /// Serve the gate over plain HTTP
    Serve,
    /// Run as a Lambda function
    Lambda,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let loaded = config::load(cli.config.as_deref())?;
    if let Err(e) = init_logging(&loaded.config.observability) {
        eprintln!("logging already initialised: {}", e);
    }
    tracing::info!("iris v{} starting", env!("CARGO_PKG_VERSION"));
    loaded.log_notices();
    let config = loaded.config;

    let gate = lifecycle::start(&config).inspect_err(|e| {
        tracing::error!(error = %e, "Startup failed");
    })?;

    let shutdown = Shutdown::new();
    tokio::spawn(wait_for_signal(shutdown.clone()));

    let command = cli.command.unwrap_or_else(|| default_command(&config));
    match command {
        Command::Serve => {
            let listener = TcpListener::bind(&config.server.bind_address).await?;
            tracing::info!(address = %listener.local_addr()?, "Listening for connections");
            HttpServer::new(&config.server, gate)
                .run(listener, shutdown.subscribe())
                .await?;
        }
        Command::Lambda => {
            if config.runtime.api_address.is_none() {
                return Err(format!("lambda mode needs {}", config::loader::RUNTIME_API).into());
            }
            register_lambda_shutdown(shutdown.clone()).await;
            let result = LambdaRuntime::new(gate, config.runtime.event_source)
                .run(shutdown.subscribe())
                .await;
            if let Err(e) = result {
                tracing::error!(error = %e, "Lambda runtime failed");
                let e: Box<dyn std::error::Error> = e;
                return Err(e);
            }
        }
    }

    tracing::info!("Shutdown complete");
    Ok(())
}

fn default_command(config: &IrisConfig) -> Command {
    if config.runtime.api_address.is_some() {
        Command::Lambda
    } else {
        Command::Serve
    }
}

/// Lambda only delivers SIGTERM to functions with an extension registered.
#[cfg(unix)]
async fn register_lambda_shutdown(shutdown: Shutdown) {
    lambda_runtime::spawn_graceful_shutdown_handler(move || async move {
        tracing::info!("Execution environment shutting down");
        shutdown.trigger();
    })
    .await;
}

#[cfg(not(unix))]
async fn register_lambda_shutdown(_shutdown: Shutdown) {}
