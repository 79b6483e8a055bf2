//! Run a single Lambda event through the gate locally and print the response.

use std::io::Read;
use std::path::PathBuf;

use clap::Parser;

use iris::adapters::EventSource;
use iris::config;
use iris::lifecycle;
use iris::observability::init_stderr_logging;
use iris::runtime::handle_event;

#[derive(Parser)]
#[command(name = "iris-invoke")]
#[command(about = "Feed one event payload through the iris gate", long_about = None)]
struct Cli {
    /// Event JSON file; reads stdin when omitted or `-`
    event: Option<PathBuf>,

    /// Optional TOML config file; environment variables override it.
    #[arg(short, long, env = "IRIS_CONFIG")]
    config: Option<PathBuf>,

    /// Event shape: auto, function_url, api_gateway, alb
    #[arg(short, long)]
    source: Option<EventSource>,

    /// Pretty-print the response
    #[arg(long)]
    pretty: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let loaded = config::load(cli.config.as_deref())?;
    init_stderr_logging(&loaded.config.observability)?;
    loaded.log_notices();
    let config = loaded.config;

    let payload = read_event(cli.event.as_ref())?;
    let source = cli.source.unwrap_or(config.runtime.event_source);
    let gate = lifecycle::start(&config)?;

    let response = handle_event(gate.as_ref(), source, &payload).await?;
    let rendered = if cli.pretty {
        serde_json::to_string_pretty(&response)?
    } else {
        serde_json::to_string(&response)?
    };
    println!("{}", rendered);
    Ok(())
}

fn read_event(path: Option<&PathBuf>) -> std::io::Result<Vec<u8>> {
    match path {
        Some(path) if path.as_os_str() != "-" => std::fs::read(path),
        _ => {
            let mut buf = Vec::new();
            std::io::stdin().read_to_end(&mut buf)?;
            Ok(buf)
        }
    }
}
