#![forbid(unsafe_code)]
//! Chronicle API server
//!
//! Composition root: loads configuration, initializes logging, constructs
//! the process-lifetime ledger and serves the HTTP API.

use chronicle::api::{run_api_server, Node};
use chronicle::config::load_config;
use chronicle::ledger::Ledger;
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the configuration file
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,
    /// Override the configured API port
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    tracing_subscriber::fmt::init();

    let mut config = load_config(&cli.config)?;
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    let addr: SocketAddr = format!("{}:{}", config.server.bind, config.server.port)
        .parse()
        .map_err(|e| format!("Invalid bind address: {}", e))?;

    info!(
        "Starting Chronicle server (max_message_len = {})",
        config.ledger.max_message_len
    );

    // The ledger lives for the process lifetime; it is constructed here and
    // handed to the API layer rather than hiding behind a global.
    let ledger = Ledger::new();
    let node = Arc::new(Node::new(ledger, config.ledger.max_message_len));

    run_api_server(node, addr).await
}
