//! Harvestr MCP server
//!
//! Speaks MCP over stdin/stdout. Logs go to stderr.

use anyhow::{Context, Result};
use clap::Parser;
use harvestr_mcp::client::config::{
    resolve_token, BASE_URL_ENV_VAR, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS, TIMEOUT_ENV_VAR,
    TOKEN_ENV_VAR,
};
use harvestr_mcp::client::{ClientConfig, SharedClient};
use harvestr_mcp::tools::all_tools;
use harvestr_mcp::{serve_stdio, McpServer};
use std::sync::Arc;
use tracing::info;

/// MCP server exposing the Harvestr.io API as tools
#[derive(Parser)]
#[command(name = "harvestr-mcp")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Harvestr private app token
    #[arg(long, env = TOKEN_ENV_VAR, hide_env_values = true)]
    token: Option<String>,

    /// Harvestr REST API base URL
    #[arg(long, env = BASE_URL_ENV_VAR, default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Per-request timeout in seconds
    #[arg(long, env = TIMEOUT_ENV_VAR, default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout_secs: u64,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "harvestr_mcp=debug,info"
    } else {
        "harvestr_mcp=info,warn"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();

    let config = ClientConfig {
        token: resolve_token(cli.token, None),
        base_url: cli.base_url,
        timeout_secs: cli.timeout_secs.max(1),
    };

    // Refuse to start without a usable token rather than failing every call.
    let client = Arc::new(SharedClient::new(config));
    client.get().context("Failed to configure Harvestr client")?;

    let server = McpServer::harvestr();
    server.register_tools(all_tools(Arc::clone(&client))).await;
    info!(
        tools = server.list_tools().await.len(),
        "Harvestr MCP server ready"
    );

    let served = serve_stdio(&server).await;
    client.reset();
    served.context("MCP transport failed")?;

    info!("Harvestr MCP server stopped");
    Ok(())
}
