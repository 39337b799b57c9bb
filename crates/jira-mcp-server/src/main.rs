//! jira-mcp
//!
//! MCP server giving an agent access to Jira issues, comments, transitions and
//! projects. Speaks JSON-RPC on stdin/stdout; logs go to stderr.

use anyhow::{Context, Result};
use clap::Parser;
use jira_mcp_client::{get_settings, JiraClient};
use jira_mcp_server::{Dispatcher, McpServer};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "jira-mcp", version)]
#[command(about = "Jira tools for AI agents over the Model Context Protocol (stdio)", long_about = None)]
struct Args {}

#[tokio::main]
async fn main() -> Result<()> {
    Args::parse();

    // stdout is reserved for protocol frames
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_ansi(false)
        .init();

    let settings = get_settings().context("Failed to load Jira settings")?;
    tracing::debug!(?settings, "Settings loaded");

    let client = JiraClient::new(settings).context("Failed to create Jira client")?;
    tracing::info!(
        base_url = %client.base_url(),
        username = %settings.username,
        "Jira client ready"
    );
    let dispatcher = Arc::new(Dispatcher::new(Arc::new(client)));
    let server = McpServer::new(dispatcher);

    tracing::info!("Jira MCP server started. Listening on stdin.");
    server.run_stdio().await?;
    tracing::info!("Shutting down");

    Ok(())
}
