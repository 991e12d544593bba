//! Agent Assist MCP server
//!
//! Entry point: parses the CLI, sets up logging on stderr, loads settings and
//! serves MCP over stdio.

use agent_assist_mcp::{McpServer, RestConnector, Settings, ToolHandler};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn, Level};
use tracing_subscriber::{self, EnvFilter};

#[derive(Parser)]
#[command(name = "agent-assist-mcp")]
#[command(about = "MCP server exposing Google Cloud Agent Assist as tools", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Set log level
    #[arg(short, long, global = true, default_value = "info")]
    log_level: String,

    /// Config file (defaults to the platform config directory)
    #[arg(short, long, global = true, env = "AGENT_ASSIST_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start MCP server (stdio mode)
    Serve,

    /// Print the tool catalogue as JSON
    Tools,
}

async fn start_mcp_server(settings: Settings) -> Result<()> {
    debug!(
        "Starting MCP server (location {}, endpoint {})",
        settings.location,
        settings.endpoint_for(&settings.location)
    );

    let tool_handler = ToolHandler::new(settings, Arc::new(RestConnector));

    match tool_handler.initialize_from_settings().await {
        Ok(true) => info!("Initialized from configured credentials file"),
        Ok(false) => debug!("No credentials file configured; waiting for initialize_agent_assist"),
        Err(e) => warn!(
            "Could not initialize from configured credentials: {}. Call initialize_agent_assist instead.",
            e
        ),
    }

    let server = McpServer::new(tool_handler);

    tokio::select! {
        result = server.run() => {
            result.context("MCP server stopped with an error")?;
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received shutdown signal, stopping MCP server...");
        }
    }

    Ok(())
}

fn load_settings(path: Option<&Path>) -> Result<Settings> {
    let settings = Settings::load(path).with_context(|| match path {
        Some(p) => format!("failed to load settings from {}", p.display()),
        None => "failed to load settings".to_string(),
    })?;
    Ok(settings)
}

fn print_tools() -> Result<()> {
    let handler = ToolHandler::new(Settings::default(), Arc::new(RestConnector));
    let tools = serde_json::to_string_pretty(&handler.list_tools())
        .context("failed to serialize tool catalogue")?;
    println!("{}", tools);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    // reqwest/hyper are noisy at debug
    let filter = EnvFilter::new(format!(
        "agent_assist_mcp={},hyper=warn,reqwest=warn",
        level.as_str().to_lowercase()
    ));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr) // stdout carries the protocol
        .init();

    debug!("agent-assist-mcp v{} starting...", env!("CARGO_PKG_VERSION"));

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            let settings = load_settings(cli.config.as_deref())?;
            start_mcp_server(settings).await
        }
        Commands::Tools => print_tools(),
    }
}
