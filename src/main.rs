// src/main.rs
// opsrelay - remote dev-service tools for AI agents over MCP

use anyhow::Result;
use clap::{Parser, Subcommand};
use opsrelay::auth::ClientFactory;
use opsrelay::config::EnvConfig;
use opsrelay::credentials::CredentialStore;
use opsrelay::git::GitClient;
use opsrelay::http;
use opsrelay::mcp::RelayServer;
use std::sync::Arc;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "opsrelay")]
#[command(about = "Issue tracking, code hosting, team chat, and local git as MCP tools")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run as MCP server over stdio (default)
    Serve,
}

async fn run_mcp_server() -> Result<()> {
    let config = EnvConfig::from_env();
    let store = Arc::new(CredentialStore::new());
    let http = http::create_shared_client();
    let factory = Arc::new(ClientFactory::new(store, config, http));
    let git = Arc::new(GitClient::new());

    let server = RelayServer::new(factory, git);

    info!("starting MCP server on stdio");
    let transport = rmcp::transport::io::stdio();
    let service = rmcp::serve_server(server, transport).await?;
    service.waiting().await?;

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env from the current directory if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Quiet by default: stdout is the MCP transport, logs go to stderr
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::WARN)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        None | Some(Commands::Serve) => run_mcp_server().await?,
    }

    Ok(())
}
