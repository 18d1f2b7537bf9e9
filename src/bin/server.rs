//! Freightdesk HTTP server
//!
//! Run with: freightdesk-server

use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use freightdesk::mcp::{McpService, ServiceMetadata};
use freightdesk::storage::Storage;

#[derive(Parser, Debug)]
#[command(name = "freightdesk-server")]
#[command(about = "Freight customer directory with an MCP tool API")]
struct Args {
    /// Database path
    #[arg(
        long,
        env = "FREIGHTDESK_DB_PATH",
        default_value = "~/.local/share/freightdesk/customers.db"
    )]
    db_path: String,

    /// Address to bind
    #[arg(long, env = "FREIGHTDESK_HOST", default_value = "127.0.0.1")]
    host: String,

    /// Port to listen on
    #[arg(long, env = "FREIGHTDESK_PORT", default_value = "8080")]
    port: u16,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    // Expand ~ in path
    let db_path = shellexpand::tilde(&args.db_path).to_string();

    let storage = Storage::open(&db_path)?;
    tracing::info!("Customer store opened at {}", storage.db_path());

    // The registry is built once here and shared read-only from now on.
    let metadata = Arc::new(ServiceMetadata::new());
    let service = McpService::new(storage, metadata);

    let addr = format!("{}:{}", args.host, args.port);
    freightdesk::server::serve(&addr, service).await?;

    Ok(())
}
