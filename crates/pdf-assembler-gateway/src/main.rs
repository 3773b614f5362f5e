//! PDF Assembler Gateway - credential-injecting proxy in front of the PDF backend.

mod helpers;
mod routes;
mod state;

use anyhow::{Context, Result};
use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use state::GatewayState;

#[derive(Parser, Debug)]
#[command(name = "pdf-assembler-gateway")]
#[command(author, version, about = "PDF Assembler API Gateway", long_about = None)]
struct Args {
    /// Host to bind to
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port to bind to
    #[arg(short, long, default_value = "3000")]
    port: u16,

    /// Backend base URL that proxied paths are appended to
    #[arg(long, env = "API_BASE_URL")]
    api_base: Option<String>,

    /// Backend API key, sent as X-API-Key
    #[arg(long, env = "API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Maximum forwarded request body in megabytes
    #[arg(long, default_value = "100")]
    body_limit_mb: usize,

    /// Verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (before parsing args so env vars are available)
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let default_level = match args.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();

    let state = Arc::new(
        GatewayState::new(args.api_base, args.api_key)
            .context("Failed to initialize gateway state")?,
    );

    // Keep serving so clients see the misconfiguration as a 500 body
    for setting in state.missing_settings() {
        error!("{} is not set; proxied requests will fail", setting);
    }

    let app = routes::router(state, args.body_limit_mb * 1024 * 1024);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    info!("Starting gateway at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
