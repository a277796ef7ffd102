//! lnch server binary.
//!
//! Sells Lightning channels: the operator mints LNURL offers through the
//! admin page and buyers' wallets claim them over the LNURL-channel flow.

use std::path::PathBuf;
use std::sync::Arc;

use channel_offers::OfferService;
use clap::Parser;
use node_backend::BackendRegistry;
use tracing::{error, info};

use lnch_server::{router, AppState, Config};

#[derive(Debug, Parser)]
#[command(name = "lnch-server")]
#[command(about = "Sell Lightning channels over LNURL", version)]
struct Args {
    /// Dotenv-style file with LNCH_* settings (defaults to ./.env if present)
    #[arg(long, value_name = "FILE")]
    conf: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    match &args.conf {
        Some(path) => {
            dotenvy::from_path(path)?;
        }
        None => {
            let _ = dotenvy::dotenv();
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env().map_err(|e| {
        error!(error = %e, "Invalid configuration");
        e
    })?;
    info!(
        addr = %config.web_addr,
        backend = %config.backend,
        network = %config.network,
        "Starting lnch server"
    );

    let backend = config.build_backend(&BackendRegistry::with_defaults())?;
    let service = OfferService::new(backend, config.url_prefix(), config.offer_policy())
        .await
        .map_err(|e| {
            error!(error = %e, "Could not reach the node backend");
            e
        })?;
    let service = Arc::new(service);

    if let Some(interval) = config.prune_interval() {
        service.start_pruner(interval);
    }

    let state = AppState::new(service, &config.auth_key);
    let app = router(state, &config.www_root, &config.root_path);

    info!(addr = %config.web_addr, prefix = %config.url_prefix(), "lnch server listening");
    let listener = tokio::net::TcpListener::bind(config.web_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
