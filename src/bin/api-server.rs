//! Funnelboard API Server
//!
//! Loads the dataset once, then serves the dashboard views over HTTP.
//! The store is immutable after startup, so the service can be
//! horizontally scaled.

use dotenvy::dotenv;
use funnelboard::config::Config;
use funnelboard::core::http::start_server;
use funnelboard::logging;
use funnelboard::store::RecordStore;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    logging::init_logging();

    let config = Config::from_env()?;
    info!("Starting Funnelboard API Server");
    info!(environment = %config.environment, production = config.is_production(), "Environment");
    info!(data_path = %config.data_path.display(), cutoff = ?config.analytics.cohort_cutoff, "Dataset");

    let store = match RecordStore::load(&config.data_path) {
        Ok(store) => Arc::new(store),
        Err(e) => {
            error!(error = %e, "Failed to load dataset");
            return Err(e.into());
        }
    };

    let server_config = config.clone();
    let server_handle = tokio::spawn(async move {
        if let Err(e) = start_server(&server_config, store).await {
            error!(error = %e, "HTTP server error");
        }
    });

    info!("API server started, waiting for shutdown signal...");
    tokio::select! {
        _ = signal::ctrl_c() => {
            info!("Shutting down API server...");
        }
        _ = server_handle => {
            error!("HTTP server stopped");
        }
    }

    Ok(())
}
