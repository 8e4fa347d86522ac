//! Static snapshot exporter
//!
//! Loads the dataset, pre-computes every dashboard view for the global
//! selection and each single-dimension slice, and writes the JSON tree the
//! static dashboard reads instead of the API.

use dotenvy::dotenv;
use funnelboard::analytics::DashboardEngine;
use funnelboard::config::Config;
use funnelboard::logging;
use funnelboard::snapshot::Snapshot;
use funnelboard::store::RecordStore;
use std::time::Instant;
use tracing::{error, info};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    logging::init_logging();

    let config = Config::from_env()?;
    let out_dir = &config.export_dir;

    let started = Instant::now();
    let store = RecordStore::load(&config.data_path).inspect_err(|e| {
        error!(error = %e, data_path = %config.data_path.display(), "Failed to load dataset");
    })?;

    let engine = DashboardEngine::new(&store, config.analytics);
    let snapshot = Snapshot::build(&engine);

    for path in snapshot.write_to(out_dir)? {
        let size_kb = std::fs::metadata(&path).map(|m| m.len() as f64 / 1024.0).unwrap_or(0.0);
        info!(file = %path.display(), size_kb = %format!("{size_kb:.1}"), "Exported");
    }

    info!(
        elapsed_ms = started.elapsed().as_millis(),
        out_dir = %out_dir.display(),
        "Static export complete"
    );
    Ok(())
}
