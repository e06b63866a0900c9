//! cost-tracker: HTTP server for alert ingestion and log queries
//!
//! ## Architecture
//! ```text
//! [alarm notification] --POST /api/events--> [IngestHandler] --put--> [record store]
//! [ScheduledTicker]    -------------------->       |                       |
//! [dashboard]          --GET /api/logs-----> [QueryHandler]  <--scan-------+
//! ```
//!
//! ## Configuration
//! - `--config <path>` / COST_TRACKER_CONFIG: YAML configuration file
//! - COST_TRACKER__*: configuration overrides (e.g. COST_TRACKER__SERVER__PORT)
//! - DDB_TABLE: DynamoDB table name
//! - COST_TRACKER_LOG: log filter (default: info)

use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info};

use cost_tracker::api::{self, AppState};
use cost_tracker::config::Config;
use cost_tracker::handlers::{IngestHandler, QueryHandler};
use cost_tracker::scheduler::ScheduledTicker;
use cost_tracker::storage::init_storage;
use cost_tracker::utils::bootstrap::{init_tracing, parse_config_path, shutdown_signal};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    init_tracing();

    let config_path = parse_config_path();
    let config = Config::load(config_path.as_deref()).map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    let store = init_storage(&config.storage).await.map_err(|e| {
        error!("Failed to initialize record store: {}", e);
        e
    })?;

    let ingest = Arc::new(IngestHandler::new(store.clone(), config.ingest.clone()));
    let query = Arc::new(QueryHandler::new(store, config.query.clone()));

    let ticker = config.schedule.interval_secs.map(|secs| {
        info!(interval_secs = secs, "Scheduled ticks enabled");
        ScheduledTicker::new(ingest.clone(), Duration::from_secs(secs)).spawn()
    });

    info!(addr = %config.server.bind_addr(), "cost-tracker started");

    api::serve(
        AppState::new(ingest, query),
        &config.server.bind_addr(),
        shutdown_signal(),
    )
    .await?;

    if let Some(handle) = ticker {
        handle.abort();
    }

    info!("cost-tracker stopped");
    Ok(())
}
