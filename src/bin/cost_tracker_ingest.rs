//! cost-tracker-ingest: one-shot ingest of a single trigger payload
//!
//! Reads one JSON event from the file named on the command line, or from
//! stdin when no file is given, and stores it as one record. Suited to cron
//! jobs and function runtimes that hand over the event as a document.
//!
//! Exits non-zero when the record store is unavailable.
//!
//! ## Usage
//! ```text
//! cost-tracker-ingest [--config <path>] [event.json]
//! echo '{}' | cost-tracker-ingest
//! ```

use std::io::Read;
use std::sync::Arc;

use tracing::error;

use cost_tracker::config::Config;
use cost_tracker::handlers::IngestHandler;
use cost_tracker::storage::init_storage;
use cost_tracker::utils::bootstrap::{init_tracing, parse_config_path};

/// First argument that is neither a config flag nor a config flag's value.
fn event_path() -> Option<String> {
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--config" || arg == "-c" {
            args.next();
            continue;
        }
        if arg.starts_with("--config=") {
            continue;
        }
        return Some(arg);
    }
    None
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    init_tracing();

    let config = Config::load(parse_config_path().as_deref()).map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    let body = match event_path() {
        Some(path) if path != "-" => std::fs::read(&path)?,
        _ => {
            let mut buf = Vec::new();
            std::io::stdin().read_to_end(&mut buf)?;
            buf
        }
    };

    let store = init_storage(&config.storage).await?;
    let handler = IngestHandler::new(store, config.ingest.clone());

    let record = handler.ingest_body(&body).await.map_err(|e| {
        error!(error = %e, "Ingest failed");
        e
    })?;

    println!(
        "{}",
        serde_json::json!({"statusCode": 200, "body": "Log stored", "id": record.id})
    );
    Ok(())
}
