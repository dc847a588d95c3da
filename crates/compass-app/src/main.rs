//! Compass application binary - composition root.
//!
//! Ties together all Compass crates into a single executable:
//! 1. Load configuration from TOML
//! 2. Fail fast if inference credentials are missing
//! 3. Initialize storage (SQLite session store)
//! 4. Build the tool registry and conversation orchestrator
//! 5. Start the axum REST API server

use std::path::PathBuf;
use std::sync::Arc;

use compass_agent::{ManualFallbackDriver, Orchestrator, RetryPolicy};
use compass_api::{routes, AppState};
use compass_core::config::CompassConfig;
use compass_engine::{EngineParams, ReferenceTables};
use compass_inference::BedrockClient;
use compass_store::{Database, SessionRepository};
use compass_tools::builtin_registry;

/// Expand ~ to the home directory in a path string.
fn resolve_data_dir(data_dir: &str) -> PathBuf {
    if let Some(rest) = data_dir.strip_prefix("~/") {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home).join(rest)
    } else {
        PathBuf::from(data_dir)
    }
}

/// Resolve the config file path (COMPASS_CONFIG env, or ~/.compass/config.toml).
fn config_path() -> PathBuf {
    if let Ok(p) = std::env::var("COMPASS_CONFIG") {
        return PathBuf::from(p);
    }
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".compass").join("config.toml");
    }
    PathBuf::from("config.toml")
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Tracing.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Starting Compass v{}", env!("CARGO_PKG_VERSION"));

    // Config.
    let config_file = config_path();
    let config = CompassConfig::load_or_default(&config_file);
    tracing::info!(path = %config_file.display(), "Configuration loaded");

    // Inference client. Missing credentials abort startup before any
    // session is accepted.
    let inference = match BedrockClient::from_config(&config.inference) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            tracing::error!(error = %e, "Inference credentials unavailable");
            return Err(e.into());
        }
    };
    tracing::info!(model = %config.inference.model_id, "Inference client ready");

    // Reference tables for the configured vintage.
    let tables: &'static ReferenceTables = match config.engine.reference_year {
        2024 => ReferenceTables::default_2024(),
        year => {
            tracing::error!(year, "No reference tables for configured year");
            return Err(format!("no reference tables for year {}", year).into());
        }
    };

    // Storage.
    let data_dir = resolve_data_dir(&config.general.data_dir);
    std::fs::create_dir_all(&data_dir)?;
    let db_path = data_dir.join("compass.db");
    let db = Arc::new(Database::new(&db_path)?);
    tracing::info!(path = %db_path.display(), "SQLite session store opened");

    let store = Arc::new(SessionRepository::new(
        Arc::clone(&db),
        config.agent.transcript_retain,
    ));

    // Tool registry: the document tool reuses the inference client for
    // vision extraction.
    let engine_params = EngineParams {
        near_margin_pct: config.engine.near_margin_pct,
    };
    let registry = Arc::new(builtin_registry(
        tables,
        engine_params,
        Arc::clone(&inference) as Arc<dyn compass_inference::DocumentVision>,
    ));
    tracing::info!(tools = registry.specs().len(), "Tool registry ready");

    // Orchestrator.
    let retry = RetryPolicy {
        max_retries: config.inference.max_retries,
        backoff_ms: config.inference.retry_backoff_ms,
    };
    let orchestrator = Arc::new(Orchestrator::new(
        inference,
        registry,
        Arc::clone(&store),
        Arc::new(ManualFallbackDriver),
        config.agent.clone(),
        retry,
    ));

    // API server.
    let state = AppState::new(config, orchestrator, store);
    routes::start_server(state).await?;

    Ok(())
}
