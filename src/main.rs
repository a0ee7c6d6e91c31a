// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Carbon-Tracker API Server
//!
//! Logs everyday activities, converts them to kg CO2 equivalent and serves
//! per-user totals, trends and reduction suggestions.

use carbon_tracker::{
    config::{Config, StorageBackend},
    db::{CarbonStore, FirestoreDb, MemoryStore},
    services::EmissionFactorTable,
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env()?;
    tracing::info!(port = config.port, "Starting Carbon-Tracker API");

    // Emission factors are read once and shared read-only
    let factors = match &config.emission_factors_path {
        Some(path) => {
            tracing::info!(path = %path.display(), "Loading emission factors");
            EmissionFactorTable::load_from_file(path)?
        }
        None => EmissionFactorTable::scientific(),
    };
    tracing::info!(
        vehicles = factors.transport.len(),
        countries = factors.electricity.len(),
        diets = factors.diet.len(),
        "Emission factors loaded"
    );

    let store: Arc<dyn CarbonStore> = match config.storage {
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; data is lost on restart");
            Arc::new(MemoryStore::new())
        }
        StorageBackend::Firestore => Arc::new(FirestoreDb::new(&config.gcp_project_id).await?),
    };

    tracing::info!(
        strategy = ?config.suggestion_strategy,
        weather = if config.openweather_api_key.is_some() { "openweather" } else { "mock" },
        "Services initialized"
    );

    // Build shared state
    let state = Arc::new(AppState::new(config.clone(), store, Arc::new(factors)));

    // Build router
    let app = carbon_tracker::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("carbon_tracker=debug,info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(format)
        .init();
}
