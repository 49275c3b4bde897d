// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use provenance_node::config::NodeConfig;
use provenance_node::engine::Engine;
use provenance_node::server::{build_router, SharedEngine};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tower_http::trace::TraceLayer;

#[tokio::main]
async fn main() {
    provenance_node::telemetry::init_telemetry();

    let cfg = match NodeConfig::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!("Initializing Provenance Node with config: {:?}", cfg);

    let engine = match Engine::open(&cfg) {
        Ok(engine) => engine,
        Err(e) => {
            tracing::error!("Failed to open ledger: {}", e);
            std::process::exit(1);
        }
    };
    tracing::info!(
        points = engine.state().points_total(),
        transfers = engine.state().product_transfers_total(),
        version = engine.state().version(),
        "Ledger ready"
    );

    let shared_state: SharedEngine = Arc::new(Mutex::new(engine));

    if let (Some(path), Some(secs)) = (cfg.snapshot_path.clone(), cfg.auto_snapshot_interval_secs) {
        let state_clone = shared_state.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(tokio::time::Duration::from_secs(secs));
            // First tick completes immediately.
            interval.tick().await;
            loop {
                interval.tick().await;
                tracing::debug!("Auto-snapshotting...");
                let mut engine = state_clone.lock().await;
                match engine.save_snapshot() {
                    Ok(_) => tracing::info!("Snapshot saved to {:?}", path),
                    Err(e) => tracing::error!("Snapshot failed: {}", e),
                }
            }
        });
    }

    let app = build_router(shared_state, cfg.auth_token.clone()).layer(TraceLayer::new_for_http());

    let addr = cfg.bind_addr;
    let listener = match TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!("Failed to bind {}: {}", addr, e);
            std::process::exit(1);
        }
    };
    tracing::info!("Listening on {}", addr);
    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
