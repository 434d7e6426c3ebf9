use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::AppState;

/// Health check endpoint
///
/// Reports whether the config directory can be read.
/// Used by load balancers and monitoring systems.
pub async fn health_check(State(state): State<AppState>) -> Json<Value> {
    let dir = state.store.dir().to_path_buf();
    let storage_status = tokio::task::spawn_blocking(move || match std::fs::read_dir(&dir) {
        Ok(_) => "available",
        Err(e) => {
            tracing::error!("Config directory health check failed: {:?}", e);
            "unavailable"
        }
    })
    .await
    .unwrap_or("error");

    Json(json!({
        "status": if storage_status == "available" { "healthy" } else { "unhealthy" },
        "storage": storage_status,
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
