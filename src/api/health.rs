//! Health check endpoints

use axum::{extract::State, Json};
use serde::Serialize;

use crate::{config::StoreBackend, AppState};

#[derive(Serialize)]
pub struct HealthResponse {
    /// Current status of the service
    pub status: String,
    /// Version of the service
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store: Option<StoreBackend>,
}

/// Health check endpoint
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        store: None,
    })
}

/// Readiness check endpoint, reports which store backs the catalog
pub async fn readiness_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ready".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        store: Some(state.config.database.backend),
    })
}
