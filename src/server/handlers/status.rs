//! Health, fonts and configuration endpoints.

use axum::{Json, extract::State, http::StatusCode};
use serde::Serialize;
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::Arc;

use super::super::state::AppState;
use super::blocking;

#[derive(Debug, Serialize)]
pub struct Health {
    pub printers: Vec<String>,
}

/// GET /health - printers visible to the service; 500 when there are none.
pub async fn health(
    State(state): State<Arc<AppState>>,
) -> Result<(StatusCode, Json<Health>), (StatusCode, String)> {
    let engine = state.engine.clone();
    let printers = blocking(move || engine.printers()).await?;
    let status = if printers.is_empty() {
        StatusCode::INTERNAL_SERVER_ERROR
    } else {
        StatusCode::OK
    };
    Ok((status, Json(Health { printers })))
}

/// GET /api/fonts - family to styles.
pub async fn fonts(State(state): State<Arc<AppState>>) -> Json<BTreeMap<String, Vec<String>>> {
    Json(state.engine.fonts().families())
}

/// GET /api/config/validate - configuration warnings.
pub async fn validate(
    State(state): State<Arc<AppState>>,
) -> Result<Json<serde_json::Value>, (StatusCode, String)> {
    let engine = state.engine.clone();
    let errors = blocking(move || engine.validate()).await?;
    Ok(Json(json!({ "errors": errors })))
}

/// POST /api/config/reload - re-read the configuration file.
pub async fn reload(
    State(state): State<Arc<AppState>>,
) -> Result<Json<serde_json::Value>, (StatusCode, String)> {
    let engine = state.engine.clone();
    match blocking(move || engine.config().reload()).await? {
        Ok(_) => Ok(Json(json!({ "success": true }))),
        Err(e) => Err((StatusCode::INTERNAL_SERVER_ERROR, format!("Reload failed: {}", e))),
    }
}
