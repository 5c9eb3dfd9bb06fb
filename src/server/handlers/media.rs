//! Per-printer media endpoint.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Serialize;
use std::sync::Arc;

use crate::media::Catalog;

use super::super::state::AppState;
use super::blocking;

#[derive(Debug, Serialize)]
pub struct PrinterMedia {
    pub success: bool,
    pub label_sizes: Catalog,
    pub default_size: Option<String>,
}

/// GET /api/printer/:printer/media - size catalog and default size.
pub async fn printer_media(
    State(state): State<Arc<AppState>>,
    Path(printer): Path<String>,
) -> Result<Json<PrinterMedia>, (StatusCode, String)> {
    let engine = state.engine.clone();
    let media = blocking(move || PrinterMedia {
        success: true,
        label_sizes: engine.label_sizes(Some(&printer)),
        default_size: engine.default_label_size(Some(&printer)),
    })
    .await?;
    Ok(Json(media))
}
