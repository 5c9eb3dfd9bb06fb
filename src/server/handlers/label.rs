//! Text label preview and printing.
//!
//! Parameters arrive as a query string (GET) or a form body (POST); both
//! decode into [`LabelRequest`].

use axum::{
    Form, Json,
    extract::{Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use std::sync::Arc;

use crate::engine::LabelRequest;
use crate::error::LabelError;
use crate::sink::PrintOutcome;

use super::super::state::AppState;
use super::{blocking, error_status};

/// `return_format` query parameter of the preview endpoint.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PreviewFormat {
    pub return_format: Option<String>,
}

impl PreviewFormat {
    fn is_base64(&self) -> bool {
        self.return_format.as_deref() == Some("base64")
    }
}

/// GET /api/preview/text
pub async fn preview_get(
    State(state): State<Arc<AppState>>,
    Query(format): Query<PreviewFormat>,
    Query(request): Query<LabelRequest>,
) -> Result<Response, (StatusCode, String)> {
    preview(state, format, request).await
}

/// POST /api/preview/text
pub async fn preview_post(
    State(state): State<Arc<AppState>>,
    Query(format): Query<PreviewFormat>,
    Form(request): Form<LabelRequest>,
) -> Result<Response, (StatusCode, String)> {
    preview(state, format, request).await
}

/// Render the label as PNG, or base64 text of the PNG.
pub async fn preview(
    state: Arc<AppState>,
    format: PreviewFormat,
    request: LabelRequest,
) -> Result<Response, (StatusCode, String)> {
    let engine = state.engine.clone();
    let base64 = format.is_base64();

    let body = blocking(move || -> Result<Vec<u8>, LabelError> {
        let ctx = engine.context(&request)?;
        let bitmap = engine.render_text(&ctx)?;
        if base64 {
            bitmap.to_base64().map(String::into_bytes)
        } else {
            bitmap.to_png()
        }
    })
    .await?
    .map_err(|e| (error_status(&e), e.to_string()))?;

    let content_type = if base64 { "text/plain" } else { "image/png" };
    Ok(([(header::CONTENT_TYPE, content_type)], body).into_response())
}

/// GET /api/print/text
pub async fn print_get(
    State(state): State<Arc<AppState>>,
    Query(request): Query<LabelRequest>,
) -> Result<Json<PrintOutcome>, (StatusCode, String)> {
    print(state, request).await
}

/// POST /api/print/text
pub async fn print_post(
    State(state): State<Arc<AppState>>,
    Form(request): Form<LabelRequest>,
) -> Result<Json<PrintOutcome>, (StatusCode, String)> {
    print(state, request).await
}

/// Render and print. Request problems come back as `success: false`.
pub async fn print(
    state: Arc<AppState>,
    request: LabelRequest,
) -> Result<Json<PrintOutcome>, (StatusCode, String)> {
    if request.text.as_deref().is_none_or(str::is_empty) {
        return Ok(Json(PrintOutcome::failed("Please provide the text for the label")));
    }

    let engine = state.engine.clone();
    let outcome = blocking(move || {
        let ctx = match engine.context(&request) {
            Ok(ctx) => ctx,
            Err(e) => return PrintOutcome::failed(e.to_string()),
        };
        match engine.render_text(&ctx) {
            Ok(bitmap) => engine.print(&bitmap, &ctx),
            Err(e) => PrintOutcome::failed(e.to_string()),
        }
    })
    .await?;

    Ok(Json(outcome))
}
