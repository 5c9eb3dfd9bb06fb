//! HTTP handlers for the server.

pub mod label;
pub mod media;
pub mod status;

use axum::http::StatusCode;

use crate::error::LabelError;

/// Map an engine error to a response status.
pub(crate) fn error_status(e: &LabelError) -> StatusCode {
    match e {
        LabelError::Parse(_) | LabelError::ConfigurationIncomplete(_) => StatusCode::BAD_REQUEST,
        LabelError::SinkUnavailable(_) => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Run blocking engine work off the async runtime.
pub(crate) async fn blocking<T, F>(f: F) -> Result<T, (StatusCode, String)>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, format!("Task error: {}", e)))
}
