//! # HTTP Server for Label Printing
//!
//! JSON and image endpoints for a browser-based label designer.
//!
//! ## Usage
//!
//! ```bash
//! labelweb serve --config /appconfig/config.json
//! ```
//!
//! | Route | Purpose |
//! |-------|---------|
//! | `GET /health` | printers visible to the service |
//! | `GET /api/printer/:printer/media` | size catalog for one printer |
//! | `GET /api/fonts` | font families and styles |
//! | `GET /api/config/validate` | configuration warnings |
//! | `POST /api/config/reload` | re-read the configuration file |
//! | `GET, POST /api/preview/text` | PNG (or base64) preview |
//! | `GET, POST /api/print/text` | render and print |

pub mod handlers;
mod state;

pub use state::{AppState, ServerConfig};

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::engine::LabelEngine;
use crate::error::LabelError;

/// Build the application router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::status::health).post(handlers::status::health))
        .route("/api/fonts", get(handlers::status::fonts))
        .route("/api/config/validate", get(handlers::status::validate))
        .route("/api/config/reload", post(handlers::status::reload))
        .route(
            "/api/printer/:printer/media",
            get(handlers::media::printer_media),
        )
        .route(
            "/api/preview/text",
            get(handlers::label::preview_get).post(handlers::label::preview_post),
        )
        .route(
            "/api/print/text",
            get(handlers::label::print_get).post(handlers::label::print_post),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Start the HTTP server.
///
/// ## Example
///
/// ```no_run
/// use std::sync::Arc;
/// use labelweb::config::{Config, ConfigHandle};
/// use labelweb::engine::LabelEngine;
/// use labelweb::render::FontBook;
/// use labelweb::server::{serve, ServerConfig};
/// use labelweb::sink::CupsSink;
///
/// # async fn example() -> Result<(), labelweb::LabelError> {
/// let engine = LabelEngine::new(
///     ConfigHandle::new(Config::default()),
///     Arc::new(CupsSink::new(None)),
///     FontBook::with_embedded(),
/// );
/// let config = ServerConfig {
///     listen_addr: "0.0.0.0:8013".to_string(),
/// };
///
/// serve(config, Arc::new(engine)).await?;
/// # Ok(())
/// # }
/// ```
pub async fn serve(config: ServerConfig, engine: Arc<LabelEngine>) -> Result<(), LabelError> {
    let app = router(Arc::new(AppState::new(engine)));

    log::info!("labelweb HTTP server listening on {}", config.listen_addr);

    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .map_err(|e| {
            LabelError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to bind to {}: {}", config.listen_addr, e),
            ))
        })?;

    axum::serve(listener, app).await?;

    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================
