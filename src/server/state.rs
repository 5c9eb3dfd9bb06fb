//! Server state and configuration.

use std::sync::Arc;

use crate::engine::LabelEngine;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to listen on (e.g., "0.0.0.0:8013")
    pub listen_addr: String,
}

/// Application state shared across handlers.
pub struct AppState {
    pub engine: Arc<LabelEngine>,
}

impl AppState {
    pub fn new(engine: Arc<LabelEngine>) -> Self {
        Self { engine }
    }
}
