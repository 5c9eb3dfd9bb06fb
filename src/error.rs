//! # Error Types
//!
//! This module defines error types used throughout the labelweb library.

use thiserror::Error;

/// Main error type for labelweb operations
#[derive(Debug, Error)]
pub enum LabelError {
    /// A size identifier or other input could not be recognized
    #[error("Parse error: {0}")]
    Parse(String),

    /// The print server could not be reached or rejected a request
    #[error("Print server unavailable: {0}")]
    SinkUnavailable(String),

    /// A font, size or printer the request needs is not configured
    #[error("Configuration incomplete: {0}")]
    ConfigurationIncomplete(String),

    /// Painting a label failed (template element, canvas geometry)
    #[error("Composition failed: {0}")]
    Composition(String),

    /// Image encoding error
    #[error("Image error: {0}")]
    Image(String),

    /// Configuration file could not be decoded
    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
