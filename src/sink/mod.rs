//! # Print Sinks
//!
//! A print sink is whatever accepts finished label bitmaps: normally a CUPS
//! server, in tests an in-memory recorder. The engine only talks to the
//! [`PrintSink`] trait.
//!
//! ## Available Sinks
//!
//! - [`cups`]: drives the CUPS command-line clients (`lpstat`, `lpoptions`, `lp`)
//! - [`memory`]: records submissions, serves a fixed catalog

pub mod cups;
pub mod memory;

pub use cups::CupsSink;
pub use memory::MemorySink;

use serde::Serialize;
use std::path::Path;

use crate::error::LabelError;
use crate::media::PhysicalSize;

/// One media entry reported by the print server.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaRecord {
    /// Print-server media name (e.g. `na_index-4x6_4x6in`, `w162h90`).
    pub name: String,
    /// Absolute size, when the server reports one.
    pub size: Option<PhysicalSize>,
}

impl MediaRecord {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            size: None,
        }
    }

    pub fn sized(name: &str, size: PhysicalSize) -> Self {
        Self {
            name: name.to_string(),
            size: Some(size),
        }
    }
}

/// Options passed along with a print job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintOptions {
    pub copies: u32,
    /// Media name; `None` prints the bitmap at its own physical size.
    pub media: Option<String>,
    /// Pixels per inch of the bitmap for 1:1 printing.
    pub ppi: Option<u32>,
}

impl PrintOptions {
    pub fn copies(copies: u32) -> Self {
        Self {
            copies: copies.max(1),
            media: None,
            ppi: None,
        }
    }
}

/// User-visible result of a print request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrintOutcome {
    pub success: bool,
    pub message: String,
}

impl PrintOutcome {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// The print server as seen by the engine.
///
/// Every call may block on the network. Errors are reported as
/// [`LabelError::SinkUnavailable`]; callers degrade instead of failing.
pub trait PrintSink: Send + Sync {
    /// Names of all printers.
    fn list_printers(&self) -> Result<Vec<String>, LabelError>;

    /// The server's default destination.
    fn default_printer(&self) -> Result<Option<String>, LabelError>;

    /// Media supported by `printer`.
    fn media_catalog(&self, printer: &str) -> Result<Vec<MediaRecord>, LabelError>;

    /// Media loaded by default on `printer`.
    fn default_media(&self, printer: &str) -> Result<Option<String>, LabelError>;

    /// Default horizontal resolution of `printer` in DPI.
    fn resolution(&self, printer: &str) -> Result<Option<u32>, LabelError>;

    /// Queue the image at `bitmap` on `printer`.
    fn submit(&self, bitmap: &Path, printer: &str, options: &PrintOptions)
    -> Result<(), LabelError>;
}
