//! # labelweb - Label Rendering and Print Service
//!
//! labelweb renders text labels for thermal label printers and sends them
//! to a CUPS server. It provides:
//!
//! - **Size resolution**: label size identifiers from the print server,
//!   from configuration and from free-form `WxH unit` names, resolved to
//!   pixels through one precedence cascade
//! - **Catalogs**: per-printer merged size lists with canonical
//!   `Custom.WxHunit` names
//! - **Layout**: shrink-to-fit text, margins, orientation and registration
//!   offsets
//! - **Printing**: a print-sink abstraction with a CUPS implementation
//!
//! ## Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use labelweb::config::{Config, ConfigHandle, PrintableArea};
//! use labelweb::engine::{LabelEngine, LabelRequest};
//! use labelweb::render::FontBook;
//! use labelweb::sink::MemorySink;
//!
//! let mut config = Config::default();
//! config.printer.label_printable_area.insert("62".into(), PrintableArea::new(696, 271));
//!
//! let engine = LabelEngine::new(
//!     ConfigHandle::new(config),
//!     Arc::new(MemorySink::new()),
//!     FontBook::with_embedded(),
//! );
//!
//! let request = LabelRequest {
//!     text: Some("Hello".into()),
//!     label_size: Some("62".into()),
//!     ..Default::default()
//! };
//! let ctx = engine.context(&request)?;
//! let bitmap = engine.render_text(&ctx)?;
//! assert_eq!((bitmap.width(), bitmap.height()), (696, 271));
//! # Ok::<(), labelweb::LabelError>(())
//! ```
//!
//! ## Modules
//!
//! - [`media`]: unit conversion, size parsing, canonical names, resolution, catalogs
//! - [`render`]: fonts, fitting, compositing, PNG output
//! - [`sink`]: print sinks
//! - [`config`]: configuration snapshot
//! - [`engine`]: request-level operations
//! - [`server`]: HTTP surface

pub mod config;
pub mod engine;
pub mod error;
pub mod logging;
pub mod media;
pub mod render;
pub mod server;
pub mod sink;

// Re-export commonly used types
pub use error::LabelError;
