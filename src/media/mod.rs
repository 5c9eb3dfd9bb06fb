//! # Media Sizes
//!
//! Everything that turns a label size identifier into numbers.
//!
//! ## Pipeline
//!
//! ```text
//! "4x6in" ──► key::parse ──► PhysicalSize(4, 6, in)
//!                                │
//!          units::to_pixels ◄────┘  (dpi)
//!                │
//!                ▼
//!   resolve::resolve ──► PixelSize(1200, 1800) ──► orient ──► (1800, 1200)
//!
//! config sizes + print-server media ──► catalog::build_catalog ──► Catalog
//!                       └── canonical::to_canonical ("Custom.WxHunit")
//! ```
//!
//! ## Modules
//!
//! - [`units`]: pixel / point / inch / mm / cm conversion
//! - [`key`]: size identifier parsing
//! - [`canonical`]: print-server custom media names
//! - [`resolve`]: the dimension resolution cascade
//! - [`catalog`]: per-printer size catalogs

pub mod canonical;
pub mod catalog;
pub mod key;
pub mod resolve;
pub mod units;

pub use canonical::to_canonical;
pub use catalog::{Catalog, CatalogEntry, build_catalog, configured_catalog};
pub use key::{ParsedSize, PhysicalSize};
pub use resolve::{FALLBACK_SIZE, ResolveInput, orient, resolve};
pub use units::Unit;

use serde::Serialize;

/// Label size in device pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct PixelSize {
    pub width: u32,
    pub height: u32,
}

impl PixelSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Both dimensions are non-zero.
    #[inline]
    pub fn is_positive(&self) -> bool {
        self.width > 0 && self.height > 0
    }

    /// The same size with width and height exchanged.
    #[inline]
    pub fn swapped(self) -> Self {
        Self::new(self.height, self.width)
    }

    /// Convert a physical size at `dpi`.
    pub fn from_physical(size: &PhysicalSize, dpi: u32) -> Self {
        Self::new(
            units::to_pixels(size.width, size.unit, dpi),
            units::to_pixels(size.height, size.unit, dpi),
        )
    }
}
