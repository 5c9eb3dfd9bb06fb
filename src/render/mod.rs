//! # Rendering Module
//!
//! Turns a resolved label size and a request into a bitmap.
//!
//! ## Modules
//!
//! - [`context`]: per-request layout parameters
//! - [`font`]: TTF measurement/drawing and the font book
//! - [`fit`]: shrink-to-fit font sizing
//! - [`compose`]: canvas assembly, text placement, registration offset
//! - [`bitmap`]: PNG output with DPI metadata
//!
//! ## Usage Example
//!
//! ```
//! use labelweb::config::FontChoice;
//! use labelweb::media::PixelSize;
//! use labelweb::render::{compose, CompositeOptions, LabelContent, LabelFont, RenderContext};
//!
//! let font = LabelFont::embedded();
//! let ctx = RenderContext::new("62", FontChoice::new("DejaVu Sans", "Book"), 40);
//! let (bitmap, _) = compose(
//!     PixelSize::new(696, 271),
//!     LabelContent::Text { text: "Hello", font: &font },
//!     &ctx,
//!     &CompositeOptions::default(),
//! )?;
//! let png = bitmap.to_png()?;
//! # Ok::<(), labelweb::LabelError>(())
//! ```

pub mod bitmap;
pub mod compose;
pub mod context;
pub mod fit;
pub mod font;

pub use bitmap::Bitmap;
pub use compose::{CompositeOptions, ElementPainter, LabelContent, compose};
pub use context::{Align, MarginPercent, Margins, Orientation, RenderContext};
pub use font::{FontBook, LabelFont, TextMeasure};
