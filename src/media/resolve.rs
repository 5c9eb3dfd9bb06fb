//! # Dimension Resolution
//!
//! Turns a size identifier into pixels by trying, in order:
//!
//! | Step | Source | Notes |
//! |------|--------|-------|
//! | 1 | print server media catalog | only with a sink; absolute sizes |
//! | 2 | the identifier itself | `4x6in`, `Custom.100x50mm`, `na_index-4x6_4x6in` |
//! | 3 | configured printable area | `LABEL_PRINTABLE_AREA` pixels |
//! | 4 | [`FALLBACK_SIZE`] | logged as a warning |
//!
//! Each step is a plain function returning `Option<PixelSize>`; the
//! precedence is the order of [`CASCADE`]. Failures inside a step count as
//! "no answer" and resolution never fails.

use super::{PixelSize, key};
use crate::config::Config;
use crate::render::Orientation;
use crate::sink::PrintSink;

/// Size used when no step produced a usable answer.
pub const FALLBACK_SIZE: PixelSize = PixelSize::new(300, 200);

/// Everything a cascade step may look at.
#[derive(Clone, Copy)]
pub struct ResolveInput<'a> {
    pub size_id: &'a str,
    pub printer: Option<&'a str>,
    pub config: &'a Config,
    /// `None` when the print server is disabled.
    pub sink: Option<&'a dyn PrintSink>,
    pub dpi: u32,
}

/// One resolution step.
pub type CascadeStep = fn(&ResolveInput<'_>) -> Option<PixelSize>;

/// Resolution steps in precedence order.
pub const CASCADE: &[(&str, CascadeStep)] = &[
    ("print server", from_sink),
    ("size name", from_name),
    ("configuration", from_config),
];

/// Run `steps` in order and return the first positive answer with the
/// name of the step that produced it.
pub fn first_some(
    steps: &[(&'static str, CascadeStep)],
    input: &ResolveInput<'_>,
) -> Option<(&'static str, PixelSize)> {
    steps.iter().find_map(|(name, step)| {
        step(input)
            .filter(PixelSize::is_positive)
            .map(|size| (*name, size))
    })
}

/// Resolve `input.size_id` to pixels, before orientation.
pub fn resolve(input: &ResolveInput<'_>) -> PixelSize {
    match first_some(CASCADE, input) {
        Some((step, size)) => {
            log::info!(
                "Using dimensions from {} for '{}': {}x{}",
                step,
                input.size_id,
                size.width,
                size.height
            );
            size
        }
        None => {
            log::warn!(
                "No dimensions found for '{}', using default ({}, {})",
                input.size_id,
                FALLBACK_SIZE.width,
                FALLBACK_SIZE.height
            );
            FALLBACK_SIZE
        }
    }
}

/// Put a resolved size into layout orientation.
///
/// The longer side becomes the width first; `rotated` then swaps again.
/// Both swaps are needed: rotating a size that was already tall must give
/// a tall result.
pub fn orient(size: PixelSize, orientation: Orientation) -> PixelSize {
    let wide = if size.height > size.width {
        size.swapped()
    } else {
        size
    };
    match orientation {
        Orientation::Standard => wide,
        Orientation::Rotated => wide.swapped(),
    }
}

fn from_sink(input: &ResolveInput<'_>) -> Option<PixelSize> {
    let sink = input.sink?;
    let printer = input.printer?;
    let media = match sink.media_catalog(printer) {
        Ok(media) => media,
        Err(e) => {
            log::warn!("Could not query media for '{}': {}", printer, e);
            return None;
        }
    };
    media
        .iter()
        .find(|record| record.name == input.size_id)
        .and_then(|record| record.size.as_ref())
        .map(|size| PixelSize::from_physical(size, input.dpi))
}

fn from_name(input: &ResolveInput<'_>) -> Option<PixelSize> {
    key::parse(input.size_id).map(|parsed| PixelSize::from_physical(&parsed.size, input.dpi))
}

fn from_config(input: &ResolveInput<'_>) -> Option<PixelSize> {
    input.config.printable_size(input.size_id)
}

// ============================================================================
// TESTS
// ============================================================================
