//! # Unit Conversion
//!
//! Converts physical label lengths to device pixels and back.
//!
//! ## Constants
//!
//! ```text
//! 1 inch = 25.4 mm = 2.54 cm = 72 pt
//!
//! pixels = length / units_per_inch * dpi
//!
//! At 203 DPI:
//!   1in    → 203 px
//!   25.4mm → 203 px
//!   72pt   → 203 px
//! ```
//!
//! All pixel results are rounded to the nearest integer with ties going to
//! the even neighbour, so `2.5 → 2` and `3.5 → 4`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Millimeters per inch.
pub const MM_PER_INCH: f64 = 25.4;

/// PostScript points per inch.
pub const POINTS_PER_INCH: f64 = 72.0;

/// Physical measurement unit of a label dimension.
///
/// Point is the print-server convention when a size string carries no suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    #[default]
    Point,
    Inch,
    Millimeter,
    Centimeter,
}

impl Unit {
    /// How many of this unit make up one inch.
    #[inline]
    pub fn per_inch(self) -> f64 {
        match self {
            Unit::Point => POINTS_PER_INCH,
            Unit::Inch => 1.0,
            Unit::Millimeter => MM_PER_INCH,
            Unit::Centimeter => MM_PER_INCH / 10.0,
        }
    }

    /// Suffix used in size identifiers (`in`, `mm`, `cm`, `pt`).
    pub fn suffix(self) -> &'static str {
        match self {
            Unit::Point => "pt",
            Unit::Inch => "in",
            Unit::Millimeter => "mm",
            Unit::Centimeter => "cm",
        }
    }

    /// Parse a suffix, case-insensitively.
    pub fn from_suffix(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "pt" => Some(Unit::Point),
            "in" => Some(Unit::Inch),
            "mm" => Some(Unit::Millimeter),
            "cm" => Some(Unit::Centimeter),
            _ => None,
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

/// Convert a physical length to pixels at `dpi`.
///
/// ## Example
///
/// ```
/// use labelweb::media::units::{to_pixels, Unit};
///
/// assert_eq!(to_pixels(1.0, Unit::Inch, 203), 203);
/// assert_eq!(to_pixels(25.4, Unit::Millimeter, 203), 203);
/// ```
pub fn to_pixels(value: f64, unit: Unit, dpi: u32) -> u32 {
    // multiply before dividing so exact inputs stay exact (5pt @ 36dpi = 2.5)
    let px = (value * dpi as f64 / unit.per_inch()).round_ties_even();
    if px <= 0.0 { 0 } else { px as u32 }
}

/// Convert pixels to millimeters at `dpi`.
#[inline]
pub fn to_millimeters(pixels: u32, dpi: u32) -> f64 {
    pixels_to(pixels, Unit::Millimeter, dpi)
}

/// Convert pixels to an arbitrary unit at `dpi`.
#[inline]
pub fn pixels_to(pixels: u32, unit: Unit, dpi: u32) -> f64 {
    if dpi == 0 {
        return 0.0;
    }
    pixels as f64 / dpi as f64 * unit.per_inch()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_inch_at_203_dpi() {
        assert_eq!(to_pixels(1.0, Unit::Inch, 203), 203);
    }

    #[test]
    fn test_cross_unit_agreement() {
        assert_eq!(to_pixels(25.4, Unit::Millimeter, 203), 203);
        assert_eq!(to_pixels(2.54, Unit::Centimeter, 203), 203);
        assert_eq!(to_pixels(72.0, Unit::Point, 203), 203);
    }

    #[test]
    fn test_rounding_ties_to_even() {
        // 5pt at 36 dpi = 2.5px, 3pt = 1.5px, 7pt = 3.5px
        assert_eq!(to_pixels(5.0, Unit::Point, 36), 2);
        assert_eq!(to_pixels(3.0, Unit::Point, 36), 2);
        assert_eq!(to_pixels(7.0, Unit::Point, 36), 4);
    }

    #[test]
    fn test_rounding_nearest() {
        // 62mm at 300 dpi = 732.28px
        assert_eq!(to_pixels(62.0, Unit::Millimeter, 300), 732);
        // 29mm at 300 dpi = 342.52px
        assert_eq!(to_pixels(29.0, Unit::Millimeter, 300), 343);
    }

    #[test]
    fn test_negative_and_zero_clamp() {
        assert_eq!(to_pixels(0.0, Unit::Inch, 300), 0);
        assert_eq!(to_pixels(-3.0, Unit::Inch, 300), 0);
    }

    #[test]
    fn test_to_millimeters() {
        let mm = to_millimeters(203, 203);
        assert!((mm - 25.4).abs() < 1e-9);
        assert_eq!(to_millimeters(100, 0), 0.0);
    }

    #[test]
    fn test_suffix_roundtrip() {
        for unit in [Unit::Point, Unit::Inch, Unit::Millimeter, Unit::Centimeter] {
            assert_eq!(Unit::from_suffix(unit.suffix()), Some(unit));
        }
        assert_eq!(Unit::from_suffix("IN"), Some(Unit::Inch));
        assert_eq!(Unit::from_suffix("px"), None);
    }
}
