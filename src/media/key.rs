//! # Size Key Parsing
//!
//! Recognizes free-form label size identifiers:
//!
//! | Input | Width | Height | Unit |
//! |-------|-------|--------|------|
//! | `4x6in` | 4 | 6 | inch |
//! | `100 x 50 mm` | 100 | 50 | millimeter |
//! | `Custom.4.5x6.5in` | 4.5 | 6.5 | inch (canonical) |
//! | `288x144` | 288 | 144 | point (implied) |
//! | `na_index-4x6_4x6in` | 4 | 6 | inch |
//! | `iso_a4_210x297mm` | 210 | 297 | millimeter |
//!
//! A string without a unit suffix is measured in points, the print-server
//! convention, never in pixels. Names with no embedded `WxH` (e.g. `"62"`
//! or `"Letter"`) do not parse.
//!
//! This module is the only place size strings are matched; everything else
//! goes through [`parse`].

use regex::Regex;
use std::sync::OnceLock;

use super::units::Unit;

/// Prefix of the print-server custom media form (`Custom.WxHunit`).
pub const CUSTOM_PREFIX: &str = "Custom.";

static SIZE_PATTERN: OnceLock<Regex> = OnceLock::new();

fn size_pattern() -> &'static Regex {
    SIZE_PATTERN.get_or_init(|| {
        // a unit must not run into further letters ("4x6 inkjet" has no unit)
        Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*x\s*(\d+(?:\.\d+)?)\s*(?:(in|mm|cm|pt)(?:[^a-zA-Z]|$))?")
            .expect("size pattern is valid")
    })
}

/// A width/height pair in a physical unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicalSize {
    pub width: f64,
    pub height: f64,
    pub unit: Unit,
}

impl PhysicalSize {
    pub fn new(width: f64, height: f64, unit: Unit) -> Self {
        Self {
            width,
            height,
            unit,
        }
    }
}

/// Result of parsing a size identifier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParsedSize {
    pub size: PhysicalSize,
    /// The identifier spelled a unit suffix (otherwise points were implied).
    pub explicit_unit: bool,
    /// The identifier carried the `Custom.` prefix.
    pub canonical: bool,
}

/// Parse a size identifier into a physical size.
///
/// Catalog names often embed the size twice (`na_index-4x6_4x6in`); a match
/// that spells its unit is preferred over a bare one.
///
/// ## Example
///
/// ```
/// use labelweb::media::key::parse;
/// use labelweb::media::units::Unit;
///
/// let parsed = parse("4x6in").unwrap();
/// assert_eq!(parsed.size.width, 4.0);
/// assert_eq!(parsed.size.unit, Unit::Inch);
/// assert!(parse("62").is_none());
/// ```
pub fn parse(raw: &str) -> Option<ParsedSize> {
    let trimmed = raw.trim();
    let (body, canonical) = match strip_custom_prefix(trimmed) {
        Some(rest) => (rest, true),
        None => (trimmed, false),
    };

    let mut first_bare = None;
    for caps in size_pattern().captures_iter(body) {
        let width: f64 = caps[1].parse().ok()?;
        let height: f64 = caps[2].parse().ok()?;
        match caps.get(3).and_then(|m| Unit::from_suffix(m.as_str())) {
            Some(unit) => {
                return Some(ParsedSize {
                    size: PhysicalSize::new(width, height, unit),
                    explicit_unit: true,
                    canonical,
                });
            }
            None => {
                if first_bare.is_none() {
                    first_bare = Some(PhysicalSize::new(width, height, Unit::Point));
                }
            }
        }
    }

    first_bare.map(|size| ParsedSize {
        size,
        explicit_unit: false,
        canonical,
    })
}

/// Strip a leading `Custom.` (case-insensitive), returning the remainder.
pub fn strip_custom_prefix(s: &str) -> Option<&str> {
    let head = s.get(..CUSTOM_PREFIX.len())?;
    if head.eq_ignore_ascii_case(CUSTOM_PREFIX) {
        Some(&s[CUSTOM_PREFIX.len()..])
    } else {
        None
    }
}

/// Human-readable label for a print-server media name.
///
/// `na_index-4x6_4x6in` becomes `4in x 6in`; names without an explicit
/// unit are shown as-is.
pub fn describe(media_name: &str) -> String {
    match parse(media_name) {
        Some(parsed) if parsed.explicit_unit => {
            let unit = parsed.size.unit.suffix();
            format!(
                "{}{} x {}{}",
                parsed.size.width, unit, parsed.size.height, unit
            )
        }
        _ => media_name.to_string(),
    }
}

// ============================================================================
// TESTS
// ============================================================================
