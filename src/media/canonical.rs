//! # Canonical Media Names
//!
//! Produces the print-server custom media form `Custom.<W>x<H><unit>` for
//! any size identifier the service knows about.
//!
//! ## Precedence
//!
//! ```text
//! "Custom.4x6in"  → already canonical, unchanged
//! "4x6in"         → "Custom.4x6in"            (explicit unit)
//! "288x144"       → "Custom.288x144"          (points, no config entry)
//! "62"            → "Custom.59x23mm"          (configured 696x271 px at 300 dpi)
//! "Letter"        → "Letter"                  (passthrough)
//! ```
//!
//! A unit-less identifier that *also* has a configured pixel size uses the
//! configured pixels; this keeps existing deployments printing the same
//! physical size.

use super::key::{self, CUSTOM_PREFIX};
use super::units;
use crate::config::PrintableAreas;

/// Convert `identifier` to its canonical print-server form.
///
/// Pure function of its inputs; never queries the print server.
pub fn to_canonical(identifier: &str, configured: &PrintableAreas, dpi: u32) -> String {
    let parsed = key::parse(identifier);

    if let Some(p) = parsed {
        if p.canonical && identifier.starts_with(CUSTOM_PREFIX) {
            return identifier.to_string();
        }
        if p.explicit_unit {
            return format!(
                "{}{}x{}{}",
                CUSTOM_PREFIX,
                p.size.width,
                p.size.height,
                p.size.unit.suffix()
            );
        }
        if configured.get(identifier).and_then(|a| a.size).is_none() {
            return format!("{}{}x{}", CUSTOM_PREFIX, p.size.width, p.size.height);
        }
    }

    if let Some(size) = configured.get(identifier).and_then(|a| a.size) {
        let width_mm = units::to_millimeters(size.width, dpi).round_ties_even();
        let height_mm = units::to_millimeters(size.height, dpi).round_ties_even();
        return format!(
            "{}{}x{}mm",
            CUSTOM_PREFIX, width_mm as i64, height_mm as i64
        );
    }

    identifier.to_string()
}

// ============================================================================
// TESTS
// ============================================================================
