//! Printer filtering and configuration validation.

use std::collections::BTreeMap;

use super::Config;
use crate::media::Catalog;

/// Apply `PRINTERS_INCLUDE` (when non-empty) and then `PRINTERS_EXCLUDE`.
///
/// This filters printer *names*; catalog entries are filtered separately
/// by `ENABLED_SIZES`.
pub fn filter_printers(printers: &[String], config: &Config) -> Vec<String> {
    let include = &config.printer.printers_include;
    let exclude = &config.printer.printers_exclude;

    printers
        .iter()
        .filter(|p| include.is_empty() || include.iter().any(|i| i == *p))
        .filter(|p| !exclude.iter().any(|e| e == *p))
        .cloned()
        .collect()
}

/// Collect configuration problems without failing.
///
/// `fonts` maps family → available styles. The result is shown in the UI as
/// warnings; an empty list means the configuration is usable.
pub fn validate_configuration(
    fonts: &BTreeMap<String, Vec<String>>,
    catalog: &Catalog,
    printers: &[String],
    config: &Config,
) -> Vec<String> {
    let mut errors = Vec::new();

    if fonts.is_empty() {
        errors.push(
            "No fonts found on the system. Please install fonts to the system or configure additional font folder."
                .to_string(),
        );
    }

    if printers.is_empty() {
        errors.push(
            "No printers detected. Please ensure CUPS is available and printers are configured."
                .to_string(),
        );
    } else if let Some(configured) = config.configured_printer()
        && !printers.iter().any(|p| p == configured)
    {
        errors.push(format!(
            "Configured default printer '{}' not found among available printers.",
            configured
        ));
    }

    if catalog.is_empty() {
        errors.push(
            "No label sizes available. Ensure CUPS server has configured media or enter custom sizes in the configuration."
                .to_string(),
        );
    }

    for font in &config.label.default_fonts {
        if font.family.is_empty() || font.style.is_empty() {
            continue;
        }
        match fonts.get(&font.family) {
            None => errors.push(format!(
                "Configured default font family '{}' not found in system fonts.",
                font.family
            )),
            Some(styles) if !styles.contains(&font.style) => errors.push(format!(
                "Configured default font style '{}' not found for font family '{}'.",
                font.style, font.family
            )),
            Some(_) => {}
        }
    }

    if let Some(default_size) = config.label.default_size.as_deref()
        && !default_size.is_empty()
        && !catalog.is_empty()
        && !catalog.contains(default_size)
    {
        errors.push(format!(
            "Configured default label size '{}' is not in available label sizes.",
            default_size
        ));
    }

    errors
}

// ============================================================================
// TESTS
// ============================================================================
