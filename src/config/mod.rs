//! # Configuration
//!
//! The service reads one JSON document with four sections:
//!
//! ```json
//! {
//!   "SERVER":  { "HOST": "0.0.0.0", "PORT": 8013, "LOGLEVEL": "INFO" },
//!   "PRINTER": { "USE_CUPS": true, "PRINTER": "zebra",
//!                "LABEL_SIZES": { "62": "62mm endless" },
//!                "LABEL_PRINTABLE_AREA": { "62": [696, 271] } },
//!   "LABEL":   { "DEFAULT_SIZE": "62", "DEFAULT_ORIENTATION": "standard" },
//!   "WEBSITE": { "HTML_TITLE": "Label Designer" }
//! }
//! ```
//!
//! Loose shapes (list-or-map size tables, legacy `[w, h]` printable areas,
//! dict-or-list default fonts, `null` sections) are normalised while
//! decoding, so the rest of the crate sees exactly one shape per field.
//!
//! A decoded [`Config`] is immutable. [`ConfigHandle`] publishes new
//! snapshots atomically on reload.

mod filters;
mod snapshot;
mod types;

pub use filters::{filter_printers, validate_configuration};
pub use snapshot::{ConfigHandle, ConfigSource};
pub use types::{
    FontChoice, LabelOffset, LabelSection, LabelSizes, PrintableArea, PrintableAreas,
    PrinterSection, ServerSection, WebsiteSection,
};

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::LabelError;
use crate::media::PixelSize;

use types::nullable;

/// DPI assumed when neither the print server nor the configuration gives one.
pub const DEFAULT_DPI: u32 = 203;

/// Immutable configuration snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct Config {
    #[serde(default, deserialize_with = "nullable")]
    pub server: ServerSection,
    #[serde(default, deserialize_with = "nullable")]
    pub printer: PrinterSection,
    #[serde(default, deserialize_with = "nullable")]
    pub label: LabelSection,
    #[serde(default, deserialize_with = "nullable")]
    pub website: WebsiteSection,
}

impl Config {
    /// Decode a configuration from JSON text.
    pub fn from_json(text: &str) -> Result<Self, LabelError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Load a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LabelError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&text)
    }

    /// Load `primary`, or `fallback` when `primary` does not exist.
    pub fn load_with_fallback(
        primary: impl AsRef<Path>,
        fallback: impl AsRef<Path>,
    ) -> Result<Self, LabelError> {
        let primary = primary.as_ref();
        match Self::load(primary) {
            Ok(config) => {
                log::info!("loaded config from {}", primary.display());
                Ok(config)
            }
            Err(LabelError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                let fallback = fallback.as_ref();
                let config = Self::load(fallback)?;
                log::info!("loaded config from {}", fallback.display());
                Ok(config)
            }
            Err(e) => Err(e),
        }
    }

    /// Write the configuration as pretty-printed JSON, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), LabelError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let text = serde_json::to_string_pretty(self)?;
        std::fs::write(path, text)?;
        log::info!("config saved to {}", path.display());
        Ok(())
    }

    /// The configured printer name, ignoring empty strings.
    pub fn configured_printer(&self) -> Option<&str> {
        self.printer.printer.as_deref().filter(|p| !p.is_empty())
    }

    /// Pixel size configured for a size identifier.
    pub fn printable_size(&self, size_id: &str) -> Option<PixelSize> {
        self.printer
            .label_printable_area
            .get(size_id)
            .and_then(|area| area.size)
    }

    /// Offset record for a size identifier; disabled when not configured.
    pub fn label_offset(&self, size_id: Option<&str>) -> LabelOffset {
        size_id
            .and_then(|id| self.printer.label_printable_area.get(id))
            .map(|area| area.offset)
            .unwrap_or_default()
    }

    /// Printer DPI from configuration, falling back to [`DEFAULT_DPI`].
    pub fn printer_dpi(&self) -> u32 {
        match self.printer.printer_dpi {
            Some(dpi) if dpi > 0 => dpi,
            _ => DEFAULT_DPI,
        }
    }

    /// First configured default font.
    pub fn default_font(&self) -> Option<&FontChoice> {
        self.label.default_fonts.first()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::Orientation;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = r#"{
        "SERVER": {"HOST": "127.0.0.1", "LOGLEVEL": "DEBUG"},
        "PRINTER": {
            "USE_CUPS": true,
            "PRINTER": "zebra",
            "PRINTER_DPI": 300,
            "LABEL_SIZES": [["62", "62mm endless"], ["29", "29mm x 90mm"]],
            "ENABLED_SIZES": {"zebra": ["62"]},
            "LABEL_PRINTABLE_AREA": {
                "62": [696, 271],
                "29": {"dimensions": [306, 991], "offset": {"enabled": true, "offset_x": 10, "offset_y": 4}}
            }
        },
        "LABEL": {
            "DEFAULT_SIZE": "62",
            "DEFAULT_ORIENTATION": "rotated",
            "DEFAULT_FONTS": {"family": "DejaVu Sans", "style": "Book"}
        }
    }"#;

    #[test]
    fn test_decode_sample() {
        let config = Config::from_json(SAMPLE).unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8013);
        assert!(config.printer.use_cups);
        assert_eq!(config.configured_printer(), Some("zebra"));
        assert_eq!(config.printer_dpi(), 300);
        assert_eq!(config.label.default_orientation, Orientation::Rotated);
        assert_eq!(
            config.default_font(),
            Some(&FontChoice::new("DejaVu Sans", "Book"))
        );
    }

    #[test]
    fn test_label_sizes_order_preserved() {
        let config = Config::from_json(SAMPLE).unwrap();
        let keys: Vec<&str> = config.printer.label_sizes.keys().collect();
        assert_eq!(keys, vec!["62", "29"]);
    }

    #[test]
    fn test_printable_area_shapes_normalised() {
        let config = Config::from_json(SAMPLE).unwrap();
        assert_eq!(config.printable_size("62"), Some(PixelSize::new(696, 271)));
        assert_eq!(config.printable_size("29"), Some(PixelSize::new(306, 991)));
        assert!(!config.label_offset(Some("62")).enabled);

        let offset = config.label_offset(Some("29"));
        assert!(offset.enabled);
        assert_eq!((offset.offset_x, offset.offset_y), (10, 4));
    }

    #[test]
    fn test_offset_defaults_when_unknown() {
        let config = Config::from_json(SAMPLE).unwrap();
        assert_eq!(config.label_offset(Some("102")), LabelOffset::default());
        assert_eq!(config.label_offset(None), LabelOffset::default());
    }

    #[test]
    fn test_null_sections_decode_to_defaults() {
        let config = Config::from_json(r#"{"PRINTER": null, "SERVER": {}}"#).unwrap();
        assert!(!config.printer.use_cups);
        assert!(config.printer.label_sizes.is_empty());
        assert_eq!(config.printer_dpi(), DEFAULT_DPI);
        assert_eq!(config.website.html_title, "Label Designer");
    }

    #[test]
    fn test_empty_printer_name_is_none() {
        let config = Config::from_json(r#"{"PRINTER": {"PRINTER": ""}}"#).unwrap();
        assert_eq!(config.configured_printer(), None);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = Config::from_json(SAMPLE).unwrap();
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.printer.label_sizes, config.printer.label_sizes);
        assert_eq!(
            loaded.printer.label_printable_area,
            config.printer.label_printable_area
        );
        assert_eq!(loaded.label.default_size, config.label.default_size);
    }

    #[test]
    fn test_load_with_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let fallback = dir.path().join("config.minimal.json");
        std::fs::write(&fallback, r#"{"LABEL": {"DEFAULT_SIZE": "29"}}"#).unwrap();

        let config =
            Config::load_with_fallback(dir.path().join("missing.json"), &fallback).unwrap();
        assert_eq!(config.label.default_size.as_deref(), Some("29"));
    }

    #[test]
    fn test_load_with_fallback_reports_bad_json() {
        let dir = tempfile::tempdir().unwrap();
        let primary = dir.path().join("config.json");
        std::fs::write(&primary, "{ not json").unwrap();
        let result = Config::load_with_fallback(&primary, dir.path().join("other.json"));
        assert!(matches!(result, Err(LabelError::Config(_))));
    }
}
