//! Section types and the shape normalisation done at decode time.

use serde::de::{self, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::media::PixelSize;
use crate::render::Orientation;

/// Treat an explicit JSON `null` like a missing field.
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// ============================================================================
// SERVER / WEBSITE
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "SCREAMING_SNAKE_CASE")]
pub struct ServerSection {
    pub host: String,
    pub port: u16,
    pub loglevel: String,
    pub additional_font_folder: Option<String>,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8013,
            loglevel: "INFO".to_string(),
            additional_font_folder: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "SCREAMING_SNAKE_CASE")]
pub struct WebsiteSection {
    pub html_title: String,
    pub page_title: String,
    pub page_headline: String,
}

impl Default for WebsiteSection {
    fn default() -> Self {
        Self {
            html_title: "Label Designer".to_string(),
            page_title: "Label Designer".to_string(),
            page_headline: "Design and print labels".to_string(),
        }
    }
}

// ============================================================================
// PRINTER
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "SCREAMING_SNAKE_CASE")]
pub struct PrinterSection {
    /// Query the print server for printers and media.
    pub use_cups: bool,
    /// Print server host.
    pub server: Option<String>,
    /// Preferred printer.
    pub printer: Option<String>,
    pub printer_dpi: Option<u32>,
    /// Print bitmaps 1:1 with DPI metadata instead of passing a media size.
    pub use_new_print_workflow: bool,
    #[serde(deserialize_with = "nullable")]
    pub label_sizes: LabelSizes,
    /// Printer name → allowed size identifiers.
    #[serde(deserialize_with = "nullable")]
    pub enabled_sizes: BTreeMap<String, Vec<String>>,
    #[serde(deserialize_with = "nullable")]
    pub printers_include: Vec<String>,
    #[serde(deserialize_with = "nullable")]
    pub printers_exclude: Vec<String>,
    #[serde(deserialize_with = "nullable")]
    pub label_printable_area: PrintableAreas,
}

/// Ordered table of user-defined sizes: identifier → display label.
///
/// Accepts either a JSON object or a list of `[key, label, ...]` entries.
/// Malformed list entries are skipped with a warning; a repeated key keeps
/// its last label.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelSizes(Vec<(String, String)>);

impl LabelSizes {
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(k, _)| k.as_str())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn insert(&mut self, key: String, label: String) {
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = label,
            None => self.0.push((key, label)),
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for LabelSizes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut sizes = LabelSizes::default();
        for (k, v) in iter {
            sizes.insert(k.into(), v.into());
        }
        sizes
    }
}

impl Serialize for LabelSizes {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (k, v) in &self.0 {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for LabelSizes {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SizesVisitor;

        impl<'de> Visitor<'de> for SizesVisitor {
            type Value = LabelSizes;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map or a list of [key, label] pairs")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut sizes = LabelSizes::default();
                while let Some((k, v)) = map.next_entry::<String, String>()? {
                    sizes.insert(k, v);
                }
                Ok(sizes)
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
                let mut sizes = LabelSizes::default();
                while let Some(item) = seq.next_element::<serde_json::Value>()? {
                    match pair_from_value(&item) {
                        Some((k, v)) => sizes.insert(k, v),
                        None => log::warn!("Skipping invalid label size entry: {}", item),
                    }
                }
                Ok(sizes)
            }
        }

        deserializer.deserialize_any(SizesVisitor)
    }
}

fn pair_from_value(value: &serde_json::Value) -> Option<(String, String)> {
    let items = value.as_array()?;
    if items.len() < 2 {
        return None;
    }
    let text = |v: &serde_json::Value| match v {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    };
    Some((text(&items[0])?, text(&items[1])?))
}

/// Extra canvas padding applied for printers whose feed registration is
/// not at the image origin.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelOffset {
    pub enabled: bool,
    pub offset_x: u32,
    pub offset_y: u32,
}

/// Configured pixel size (and optional offset) for a size identifier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawArea", into = "AreaRecord")]
pub struct PrintableArea {
    /// `None` when an entry only carries an offset.
    pub size: Option<PixelSize>,
    pub offset: LabelOffset,
}

impl PrintableArea {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            size: Some(PixelSize::new(width, height)),
            offset: LabelOffset::default(),
        }
    }

    pub fn with_offset(mut self, offset_x: u32, offset_y: u32) -> Self {
        self.offset = LabelOffset {
            enabled: true,
            offset_x,
            offset_y,
        };
        self
    }
}

pub type PrintableAreas = BTreeMap<String, PrintableArea>;

/// The two on-disk shapes of a printable area.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawArea {
    Legacy(Vec<u32>),
    Detailed {
        #[serde(default)]
        dimensions: Vec<u32>,
        #[serde(default)]
        offset: LabelOffset,
    },
}

/// Printable areas are always written in the detailed shape.
#[derive(Serialize)]
struct AreaRecord {
    dimensions: Vec<u32>,
    offset: LabelOffset,
}

fn size_from_dims(dims: &[u32]) -> Option<PixelSize> {
    match dims {
        [w, h, ..] if *w > 0 && *h > 0 => Some(PixelSize::new(*w, *h)),
        _ => None,
    }
}

impl From<RawArea> for PrintableArea {
    fn from(raw: RawArea) -> Self {
        match raw {
            RawArea::Legacy(dims) => Self {
                size: size_from_dims(&dims),
                offset: LabelOffset::default(),
            },
            RawArea::Detailed { dimensions, offset } => Self {
                size: size_from_dims(&dimensions),
                offset,
            },
        }
    }
}

impl From<PrintableArea> for AreaRecord {
    fn from(area: PrintableArea) -> Self {
        Self {
            dimensions: area
                .size
                .map(|s| vec![s.width, s.height])
                .unwrap_or_default(),
            offset: area.offset,
        }
    }
}

// ============================================================================
// LABEL
// ============================================================================

/// A font family/style pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontChoice {
    pub family: String,
    pub style: String,
}

impl FontChoice {
    pub fn new(family: &str, style: &str) -> Self {
        Self {
            family: family.to_string(),
            style: style.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "SCREAMING_SNAKE_CASE")]
pub struct LabelSection {
    pub default_size: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub default_orientation: Orientation,
    pub default_font_size: u32,
    /// Preference-ordered default fonts; a single object is accepted too.
    #[serde(deserialize_with = "one_or_many")]
    pub default_fonts: Vec<FontChoice>,
}

impl Default for LabelSection {
    fn default() -> Self {
        Self {
            default_size: None,
            default_orientation: Orientation::Standard,
            default_font_size: 70,
            default_fonts: vec![FontChoice::new("DejaVu Sans", "Book")],
        }
    }
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<FontChoice>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(FontChoice),
        Many(Vec<FontChoice>),
        Nothing(Option<()>),
    }

    match OneOrMany::deserialize(deserializer) {
        Ok(OneOrMany::One(font)) => Ok(vec![font]),
        Ok(OneOrMany::Many(fonts)) => Ok(fonts),
        Ok(OneOrMany::Nothing(_)) => Ok(Vec::new()),
        Err(_) => Err(de::Error::custom(
            "DEFAULT_FONTS must be a {family, style} object or a list of them",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_label_sizes_from_map() {
        let sizes: LabelSizes = serde_json::from_str(r#"{"62": "62mm", "29": "29mm"}"#).unwrap();
        assert_eq!(
            sizes.iter().collect::<Vec<_>>(),
            vec![("62", "62mm"), ("29", "29mm")]
        );
    }

    #[test]
    fn test_label_sizes_list_skips_invalid() {
        let sizes: LabelSizes =
            serde_json::from_str(r#"[["62", "62mm"], "invalid", ["29", "29mm", "extra"], null, [102, "102mm"]]"#)
                .unwrap();
        assert_eq!(
            sizes.iter().collect::<Vec<_>>(),
            vec![("62", "62mm"), ("29", "29mm"), ("102", "102mm")]
        );
    }

    #[test]
    fn test_label_sizes_duplicate_keeps_last() {
        let sizes: LabelSizes = serde_json::from_str(r#"[["62", "a"], ["62", "b"]]"#).unwrap();
        assert_eq!(sizes.len(), 1);
        assert_eq!(sizes.get("62"), Some("b"));
    }

    #[test]
    fn test_printable_area_legacy_and_detailed() {
        let legacy: PrintableArea = serde_json::from_str("[696, 271]").unwrap();
        assert_eq!(legacy, PrintableArea::new(696, 271));

        let detailed: PrintableArea = serde_json::from_str(
            r#"{"dimensions": [696, 271], "offset": {"enabled": true, "offset_x": 8}}"#,
        )
        .unwrap();
        assert_eq!(detailed, PrintableArea::new(696, 271).with_offset(8, 0));

        let offset_only: PrintableArea =
            serde_json::from_str(r#"{"offset": {"enabled": true, "offset_y": 3}}"#).unwrap();
        assert_eq!(offset_only.size, None);
        assert_eq!(offset_only.offset.offset_y, 3);
    }

    #[test]
    fn test_printable_area_written_detailed() {
        let json = serde_json::to_value(PrintableArea::new(10, 20)).unwrap();
        assert_eq!(json["dimensions"], serde_json::json!([10, 20]));
        assert_eq!(json["offset"]["enabled"], serde_json::json!(false));
    }

    #[test]
    fn test_default_fonts_shapes() {
        let one: LabelSection =
            serde_json::from_str(r#"{"DEFAULT_FONTS": {"family": "A", "style": "B"}}"#).unwrap();
        assert_eq!(one.default_fonts, vec![FontChoice::new("A", "B")]);

        let many: LabelSection = serde_json::from_str(
            r#"{"DEFAULT_FONTS": [{"family": "A", "style": "B"}, {"family": "C", "style": "D"}]}"#,
        )
        .unwrap();
        assert_eq!(many.default_fonts.len(), 2);

        let none: LabelSection = serde_json::from_str(r#"{"DEFAULT_FONTS": null}"#).unwrap();
        assert!(none.default_fonts.is_empty());
    }
}
