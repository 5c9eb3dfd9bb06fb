//! # Size Catalogs
//!
//! A catalog is the ordered list of sizes a printer offers in the UI:
//! identifier → display label, unique identifiers.
//!
//! ## Merge Rules
//!
//! ```text
//! print-server media           configured LABEL_SIZES
//!   na_index-4x6_4x6in           "4x6in"  → Custom.4x6in
//!   Custom.100x50mm              "62"     → Custom.59x23mm
//!            │                          │
//!            └──── server entries first, then configured entries whose
//!                  canonical key is not taken yet
//!                               │
//!                  ENABLED_SIZES[printer] allow-list (empty = all)
//! ```

use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::BTreeMap;

use super::{canonical, key};
use crate::config::{LabelSizes, PrintableAreas};
use crate::sink::MediaRecord;

/// One selectable size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub id: String,
    pub label: String,
}

/// Ordered identifier → label mapping with unique identifiers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    /// Build from pairs; later duplicates are dropped.
    pub fn from_entries<K: Into<String>, V: Into<String>>(
        entries: impl IntoIterator<Item = (K, V)>,
    ) -> Self {
        let mut catalog = Self::default();
        for (id, label) in entries {
            catalog.insert(id, label);
        }
        catalog
    }

    /// Add an entry unless the identifier is already present.
    /// Returns whether the entry was added.
    pub fn insert(&mut self, id: impl Into<String>, label: impl Into<String>) -> bool {
        let id = id.into();
        if self.contains(&id) {
            return false;
        }
        self.entries.push(CatalogEntry {
            id,
            label: label.into(),
        });
        true
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    pub fn label(&self, id: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.id == id)
            .map(|e| e.label.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.id.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keep only the sizes enabled for `printer`. A missing or empty
    /// allow-list keeps everything.
    pub fn filter_enabled(
        mut self,
        printer: Option<&str>,
        enabled: &BTreeMap<String, Vec<String>>,
    ) -> Self {
        let allowed = printer.and_then(|p| enabled.get(p));
        if let Some(allowed) = allowed
            && !allowed.is_empty()
        {
            self.entries.retain(|e| allowed.contains(&e.id));
        }
        self
    }
}

impl Serialize for Catalog {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for entry in &self.entries {
            map.serialize_entry(&entry.id, &entry.label)?;
        }
        map.end()
    }
}

/// Merge print-server media with configured sizes for `printer`.
///
/// Server entries keep their native names and are labelled from any
/// embedded size; configured entries are added under their canonical name
/// unless that name is already taken.
pub fn build_catalog(
    printer: &str,
    sink_media: &[MediaRecord],
    configured: &LabelSizes,
    areas: &PrintableAreas,
    enabled: &BTreeMap<String, Vec<String>>,
    dpi: u32,
) -> Catalog {
    let mut catalog = Catalog::default();
    for record in sink_media {
        catalog.insert(record.name.clone(), key::describe(&record.name));
    }

    for (id, label) in configured.iter() {
        let canonical = canonical::to_canonical(id, areas, dpi);
        if !catalog.insert(canonical.clone(), label) {
            log::debug!(
                "configured size '{}' ({}) already offered by '{}'",
                id,
                canonical,
                printer
            );
        }
    }

    catalog.filter_enabled(Some(printer), enabled)
}

/// Catalog of configured sizes under their own keys, used when the
/// print server is disabled.
pub fn configured_catalog(
    printer: Option<&str>,
    configured: &LabelSizes,
    enabled: &BTreeMap<String, Vec<String>>,
) -> Catalog {
    Catalog::from_entries(configured.iter()).filter_enabled(printer, enabled)
}

// ============================================================================
// TESTS
// ============================================================================
