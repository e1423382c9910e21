//! Canonical name mapping
//!
//! Loads the `original_name,canonical_name` CSV that maps spellings found in
//! the spreadsheet to the canonical artist name. Lookups are exact-match.

use eam_common::Result;
use serde::Deserialize;
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct MappingRow {
    original_name: String,
    canonical_name: String,
}

/// original name → canonical name
#[derive(Debug, Clone, Default)]
pub struct NameMapping {
    entries: HashMap<String, String>,
}

impl NameMapping {
    /// Load a mapping CSV from disk
    pub fn from_csv_path(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    /// Load a mapping CSV from any reader (header row required)
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::None).from_reader(reader);
        let mut entries = HashMap::new();

        for row in csv_reader.deserialize::<MappingRow>() {
            let row = row?;
            if row.original_name.trim().is_empty() || row.canonical_name.trim().is_empty() {
                continue;
            }
            entries.insert(row.original_name, row.canonical_name);
        }

        tracing::debug!(entries = entries.len(), "Loaded artist name mapping");

        Ok(Self { entries })
    }

    /// Canonical name for `original`, if mapped
    pub fn resolve(&self, original: &str) -> Option<&str> {
        self.entries.get(original).map(String::as_str)
    }

    /// Canonical name, or `original` unchanged when unmapped
    pub fn canonical_or_original(&self, original: &str) -> String {
        self.resolve(original).unwrap_or(original).to_string()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for NameMapping {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}
