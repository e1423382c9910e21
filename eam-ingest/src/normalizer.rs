//! Artist normalization pass
//!
//! Parses the `ARTISTS` field of every raw concert record, resolves canonical
//! names, and writes `festival_name` plus an `artists` array back into the
//! record. All other record fields pass through untouched.

use crate::artist_parser::{ArtistParser, ArtistRole};
use crate::name_mapping::NameMapping;
use eam_common::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{info, warn};

/// Raw spreadsheet column holding the artist text
pub const ARTISTS_FIELD: &str = "ARTISTS";

/// Normalized artist attached to a concert record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConcertArtist {
    /// Name as parsed from the spreadsheet
    pub original: String,
    /// Name after mapping lookup (same as `original` when unmapped)
    pub canonical: String,
    pub role: ArtistRole,
}

/// Counters collected during a normalization pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NormalizationStats {
    /// Records processed
    pub records: usize,
    /// Artist entries found in the mapping table
    pub mapped_count: usize,
    /// Artist entries with role `opener` (one per `w/` entry)
    pub opener_count: usize,
    /// Records with a festival / multi-artist name
    pub festival_count: usize,
    /// Records with more than one artist
    pub multi_artist_count: usize,
    /// Unmapped artist name → occurrences
    pub unmapped: BTreeMap<String, usize>,
}

impl NormalizationStats {
    /// Total artist entries seen (mapped occurrences + distinct unmapped names)
    pub fn total_artist_entries(&self) -> usize {
        self.mapped_count + self.unmapped.len()
    }

    /// Most frequent unmapped names, ties broken alphabetically
    pub fn top_unmapped(&self, n: usize) -> Vec<(&str, usize)> {
        let mut ranked: Vec<(&str, usize)> =
            self.unmapped.iter().map(|(name, count)| (name.as_str(), *count)).collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ranked.truncate(n);
        ranked
    }
}

/// Parse one artist entry and resolve canonical names
pub fn normalize_entry(
    raw: &str,
    parser: &ArtistParser,
    mapping: &NameMapping,
    stats: &mut NormalizationStats,
) -> (Option<String>, Vec<ConcertArtist>) {
    let parsed = parser.parse(raw);

    let artists = parsed
        .artists
        .into_iter()
        .map(|artist| {
            let canonical = match mapping.resolve(&artist.name) {
                Some(canonical) => {
                    stats.mapped_count += 1;
                    canonical.to_string()
                }
                None => {
                    *stats.unmapped.entry(artist.name.clone()).or_insert(0) += 1;
                    artist.name.clone()
                }
            };

            if artist.role == ArtistRole::Opener {
                stats.opener_count += 1;
            }

            ConcertArtist {
                original: artist.name,
                canonical,
                role: artist.role,
            }
        })
        .collect();

    (parsed.festival_name, artists)
}

/// Normalize raw records in place
pub fn normalize_records(
    records: &mut [Value],
    parser: &ArtistParser,
    mapping: &NameMapping,
) -> Result<NormalizationStats> {
    let mut stats = NormalizationStats::default();

    for (index, record) in records.iter_mut().enumerate() {
        let Some(fields) = record.as_object_mut() else {
            warn!(index, "Skipping record that is not a JSON object");
            continue;
        };
        stats.records += 1;

        let raw = match fields.get(ARTISTS_FIELD) {
            Some(Value::String(text)) => text.clone(),
            Some(Value::Number(number)) => number.to_string(),
            _ => String::new(),
        };

        let (festival_name, artists) = normalize_entry(&raw, parser, mapping, &mut stats);

        if festival_name.is_some() {
            stats.festival_count += 1;
        }
        if artists.len() > 1 {
            stats.multi_artist_count += 1;
        }

        fields.insert("festival_name".to_string(), serde_json::to_value(festival_name)?);
        fields.insert("artists".to_string(), serde_json::to_value(artists)?);
    }

    Ok(stats)
}

/// Read raw records, normalize them, and write the result as pretty JSON
pub fn normalize_file(input: &Path, mapping_path: &Path, output: &Path) -> Result<NormalizationStats> {
    info!("Normalizing artist names from {}", input.display());

    let content = std::fs::read_to_string(input)?;
    let mut records: Vec<Value> = serde_json::from_str(&content).map_err(|e| {
        Error::InvalidInput(format!(
            "{} is not a JSON array of records: {}",
            input.display(),
            e
        ))
    })?;

    let mapping = NameMapping::from_csv_path(mapping_path)?;
    info!("Loaded {} artist mappings", mapping.len());

    let parser = ArtistParser::new();
    let stats = normalize_records(&mut records, &parser, &mapping)?;

    std::fs::write(output, serde_json::to_string_pretty(&records)?)?;

    info!(
        records = stats.records,
        artist_entries = stats.total_artist_entries(),
        mapped = stats.mapped_count,
        openers = stats.opener_count,
        festivals = stats.festival_count,
        multi_artist = stats.multi_artist_count,
        unmapped = stats.unmapped.len(),
        "Normalization complete"
    );
    info!("Saved normalized data to {}", output.display());

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn mapping() -> NameMapping {
        [("Tom Petty & The Heartbreakers", "Tom Petty & the Heartbreakers")]
            .into_iter()
            .collect()
    }

    #[test]
    fn test_normalize_entry_opener() {
        let mut stats = NormalizationStats::default();
        let (festival, artists) = normalize_entry(
            "Tom Petty & The Heartbreakers w/ Joe Walsh",
            &ArtistParser::new(),
            &mapping(),
            &mut stats,
        );

        assert_eq!(festival, None);
        assert_eq!(
            artists,
            vec![
                ConcertArtist {
                    original: "Tom Petty & The Heartbreakers".to_string(),
                    canonical: "Tom Petty & the Heartbreakers".to_string(),
                    role: ArtistRole::Headliner,
                },
                ConcertArtist {
                    original: "Joe Walsh".to_string(),
                    canonical: "Joe Walsh".to_string(),
                    role: ArtistRole::Opener,
                },
            ]
        );
        assert_eq!(stats.mapped_count, 1);
        assert_eq!(stats.opener_count, 1);
        assert_eq!(stats.unmapped.get("Joe Walsh"), Some(&1));
    }

    #[test]
    fn test_opener_count_counts_opener_entries() {
        let mut records = vec![
            json!({"ARTISTS": "Foreigner w/ Kansas"}),
            json!({"ARTISTS": "Billy Joel"}),
            json!({"ARTISTS": "Heart w/ Joan Jett"}),
        ];

        let stats = normalize_records(&mut records, &ArtistParser::new(), &NameMapping::default()).unwrap();

        assert_eq!(stats.opener_count, 2);
        assert_eq!(records[2]["artists"][1]["role"], "opener");
    }

    #[test]
    fn test_normalize_records_preserves_other_fields() {
        let mut records = vec![
            json!({"DATE": "2019-05-09", "ARTISTS": "Kip Moore", "VENUE": "Ridgefield Playhouse"}),
            json!({"DATE": "2019-07-04", "ARTISTS": "Outlaw Festival: Bob Dylan and Willie Nelson"}),
            json!({"DATE": "2020-01-01", "ARTISTS": null}),
            json!("not a record"),
        ];

        let stats = normalize_records(&mut records, &ArtistParser::new(), &NameMapping::default()).unwrap();

        assert_eq!(stats.records, 3);
        assert_eq!(stats.festival_count, 1);
        assert_eq!(stats.multi_artist_count, 1);

        assert_eq!(records[0]["VENUE"], "Ridgefield Playhouse");
        assert_eq!(records[0]["festival_name"], Value::Null);
        assert_eq!(records[0]["artists"][0]["role"], "headliner");

        assert_eq!(records[1]["festival_name"], "Outlaw Festival");
        assert_eq!(records[1]["artists"][1]["canonical"], "Willie Nelson");
        assert_eq!(records[1]["artists"][1]["role"], "festival_performer");

        assert_eq!(records[2]["artists"], json!([]));
        assert_eq!(records[3], json!("not a record"));
    }

    #[test]
    fn test_top_unmapped_ordering() {
        let mut stats = NormalizationStats::default();
        stats.unmapped.insert("B".to_string(), 2);
        stats.unmapped.insert("A".to_string(), 2);
        stats.unmapped.insert("C".to_string(), 5);

        assert_eq!(stats.top_unmapped(2), vec![("C", 5), ("A", 2)]);
    }
}
