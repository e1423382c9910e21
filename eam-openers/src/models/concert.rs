//! Normalized concert records read by the batch scanner
//!
//! Accepts the output of `eam-ingest normalize` (`original` / `canonical`
//! artist fields) as well as exports that use `artist_name`.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Concert {
    /// Concert identifier (string or number in the source data)
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: Option<String>,
    /// Concert date as YYYY-MM-DD
    #[serde(default, alias = "DATE")]
    pub date: Option<String>,
    #[serde(default)]
    pub artists: Vec<ConcertArtistRef>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ConcertArtistRef {
    #[serde(default)]
    pub artist_name: Option<String>,
    #[serde(default)]
    pub canonical: Option<String>,
    #[serde(default)]
    pub original: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

impl ConcertArtistRef {
    /// Best available display name: explicit, canonical, then original
    pub fn name(&self) -> Option<&str> {
        [&self.artist_name, &self.canonical, &self.original]
            .into_iter()
            .filter_map(|name| name.as_deref())
            .map(str::trim)
            .find(|name| !name.is_empty())
    }
}

impl Concert {
    /// Name of the only (first) artist
    pub fn headliner_name(&self) -> Option<&str> {
        self.artists.first().and_then(ConcertArtistRef::name)
    }

    /// Concert lists exactly one artist
    pub fn is_single_headliner(&self) -> bool {
        self.artists.len() == 1
    }

    /// Identifier for logs, `"?"` when missing
    pub fn display_id(&self) -> &str {
        self.id.as_deref().unwrap_or("?")
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_numeric_id_and_canonical_name() {
        let concert: Concert = serde_json::from_value(json!({
            "id": 1274,
            "date": "2025-08-09",
            "artists": [{"original": "Mumford and Sons", "canonical": "Mumford & Sons", "role": "headliner"}]
        }))
        .unwrap();

        assert_eq!(concert.id.as_deref(), Some("1274"));
        assert_eq!(concert.headliner_name(), Some("Mumford & Sons"));
        assert!(concert.is_single_headliner());
    }

    #[test]
    fn test_artist_name_field_wins() {
        let artist: ConcertArtistRef =
            serde_json::from_value(json!({"artist_name": "Kip Moore", "canonical": "Other"})).unwrap();
        assert_eq!(artist.name(), Some("Kip Moore"));
    }

    #[test]
    fn test_missing_fields() {
        let concert: Concert = serde_json::from_value(json!({})).unwrap();
        assert_eq!(concert.display_id(), "?");
        assert_eq!(concert.headliner_name(), None);
        assert!(!concert.is_single_headliner());
    }
}
