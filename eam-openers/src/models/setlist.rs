//! setlist.fm response types
//!
//! Only the fields the detector and song listing read are modelled. Every
//! field is optional or defaulted; community-edited setlists routinely leave
//! out tours, cities, and song names.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// `GET /search/setlists` response page
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SetlistPage {
    #[serde(default)]
    pub setlist: Vec<Setlist>,
    /// Total matches across all pages
    #[serde(default)]
    pub total: u32,
    #[serde(default)]
    pub page: u32,
    #[serde(rename = "itemsPerPage", default)]
    pub items_per_page: u32,
}

/// One performer's setlist at one event
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Setlist {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub url: Option<String>,
    /// Event date in dd-MM-yyyy format
    #[serde(rename = "eventDate", default)]
    pub event_date: Option<String>,
    #[serde(default)]
    pub artist: SetlistArtist,
    #[serde(default)]
    pub venue: Venue,
    #[serde(default)]
    pub tour: Option<Tour>,
    #[serde(default)]
    pub sets: Sets,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SetlistArtist {
    #[serde(default)]
    pub name: String,
    /// MusicBrainz artist ID
    #[serde(default)]
    pub mbid: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Venue {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub city: Option<City>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct City {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "stateCode", default)]
    pub state_code: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Tour {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Sets {
    #[serde(default)]
    pub set: Vec<SetSection>,
}

/// Main set or encore
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SetSection {
    #[serde(default)]
    pub name: Option<String>,
    /// Encore number (0 or absent for the main set)
    #[serde(default)]
    pub encore: u32,
    #[serde(default)]
    pub song: Vec<Song>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Song {
    #[serde(default)]
    pub name: String,
    /// Guest performer on this song
    #[serde(rename = "with", default)]
    pub guest: Option<SongArtist>,
    /// Original artist when the song is a cover
    #[serde(default)]
    pub cover: Option<SongArtist>,
    /// Played from tape rather than live
    #[serde(default)]
    pub tape: bool,
    #[serde(default)]
    pub info: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SongArtist {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub mbid: Option<String>,
}

impl Setlist {
    /// Songs across all sets, encores included
    pub fn song_count(&self) -> usize {
        self.sets.set.iter().map(|s| s.song.len()).sum()
    }

    /// Tour name, if present and non-blank
    pub fn tour_name(&self) -> Option<&str> {
        self.tour
            .as_ref()
            .and_then(|t| t.name.as_deref())
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }

    /// Lowercased names of guests credited on any song
    pub fn guest_names(&self) -> BTreeSet<String> {
        self.sets
            .set
            .iter()
            .flat_map(|s| s.song.iter())
            .filter_map(|song| song.guest.as_ref()?.name.as_deref())
            .map(|name| name.trim().to_lowercase())
            .filter(|name| !name.is_empty())
            .collect()
    }
}

/// Performer at a venue/date, held only for one detection run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Performer {
    pub artist_name: String,
    pub artist_mbid: Option<String>,
    pub song_count: usize,
    pub tour_name: Option<String>,
    pub setlist_id: String,
    pub setlist_url: Option<String>,
}

impl From<&Setlist> for Performer {
    fn from(setlist: &Setlist) -> Self {
        Self {
            artist_name: setlist.artist.name.clone(),
            artist_mbid: setlist.artist.mbid.clone(),
            song_count: setlist.song_count(),
            tour_name: setlist.tour_name().map(str::to_string),
            setlist_id: setlist.id.clone(),
            setlist_url: setlist.url.clone(),
        }
    }
}

/// Flattened song entry for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SongEntry {
    /// 1-based position across the whole show
    pub position: usize,
    pub name: String,
    pub set_name: String,
    pub encore: u32,
    pub cover: Option<String>,
    pub tape: bool,
    pub info: Option<String>,
}

/// List songs in play order, numbering continuously across sets
pub fn extract_songs(setlist: &Setlist) -> Vec<SongEntry> {
    setlist
        .sets
        .set
        .iter()
        .flat_map(|section| section.song.iter().map(move |song| (section, song)))
        .enumerate()
        .map(|(index, (section, song))| SongEntry {
            position: index + 1,
            name: if song.name.trim().is_empty() {
                "Unknown".to_string()
            } else {
                song.name.clone()
            },
            set_name: section.name.clone().unwrap_or_else(|| "Main Set".to_string()),
            encore: section.encore,
            cover: song.cover.as_ref().and_then(|c| c.name.clone()),
            tape: song.tape,
            info: song.info.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Setlist {
        serde_json::from_value(json!({
            "id": "63d6e2b3",
            "url": "https://www.setlist.fm/setlist/mumford-and-sons/2025/forest-hills-stadium-63d6e2b3.html",
            "eventDate": "09-08-2025",
            "artist": {"mbid": "c44e9c22-ef82-4a77-9bcd-af6c958446d6", "name": "Mumford & Sons"},
            "venue": {"name": "Forest Hills Stadium", "city": {"name": "Queens", "stateCode": "NY"}},
            "tour": {"name": "Rushmere Tour"},
            "sets": {"set": [
                {"song": [
                    {"name": "Babel"},
                    {"name": "Little Lion Man", "with": {"name": "Lucius"}},
                    {"name": "", "tape": true}
                ]},
                {"encore": 1, "name": "Encore", "song": [
                    {"name": "The Boxer", "cover": {"name": "Simon & Garfunkel"}, "with": {"name": "LUCIUS"}, "info": "acoustic"}
                ]}
            ]}
        }))
        .unwrap()
    }

    #[test]
    fn test_song_count_includes_encores() {
        assert_eq!(sample().song_count(), 4);
    }

    #[test]
    fn test_guest_names_lowercased_and_deduplicated() {
        let guests = sample().guest_names();
        assert_eq!(guests.into_iter().collect::<Vec<_>>(), vec!["lucius".to_string()]);
    }

    #[test]
    fn test_lenient_deserialization() {
        let setlist: Setlist = serde_json::from_value(json!({"artist": {"name": "Lucius"}})).unwrap();
        assert_eq!(setlist.song_count(), 0);
        assert_eq!(setlist.tour_name(), None);
        assert_eq!(setlist.venue.name, "");
    }

    #[test]
    fn test_blank_tour_name_is_none() {
        let setlist: Setlist = serde_json::from_value(json!({"tour": {"name": "  "}})).unwrap();
        assert_eq!(setlist.tour_name(), None);
    }

    #[test]
    fn test_performer_from_setlist() {
        let performer = Performer::from(&sample());
        assert_eq!(performer.artist_name, "Mumford & Sons");
        assert_eq!(performer.song_count, 4);
        assert_eq!(performer.tour_name.as_deref(), Some("Rushmere Tour"));
        assert_eq!(performer.setlist_id, "63d6e2b3");
    }

    #[test]
    fn test_extract_songs() {
        let songs = extract_songs(&sample());
        assert_eq!(songs.len(), 4);
        assert_eq!(songs[0].position, 1);
        assert_eq!(songs[0].set_name, "Main Set");
        assert_eq!(songs[2].name, "Unknown");
        assert!(songs[2].tape);
        assert_eq!(songs[3].position, 4);
        assert_eq!(songs[3].set_name, "Encore");
        assert_eq!(songs[3].encore, 1);
        assert_eq!(songs[3].cover.as_deref(), Some("Simon & Garfunkel"));
        assert_eq!(songs[3].info.as_deref(), Some("acoustic"));
    }
}
