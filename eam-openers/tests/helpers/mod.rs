//! Shared fixtures for eam-openers integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::NaiveDate;
use eam_openers::models::setlist::{Setlist, SetlistPage};
use eam_openers::{SetlistError, SetlistQuery, SetlistSource};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Mutex;

/// In-memory setlist.fm stand-in
///
/// Artist searches are keyed by lowercased artist name and date; venue
/// searches by exact venue name and date. Every query is recorded.
#[derive(Default)]
pub struct FakeSource {
    by_artist: HashMap<(String, NaiveDate), Vec<Setlist>>,
    by_venue: HashMap<(String, NaiveDate), Vec<Setlist>>,
    fail: bool,
    pub queries: Mutex<Vec<SetlistQuery>>,
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Source whose every search fails with a network error
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// Register a setlist under its artist and venue for `date`
    pub fn with_setlist(mut self, date: NaiveDate, setlist: Setlist) -> Self {
        self.by_artist
            .entry((setlist.artist.name.to_lowercase(), date))
            .or_default()
            .push(setlist.clone());
        self.by_venue
            .entry((setlist.venue.name.clone(), date))
            .or_default()
            .push(setlist);
        self
    }

    pub fn recorded(&self) -> Vec<SetlistQuery> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl SetlistSource for FakeSource {
    async fn search_setlists(&self, query: &SetlistQuery) -> Result<SetlistPage, SetlistError> {
        self.queries.lock().unwrap().push(query.clone());

        if self.fail {
            return Err(SetlistError::Network("connection refused".to_string()));
        }

        let date = query.date.expect("fake searches always carry a date");
        let found = if let Some(artist) = &query.artist_name {
            self.by_artist.get(&(artist.to_lowercase(), date))
        } else if let Some(venue) = &query.venue_name {
            self.by_venue.get(&(venue.clone(), date))
        } else {
            None
        };
        let setlist = found.cloned().unwrap_or_default();

        Ok(SetlistPage {
            total: setlist.len() as u32,
            page: query.page,
            items_per_page: 20,
            setlist,
        })
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Setlist JSON with `songs` songs split into a main set and one encore
pub fn setlist_json(
    id: &str,
    artist: &str,
    venue: &str,
    songs: usize,
    tour: Option<&str>,
    guests: &[&str],
) -> Value {
    let mut song_list: Vec<Value> = (1..=songs)
        .map(|n| json!({"name": format!("{} song {}", artist, n)}))
        .collect();
    for (song, guest) in song_list.iter_mut().zip(guests) {
        song["with"] = json!({"name": guest});
    }

    let encore = if songs > 1 { song_list.split_off(songs - 1) } else { Vec::new() };

    let mut value = json!({
        "id": id,
        "url": format!("https://www.setlist.fm/setlist/{}.html", id),
        "eventDate": "09-08-2025",
        "artist": {"name": artist, "mbid": format!("mbid-{}", id)},
        "venue": {"name": venue, "city": {"name": "Queens", "stateCode": "NY"}},
        "sets": {"set": [
            {"song": song_list},
            {"encore": 1, "song": encore}
        ]}
    });
    if let Some(tour) = tour {
        value["tour"] = json!({"name": tour});
    }
    value
}

pub fn setlist(
    id: &str,
    artist: &str,
    venue: &str,
    songs: usize,
    tour: Option<&str>,
    guests: &[&str],
) -> Setlist {
    serde_json::from_value(setlist_json(id, artist, venue, songs, tour, guests)).unwrap()
}
