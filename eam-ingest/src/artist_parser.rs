//! Artist-field parser
//!
//! Classifies a free-text artist entry from the concert spreadsheet as a
//! single act, opener notation (`"A w/ B"`), or a festival / multi-artist
//! lineup, and splits lineups into individual artists with roles.
//!
//! **Rule order** (first rule that applies wins):
//! 1. Opener notation: `"Headliner w/ Opener"`
//! 2. Colon festival: `"Outlaw Festival: Bob Dylan and Willie Nelson"`
//! 3. Two or more commas: `"A, B, C"` or `"Some Benefit (A, B, C)"`
//! 4. Ampersand: `"Elton John & Billy Joel"`
//! 5. "and": `"Bob Dylan and Mavis Staples"`
//! 6. Fallback: the whole entry is one headliner
//!
//! Later rules are looser than earlier ones, so the order matters. The parser
//! never fails; anything it cannot explain comes back as a single headliner.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Acts whose names look like lists (`&`, `,`, `and`) but are one act
pub const PROTECTED_BANDS: &[&str] = &[
    "Bruce Springsteen & the E Street Band",
    "Bruce Springsteen & E Street Band",
    "Tom Petty & the Heartbreakers",
    "Tom Petty & The Heartbreakers",
    "Hootie & the Blowfish",
    "Crosby, Stills and Nash",
    "Crosby Stills and Nash",
    "Emerson, Lake and Palmer",
    "Earth, Wind and Fire",
    "Blood, Sweat and Tears",
    "Peter, Paul and Mary",
    "Crosby and Nash",
    "Simon and Garfunkel",
    "Hall and Oates",
    "Hall & Oates",
    "Ringo Starr & His All-Starr Band",
    "Ringo Starr & His All Sarr Band",
    "Bob Seger & Silver Bullet Band",
    "Bob Seger & the Silver Bullet Band",
    "Bob Weir & Ratdog",
];

/// Festival name used when a lineup has no explicit event name
pub const MULTI_ARTIST_SHOW: &str = "Multi-Artist Show";

/// Keywords marking the text before a colon as an event name
const FESTIVAL_KEYWORDS: &[&str] = &["Festival", "Concert", "Benefit", "Relief", "Upfront", "Earth"];

/// Keywords marking `"Event (A, B, C)"` as an event with a lineup
const EVENT_KEYWORDS: &[&str] = &["Concert", "Benefit", "Light of Day"];

/// Shorter fragments are split noise, not artist names
const MIN_NAME_CHARS: usize = 2;

static OPENER_SEPARATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+w/\s*").expect("opener separator regex is valid"));
static AND_SEPARATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\s+and\s+").expect("and separator regex is valid"));
static LEADING_WITH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^with\s+").expect("leading-with regex is valid"));
static PARENTHETICAL_LIST: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([^(]+)\s*\((.+)\)$").expect("parenthetical regex is valid"));

static DEFAULT_PARSER: Lazy<ArtistParser> = Lazy::new(ArtistParser::new);

/// Role of an artist at a concert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtistRole {
    /// Primary billed performer
    Headliner,
    /// Supporting act before the headliner
    Opener,
    /// One of several acts at a festival or multi-artist show
    FestivalPerformer,
}

impl ArtistRole {
    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            ArtistRole::Headliner => "headliner",
            ArtistRole::Opener => "opener",
            ArtistRole::FestivalPerformer => "festival_performer",
        }
    }
}

impl fmt::Display for ArtistRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One artist extracted from an entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedArtist {
    pub name: String,
    pub role: ArtistRole,
}

impl ParsedArtist {
    pub fn new(name: impl Into<String>, role: ArtistRole) -> Self {
        Self {
            name: name.into(),
            role,
        }
    }
}

/// Parser output: optional festival name plus the artists it contains
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedEntry {
    /// Event name for festivals, `"Multi-Artist Show"` for unnamed lineups
    pub festival_name: Option<String>,
    pub artists: Vec<ParsedArtist>,
}

impl ParsedEntry {
    /// No artists (blank or missing spreadsheet cell)
    pub fn empty() -> Self {
        Self::default()
    }

    fn single(name: &str) -> Self {
        Self {
            festival_name: None,
            artists: vec![ParsedArtist::new(name, ArtistRole::Headliner)],
        }
    }

    fn lineup(festival_name: impl Into<String>, names: Vec<String>) -> Self {
        Self {
            festival_name: Some(festival_name.into()),
            artists: names
                .into_iter()
                .map(|name| ParsedArtist::new(name, ArtistRole::FestivalPerformer))
                .collect(),
        }
    }

    /// True when a festival or multi-artist rule fired
    pub fn is_lineup(&self) -> bool {
        self.festival_name.is_some()
    }

    /// Artist names in entry order
    pub fn names(&self) -> Vec<&str> {
        self.artists.iter().map(|a| a.name.as_str()).collect()
    }
}

/// Artist-field parser holding the protected-band allow-list
#[derive(Debug, Clone)]
pub struct ArtistParser {
    /// Lowercased, whitespace-collapsed band names, in list order
    protected: Vec<String>,
}

impl Default for ArtistParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ArtistParser {
    /// Parser using [`PROTECTED_BANDS`]
    pub fn new() -> Self {
        Self::with_protected_bands(PROTECTED_BANDS.iter().copied())
    }

    /// Parser with a custom protected-band list
    pub fn with_protected_bands<I, S>(bands: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            protected: bands
                .into_iter()
                .map(|band| collapse_whitespace(band.as_ref()).to_lowercase())
                .filter(|band| !band.is_empty())
                .collect(),
        }
    }

    /// Check whether `text` is a protected band
    ///
    /// Matches exactly, or as a prefix followed by a space or `(` so that
    /// annotations like `"Tom Petty & the Heartbreakers (Encore)"` still count.
    pub fn is_protected_band(&self, text: &str) -> bool {
        let text = collapse_whitespace(text).to_lowercase();

        self.protected.iter().any(|band| {
            text == *band
                || text
                    .strip_prefix(band.as_str())
                    .is_some_and(|rest| rest.starts_with(' ') || rest.starts_with('('))
        })
    }

    /// Exact (case- and whitespace-insensitive) match against the list
    fn is_exact_protected_band(&self, text: &str) -> bool {
        let text = collapse_whitespace(text).to_lowercase();
        self.protected.iter().any(|band| text == *band)
    }

    /// Parse a raw artist entry
    pub fn parse(&self, raw: &str) -> ParsedEntry {
        let text = raw.trim();
        if text.is_empty() || text == "nan" {
            return ParsedEntry::empty();
        }

        self.parse_opener_notation(text)
            .or_else(|| self.parse_colon_festival(text))
            .or_else(|| self.parse_comma_list(text))
            .or_else(|| self.parse_ampersand_list(text))
            .or_else(|| self.parse_and_list(text))
            .unwrap_or_else(|| ParsedEntry::single(text))
    }

    /// Rule 1: `"Headliner w/ Opener"`, split on the first `w/` only
    fn parse_opener_notation(&self, text: &str) -> Option<ParsedEntry> {
        if !text.contains(" w/") {
            return None;
        }

        let mut parts = OPENER_SEPARATOR.splitn(text, 2);
        let headliner = collapse_whitespace(parts.next()?);
        let opener = collapse_whitespace(parts.next()?);

        let artists: Vec<ParsedArtist> = [(headliner, ArtistRole::Headliner), (opener, ArtistRole::Opener)]
            .into_iter()
            .filter(|(name, _)| is_retainable(name))
            .map(|(name, role)| ParsedArtist::new(name, role))
            .collect();

        // Opener notation short-circuits the later rules even when both
        // sides are too short to keep
        if artists.is_empty() {
            return Some(ParsedEntry::single(text));
        }

        Some(ParsedEntry {
            festival_name: None,
            artists,
        })
    }

    /// Rule 2: `"Event Name: A, B and C"` where the event name has a keyword
    fn parse_colon_festival(&self, text: &str) -> Option<ParsedEntry> {
        let (event, lineup) = text.split_once(':')?;

        if !FESTIVAL_KEYWORDS.iter().any(|keyword| event.contains(keyword)) {
            return None;
        }

        Some(ParsedEntry::lineup(
            collapse_whitespace(event),
            parse_artist_list(lineup),
        ))
    }

    /// Rule 3: entries with two or more commas
    fn parse_comma_list(&self, text: &str) -> Option<ParsedEntry> {
        if text.matches(',').count() < 2 {
            return None;
        }

        if self.is_protected_band(text) {
            return Some(ParsedEntry::single(text));
        }

        if let Some(caps) = PARENTHETICAL_LIST.captures(text) {
            let event = caps.get(1).map_or("", |m| m.as_str()).trim();
            let lineup = caps.get(2).map_or("", |m| m.as_str()).trim();

            if EVENT_KEYWORDS.iter().any(|keyword| event.contains(keyword)) {
                return Some(ParsedEntry::lineup(
                    collapse_whitespace(event),
                    parse_artist_list(lineup),
                ));
            }
        }

        let artists = parse_artist_list(text);
        if artists.len() >= 3 {
            return Some(ParsedEntry::lineup(MULTI_ARTIST_SHOW, artists));
        }

        None
    }

    /// Rule 4: `"A & B"`, keeping protected `&` bands together
    fn parse_ampersand_list(&self, text: &str) -> Option<ParsedEntry> {
        if !text.contains(" & ") {
            return None;
        }

        if self.is_protected_band(text) {
            return Some(ParsedEntry::single(text));
        }

        let artists = self.merge_protected_fragments(text.split(" & "));
        if artists.len() > 1 {
            return Some(ParsedEntry::lineup(MULTI_ARTIST_SHOW, artists));
        }

        None
    }

    /// Rule 5: `"A and B"` (case-insensitive)
    ///
    /// Entries that also contain `" with "` are left unparsed.
    fn parse_and_list(&self, text: &str) -> Option<ParsedEntry> {
        let lower = text.to_lowercase();
        if !lower.contains(" and ") {
            return None;
        }

        if self.is_protected_band(text) || lower.contains(" with ") {
            return Some(ParsedEntry::single(text));
        }

        let artists: Vec<String> = AND_SEPARATOR
            .split(text)
            .map(collapse_whitespace)
            .filter(|name| is_retainable(name))
            .collect();

        if artists.len() >= 2 {
            return Some(ParsedEntry::lineup(MULTI_ARTIST_SHOW, artists));
        }

        None
    }

    /// Re-join adjacent fragments whose `" & "` concatenation is protected
    ///
    /// `"Elton John & Hall & Oates"` → `["Elton John", "Hall & Oates"]`
    fn merge_protected_fragments<'a>(&self, fragments: impl Iterator<Item = &'a str>) -> Vec<String> {
        let mut merged: Vec<String> = Vec::new();

        for fragment in fragments {
            let fragment = collapse_whitespace(fragment);

            if let Some(last) = merged.last_mut() {
                let combined = format!("{} & {}", last, fragment);
                if self.is_exact_protected_band(&combined) {
                    *last = combined;
                    continue;
                }
            }

            merged.push(fragment);
        }

        merged.retain(|name| is_retainable(name));
        merged
    }
}

/// Parse with the default protected-band list
pub fn parse_artist_entry(raw: &str) -> ParsedEntry {
    DEFAULT_PARSER.parse(raw)
}

/// Split a comma / "and" separated lineup into names
fn parse_artist_list(list: &str) -> Vec<String> {
    let list = LEADING_WITH.replace(list.trim(), "");
    let list = AND_SEPARATOR.replace_all(&list, ",");

    list.split(',')
        .map(collapse_whitespace)
        .filter(|name| is_retainable(name))
        .collect()
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn is_retainable(name: &str) -> bool {
    name.chars().count() >= MIN_NAME_CHARS
}
