//! eam-ingest - artist-field parsing and normalization
//!
//! Turns the free-text artist column of the concert spreadsheet into
//! individual artists with roles, then resolves canonical names.

pub mod artist_parser;
pub mod name_mapping;
pub mod normalizer;

pub use artist_parser::{
    parse_artist_entry, ArtistParser, ArtistRole, ParsedArtist, ParsedEntry, MULTI_ARTIST_SHOW,
    PROTECTED_BANDS,
};
pub use name_mapping::NameMapping;
pub use normalizer::{normalize_file, normalize_records, ConcertArtist, NormalizationStats};
