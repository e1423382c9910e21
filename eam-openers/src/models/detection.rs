//! Opener detection results

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Reporting band for a confidence score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ConfidenceLabel {
    /// Below 50; never surfaced by the detector
    Low,
    /// 50-79, review recommended
    Medium,
    /// 80 and above
    High,
}

impl ConfidenceLabel {
    pub fn from_score(confidence: u8) -> Self {
        if confidence >= 80 {
            ConfidenceLabel::High
        } else if confidence >= 50 {
            ConfidenceLabel::Medium
        } else {
            ConfidenceLabel::Low
        }
    }

    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfidenceLabel::High => "HIGH",
            ConfidenceLabel::Medium => "MEDIUM",
            ConfidenceLabel::Low => "LOW",
        }
    }
}

impl fmt::Display for ConfidenceLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Signal that contributed points to a confidence score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "signal", rename_all = "snake_case")]
pub enum Evidence {
    /// Played fewer songs than the presumed headliner
    FewerSongs {
        song_count: usize,
        headliner_song_count: usize,
    },
    /// Credited as a guest in the headliner's setlist
    GuestAppearance { guest_name: String },
    /// Set shorter than half the headliner's
    ShortSet { ratio: f64 },
    /// No tour name on the setlist
    NoTourName,
}

impl Evidence {
    /// Points this signal adds to the score
    pub fn points(&self) -> u8 {
        match self {
            Evidence::FewerSongs { .. } => 30,
            Evidence::GuestAppearance { .. } => 50,
            Evidence::ShortSet { .. } => 15,
            Evidence::NoTourName => 5,
        }
    }
}

/// Candidate opener that passed the reporting threshold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedOpener {
    pub artist_name: String,
    pub artist_mbid: Option<String>,
    pub song_count: usize,
    pub tour_name: Option<String>,
    /// 0-100
    pub confidence: u8,
    pub confidence_label: ConfidenceLabel,
    pub evidence: Vec<Evidence>,
    pub setlist_id: String,
    pub setlist_url: Option<String>,
}

/// Presumed headliner (most songs at the venue/date)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadlinerSummary {
    pub name: String,
    pub song_count: usize,
}

/// Detection outcome for one concert
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionResult {
    pub concert_id: Option<String>,
    pub concert_date: NaiveDate,
    /// Venue name exactly as setlist.fm spells it
    pub venue: String,
    pub headliner: HeadlinerSummary,
    pub detected_openers: Vec<DetectedOpener>,
    /// Lowercased guest names from the headliner's setlist
    pub guest_artists: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_bands() {
        assert_eq!(ConfidenceLabel::from_score(100), ConfidenceLabel::High);
        assert_eq!(ConfidenceLabel::from_score(80), ConfidenceLabel::High);
        assert_eq!(ConfidenceLabel::from_score(79), ConfidenceLabel::Medium);
        assert_eq!(ConfidenceLabel::from_score(50), ConfidenceLabel::Medium);
        assert_eq!(ConfidenceLabel::from_score(49), ConfidenceLabel::Low);
    }

    #[test]
    fn test_evidence_serialization() {
        let value = serde_json::to_value(Evidence::GuestAppearance {
            guest_name: "lucius".to_string(),
        })
        .unwrap();
        assert_eq!(value["signal"], "guest_appearance");
        assert_eq!(value["guest_name"], "lucius");

        let value = serde_json::to_value(ConfidenceLabel::Medium).unwrap();
        assert_eq!(value, "MEDIUM");
    }
}
