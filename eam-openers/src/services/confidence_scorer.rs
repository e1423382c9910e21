//! Opener confidence scoring
//!
//! Additive score for a candidate that shared a venue and date with the
//! presumed headliner:
//!
//! | Signal | Points |
//! |--------|--------|
//! | Fewer songs than the headliner (required) | 30 |
//! | Credited as a guest in the headliner's setlist | 50 |
//! | Set under half the headliner's length | 15 |
//! | No tour name | 5 |
//!
//! Capped at 100; only scores of 50 and above are reported.

use crate::models::detection::{ConfidenceLabel, Evidence};
use crate::models::setlist::Performer;
use std::collections::BTreeSet;

/// Scored candidate
#[derive(Debug, Clone, PartialEq)]
pub struct OpenerScore {
    /// 0-100
    pub confidence: u8,
    pub label: ConfidenceLabel,
    pub evidence: Vec<Evidence>,
}

/// Opener confidence scorer
pub struct OpenerScorer {
    /// Cap on the summed score (default 100)
    max_confidence: u8,

    /// Minimum reported score (default 50)
    report_threshold: u8,

    /// Song-count ratio below which a set counts as short (default 0.5)
    short_set_ratio: f64,
}

impl OpenerScorer {
    pub fn new() -> Self {
        Self {
            max_confidence: 100,
            report_threshold: 50,
            short_set_ratio: 0.5,
        }
    }

    /// Score one candidate against the headliner
    ///
    /// Returns `None` when the candidate played at least as many songs as the
    /// headliner; such a performer is not treated as an opener at all.
    pub fn score(
        &self,
        candidate: &Performer,
        headliner_song_count: usize,
        guest_names: &BTreeSet<String>,
    ) -> Option<OpenerScore> {
        if candidate.song_count >= headliner_song_count {
            return None;
        }

        let mut evidence = vec![Evidence::FewerSongs {
            song_count: candidate.song_count,
            headliner_song_count,
        }];

        if let Some(guest) = matching_guest(&candidate.artist_name, guest_names) {
            evidence.push(Evidence::GuestAppearance {
                guest_name: guest.to_string(),
            });
        }

        // headliner_song_count > candidate.song_count >= 0, so never zero here
        let ratio = candidate.song_count as f64 / headliner_song_count as f64;
        if ratio < self.short_set_ratio {
            evidence.push(Evidence::ShortSet { ratio });
        }

        if candidate.tour_name.is_none() {
            evidence.push(Evidence::NoTourName);
        }

        let total: u32 = evidence.iter().map(|e| u32::from(e.points())).sum();
        let confidence = total.min(u32::from(self.max_confidence)) as u8;

        Some(OpenerScore {
            confidence,
            label: ConfidenceLabel::from_score(confidence),
            evidence,
        })
    }

    /// Score clears the reporting threshold
    pub fn is_reportable(&self, confidence: u8) -> bool {
        confidence >= self.report_threshold
    }
}

impl Default for OpenerScorer {
    fn default() -> Self {
        Self::new()
    }
}

/// First guest whose name contains, or is contained in, the candidate's name
fn matching_guest<'a>(artist_name: &str, guest_names: &'a BTreeSet<String>) -> Option<&'a str> {
    let name = artist_name.trim().to_lowercase();
    if name.is_empty() {
        return None;
    }

    guest_names
        .iter()
        .map(String::as_str)
        .find(|guest| !guest.is_empty() && (guest.contains(&name) || name.contains(guest)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn performer(name: &str, songs: usize, tour: Option<&str>) -> Performer {
        Performer {
            artist_name: name.to_string(),
            artist_mbid: None,
            song_count: songs,
            tour_name: tour.map(str::to_string),
            setlist_id: "id".to_string(),
            setlist_url: None,
        }
    }

    fn guests(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_all_signals_capped_at_100() {
        let scorer = OpenerScorer::new();
        let score = scorer
            .score(&performer("Lucius", 8, None), 20, &guests(&["lucius"]))
            .unwrap();

        // 30 + 50 + 15 + 5
        assert_eq!(score.confidence, 100);
        assert_eq!(score.label, ConfidenceLabel::High);
        assert_eq!(score.evidence.len(), 4);
    }

    #[test]
    fn test_equal_song_count_is_not_a_candidate() {
        let scorer = OpenerScorer::new();
        assert!(scorer.score(&performer("Other", 20, None), 20, &guests(&[])).is_none());
        assert!(scorer.score(&performer("Other", 25, None), 20, &guests(&[])).is_none());
    }

    #[test]
    fn test_short_set_without_guest() {
        let scorer = OpenerScorer::new();
        let score = scorer.score(&performer("Kip Moore", 9, None), 20, &guests(&[])).unwrap();
        assert_eq!(score.confidence, 50);
        assert_eq!(score.label, ConfidenceLabel::Medium);
        assert!(scorer.is_reportable(score.confidence));
    }

    #[test]
    fn test_below_threshold() {
        let scorer = OpenerScorer::new();

        let score = scorer
            .score(&performer("Opener", 15, Some("Tour")), 20, &guests(&[]))
            .unwrap();
        assert_eq!(score.confidence, 30);
        assert_eq!(score.label, ConfidenceLabel::Low);
        assert!(!scorer.is_reportable(score.confidence));

        let score = scorer.score(&performer("Opener", 15, None), 20, &guests(&[])).unwrap();
        assert_eq!(score.confidence, 35);
        assert!(!scorer.is_reportable(score.confidence));
    }

    #[test]
    fn test_guest_match_either_direction() {
        let scorer = OpenerScorer::new();
        let headliner = 20;

        let score = scorer
            .score(&performer("The Lumineers", 15, Some("T")), headliner, &guests(&["lumineers"]))
            .unwrap();
        assert_eq!(score.confidence, 80);

        let score = scorer
            .score(&performer("Lucius", 15, Some("T")), headliner, &guests(&["lucius & friends"]))
            .unwrap();
        assert_eq!(score.confidence, 80);
    }

    #[test]
    fn test_blank_name_never_matches_guest() {
        assert_eq!(matching_guest("  ", &guests(&["lucius"])), None);
    }

    #[test]
    fn test_monotonic_in_song_ratio() {
        let scorer = OpenerScorer::new();
        let none = guests(&[]);
        let mut previous = u8::MAX;

        for songs in 0..20 {
            let score = scorer.score(&performer("Opener", songs, None), 20, &none).unwrap();
            assert!(score.confidence <= previous);
            previous = score.confidence;
        }
    }
}
