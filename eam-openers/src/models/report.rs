//! Batch scan report (JSON and plain text)

use super::detection::{ConfidenceLabel, DetectedOpener, DetectionResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::path::Path;

/// Per-concert outcome counts for a scan
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanTally {
    /// Concerts with at least one reportable opener
    pub found: usize,
    /// Concerts scanned without a reportable opener
    pub not_found: usize,
    /// Concerts aborted by a bad date or an API error
    pub errors: usize,
}

impl ScanTally {
    pub fn total(&self) -> usize {
        self.found + self.not_found + self.errors
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanReport {
    pub scan_date: DateTime<Utc>,
    pub total_concerts_scanned: usize,
    #[serde(default)]
    pub tally: ScanTally,
    pub results: Vec<DetectionResult>,
}

impl ScanReport {
    pub fn new(tally: ScanTally, results: Vec<DetectionResult>) -> Self {
        Self {
            scan_date: Utc::now(),
            total_concerts_scanned: tally.total(),
            tally,
            results,
        }
    }

    /// Number of detected openers carrying `label`
    pub fn count_label(&self, label: ConfidenceLabel) -> usize {
        self.openers()
            .filter(|(_, opener)| opener.confidence_label == label)
            .count()
    }

    fn openers(&self) -> impl Iterator<Item = (&DetectionResult, &DetectedOpener)> {
        self.results
            .iter()
            .flat_map(|result| result.detected_openers.iter().map(move |o| (result, o)))
    }

    /// Write pretty-printed JSON, creating parent directories
    pub fn write_json(&self, path: &Path) -> eam_common::Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Human-readable summary with HIGH and MEDIUM detail sections
    pub fn render_text(&self) -> String {
        let rule = "=".repeat(80);
        let mut out = String::new();

        let _ = writeln!(out, "{}", rule);
        let _ = writeln!(out, "MISSING OPENER DETECTION REPORT");
        let _ = writeln!(out, "{}", rule);
        let _ = writeln!(out, "Scan date: {}", self.scan_date.format("%Y-%m-%d %H:%M:%S UTC"));
        let _ = writeln!(out, "Concerts scanned: {}", self.total_concerts_scanned);
        let _ = writeln!(
            out,
            "Concerts with openers: {} (not found: {}, errors: {})",
            self.tally.found, self.tally.not_found, self.tally.errors
        );
        let _ = writeln!(out);
        let _ = writeln!(out, "Confidence breakdown:");
        for label in [ConfidenceLabel::High, ConfidenceLabel::Medium, ConfidenceLabel::Low] {
            let _ = writeln!(out, "  {:<7} {}", label.as_str(), self.count_label(label));
        }

        for (label, title) in [
            (ConfidenceLabel::High, "HIGH CONFIDENCE"),
            (ConfidenceLabel::Medium, "MEDIUM CONFIDENCE (review recommended)"),
        ] {
            let _ = writeln!(out);
            let _ = writeln!(out, "{}", title);
            let _ = writeln!(out, "{}", "-".repeat(80));

            let mut any = false;
            for (result, opener) in self.openers().filter(|(_, o)| o.confidence_label == label) {
                any = true;
                let _ = writeln!(
                    out,
                    "Concert {} ({}) - {} @ {}",
                    result.concert_id.as_deref().unwrap_or("?"),
                    result.concert_date,
                    result.headliner.name,
                    result.venue
                );
                let _ = writeln!(
                    out,
                    "  Opener: {} ({} songs vs {})",
                    opener.artist_name, opener.song_count, result.headliner.song_count
                );
                let _ = writeln!(out, "  Confidence: {}%", opener.confidence);
                if let Some(url) = &opener.setlist_url {
                    let _ = writeln!(out, "  Setlist: {}", url);
                }
            }
            if !any {
                let _ = writeln!(out, "  (none)");
            }
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::detection::{Evidence, HeadlinerSummary};
    use chrono::NaiveDate;

    fn opener(name: &str, confidence: u8) -> DetectedOpener {
        DetectedOpener {
            artist_name: name.to_string(),
            artist_mbid: None,
            song_count: 8,
            tour_name: None,
            confidence,
            confidence_label: ConfidenceLabel::from_score(confidence),
            evidence: vec![Evidence::NoTourName],
            setlist_id: format!("{}-id", name),
            setlist_url: Some(format!("https://www.setlist.fm/{}", name)),
        }
    }

    fn report() -> ScanReport {
        let result = DetectionResult {
            concert_id: Some("42".to_string()),
            concert_date: NaiveDate::from_ymd_opt(2025, 8, 9).unwrap(),
            venue: "Forest Hills Stadium".to_string(),
            headliner: HeadlinerSummary {
                name: "Mumford & Sons".to_string(),
                song_count: 20,
            },
            detected_openers: vec![opener("Lucius", 100), opener("Kip Moore", 50)],
            guest_artists: vec!["lucius".to_string()],
        };
        ScanReport::new(
            ScanTally {
                found: 1,
                not_found: 2,
                errors: 1,
            },
            vec![result],
        )
    }

    #[test]
    fn test_totals_and_counts() {
        let report = report();
        assert_eq!(report.total_concerts_scanned, 4);
        assert_eq!(report.count_label(ConfidenceLabel::High), 1);
        assert_eq!(report.count_label(ConfidenceLabel::Medium), 1);
        assert_eq!(report.count_label(ConfidenceLabel::Low), 0);
    }

    #[test]
    fn test_render_text_sections() {
        let text = report().render_text();
        assert!(text.contains("Concerts scanned: 4"));
        assert!(text.contains("HIGH CONFIDENCE"));
        assert!(text.contains("Opener: Lucius (8 songs vs 20)"));
        assert!(text.contains("Confidence: 100%"));

        let high = text.find("HIGH CONFIDENCE\n").unwrap();
        let medium = text.find("MEDIUM CONFIDENCE").unwrap();
        let kip = text.find("Opener: Kip Moore").unwrap();
        assert!(high < medium && medium < kip);
    }

    #[test]
    fn test_write_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("report.json");
        report().write_json(&path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["total_concerts_scanned"], 4);
        assert_eq!(value["results"][0]["concert_date"], "2025-08-09");
        assert_eq!(value["results"][0]["detected_openers"][0]["confidence_label"], "HIGH");
    }
}
