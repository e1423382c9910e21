//! Batch opener scan over normalized concert records

use crate::models::concert::Concert;
use crate::models::detection::DetectionResult;
use crate::models::report::ScanTally;
use crate::services::opener_detector::OpenerDetector;
use crate::services::setlistfm_client::{SetlistError, SetlistSource};
use chrono::NaiveDate;
use eam_common::{Error, Result};
use std::path::Path;
use tracing::{info, warn};

/// Read a JSON array of normalized concerts
pub fn load_concerts(path: &Path) -> Result<Vec<Concert>> {
    let content = std::fs::read_to_string(path)?;
    let concerts: Vec<Concert> = serde_json::from_str(&content)?;
    info!("Loaded {} concerts from {}", concerts.len(), path.display());
    Ok(concerts)
}

/// Concerts to scan
///
/// With `concert_id`, just that concert (any artist count). Otherwise every
/// single-artist concert, newest first, truncated to `limit`.
pub fn select_concerts(
    concerts: &[Concert],
    concert_id: Option<&str>,
    limit: Option<usize>,
) -> Result<Vec<Concert>> {
    if let Some(id) = concert_id {
        return concerts
            .iter()
            .find(|c| c.id.as_deref() == Some(id))
            .map(|c| vec![c.clone()])
            .ok_or_else(|| Error::NotFound(format!("Concert {} not found", id)));
    }

    let mut selected: Vec<Concert> = concerts
        .iter()
        .filter(|c| c.is_single_headliner())
        .cloned()
        .collect();

    // ISO dates sort lexically; missing dates go last
    selected.sort_by(|a, b| b.date.cmp(&a.date));

    if let Some(limit) = limit {
        selected.truncate(limit);
    }

    Ok(selected)
}

/// Parse a `YYYY-MM-DD` concert date
pub fn parse_concert_date(date: &str) -> std::result::Result<NaiveDate, SetlistError> {
    NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
        .map_err(|e| SetlistError::InvalidDate(format!("{}: {}", date, e)))
}

/// Run detection for each concert in order
///
/// Returns results for concerts with at least one reportable opener, plus
/// the found / not-found / error tally.
pub async fn scan_concerts<S: SetlistSource>(
    detector: &OpenerDetector<S>,
    concerts: &[Concert],
) -> (Vec<DetectionResult>, ScanTally) {
    let mut results = Vec::new();
    let mut tally = ScanTally::default();
    let total = concerts.len();

    for (index, concert) in concerts.iter().enumerate() {
        let id = concert.display_id();

        let outcome = match (concert.headliner_name(), concert.date.as_deref()) {
            (Some(headliner), Some(date)) => match parse_concert_date(date) {
                Ok(date) => {
                    info!(
                        "[{}/{}] Concert {}: {} on {}",
                        index + 1,
                        total,
                        id,
                        headliner,
                        date
                    );
                    detector.try_detect(concert.id.as_deref(), headliner, date).await
                }
                Err(e) => Err(e),
            },
            (None, _) => {
                warn!("[{}/{}] Concert {} has no artist, skipping", index + 1, total, id);
                Ok(None)
            }
            (_, None) => Err(SetlistError::InvalidDate("missing date".to_string())),
        };

        match outcome {
            Ok(Some(result)) if !result.detected_openers.is_empty() => {
                for opener in &result.detected_openers {
                    info!(
                        "  Opener: {} ({} songs, {}% {})",
                        opener.artist_name,
                        opener.song_count,
                        opener.confidence,
                        opener.confidence_label
                    );
                }
                tally.found += 1;
                results.push(result);
            }
            Ok(_) => tally.not_found += 1,
            Err(e) => {
                warn!("Concert {} failed: {}", id, e);
                tally.errors += 1;
            }
        }

        info!(
            "  Found: {} | Not found: {} | Errors: {}",
            tally.found, tally.not_found, tally.errors
        );
    }

    (results, tally)
}
