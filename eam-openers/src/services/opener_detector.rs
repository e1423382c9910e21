//! Missing opener detection
//!
//! Two sequential searches per concert:
//!
//! 1. Headliner + date, to learn the venue name exactly as setlist.fm has it
//!    and collect guest credits from the headliner's setlist.
//! 2. Venue + date, to list every act that played that night.
//!
//! The act with the most songs is taken as the headliner; every other act
//! with fewer songs is scored by [`OpenerScorer`].

use crate::models::detection::{DetectedOpener, DetectionResult, HeadlinerSummary};
use crate::models::setlist::Performer;
use crate::services::confidence_scorer::OpenerScorer;
use crate::services::setlistfm_client::{SetlistError, SetlistQuery, SetlistSource};
use chrono::NaiveDate;
use tracing::{debug, warn};

pub struct OpenerDetector<S> {
    source: S,
    scorer: OpenerScorer,
}

impl<S: SetlistSource> OpenerDetector<S> {
    pub fn new(source: S) -> Self {
        Self::with_scorer(source, OpenerScorer::default())
    }

    pub fn with_scorer(source: S, scorer: OpenerScorer) -> Self {
        Self { source, scorer }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Openers scoring 50 or more, best first
    ///
    /// Lookup failures are logged and reported as "no openers".
    pub async fn detect_openers(&self, headliner_name: &str, date: NaiveDate) -> Vec<DetectedOpener> {
        match self.try_detect(None, headliner_name, date).await {
            Ok(Some(result)) => result.detected_openers,
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(headliner = %headliner_name, %date, error = %e, "Opener detection failed");
                Vec::new()
            }
        }
    }

    /// Full detection for one concert
    ///
    /// `Ok(None)` when the headliner has no setlist for the date or when the
    /// venue search finds at most one act.
    pub async fn try_detect(
        &self,
        concert_id: Option<&str>,
        headliner_name: &str,
        date: NaiveDate,
    ) -> Result<Option<DetectionResult>, SetlistError> {
        if headliner_name.trim().is_empty() {
            return Ok(None);
        }

        let page = self
            .source
            .search_setlists(&SetlistQuery::new().artist(headliner_name).date(date))
            .await?;

        let Some(headliner_setlist) = page.setlist.into_iter().next() else {
            debug!(headliner = %headliner_name, %date, "No headliner setlist");
            return Ok(None);
        };

        let venue = headliner_setlist.venue.name.clone();
        if venue.trim().is_empty() {
            debug!(headliner = %headliner_name, %date, "Headliner setlist has no venue");
            return Ok(None);
        }

        let guest_names = headliner_setlist.guest_names();

        let page = self
            .source
            .search_setlists(&SetlistQuery::new().venue(venue.as_str()).date(date))
            .await?;

        if page.setlist.len() <= 1 {
            debug!(venue = %venue, %date, "Single setlist at venue");
            return Ok(None);
        }

        let mut performers: Vec<Performer> = page.setlist.iter().map(Performer::from).collect();
        // Stable: ties keep API order
        performers.sort_by(|a, b| b.song_count.cmp(&a.song_count));

        let likely_headliner = &performers[0];
        let headliner_song_count = likely_headliner.song_count;

        let mut detected_openers: Vec<DetectedOpener> = performers[1..]
            .iter()
            .filter_map(|candidate| {
                let score = self
                    .scorer
                    .score(candidate, headliner_song_count, &guest_names)?;
                if !self.scorer.is_reportable(score.confidence) {
                    debug!(
                        artist = %candidate.artist_name,
                        confidence = score.confidence,
                        "Candidate below reporting threshold"
                    );
                    return None;
                }
                Some(DetectedOpener {
                    artist_name: candidate.artist_name.clone(),
                    artist_mbid: candidate.artist_mbid.clone(),
                    song_count: candidate.song_count,
                    tour_name: candidate.tour_name.clone(),
                    confidence: score.confidence,
                    confidence_label: score.label,
                    evidence: score.evidence,
                    setlist_id: candidate.setlist_id.clone(),
                    setlist_url: candidate.setlist_url.clone(),
                })
            })
            .collect();

        detected_openers.sort_by(|a, b| b.confidence.cmp(&a.confidence));

        Ok(Some(DetectionResult {
            concert_id: concert_id.map(str::to_string),
            concert_date: date,
            venue,
            headliner: HeadlinerSummary {
                name: likely_headliner.artist_name.clone(),
                song_count: headliner_song_count,
            },
            detected_openers,
            guest_artists: guest_names.into_iter().collect(),
        }))
    }
}
