//! setlist.fm API client
//!
//! Rate-limited search against the setlist.fm REST API. Every request waits
//! for the configured minimum interval since the previous one; HTTP 429 is
//! retried once after the server's `Retry-After` delay.

use crate::models::setlist::{Setlist, SetlistPage};
use async_trait::async_trait;
use chrono::NaiveDate;
use eam_common::config::{TomlConfig, DEFAULT_REQUEST_INTERVAL_SECS, DEFAULT_SETLISTFM_BASE_URL};
use reqwest::header::{HeaderMap, ACCEPT, RETRY_AFTER};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::sync::Mutex;

const USER_AGENT: &str = concat!("eam-openers/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Wait applied to a 429 response without a usable `Retry-After`
const DEFAULT_RETRY_AFTER: Duration = Duration::from_secs(1);

/// Backing-band suffixes stripped before searching by artist name
const BAND_SUFFIXES: &[&str] = &[
    " & the E Street Band",
    " & The E Street Band",
    " & the Silver Bullet Band",
    " & the 400 Unit",
    " and the E Street Band",
    " + the E Street Band",
    " + Joe Sumner",
];

/// setlist.fm client errors
#[derive(Debug, Error)]
pub enum SetlistError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error {0}: {1}")]
    Api(u16, String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("setlist.fm API key is missing")]
    MissingApiKey,
}

/// Search parameters for `GET /search/setlists`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetlistQuery {
    pub artist_name: Option<String>,
    pub venue_name: Option<String>,
    pub city_name: Option<String>,
    /// State code, e.g. `NY`
    pub state: Option<String>,
    pub date: Option<NaiveDate>,
    pub year: Option<i32>,
    /// 1-based result page
    pub page: u32,
}

impl Default for SetlistQuery {
    fn default() -> Self {
        Self {
            artist_name: None,
            venue_name: None,
            city_name: None,
            state: None,
            date: None,
            year: None,
            page: 1,
        }
    }
}

impl SetlistQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn artist(mut self, name: impl Into<String>) -> Self {
        self.artist_name = Some(name.into());
        self
    }

    pub fn venue(mut self, name: impl Into<String>) -> Self {
        self.venue_name = Some(name.into());
        self
    }

    pub fn city(mut self, name: impl Into<String>) -> Self {
        self.city_name = Some(name.into());
        self
    }

    pub fn state(mut self, code: impl Into<String>) -> Self {
        self.state = Some(code.into());
        self
    }

    pub fn date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    /// Query-string pairs; blank text parameters are omitted
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("p", self.page.to_string())];

        let text = [
            ("artistName", &self.artist_name),
            ("venueName", &self.venue_name),
            ("cityName", &self.city_name),
            ("state", &self.state),
        ];
        for (key, value) in text {
            if let Some(value) = value.as_deref().filter(|v| !v.trim().is_empty()) {
                params.push((key, value.to_string()));
            }
        }

        if let Some(date) = self.date {
            params.push(("date", date.format("%d-%m-%Y").to_string()));
        }
        if let Some(year) = self.year {
            params.push(("year", year.to_string()));
        }

        params
    }
}

/// Source of setlist search results
///
/// Implemented by [`SetlistFmClient`]; tests substitute canned data.
#[async_trait]
pub trait SetlistSource: Send + Sync {
    /// Run one search. "No results" is an empty page, not an error.
    async fn search_setlists(&self, query: &SetlistQuery) -> Result<SetlistPage, SetlistError>;
}

/// Rate limiter enforcing a minimum interval between requests
struct RateLimiter {
    last_request: Mutex<Option<Instant>>,
    min_interval: Duration,
}

impl RateLimiter {
    fn new(min_interval: Duration) -> Self {
        Self {
            last_request: Mutex::new(None),
            min_interval,
        }
    }

    /// Wait if necessary to comply with rate limit
    async fn wait(&self) {
        let mut last = self.last_request.lock().await;

        if let Some(last_time) = *last {
            let elapsed = last_time.elapsed();
            if elapsed < self.min_interval {
                let wait_time = self.min_interval - elapsed;
                tracing::debug!("Rate limiting: waiting {:?}", wait_time);
                tokio::time::sleep(wait_time).await;
            }
        }

        *last = Some(Instant::now());
    }
}

/// setlist.fm API client
pub struct SetlistFmClient {
    http_client: reqwest::Client,
    base_url: String,
    api_key: String,
    rate_limiter: Arc<RateLimiter>,
    retry_fallback: Duration,
}

impl SetlistFmClient {
    /// Client for the public API with the default 4 second interval
    pub fn new(api_key: &str) -> Result<Self, SetlistError> {
        Self::with_base_url(
            api_key,
            DEFAULT_SETLISTFM_BASE_URL,
            Duration::from_secs_f64(DEFAULT_REQUEST_INTERVAL_SECS),
        )
    }

    /// Client using the base URL and interval from the TOML config
    pub fn from_config(api_key: &str, config: &TomlConfig) -> Result<Self, SetlistError> {
        Self::with_base_url(api_key, &config.setlistfm_base_url, config.request_interval())
    }

    pub fn with_base_url(
        api_key: &str,
        base_url: &str,
        min_interval: Duration,
    ) -> Result<Self, SetlistError> {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err(SetlistError::MissingApiKey);
        }

        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| SetlistError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            rate_limiter: Arc::new(RateLimiter::new(min_interval)),
            retry_fallback: DEFAULT_RETRY_AFTER,
        })
    }

    /// Override the wait used when a 429 carries no `Retry-After`
    pub fn with_retry_fallback(mut self, wait: Duration) -> Self {
        self.retry_fallback = wait;
        self
    }

    /// Minimum interval between requests
    pub fn min_interval(&self) -> Duration {
        self.rate_limiter.min_interval
    }

    /// Fetch one setlist by id; `None` on 404
    pub async fn get_setlist(&self, setlist_id: &str) -> Result<Option<Setlist>, SetlistError> {
        self.get_json(&format!("/setlist/{}", setlist_id), &[]).await
    }

    /// First setlist for `artist_name` on `date`, searching by a cleaned name
    pub async fn find_setlist_for_concert(
        &self,
        artist_name: &str,
        date: NaiveDate,
    ) -> Result<Option<Setlist>, SetlistError> {
        let search_artist = clean_artist_for_search(artist_name);
        tracing::debug!(artist = %artist_name, search = %search_artist, %date, "Finding setlist");

        let query = SetlistQuery::new().artist(search_artist).date(date);
        let page = self.search_setlists(&query).await?;
        Ok(page.setlist.into_iter().next())
    }

    /// GET `{base}{path}`; `Ok(None)` on 404
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<Option<T>, SetlistError> {
        let url = format!("{}{}", self.base_url, path);
        let mut retried = false;

        loop {
            self.rate_limiter.wait().await;

            tracing::debug!(url = %url, params = ?params, "Querying setlist.fm API");

            let response = self
                .http_client
                .get(&url)
                .query(params)
                .header("x-api-key", &self.api_key)
                .header(ACCEPT, "application/json")
                .send()
                .await
                .map_err(|e| SetlistError::Network(e.to_string()))?;

            let status = response.status();

            if status == StatusCode::NOT_FOUND {
                return Ok(None);
            }

            if status == StatusCode::TOO_MANY_REQUESTS {
                if retried {
                    return Err(SetlistError::RateLimitExceeded);
                }
                let wait_time = retry_after(response.headers()).unwrap_or(self.retry_fallback);
                tracing::warn!("Rate limit exceeded, retrying in {:?}", wait_time);
                tokio::time::sleep(wait_time).await;
                retried = true;
                continue;
            }

            if !status.is_success() {
                let error_text = response.text().await.unwrap_or_default();
                return Err(SetlistError::Api(status.as_u16(), error_text));
            }

            let body = response
                .text()
                .await
                .map_err(|e| SetlistError::Network(e.to_string()))?;

            return serde_json::from_str(&body)
                .map(Some)
                .map_err(|e| SetlistError::Parse(e.to_string()));
        }
    }
}

#[async_trait]
impl SetlistSource for SetlistFmClient {
    async fn search_setlists(&self, query: &SetlistQuery) -> Result<SetlistPage, SetlistError> {
        let page: Option<SetlistPage> = self.get_json("/search/setlists", &query.to_params()).await?;
        let page = page.unwrap_or_default();

        tracing::debug!(
            results = page.setlist.len(),
            total = page.total,
            "setlist.fm search complete"
        );

        Ok(page)
    }
}

/// `Retry-After` in delta-seconds form
fn retry_after(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}

/// Reduce a concert artist string to the name setlist.fm lists
///
/// Drops parenthetical notes, `w/` and `w.` opener notation, and the first
/// matching backing-band suffix.
pub fn clean_artist_for_search(artist_name: &str) -> String {
    let mut clean = artist_name.split('(').next().unwrap_or_default().trim();
    clean = clean.split(" w/").next().unwrap_or_default().trim();
    clean = clean.split(" w.").next().unwrap_or_default().trim();

    match BAND_SUFFIXES.iter().find(|suffix| clean.contains(*suffix)) {
        Some(suffix) => clean.replace(suffix, "").trim().to_string(),
        None => clean.to_string(),
    }
}
