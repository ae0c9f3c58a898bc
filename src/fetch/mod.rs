//! HTTP fetching from the upstream ATP endpoints.
//!
//! The upstream API is unofficial and undocumented. Match-stats lookups treat
//! every failure as "no such match", since most probed ids do not exist.
//! Head-to-head lookups report each failure mode separately.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::Client;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};
use url::Url;

use crate::config::UpstreamConfig;
use crate::normalize::has_match_id;

/// Timeout for the (large) tour calendar download.
const CALENDAR_TIMEOUT: Duration = Duration::from_secs(15);

/// Which response statuses count as a usable body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Accept {
    /// Only `200 OK`. Match-stats and head-to-head answer other 2xx codes
    /// with partial or placeholder bodies.
    Ok,
    /// Any 2xx.
    Success,
}

impl Accept {
    fn allows(self, status: reqwest::StatusCode) -> bool {
        match self {
            Accept::Ok => status == reqwest::StatusCode::OK,
            Accept::Success => status.is_success(),
        }
    }
}

/// Errors that can occur during fetching.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Invalid player code: {0}")]
    InvalidPlayerCode(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("HTTP {status}: {message}")]
    HttpStatus { status: u16, message: String },

    #[error("Invalid JSON from {url}: {source}")]
    InvalidJson {
        url: String,
        source: serde_json::Error,
    },

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

/// Read access to the upstream ATP service.
#[async_trait]
pub trait AtpUpstream: Send + Sync {
    /// Source identifier for logging.
    fn name(&self) -> &'static str;

    /// Match-stats payload for one match, or `None` if upstream has nothing
    /// usable (any non-success status, transport failure or non-JSON body).
    async fn fetch_match(&self, year: i32, tournament_id: &str, match_id: &str) -> Option<Value>;

    /// Raw head-to-head payload for two player codes.
    async fn fetch_head_to_head(&self, player1: &str, player2: &str) -> Result<Value, FetchError>;
}

/// reqwest-backed client for the live ATP endpoints.
pub struct AtpClient {
    client: Client,
    config: UpstreamConfig,
}

impl AtpClient {
    /// Create a new client with the given configuration.
    pub fn new(config: UpstreamConfig) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .unwrap_or_else(|_| HeaderValue::from_static("atp-proxy/0.1.0")),
        );

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .default_headers(headers)
            .build()?;

        Ok(Self { client, config })
    }

    /// Create a client with default configuration.
    pub fn with_defaults() -> Result<Self, FetchError> {
        Self::new(UpstreamConfig::default())
    }

    /// Download the tour calendar used to build the registry.
    pub async fn fetch_calendar(&self) -> Result<Value, FetchError> {
        let url = Url::parse(&self.config.calendar_url)
            .map_err(|e| FetchError::InvalidUrl(format!("Bad calendar URL: {}", e)))?;
        info!("Fetching tour calendar from {}", url);
        self.get_json(&url, Accept::Success, Some(CALENDAR_TIMEOUT))
            .await
    }

    /// Append path segments to a base URL, percent-encoding each one.
    fn endpoint(base: &str, segments: &[&str]) -> Result<Url, FetchError> {
        let mut url = Url::parse(base)
            .map_err(|e| FetchError::InvalidUrl(format!("Bad base URL {}: {}", base, e)))?;
        url.path_segments_mut()
            .map_err(|_| FetchError::InvalidUrl(format!("Cannot append to {}", base)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// GET a URL and parse the body as JSON, keeping each failure distinct.
    async fn get_json(
        &self,
        url: &Url,
        accept: Accept,
        timeout: Option<Duration>,
    ) -> Result<Value, FetchError> {
        let mut request = self.client.get(url.as_str());
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound(url.to_string()));
        }

        if !accept.allows(status) {
            return Err(FetchError::HttpStatus {
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|source| FetchError::InvalidJson {
            url: url.to_string(),
            source,
        })
    }
}

#[async_trait]
impl AtpUpstream for AtpClient {
    fn name(&self) -> &'static str {
        "atptour"
    }

    async fn fetch_match(&self, year: i32, tournament_id: &str, match_id: &str) -> Option<Value> {
        let year = year.to_string();
        let url = match Self::endpoint(
            &self.config.match_stats_url,
            &[year.as_str(), tournament_id, match_id],
        ) {
            Ok(url) => url,
            Err(e) => {
                warn!("Cannot build match URL: {}", e);
                return None;
            }
        };

        match self.get_json(&url, Accept::Ok, None).await {
            Ok(payload) => Some(payload),
            Err(e) => {
                debug!("No match at {}: {}", url, e);
                None
            }
        }
    }

    async fn fetch_head_to_head(&self, player1: &str, player2: &str) -> Result<Value, FetchError> {
        let url = Self::endpoint(&self.config.h2h_url, &[player1, player2])?;
        self.get_json(&url, Accept::Ok, None)
            .await
            .inspect_err(|e| {
                warn!("Head-to-head {} vs {} failed: {}", player1, player2, e);
            })
    }
}

/// Player codes are short alphanumeric tokens such as `DH58`.
pub fn is_valid_player_code(code: &str) -> bool {
    !code.is_empty() && code.chars().all(|c| c.is_ascii_alphanumeric())
}

/// Validate both player codes, then fetch the head-to-head payload.
///
/// Malformed codes fail before any request is made.
pub async fn head_to_head(
    upstream: &dyn AtpUpstream,
    player1: &str,
    player2: &str,
) -> Result<Value, FetchError> {
    for code in [player1, player2] {
        if !is_valid_player_code(code) {
            return Err(FetchError::InvalidPlayerCode(code.to_string()));
        }
    }
    upstream.fetch_head_to_head(player1, player2).await
}

/// Probe every candidate match id and keep the payloads that hold a real match.
///
/// Probes run concurrently, at most `concurrency` at a time. A failed probe is
/// indistinguishable from a missing match and never aborts the others.
pub async fn probe_matches(
    upstream: &dyn AtpUpstream,
    year: i32,
    tournament_id: &str,
    match_ids: Vec<String>,
    concurrency: usize,
) -> BTreeMap<String, Value> {
    let candidates = match_ids.len();
    info!(
        "Probing {} candidate matches for {}/{} via {}",
        candidates,
        year,
        tournament_id,
        upstream.name()
    );

    let found: BTreeMap<String, Value> = stream::iter(match_ids)
        .map(|match_id| async move {
            let payload = upstream.fetch_match(year, tournament_id, &match_id).await;
            (match_id, payload)
        })
        .buffer_unordered(concurrency.max(1))
        .filter_map(|(match_id, payload)| async move {
            payload.filter(has_match_id).map(|p| (match_id, p))
        })
        .collect()
        .await;

    info!(
        "Found {} of {} candidate matches for {}/{}",
        found.len(),
        candidates,
        year,
        tournament_id
    );
    found
}

/// In-memory upstream for tests.
#[cfg(test)]
#[derive(Default)]
pub struct MockUpstream {
    matches: std::collections::HashMap<String, Value>,
    h2h: std::collections::HashMap<String, Value>,
    h2h_status: Option<u16>,
    pub calls: std::sync::atomic::AtomicUsize,
}

#[cfg(test)]
impl MockUpstream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_match(mut self, year: i32, tournament_id: &str, match_id: &str, payload: Value) -> Self {
        self.matches
            .insert(format!("{}/{}/{}", year, tournament_id, match_id), payload);
        self
    }

    pub fn with_h2h(mut self, player1: &str, player2: &str, payload: Value) -> Self {
        self.h2h.insert(format!("{}/{}", player1, player2), payload);
        self
    }

    pub fn with_h2h_status(mut self, status: u16) -> Self {
        self.h2h_status = Some(status);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[cfg(test)]
#[async_trait]
impl AtpUpstream for MockUpstream {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn fetch_match(&self, year: i32, tournament_id: &str, match_id: &str) -> Option<Value> {
        self.calls
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        self.matches
            .get(&format!("{}/{}/{}", year, tournament_id, match_id))
            .cloned()
    }

    async fn fetch_head_to_head(&self, player1: &str, player2: &str) -> Result<Value, FetchError> {
        self.calls
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        if let Some(status) = self.h2h_status {
            return Err(FetchError::HttpStatus {
                status,
                message: "mock".to_string(),
            });
        }
        self.h2h
            .get(&format!("{}/{}", player1, player2))
            .cloned()
            .ok_or_else(|| FetchError::NotFound(format!("{}/{}", player1, player2)))
    }
}
