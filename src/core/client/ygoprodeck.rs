//! YGOPRODeck API client.
//!
//! All three lookups hit `cardinfo.php`:
//!
//! | Operation | Endpoint |
//! |-----------|----------|
//! | exact name | `/cardinfo.php?name=<encoded>` |
//! | partial name | `/cardinfo.php?fname=<encoded>` |
//! | full catalog | `/cardinfo.php` |
//!
//! The API answers "no card matching your query" with HTTP 400; that is
//! reported as an empty result, not an error. Requests are spaced by a
//! fixed delay to stay inside the API's rate limit.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, warn};

use super::cache::ResponseCache;
use super::error::{ClientError, Result};
use super::CardDataSource;
use crate::core::models::{CardInfoResponse, CardRecord};

/// Public API root.
pub const DEFAULT_BASE_URL: &str = "https://db.ygoprodeck.com/api/v7";

const CARD_INFO_ENDPOINT: &str = "/cardinfo.php";

/// Default delay between consecutive requests.
pub const DEFAULT_RATE_LIMIT: Duration = Duration::from_millis(100);

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Trim a card name and percent-encode it for a query string.
///
/// Apostrophes become `%27` and quotation marks `%22`, along with every
/// other reserved character.
pub fn encode_card_name(name: &str) -> String {
    urlencoding::encode(name.trim()).into_owned()
}

pub struct YgoProDeckClient {
    http: Client,
    base_url: String,
    cache: ResponseCache,
    rate_limit: Duration,
    last_request: Mutex<Option<Instant>>,
}

impl YgoProDeckClient {
    /// Create a client against `base_url`.
    pub fn new(base_url: impl Into<String>, cache: ResponseCache) -> Result<Self> {
        Self::with_options(base_url, cache, DEFAULT_RATE_LIMIT, DEFAULT_TIMEOUT)
    }

    pub fn with_options(
        base_url: impl Into<String>,
        cache: ResponseCache,
        rate_limit: Duration,
        timeout: Duration,
    ) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            cache,
            rate_limit,
            last_request: Mutex::new(None),
        })
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    /// Remove every cached response.
    pub async fn clear_cache(&self) -> Result<usize> {
        self.cache.clear().await
    }

    /// Wait until at least `rate_limit` has passed since the previous request.
    async fn respect_rate_limit(&self) {
        let mut last = self.last_request.lock().await;
        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < self.rate_limit {
                tokio::time::sleep(self.rate_limit - elapsed).await;
            }
        }
        *last = Some(Instant::now());
    }

    /// Fetch `endpoint`, going through the response cache.
    ///
    /// Returns `Ok(None)` when the API reports that nothing matched. A cached
    /// body that no longer parses is evicted and fetched again.
    async fn fetch(&self, endpoint: &str) -> Result<Option<CardInfoResponse>> {
        if let Some(body) = self.cache.get(endpoint).await {
            match serde_json::from_str(&body) {
                Ok(parsed) => {
                    debug!(endpoint, "Using cached response");
                    return Ok(Some(parsed));
                }
                Err(e) => {
                    warn!(endpoint, error = %e, "Discarding unreadable cached response");
                    self.cache.remove(endpoint).await;
                }
            }
        }

        self.respect_rate_limit().await;

        let url = format!("{}{}", self.base_url, endpoint);
        debug!(url = %url, "API request");
        let response = self.http.get(&url).send().await?;

        let status = response.status();
        if status == StatusCode::BAD_REQUEST || status == StatusCode::NOT_FOUND {
            debug!(endpoint, status = status.as_u16(), "No matching cards");
            return Ok(None);
        }
        if !status.is_success() {
            return Err(ClientError::Status {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let parsed: CardInfoResponse = serde_json::from_str(&body)?;
        self.cache.put(endpoint, &body).await;
        Ok(Some(parsed))
    }
}

#[async_trait]
impl CardDataSource for YgoProDeckClient {
    async fn get_card_by_name(&self, name: &str) -> Result<Option<CardRecord>> {
        let endpoint = format!("{}?name={}", CARD_INFO_ENDPOINT, encode_card_name(name));
        let response = self.fetch(&endpoint).await?;
        Ok(response.and_then(|r| r.data.into_iter().next()))
    }

    async fn search_cards(&self, query: &str) -> Result<Vec<CardRecord>> {
        let endpoint = format!("{}?fname={}", CARD_INFO_ENDPOINT, urlencoding::encode(query));
        let response = self.fetch(&endpoint).await?;
        Ok(response.map(|r| r.data).unwrap_or_default())
    }

    async fn get_all_cards(&self) -> Result<Vec<CardRecord>> {
        let response = self.fetch(CARD_INFO_ENDPOINT).await?;
        let cards = response.map(|r| r.data).unwrap_or_default();
        if cards.is_empty() {
            warn!("Card catalog endpoint returned no cards");
        }
        Ok(cards)
    }
}
