//! HTTP client for the upstream place-search API.

use async_trait::async_trait;
use axum::http::{header, StatusCode};
use tokio::time::{timeout_at, Instant};

use crate::places::PlaceRecord;
use crate::upstream::{Upstream, UpstreamError};

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Fetches places from a single fixed origin.
#[derive(Debug, Clone)]
pub struct PlacesClient {
    client: reqwest::Client,
    origin: String,
}

impl PlacesClient {
    /// Create a client for `origin`, e.g. `https://places.example.com`.
    pub fn new(origin: impl Into<String>) -> Result<Self, UpstreamError> {
        let client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self {
            client,
            origin: origin.into(),
        })
    }

    /// Use a preconfigured `reqwest::Client`.
    pub fn with_client(client: reqwest::Client, origin: impl Into<String>) -> Self {
        Self {
            client,
            origin: origin.into(),
        }
    }

    /// The upstream URL for an incoming path and query.
    ///
    /// Plain concatenation; the origin is validated at config load.
    pub fn url_for(&self, path_and_query: &str) -> String {
        format!("{}{}", self.origin, path_and_query)
    }

    async fn get(&self, url: &str) -> Result<Vec<PlaceRecord>, UpstreamError> {
        let response = self
            .client
            .get(url)
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(UpstreamError::Status(status));
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl Upstream for PlacesClient {
    async fn fetch(
        &self,
        path_and_query: &str,
        deadline: Instant,
    ) -> Result<Vec<PlaceRecord>, UpstreamError> {
        let url = self.url_for(path_and_query);
        let budget = deadline.saturating_duration_since(Instant::now());

        tracing::debug!(url = %url, budget = ?budget, "Fetching from upstream");

        match timeout_at(deadline, self.get(&url)).await {
            Ok(result) => result,
            Err(_) => Err(UpstreamError::DeadlineExceeded(budget)),
        }
    }
}
