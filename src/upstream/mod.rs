//! Upstream place-search service.
//!
//! # Responsibilities
//! - Build the upstream URL from the configured origin and the request path
//! - Issue a deadline-bound GET and decode the JSON array of places
//! - Classify failures (transport, deadline, status, decode)
//!
//! # Design Decisions
//! - No retries: one failed fetch is one failed client request
//! - The [`Upstream`] trait is the seam the orchestrator depends on

pub mod client;

use async_trait::async_trait;
use axum::http::StatusCode;
use std::time::Duration;
use thiserror::Error;
use tokio::time::Instant;

use crate::places::PlaceRecord;

pub use client::PlacesClient;

/// Errors surfaced by an upstream fetch.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// Connection, DNS or I/O failure.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The fetch did not finish before its deadline.
    #[error("upstream did not answer within {0:?}")]
    DeadlineExceeded(Duration),

    /// Upstream answered with something other than 200 OK.
    #[error("upstream responded with {0}")]
    Status(StatusCode),

    /// The body was not a JSON array of places.
    #[error("malformed upstream body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl UpstreamError {
    /// Short label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            UpstreamError::Transport(_) => "transport",
            UpstreamError::DeadlineExceeded(_) => "deadline",
            UpstreamError::Status(_) => "status",
            UpstreamError::Decode(_) => "decode",
        }
    }
}

/// A source of upstream place records.
#[async_trait]
pub trait Upstream: Send + Sync + 'static {
    /// Fetch the places for `path_and_query`, giving up at `deadline`.
    async fn fetch(
        &self,
        path_and_query: &str,
        deadline: Instant,
    ) -> Result<Vec<PlaceRecord>, UpstreamError>;
}
