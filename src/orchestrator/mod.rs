//! Request orchestration.
//!
//! # State Machine
//! ```text
//! CacheCheck ──hit──▶ CacheHit
//!     │
//!    miss
//!     ▼
//! Fetching ──signal first──▶ Completed | Failed
//!     │
//!  deadline first
//!     ▼
//! TimedOut   (fetch keeps running, may still fill the cache)
//! ```
//!
//! # Design Decisions
//! - The fetch runs in its own task and reports through a oneshot; the
//!   request races that signal against its deadline with `tokio::select!`
//! - A timed-out request drops its receiver; the task's later send is a no-op
//! - Fetches are bounded by `max(request timeout, fetch timeout)` so a
//!   background fetch can outlive the request that started it
//! - Concurrent misses for one key share a fetch when single-flight is on
//! - No retries

pub mod error;
pub mod flight;

use axum::body::Bytes;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::time::{sleep_until, Instant};
use tracing::Instrument;

use crate::cache::{CachedPlaces, ResponseCache};
use crate::config::GatewayConfig;
use crate::observability::metrics;
use crate::places::{transform, Place};
use crate::upstream::Upstream;

pub use error::GatewayError;
pub use flight::{Completion, InFlight, Role};

/// What a fetch task reports: the serialized response body, or why not.
pub type FetchResult = Result<Bytes, GatewayError>;

/// Terminal state of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    CacheHit,
    Completed,
    TimedOut,
    Failed,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::CacheHit => "cache_hit",
            Outcome::Completed => "completed",
            Outcome::TimedOut => "timed_out",
            Outcome::Failed => "failed",
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&GatewayError> for Outcome {
    fn from(err: &GatewayError) -> Self {
        if err.is_timeout() {
            Outcome::TimedOut
        } else {
            Outcome::Failed
        }
    }
}

/// A successful answer.
#[derive(Debug, Clone)]
pub struct Served {
    /// JSON array of places.
    pub body: Bytes,
    /// `CacheHit` or `Completed`.
    pub outcome: Outcome,
}

/// Per-request coordinator between the cache, the upstream and the deadline.
///
/// Cheap to clone; clones share the cache and in-flight registry.
#[derive(Clone)]
pub struct Orchestrator {
    upstream: Arc<dyn Upstream>,
    cache: Option<ResponseCache>,
    flights: Option<Arc<InFlight>>,
    request_timeout: Duration,
    fetch_timeout: Duration,
}

impl Orchestrator {
    /// An orchestrator with no cache and no single-flight: every request
    /// fetches.
    pub fn new(upstream: Arc<dyn Upstream>, request_timeout: Duration) -> Self {
        Self {
            upstream,
            cache: None,
            flights: None,
            request_timeout,
            fetch_timeout: request_timeout,
        }
    }

    /// Wire an orchestrator from validated configuration.
    pub fn from_config(config: &GatewayConfig, upstream: Arc<dyn Upstream>) -> Self {
        let mut orchestrator = Self::new(upstream, config.timeouts.request())
            .with_fetch_timeout(config.upstream.fetch_timeout());

        if config.cache.enabled {
            if let Some(capacity) = std::num::NonZeroUsize::new(config.cache.capacity) {
                orchestrator = orchestrator.with_cache(ResponseCache::new(capacity));
            }
        }
        if config.cache.single_flight {
            orchestrator = orchestrator.with_single_flight();
        }
        orchestrator
    }

    pub fn with_cache(mut self, cache: ResponseCache) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn with_single_flight(mut self) -> Self {
        self.flights = Some(Arc::new(InFlight::new()));
        self
    }

    /// Budget for background fetches; never shorter than the request timeout.
    pub fn with_fetch_timeout(mut self, fetch_timeout: Duration) -> Self {
        self.fetch_timeout = fetch_timeout.max(self.request_timeout);
        self
    }

    pub fn cache(&self) -> Option<&ResponseCache> {
        self.cache.as_ref()
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// Answer a request for `key` (the incoming path and query).
    pub async fn handle(&self, key: &str) -> Result<Served, GatewayError> {
        let deadline = Instant::now() + self.request_timeout;

        if let Some(places) = self.cached(key) {
            let body = encode(&places)?;
            return Ok(Served {
                body,
                outcome: Outcome::CacheHit,
            });
        }

        let completion = self.launch(key);

        tokio::select! {
            biased;

            received = completion => match received {
                Ok(result) => result.map(|body| Served {
                    body,
                    outcome: Outcome::Completed,
                }),
                Err(_) => Err(GatewayError::WorkerLost),
            },
            _ = sleep_until(deadline) => {
                tracing::warn!(
                    key = %key,
                    timeout = ?self.request_timeout,
                    "Request deadline elapsed before upstream answered"
                );
                Err(GatewayError::Timeout(self.request_timeout))
            }
        }
    }

    fn cached(&self, key: &str) -> Option<CachedPlaces> {
        let cache = self.cache.as_ref()?;
        let hit = cache.get(key);
        metrics::record_cache_lookup(hit.is_some());
        hit
    }

    /// Start (or join) the fetch for `key` and return the completion signal.
    fn launch(&self, key: &str) -> oneshot::Receiver<FetchResult> {
        let (tx, rx) = oneshot::channel();

        let completion = match &self.flights {
            Some(flights) => match flights.join(key, tx) {
                Role::Leader => Completion::shared(key, Arc::clone(flights)),
                Role::Follower => {
                    tracing::debug!(key = %key, "Joined in-flight fetch");
                    metrics::record_joined_flight();
                    return rx;
                }
            },
            None => Completion::direct(key, tx),
        };

        let worker = self.clone();
        let span = tracing::debug_span!("fetch", key = %key);
        tokio::spawn(
            async move {
                let result = worker.fetch_and_store(completion.key()).await;
                let delivered = completion.complete(result);
                if delivered == 0 {
                    tracing::debug!("Fetch finished after every waiting request gave up");
                }
            }
            .instrument(span),
        );

        rx
    }

    /// fetch → transform → cache put → serialize.
    async fn fetch_and_store(&self, key: &str) -> FetchResult {
        let started = Instant::now();
        let deadline = started + self.fetch_timeout;

        let records = match self.upstream.fetch(key, deadline).await {
            Ok(records) => {
                metrics::record_upstream_fetch("ok", started.elapsed());
                records
            }
            Err(e) => {
                tracing::error!(key = %key, kind = e.kind(), error = %e, "Upstream fetch failed");
                metrics::record_upstream_fetch(e.kind(), started.elapsed());
                return Err(e.into());
            }
        };

        let places: CachedPlaces = Arc::new(transform(&records));
        tracing::debug!(key = %key, places = places.len(), "Upstream fetch transformed");

        if let Some(cache) = &self.cache {
            cache.put(key, Arc::clone(&places));
        }

        encode(&places)
    }
}

fn encode(places: &[Place]) -> Result<Bytes, GatewayError> {
    let body = serde_json::to_vec(places).map_err(|e| {
        tracing::error!(error = %e, "Failed to encode places");
        GatewayError::from(e)
    })?;
    Ok(Bytes::from(body))
}
