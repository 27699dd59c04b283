//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the single wildcard handler
//! - Wire up middleware (tracing, request ID, JSON content type)
//! - Bind server to listener
//! - Dispatch every GET to the orchestrator
//! - Observability (metrics, processing time in verbose mode)

use axum::{
    extract::State,
    http::{header, HeaderValue, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};

use crate::config::GatewayConfig;
use crate::http::request::{cache_key, MakeRequestUuidV4};
use crate::http::response::method_not_allowed;
use crate::observability::metrics;
use crate::orchestrator::{Orchestrator, Outcome};
use crate::upstream::{PlacesClient, Upstream, UpstreamError};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Orchestrator,
    /// Log per-request processing time.
    pub verbose: bool,
}

/// HTTP front end of the gateway.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a server talking to the configured upstream origin.
    pub fn new(config: GatewayConfig) -> Result<Self, UpstreamError> {
        let client = PlacesClient::new(config.upstream.origin.clone())?;
        Ok(Self::with_upstream(config, Arc::new(client)))
    }

    /// Create a server with a custom upstream.
    pub fn with_upstream(config: GatewayConfig, upstream: Arc<dyn Upstream>) -> Self {
        let orchestrator = Orchestrator::from_config(&config, upstream);

        tracing::info!(
            origin = %config.upstream.origin,
            cache_enabled = config.cache.enabled,
            cache_capacity = config.cache.capacity,
            single_flight = config.cache.single_flight,
            request_timeout_ms = config.timeouts.request_ms,
            "Gateway initialized"
        );

        let state = AppState {
            orchestrator,
            verbose: config.verbose(),
        };

        let router = Self::build_router(state);
        Self { router }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState) -> Router {
        Router::new()
            .route("/", get(places_handler).fallback(method_not_allowed))
            .route("/{*path}", get(places_handler).fallback(method_not_allowed))
            .with_state(state)
            .layer(SetResponseHeaderLayer::overriding(
                header::CONTENT_TYPE,
                HeaderValue::from_static("application/json"),
            ))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV4))
    }

    /// The fully layered router, for driving the gateway without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("HTTP server draining");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Forwards every GET to the orchestrator, keyed by path and query.
async fn places_handler(State(state): State<AppState>, uri: Uri) -> Response {
    let start_time = Instant::now();
    let key = cache_key(&uri);

    let (response, outcome) = match state.orchestrator.handle(key).await {
        Ok(served) => ((StatusCode::OK, served.body).into_response(), served.outcome),
        Err(e) => {
            let outcome = Outcome::from(&e);
            (e.into_response(), outcome)
        }
    };

    let status = response.status();
    metrics::record_request(outcome.as_str(), status.as_u16(), start_time.elapsed());

    if state.verbose {
        tracing::debug!(
            url = %key,
            outcome = %outcome,
            status = status.as_u16(),
            processing_time = ?start_time.elapsed(),
            "request"
        );
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::places::PlaceRecord;
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{Method, Request};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tower::ServiceExt;

    struct Moscow {
        calls: AtomicUsize,
        delay: Duration,
    }

    #[async_trait]
    impl Upstream for Moscow {
        async fn fetch(
            &self,
            _path_and_query: &str,
            _deadline: tokio::time::Instant,
        ) -> Result<Vec<PlaceRecord>, UpstreamError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            Ok(vec![PlaceRecord {
                code: "MOW".into(),
                name: "Moscow".into(),
                country_name: "Russia".into(),
                ..Default::default()
            }])
        }
    }

    fn server(delay: Duration, request_ms: u64) -> (HttpServer, Arc<Moscow>) {
        let upstream = Arc::new(Moscow {
            calls: AtomicUsize::new(0),
            delay,
        });
        let mut config = GatewayConfig::default();
        config.timeouts.request_ms = request_ms;
        (HttpServer::with_upstream(config, upstream.clone()), upstream)
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_serves_transformed_places_as_json() {
        let (server, _) = server(Duration::ZERO, 1000);

        let response = server
            .router()
            .oneshot(get("/v2/places.json?term=Moscow"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
        assert!(response.headers().contains_key(crate::http::X_REQUEST_ID));

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], br#"[{"slug":"MOW","subtitle":"Russia","title":"Moscow"}]"#);
    }

    #[tokio::test]
    async fn test_repeated_request_is_served_from_cache() {
        let (server, upstream) = server(Duration::ZERO, 1000);
        let router = server.router();

        for _ in 0..3 {
            let response = router.clone().oneshot(get("/v2/places.json?term=Moscow")).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }
        assert_eq!(upstream.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_slow_upstream_yields_gateway_timeout() {
        let (server, _) = server(Duration::from_millis(500), 50);

        let response = server.router().oneshot(get("/slow")).await.unwrap();

        assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], br#"{"error": "internal error"}"#);
    }

    #[tokio::test]
    async fn test_non_get_is_rejected() {
        let (server, upstream) = server(Duration::ZERO, 1000);

        let request = Request::builder()
            .method(Method::POST)
            .uri("/v2/places.json")
            .body(Body::empty())
            .unwrap();
        let response = server.router().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers()[header::ALLOW], "GET,HEAD");
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], crate::http::response::METHOD_NOT_ALLOWED_BODY);
        assert_eq!(upstream.calls.load(Ordering::SeqCst), 0);
    }
}
