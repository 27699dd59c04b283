//! Request identification and cache keys.
//!
//! # Responsibilities
//! - Generate unique request ID (UUID v4)
//! - Extract the cache/forwarding key (path + query)
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - The key is forwarded verbatim; no normalization of query order

use axum::http::{HeaderValue, Request, Uri};
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

/// Header carrying the request ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Generates a UUID v4 request ID for requests that arrive without one.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestUuidV4;

impl MakeRequestId for MakeRequestUuidV4 {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// The path and query of a request, used both as the cache key and as the
/// suffix appended to the upstream origin.
pub fn cache_key(uri: &Uri) -> &str {
    uri.path_and_query().map(|pq| pq.as_str()).unwrap_or("/")
}
