//! Response mapping.
//!
//! # Responsibilities
//! - Map orchestrator errors to HTTP status codes
//! - Keep upstream error detail out of client-visible bodies
//!
//! # Design Decisions
//! - Request timeouts return 504 Gateway Timeout, everything else 500
//! - Both carry the same opaque body
//! - Non-GET methods get 405 with a JSON body of their own

use axum::body::Bytes;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::orchestrator::GatewayError;

/// The only error body a client ever sees.
pub const INTERNAL_ERROR_BODY: &[u8] = br#"{"error": "internal error"}"#;

pub const METHOD_NOT_ALLOWED_BODY: &[u8] = br#"{"error": "method not allowed"}"#;

impl GatewayError {
    /// Status code reported to the client.
    pub fn status_code(&self) -> StatusCode {
        if self.is_timeout() {
            StatusCode::GATEWAY_TIMEOUT
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        (self.status_code(), Bytes::from_static(INTERNAL_ERROR_BODY)).into_response()
    }
}

/// Answer for any method other than GET (or HEAD).
pub async fn method_not_allowed() -> Response {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        [(header::ALLOW, "GET,HEAD")],
        Bytes::from_static(METHOD_NOT_ALLOWED_BODY),
    )
        .into_response()
}
