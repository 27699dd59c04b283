//! Request-level errors.

use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::upstream::UpstreamError;

/// Why a request could not be answered with places.
///
/// Cloneable so one fetch result can be handed to every request waiting on
/// it. Clients only ever see the status code; the detail stays in the logs.
#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    #[error(transparent)]
    Upstream(Arc<UpstreamError>),

    /// The request deadline elapsed before the fetch finished.
    #[error("no answer within {0:?}")]
    Timeout(Duration),

    #[error("failed to encode response: {0}")]
    Encode(Arc<serde_json::Error>),

    /// The fetch task went away without reporting (it panicked).
    #[error("fetch task ended without a result")]
    WorkerLost,
}

impl GatewayError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, GatewayError::Timeout(_))
    }
}

impl From<UpstreamError> for GatewayError {
    fn from(err: UpstreamError) -> Self {
        GatewayError::Upstream(Arc::new(err))
    }
}

impl From<serde_json::Error> for GatewayError {
    fn from(err: serde_json::Error) -> Self {
        GatewayError::Encode(Arc::new(err))
    }
}
