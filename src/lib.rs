//! Caching gateway in front of a place-search API.

pub mod cache;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod orchestrator;
pub mod places;
pub mod upstream;

pub use cache::ResponseCache;
pub use config::GatewayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use orchestrator::{GatewayError, Orchestrator, Outcome};
pub use upstream::{PlacesClient, Upstream, UpstreamError};
