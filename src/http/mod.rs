//! HTTP front end.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, wildcard GET handler)
//!     → request.rs (request ID, path + query key)
//!     → orchestrator (cache / fetch / deadline race)
//!     → response.rs (error → status mapping, opaque body)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{cache_key, MakeRequestUuidV4, X_REQUEST_ID};
pub use response::{INTERNAL_ERROR_BODY, METHOD_NOT_ALLOWED_BODY};
pub use server::HttpServer;
