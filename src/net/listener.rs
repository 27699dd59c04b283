//! TCP listener setup.
//!
//! # Responsibilities
//! - Accept Go-style `:port` addresses as "all interfaces"
//! - Bind to the configured address
//! - Report the actual bound address (port 0 resolves here)

use std::net::SocketAddr;
use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::ListenerConfig;

/// Error type for listener operations.
#[derive(Debug, Error)]
pub enum ListenerError {
    /// The configured address does not parse.
    #[error("Invalid bind address '{address}': {source}")]
    Address {
        address: String,
        source: std::net::AddrParseError,
    },

    /// Failed to bind to address.
    #[error("Failed to bind: {0}")]
    Bind(#[from] std::io::Error),
}

/// Expand a bare `:port` into `0.0.0.0:port`; other addresses pass through.
pub fn normalize_bind_address(address: &str) -> String {
    if address.starts_with(':') {
        format!("0.0.0.0{}", address)
    } else {
        address.to_string()
    }
}

/// Bind a TCP listener for the configured address.
pub async fn bind(config: &ListenerConfig) -> Result<TcpListener, ListenerError> {
    let address = normalize_bind_address(&config.bind_address);
    let addr: SocketAddr = address.parse().map_err(|source| ListenerError::Address {
        address: config.bind_address.clone(),
        source,
    })?;

    let listener = TcpListener::bind(addr).await?;
    let local_addr = listener.local_addr()?;

    tracing::info!(address = %local_addr, "Listener bound");

    Ok(listener)
}
