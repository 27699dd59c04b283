//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Response cache settings.
    pub cache: CacheConfig,

    /// Upstream place-search service.
    pub upstream: UpstreamConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl GatewayConfig {
    /// Whether per-request diagnostics (processing time) should be logged.
    pub fn verbose(&self) -> bool {
        matches!(
            self.observability.log_level.to_ascii_lowercase().as_str(),
            "debug" | "trace"
        )
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address, e.g. "0.0.0.0:8080". A bare ":port" binds all interfaces.
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: ":80".to_string(),
        }
    }
}

/// Response cache configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Serve repeated queries from memory.
    pub enabled: bool,

    /// Maximum number of cached responses before LRU eviction.
    pub capacity: usize,

    /// Collapse concurrent misses for the same key into one upstream fetch.
    pub single_flight: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            capacity: 1000,
            single_flight: true,
        }
    }
}

/// Upstream service configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Origin every request path is appended to (scheme + host, no trailing path).
    pub origin: String,

    /// Budget for a single upstream fetch in milliseconds.
    ///
    /// A fetch keeps running after the client has been answered with a
    /// timeout, so it can still fill the cache; this bounds how long.
    pub fetch_timeout_ms: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            origin: "https://places.aviasales.ru".to_string(),
            fetch_timeout_ms: 10_000,
        }
    }
}

impl UpstreamConfig {
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Time a client waits for an answer, in milliseconds.
    pub request_ms: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_ms: 3000 }
    }
}

impl TimeoutConfig {
    pub fn request(&self) -> Duration {
        Duration::from_millis(self.request_ms)
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Json,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Log line encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// One JSON object per line, for log aggregation.
    Json,
    /// Human-readable output for development.
    Pretty,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_documented_values() {
        let config = GatewayConfig::default();
        assert_eq!(config.listener.bind_address, ":80");
        assert_eq!(config.cache.capacity, 1000);
        assert!(config.cache.enabled);
        assert_eq!(config.timeouts.request(), Duration::from_millis(3000));
        assert_eq!(config.observability.log_format, LogFormat::Json);
        assert!(!config.verbose());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: GatewayConfig = toml::from_str(
            r#"
            [timeouts]
            request_ms = 250

            [observability]
            log_level = "DEBUG"
            log_format = "pretty"
            "#,
        )
        .unwrap();

        assert_eq!(config.timeouts.request_ms, 250);
        assert_eq!(config.cache.capacity, 1000);
        assert_eq!(config.upstream.origin, "https://places.aviasales.ru");
        assert_eq!(config.observability.log_format, LogFormat::Pretty);
        assert!(config.verbose());
    }
}
