//! Configuration
//!
//! Runtime settings read from `NODEMAP_*` environment variables.

use crate::adapters::outbound::{DEFAULT_RELAY_ENDPOINT, DEFAULT_RELAY_FIELD, IP_API_BATCH_LIMIT};
use crate::domain::value_objects::GeoProviderKind;
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_CLUSTER_URL: &str = "http://68.183.10.93:9000/cluster/info";

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    // Cluster endpoint
    pub cluster_url: String,
    pub cluster_via_relay: bool,

    // CORS relay
    pub relay_url: String,
    pub relay_field: String,

    // Geolocation
    pub geo_provider: String,
    pub geo_base_url: Option<String>,
    pub geo_via_relay: bool,
    pub throttle_ms: u64,
    pub batch_size: usize,

    // Runtime
    pub http_timeout_secs: u64,
    pub lookup_ids: Option<String>,
    pub poll_secs: u64,
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cluster_url: DEFAULT_CLUSTER_URL.to_string(),
            cluster_via_relay: true,
            relay_url: DEFAULT_RELAY_ENDPOINT.to_string(),
            relay_field: DEFAULT_RELAY_FIELD.to_string(),
            geo_provider: GeoProviderKind::default().as_str().to_string(),
            geo_base_url: None,
            geo_via_relay: false,
            throttle_ms: 1500,
            batch_size: IP_API_BATCH_LIMIT,
            http_timeout_secs: 10,
            lookup_ids: None,
            poll_secs: 0,
            debug: false,
        }
    }
}

impl Config {
    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cluster_url.trim().is_empty() {
            return Err(ConfigError::MissingClusterUrl);
        }
        self.provider_kind()?;
        if self.batch_size == 0 || self.batch_size > IP_API_BATCH_LIMIT {
            return Err(ConfigError::InvalidBatchSize(self.batch_size));
        }
        Ok(())
    }

    /// The configured geolocation strategy.
    pub fn provider_kind(&self) -> Result<GeoProviderKind, ConfigError> {
        GeoProviderKind::parse(&self.geo_provider)
            .ok_or_else(|| ConfigError::UnknownProvider(self.geo_provider.clone()))
    }

    pub fn throttle_interval(&self) -> Duration {
        Duration::from_millis(self.throttle_ms)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    /// Some(interval) when the cycle should repeat.
    pub fn poll_interval(&self) -> Option<Duration> {
        (self.poll_secs > 0).then(|| Duration::from_secs(self.poll_secs))
    }
}

/// Configuration validation errors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("cluster_url is required")]
    MissingClusterUrl,
    #[error("unknown geo provider `{0}` (expected ip-api, ipapi-co or ip-api-batch)")]
    UnknownProvider(String),
    #[error("batch_size must be between 1 and 100, got {0}")]
    InvalidBatchSize(usize),
}

fn env_flag(name: &str, default: bool) -> bool {
    std::env::var(name)
        .map(|v| v == "1" || v.to_lowercase() == "true")
        .unwrap_or(default)
}

pub fn load_config() -> anyhow::Result<Config> {
    let cluster_url = std::env::var("NODEMAP_CLUSTER_URL")
        .unwrap_or_else(|_| DEFAULT_CLUSTER_URL.to_string());

    let cluster_via_relay = env_flag("NODEMAP_CLUSTER_VIA_RELAY", true);

    let relay_url = std::env::var("NODEMAP_RELAY_URL")
        .unwrap_or_else(|_| DEFAULT_RELAY_ENDPOINT.to_string());

    let relay_field = std::env::var("NODEMAP_RELAY_FIELD")
        .unwrap_or_else(|_| DEFAULT_RELAY_FIELD.to_string());

    let geo_provider = std::env::var("NODEMAP_GEO_PROVIDER")
        .unwrap_or_else(|_| GeoProviderKind::default().as_str().to_string());

    let geo_base_url = std::env::var("NODEMAP_GEO_BASE_URL").ok();

    let geo_via_relay = env_flag("NODEMAP_GEO_VIA_RELAY", false);

    let throttle_ms = std::env::var("NODEMAP_THROTTLE_MS")
        .unwrap_or_else(|_| "1500".to_string())
        .parse()
        .unwrap_or(1500);

    let batch_size = std::env::var("NODEMAP_BATCH_SIZE")
        .unwrap_or_else(|_| "100".to_string())
        .parse()
        .unwrap_or(IP_API_BATCH_LIMIT);

    let http_timeout_secs = std::env::var("NODEMAP_HTTP_TIMEOUT_SECS")
        .unwrap_or_else(|_| "10".to_string())
        .parse()
        .unwrap_or(10);

    let lookup_ids = std::env::var("NODEMAP_LOOKUP_IDS")
        .ok()
        .filter(|v| !v.trim().is_empty());

    let poll_secs = std::env::var("NODEMAP_POLL_SECS")
        .unwrap_or_else(|_| "0".to_string())
        .parse()
        .unwrap_or(0);

    let debug = std::env::var("DEBUG").is_ok();

    Ok(Config {
        cluster_url,
        cluster_via_relay,
        relay_url,
        relay_field,
        geo_provider,
        geo_base_url,
        geo_via_relay,
        throttle_ms,
        batch_size,
        http_timeout_secs,
        lookup_ids,
        poll_secs,
        debug,
    })
}
