//! ip-api.com Batch Geo Provider
//!
//! Implements GeoProvider with `POST /batch`, carrying up to 100 IPs
//! per request.

use crate::adapters::outbound::http_fetcher::HttpFetcher;
use crate::adapters::outbound::ip_api_provider::{IpApiRecord, IP_API_FIELDS};
use crate::domain::entities::GeoIndex;
use crate::domain::errors::NodeMapError;
use crate::domain::ports::GeoProvider;
use async_trait::async_trait;
use std::collections::HashSet;

/// Hard cap of the ip-api.com batch endpoint.
pub const IP_API_BATCH_LIMIT: usize = 100;

/// ip-api.com batch lookup provider.
///
/// The response is an array parallel to the request; each element carries
/// its own success/failure status.
pub struct IpApiBatchProvider {
    fetcher: HttpFetcher,
    base_url: String,
    batch_size: usize,
}

impl IpApiBatchProvider {
    pub fn new(fetcher: HttpFetcher, base_url: impl Into<String>) -> Self {
        Self {
            fetcher,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            batch_size: IP_API_BATCH_LIMIT,
        }
    }

    /// Use smaller batches than the endpoint allows. Clamped to 1..=100.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.clamp(1, IP_API_BATCH_LIMIT);
        self
    }

    fn batch_url(&self) -> String {
        format!("{}/batch?fields={}", self.base_url, IP_API_FIELDS)
    }
}

#[async_trait]
impl GeoProvider for IpApiBatchProvider {
    fn name(&self) -> &str {
        "ip-api-batch"
    }

    fn max_batch(&self) -> usize {
        self.batch_size
    }

    async fn locate(&self, ips: &[String]) -> Result<GeoIndex, NodeMapError> {
        if ips.is_empty() {
            return Ok(GeoIndex::new());
        }
        if ips.len() > self.batch_size {
            return Err(NodeMapError::InvalidInput(format!(
                "batch of {} exceeds limit of {}",
                ips.len(),
                self.batch_size
            )));
        }

        let body = self
            .fetcher
            .post_json(&self.batch_url(), ips)
            .await
            .map_err(NodeMapError::into_transport)?;

        let items: Vec<serde_json::Value> = serde_json::from_str(&body).map_err(|e| {
            NodeMapError::Transport(format!("malformed ip-api batch response: {}", e))
        })?;

        if items.len() != ips.len() {
            tracing::debug!(
                "ip-api-batch: asked for {} ips, got {} results",
                ips.len(),
                items.len()
            );
        }

        let requested: HashSet<&str> = ips.iter().map(String::as_str).collect();
        let mut index = GeoIndex::new();

        for (pos, item) in items.into_iter().enumerate() {
            let record: IpApiRecord = match serde_json::from_value(item) {
                Ok(r) => r,
                Err(e) => {
                    tracing::debug!("ip-api-batch: skipping result #{}: {}", pos, e);
                    continue;
                }
            };

            // Prefer the echoed query; fall back to the request position
            let ip = match record.query.as_deref() {
                Some(q) if requested.contains(q) => q.to_string(),
                Some(q) => {
                    tracing::debug!("ip-api-batch: ignoring result for unrequested ip {}", q);
                    continue;
                }
                None => match ips.get(pos) {
                    Some(ip) => ip.clone(),
                    None => continue,
                },
            };

            match record.into_geo(&ip) {
                Ok(result) => {
                    index.insert(result);
                }
                Err(reason) => tracing::debug!("ip-api-batch: no location for {}: {}", ip, reason),
            }
        }

        Ok(index)
    }
}
