//! ipapi.co Geo Provider
//!
//! Implements GeoProvider with one path-based `GET /{ip}/json/` per IP.

use crate::adapters::outbound::http_fetcher::HttpFetcher;
use crate::domain::entities::{GeoIndex, GeoResult};
use crate::domain::errors::NodeMapError;
use crate::domain::ports::GeoProvider;
use async_trait::async_trait;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct IpApiCoResponse {
    #[serde(default)]
    error: bool,
    reason: Option<String>,
    latitude: Option<serde_json::Value>,
    longitude: Option<serde_json::Value>,
    city: Option<String>,
    country_name: Option<String>,
    country: Option<String>,
}

/// ipapi.co single lookup provider.
pub struct IpApiCoProvider {
    fetcher: HttpFetcher,
    base_url: String,
}

impl IpApiCoProvider {
    pub fn new(fetcher: HttpFetcher, base_url: impl Into<String>) -> Self {
        Self {
            fetcher,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn lookup_url(&self, ip: &str) -> String {
        format!("{}/{}/json/", self.base_url, ip)
    }
}

#[async_trait]
impl GeoProvider for IpApiCoProvider {
    fn name(&self) -> &str {
        "ipapi-co"
    }

    fn max_batch(&self) -> usize {
        1
    }

    async fn locate(&self, ips: &[String]) -> Result<GeoIndex, NodeMapError> {
        let mut index = GeoIndex::new();

        for ip in ips {
            let body = self
                .fetcher
                .get(&self.lookup_url(ip))
                .await
                .map_err(NodeMapError::into_transport)?;

            let resp: IpApiCoResponse = serde_json::from_str(&body).map_err(|e| {
                NodeMapError::Transport(format!("malformed ipapi.co response for {}: {}", ip, e))
            })?;

            if resp.error {
                tracing::debug!(
                    "ipapi-co: no location for {}: {}",
                    ip,
                    resp.reason.as_deref().unwrap_or("error")
                );
                continue;
            }

            match GeoResult::from_json(ip.as_str(), resp.latitude.as_ref(), resp.longitude.as_ref()) {
                Some(result) => {
                    let country = resp.country_name.or(resp.country);
                    index.insert(result.with_city(resp.city).with_country(country));
                }
                None => tracing::debug!(
                    "ipapi-co: no location for {}: missing or non-numeric coordinates",
                    ip
                ),
            }
        }

        Ok(index)
    }
}
