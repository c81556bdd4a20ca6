//! ip-api.com Geo Provider
//!
//! Implements GeoProvider with one `GET /json/{ip}` request per IP.

use crate::adapters::outbound::http_fetcher::HttpFetcher;
use crate::domain::entities::{GeoIndex, GeoResult};
use crate::domain::errors::NodeMapError;
use crate::domain::ports::GeoProvider;
use async_trait::async_trait;
use serde::Deserialize;

/// Fields requested from ip-api.com, single and batch endpoints alike.
pub(crate) const IP_API_FIELDS: &str = "status,message,lat,lon,city,country,query";

/// One ip-api.com result, as returned by `/json` and inside `/batch` arrays.
#[derive(Debug, Deserialize)]
pub(crate) struct IpApiRecord {
    status: Option<String>,
    message: Option<String>,
    lat: Option<serde_json::Value>,
    lon: Option<serde_json::Value>,
    city: Option<String>,
    country: Option<String>,
    pub(crate) query: Option<String>,
}

impl IpApiRecord {
    /// Convert into a result keyed by `ip`, or the reason it is unresolved.
    pub(crate) fn into_geo(self, ip: &str) -> Result<GeoResult, String> {
        match self.status.as_deref() {
            Some("success") => {}
            Some(status) => {
                return Err(format!(
                    "status {} ({})",
                    status,
                    self.message.as_deref().unwrap_or("no message")
                ))
            }
            None => return Err("no status".to_string()),
        }

        let result = GeoResult::from_json(ip, self.lat.as_ref(), self.lon.as_ref())
            .ok_or_else(|| "missing or non-numeric coordinates".to_string())?;

        Ok(result.with_city(self.city).with_country(self.country))
    }
}

/// ip-api.com single lookup provider.
pub struct IpApiProvider {
    fetcher: HttpFetcher,
    base_url: String,
}

impl IpApiProvider {
    pub fn new(fetcher: HttpFetcher, base_url: impl Into<String>) -> Self {
        Self {
            fetcher,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn lookup_url(&self, ip: &str) -> String {
        format!("{}/json/{}?fields={}", self.base_url, ip, IP_API_FIELDS)
    }
}

#[async_trait]
impl GeoProvider for IpApiProvider {
    fn name(&self) -> &str {
        "ip-api"
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

            let record: IpApiRecord = serde_json::from_str(&body).map_err(|e| {
                NodeMapError::Transport(format!("malformed ip-api response for {}: {}", ip, e))
            })?;

            match record.into_geo(ip) {
                Ok(result) => {
                    index.insert(result);
                }
                Err(reason) => tracing::debug!("ip-api: no location for {}: {}", ip, reason),
            }
        }

        Ok(index)
    }
}
