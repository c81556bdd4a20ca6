mod cors_relay;
mod http_cluster_source;
mod http_fetcher;
mod ip_api_batch_provider;
mod ip_api_provider;
mod ipapi_co_provider;

pub use cors_relay::{CorsRelay, DEFAULT_RELAY_ENDPOINT, DEFAULT_RELAY_FIELD};
pub use http_cluster_source::HttpClusterSource;
pub use http_fetcher::{build_client, HttpFetcher};
pub use ip_api_batch_provider::{IpApiBatchProvider, IP_API_BATCH_LIMIT};
pub use ip_api_provider::IpApiProvider;
pub use ipapi_co_provider::IpApiCoProvider;

use crate::domain::ports::GeoProvider;
use crate::domain::value_objects::GeoProviderKind;
use std::sync::Arc;

/// Build the geolocation strategy selected by configuration.
///
/// A relayed `fetcher` yields the proxied variant of the strategy.
pub fn build_geo_provider(
    kind: GeoProviderKind,
    fetcher: HttpFetcher,
    base_url: Option<&str>,
    batch_size: usize,
) -> Arc<dyn GeoProvider> {
    let base_url = base_url.unwrap_or_else(|| kind.default_base_url());
    match kind {
        GeoProviderKind::IpApi => Arc::new(IpApiProvider::new(fetcher, base_url)),
        GeoProviderKind::IpApiCo => Arc::new(IpApiCoProvider::new(fetcher, base_url)),
        GeoProviderKind::IpApiBatch => {
            Arc::new(IpApiBatchProvider::new(fetcher, base_url).with_batch_size(batch_size))
        }
    }
}
