//! HTTP Cluster Source
//!
//! Implements ClusterSource by fetching the cluster info endpoint,
//! optionally through a CORS relay.

use crate::adapters::outbound::http_fetcher::HttpFetcher;
use crate::domain::entities::ClusterSnapshot;
use crate::domain::errors::NodeMapError;
use crate::domain::ports::ClusterSource;
use async_trait::async_trait;

/// Node list fetched from the cluster's `/cluster/info` endpoint.
pub struct HttpClusterSource {
    fetcher: HttpFetcher,
    url: String,
}

impl HttpClusterSource {
    pub fn new(fetcher: HttpFetcher, url: impl Into<String>) -> Self {
        Self {
            fetcher,
            url: url.into(),
        }
    }
}

#[async_trait]
impl ClusterSource for HttpClusterSource {
    async fn fetch(&self) -> Result<ClusterSnapshot, NodeMapError> {
        let body = self.fetcher.get(&self.url).await?;
        let snapshot = ClusterSnapshot::parse(&body)?;

        tracing::debug!(
            "fetched {} nodes from {} (relayed={})",
            snapshot.len(),
            self.url,
            self.fetcher.is_relayed()
        );

        Ok(snapshot)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::adapters::outbound::cors_relay::CorsRelay;
    use crate::adapters::outbound::http_fetcher::build_client;
    use std::time::Duration;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const CLUSTER_URL: &str = "http://68.183.10.93:9000/cluster/info";

    fn nodes_json() -> serde_json::Value {
        serde_json::json!([
            {"id": "abc123def456", "ip": "8.8.8.8", "state": "Ready", "publicPort": 9000, "p2pPort": 9001, "session": "17"},
            {"id": "fff000", "ip": "1.1.1.1", "state": "WaitingForDownload"}
        ])
    }

    fn relayed_source(mock_server: &MockServer) -> HttpClusterSource {
        let client = build_client(Duration::from_secs(5)).unwrap();
        let relay = CorsRelay::new(format!("{}/get", mock_server.uri()), "contents");
        HttpClusterSource::new(HttpFetcher::relayed(client, relay), CLUSTER_URL)
    }

    #[tokio::test]
    async fn test_fetch_direct_success() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/cluster/info"))
            .respond_with(ResponseTemplate::new(200).set_body_json(nodes_json()))
            .mount(&mock_server)
            .await;

        let client = build_client(Duration::from_secs(5)).unwrap();
        let source = HttpClusterSource::new(
            HttpFetcher::direct(client),
            format!("{}/cluster/info", mock_server.uri()),
        );

        let snapshot = source.fetch().await.unwrap();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.nodes()[0].public_port, Some(9000));
        assert_eq!(snapshot.unique_ips(), vec!["8.8.8.8", "1.1.1.1"]);
    }

    #[tokio::test]
    async fn test_fetch_direct_server_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
            .mount(&mock_server)
            .await;

        let client = build_client(Duration::from_secs(5)).unwrap();
        let source = HttpClusterSource::new(HttpFetcher::direct(client), mock_server.uri());

        let err = source.fetch().await.unwrap_err();
        assert!(err.is_transport());
    }

    #[tokio::test]
    async fn test_fetch_direct_not_an_array() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"error": "busy"})),
            )
            .mount(&mock_server)
            .await;

        let client = build_client(Duration::from_secs(5)).unwrap();
        let source = HttpClusterSource::new(HttpFetcher::direct(client), mock_server.uri());

        assert!(source.fetch().await.unwrap_err().is_format());
    }

    #[tokio::test]
    async fn test_fetch_relayed_success() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/get"))
            .and(query_param("url", CLUSTER_URL))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "contents": nodes_json().to_string(),
                "status": {"http_code": 200}
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let snapshot = relayed_source(&mock_server).fetch().await.unwrap();
        assert_eq!(snapshot.find("abc123def456").unwrap().ip, "8.8.8.8");
    }

    #[tokio::test]
    async fn test_fetch_relayed_missing_wrapper_is_format_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/get"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"status": {"http_code": 200}})),
            )
            .mount(&mock_server)
            .await;

        let err = relayed_source(&mock_server).fetch().await.unwrap_err();
        assert!(err.is_format(), "expected format error, got {:?}", err);
    }

    #[tokio::test]
    async fn test_fetch_relayed_wrapped_garbage_is_format_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/get"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"contents": "<html>oops</html>"})),
            )
            .mount(&mock_server)
            .await;

        assert!(relayed_source(&mock_server).fetch().await.unwrap_err().is_format());
    }

    #[tokio::test]
    async fn test_fetch_relayed_target_down_is_transport_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/get"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "contents": null,
                "status": {"http_code": 504}
            })))
            .mount(&mock_server)
            .await;

        assert!(relayed_source(&mock_server).fetch().await.unwrap_err().is_transport());
    }
}
