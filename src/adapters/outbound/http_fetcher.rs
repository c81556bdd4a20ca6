//! HTTP Fetcher
//!
//! Issues GET/POST requests either directly or through a CORS relay and
//! returns the target's response body.

use crate::adapters::outbound::cors_relay::CorsRelay;
use crate::domain::errors::NodeMapError;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

/// Build the shared HTTP client.
pub fn build_client(timeout: Duration) -> Result<reqwest::Client, NodeMapError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| NodeMapError::Transport(format!("client error: {}", e)))
}

/// Body-level HTTP access shared by the cluster source and geo providers.
///
/// When a relay is configured every request is sent to the relay instead,
/// and the relay envelope is unwrapped before the body is returned.
#[derive(Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    relay: Option<Arc<CorsRelay>>,
}

impl HttpFetcher {
    pub fn direct(client: reqwest::Client) -> Self {
        Self {
            client,
            relay: None,
        }
    }

    pub fn relayed(client: reqwest::Client, relay: CorsRelay) -> Self {
        Self {
            client,
            relay: Some(Arc::new(relay)),
        }
    }

    pub fn is_relayed(&self) -> bool {
        self.relay.is_some()
    }

    /// GET `url` and return the target body.
    pub async fn get(&self, url: &str) -> Result<String, NodeMapError> {
        let request = match &self.relay {
            Some(relay) => self.client.get(relay.wrap_url(url)?),
            None => self.client.get(url),
        };
        self.send(request, "GET", url).await
    }

    /// POST `body` as JSON to `url` and return the target body.
    ///
    /// Through a relay the POST is sent to the relay URL wrapping `url`.
    pub async fn post_json<B>(&self, url: &str, body: &B) -> Result<String, NodeMapError>
    where
        B: Serialize + ?Sized,
    {
        let request = match &self.relay {
            Some(relay) => self.client.post(relay.wrap_url(url)?),
            None => self.client.post(url),
        };
        self.send(request.json(body), "POST", url).await
    }

    async fn send(
        &self,
        request: reqwest::RequestBuilder,
        method: &str,
        target: &str,
    ) -> Result<String, NodeMapError> {
        let response = request
            .send()
            .await
            .map_err(|e| NodeMapError::Transport(format!("{} {} failed: {}", method, target, e)))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(NodeMapError::Transport(format!(
                "{} {} returned {}",
                method, target, status
            )));
        }

        let body = response.text().await.map_err(|e| {
            NodeMapError::Transport(format!("reading body of {} failed: {}", target, e))
        })?;

        match &self.relay {
            Some(relay) => relay.unwrap_body(&body),
            None => Ok(body),
        }
    }
}
