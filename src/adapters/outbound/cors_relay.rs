//! CORS Relay
//!
//! Wraps target URLs for a relay that fetches them server-side, and
//! unwraps the JSON envelope the relay returns.

use crate::domain::errors::NodeMapError;
use reqwest::Url;

/// Public relay used when none is configured.
pub const DEFAULT_RELAY_ENDPOINT: &str = "https://api.allorigins.win/get";

/// Envelope field holding the target's body.
pub const DEFAULT_RELAY_FIELD: &str = "contents";

/// A relay of the `GET <endpoint>?url=<target>` kind.
///
/// The relay answers with a JSON object whose `field` holds the target's
/// response body as a string.
#[derive(Debug, Clone)]
pub struct CorsRelay {
    endpoint: String,
    field: String,
}

impl CorsRelay {
    pub fn new(endpoint: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            field: field.into(),
        }
    }

    /// Build the relay URL for a target, percent-encoding the target.
    pub fn wrap_url(&self, target: &str) -> Result<Url, NodeMapError> {
        Url::parse_with_params(&self.endpoint, &[("url", target)]).map_err(|e| {
            NodeMapError::Transport(format!("invalid relay endpoint {}: {}", self.endpoint, e))
        })
    }

    /// Extract the target body from a relay envelope.
    ///
    /// A target status reported by the relay outside 2xx is a transport
    /// failure; a missing or non-string body field is a format failure.
    pub fn unwrap_body(&self, body: &str) -> Result<String, NodeMapError> {
        let envelope: serde_json::Value = serde_json::from_str(body)
            .map_err(|e| NodeMapError::Format(format!("relay response is not JSON: {}", e)))?;

        let obj = envelope.as_object().ok_or_else(|| {
            NodeMapError::Format("relay response is not a JSON object".to_string())
        })?;

        if let Some(code) = obj
            .get("status")
            .and_then(|s| s.get("http_code"))
            .and_then(serde_json::Value::as_u64)
        {
            if !(200..300).contains(&code) {
                return Err(NodeMapError::Transport(format!(
                    "relay target returned HTTP {}",
                    code
                )));
            }
        }

        match obj.get(&self.field) {
            Some(serde_json::Value::String(inner)) => Ok(inner.clone()),
            Some(serde_json::Value::Null) | None => Err(NodeMapError::Format(format!(
                "relay response has no `{}` field",
                self.field
            ))),
            Some(_) => Err(NodeMapError::Format(format!(
                "relay field `{}` is not a string",
                self.field
            ))),
        }
    }
}

impl Default for CorsRelay {
    fn default() -> Self {
        Self::new(DEFAULT_RELAY_ENDPOINT, DEFAULT_RELAY_FIELD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_wrap_url_percent_encodes_target() {
        let relay = CorsRelay::default();
        let url = relay
            .wrap_url("http://68.183.10.93:9000/cluster/info")
            .unwrap();

        assert_eq!(
            url.as_str(),
            "https://api.allorigins.win/get?url=http%3A%2F%2F68.183.10.93%3A9000%2Fcluster%2Finfo"
        );
    }

    #[test]
    fn test_wrap_url_keeps_target_query() {
        let relay = CorsRelay::new("http://relay.local/get", "contents");
        let url = relay
            .wrap_url("http://ip-api.com/json/8.8.8.8?fields=lat,lon")
            .unwrap();

        let (key, value) = url.query_pairs().next().unwrap();
        assert_eq!(key, "url");
        assert_eq!(value, "http://ip-api.com/json/8.8.8.8?fields=lat,lon");
    }

    #[test]
    fn test_wrap_url_invalid_endpoint() {
        let relay = CorsRelay::new("not a url", "contents");
        let err = relay.wrap_url("http://example.com").unwrap_err();
        assert!(err.is_transport());
    }

    #[test]
    fn test_unwrap_body_success() {
        let relay = CorsRelay::default();
        let body = json!({
            "contents": "[{\"id\":\"a\",\"ip\":\"1.1.1.1\"}]",
            "status": {"url": "http://x", "content_type": "application/json", "http_code": 200}
        })
        .to_string();

        assert_eq!(
            relay.unwrap_body(&body).unwrap(),
            "[{\"id\":\"a\",\"ip\":\"1.1.1.1\"}]"
        );
    }

    #[test]
    fn test_unwrap_body_missing_field_is_format_error() {
        let relay = CorsRelay::default();
        let err = relay
            .unwrap_body(&json!({"status": {"http_code": 200}}).to_string())
            .unwrap_err();

        assert!(err.is_format());
        assert!(err.to_string().contains("contents"));
    }

    #[test]
    fn test_unwrap_body_null_field_is_format_error() {
        let relay = CorsRelay::default();
        let err = relay.unwrap_body(r#"{"contents": null}"#).unwrap_err();
        assert!(err.is_format());
    }

    #[test]
    fn test_unwrap_body_non_string_field_is_format_error() {
        let relay = CorsRelay::default();
        let err = relay.unwrap_body(r#"{"contents": [1, 2]}"#).unwrap_err();
        assert!(err.is_format());
    }

    #[test]
    fn test_unwrap_body_not_json_is_format_error() {
        let relay = CorsRelay::default();
        assert!(relay.unwrap_body("Too Many Requests").unwrap_err().is_format());
        assert!(relay.unwrap_body("[]").unwrap_err().is_format());
    }

    #[test]
    fn test_unwrap_body_target_failure_is_transport_error() {
        let relay = CorsRelay::default();
        let body = json!({"contents": "", "status": {"http_code": 502}}).to_string();

        let err = relay.unwrap_body(&body).unwrap_err();
        assert!(err.is_transport());
        assert!(err.to_string().contains("502"));
    }

    #[test]
    fn test_unwrap_body_custom_field() {
        let relay = CorsRelay::new("http://relay.local/get", "body");
        assert_eq!(relay.unwrap_body(r#"{"body": "[]"}"#).unwrap(), "[]");
        assert!(relay.unwrap_body(r#"{"contents": "[]"}"#).is_err());
    }
}
