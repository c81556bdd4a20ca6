//! Value Objects - Immutable domain primitives
//!
//! Value objects are identified by their value rather than identity.
//! They are immutable and can be freely shared.

use serde::{Deserialize, Serialize};

/// Lifecycle state reported for a cluster node.
///
/// The upstream enumeration is open: only `Ready` carries meaning here,
/// every other value is preserved verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NodeState {
    /// Node is serving (`Ready`)
    Ready,
    /// State was not reported
    Unknown,
    /// Any other reported state (e.g. `WaitingForDownload`)
    Other(String),
}

impl NodeState {
    /// Parse a state as reported by the cluster endpoint.
    ///
    /// # Examples
    /// ```
    /// use cluster_geomap::NodeState;
    ///
    /// assert_eq!(NodeState::from_str("Ready"), NodeState::Ready);
    /// assert!(!NodeState::from_str("Observing").is_ready());
    /// ```
    pub fn from_str(s: &str) -> Self {
        match s {
            "Ready" => Self::Ready,
            "" | "Unknown" => Self::Unknown,
            other => Self::Other(other.to_string()),
        }
    }

    /// Convert to string representation.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Ready => "Ready",
            Self::Unknown => "Unknown",
            Self::Other(s) => s.as_str(),
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }
}

impl Default for NodeState {
    fn default() -> Self {
        Self::Unknown
    }
}

impl From<String> for NodeState {
    fn from(s: String) -> Self {
        Self::from_str(&s)
    }
}

impl From<NodeState> for String {
    fn from(state: NodeState) -> Self {
        state.as_str().to_string()
    }
}

impl std::fmt::Display for NodeState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Geolocation strategy selected by configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeoProviderKind {
    /// ip-api.com, one query-string request per IP
    IpApi,
    /// ipapi.co, one path-based request per IP
    IpApiCo,
    /// ip-api.com batch endpoint, up to 100 IPs per POST
    IpApiBatch,
}

impl GeoProviderKind {
    /// Parse a provider name. Returns None for unknown names.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "ip-api" | "ipapi" => Some(Self::IpApi),
            "ipapi-co" | "ipapi.co" => Some(Self::IpApiCo),
            "ip-api-batch" | "batch" => Some(Self::IpApiBatch),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::IpApi => "ip-api",
            Self::IpApiCo => "ipapi-co",
            Self::IpApiBatch => "ip-api-batch",
        }
    }

    /// Base URL used when none is configured.
    pub fn default_base_url(&self) -> &'static str {
        match self {
            // ip-api.com only serves plain HTTP on the free tier
            Self::IpApi | Self::IpApiBatch => "http://ip-api.com",
            Self::IpApiCo => "https://ipapi.co",
        }
    }
}

impl Default for GeoProviderKind {
    fn default() -> Self {
        Self::IpApiBatch
    }
}

impl std::fmt::Display for GeoProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
