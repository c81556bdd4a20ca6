//! Geolocation Provider Port
//!
//! Defines the interface for resolving IP addresses to coordinates.

use crate::domain::entities::GeoIndex;
use crate::domain::errors::NodeMapError;
use async_trait::async_trait;

/// Resolver for IP address to geographic location.
///
/// This is an outbound port that abstracts third-party geolocation
/// services. Strategies differ in how many IPs one call carries
/// (see [`max_batch`](GeoProvider::max_batch)).
#[async_trait]
pub trait GeoProvider: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Maximum number of IPs accepted by one call to [`locate`](GeoProvider::locate).
    fn max_batch(&self) -> usize;

    /// Resolve a unit of IPs.
    ///
    /// IPs that cannot be resolved are omitted from the returned fragment.
    /// Only fails with `Transport` when the request itself could not be
    /// completed.
    async fn locate(&self, ips: &[String]) -> Result<GeoIndex, NodeMapError>;
}
