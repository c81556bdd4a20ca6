//! Cluster Source Port
//!
//! Defines the interface for retrieving the current node list.

use crate::domain::entities::ClusterSnapshot;
use crate::domain::errors::NodeMapError;
use async_trait::async_trait;

/// Source of cluster snapshots.
///
/// This is an outbound port that abstracts where the node list comes from.
/// Implementations may talk to the cluster endpoint directly or through a
/// relay. No retry happens at this layer; callers decide whether to fetch
/// again.
#[async_trait]
pub trait ClusterSource: Send + Sync {
    /// Fetch and validate one snapshot.
    ///
    /// Fails with `Transport` when the request does not complete with a
    /// success status and with `Format` when the payload is not a list of
    /// node records.
    async fn fetch(&self) -> Result<ClusterSnapshot, NodeMapError>;
}
