//! Node Map Service - Main application use case
//!
//! Composes the cluster source, the location resolver and the pure
//! domain services into the two user-facing operations: plotting every
//! node on a map, and looking up individual nodes by id.

use crate::application::location_resolver::{NodeLocationResolver, Resolution};
use crate::domain::entities::ClusterSnapshot;
use crate::domain::errors::NodeMapError;
use crate::domain::ports::{ClusterSource, GeoProvider, RateLimiter};
use crate::domain::services::{LookupResult, MapLayout, MapView, NodeFinder};
use std::sync::Arc;

/// Node map service - main application use case.
///
/// Each call performs one fresh snapshot fetch; nothing is cached between
/// calls.
pub struct NodeMapService {
    source: Arc<dyn ClusterSource>,
    provider: Arc<dyn GeoProvider>,
    resolver: NodeLocationResolver,
}

impl NodeMapService {
    /// Create a new node map service.
    pub fn new(
        source: Arc<dyn ClusterSource>,
        provider: Arc<dyn GeoProvider>,
        limiter: Arc<dyn RateLimiter>,
    ) -> Self {
        Self {
            source,
            provider,
            resolver: NodeLocationResolver::new(limiter),
        }
    }

    /// Fetch the current snapshot.
    pub async fn snapshot(&self) -> Result<ClusterSnapshot, NodeMapError> {
        self.source.fetch().await
    }

    /// Fetch the snapshot and resolve the locations of its nodes.
    ///
    /// Fetch failures abort; geolocation failures only shrink the result.
    pub async fn locate_nodes(&self) -> Result<(ClusterSnapshot, Resolution), NodeMapError> {
        let snapshot = self.source.fetch().await?;
        let resolution = self
            .resolver
            .resolve_snapshot(&snapshot, self.provider.as_ref())
            .await?;
        Ok((snapshot, resolution))
    }

    /// Fetch, resolve and lay out the map.
    pub async fn build_map(&self) -> Result<MapView, NodeMapError> {
        let (snapshot, resolution) = self.locate_nodes().await?;

        let mut view = MapLayout::build(&snapshot, &resolution.index);
        view.stats.failed_units = resolution.failed_units;

        tracing::info!(
            "plotted {} of {} nodes ({} of {} ips located)",
            view.stats.plotted_nodes,
            view.stats.total_nodes,
            view.stats.located_ips,
            view.stats.unique_ips
        );

        Ok(view)
    }

    /// Look up the ids in a free-form list against a fresh snapshot.
    ///
    /// The id list is validated before anything is fetched.
    pub async fn lookup(&self, raw_ids: &str) -> Result<Vec<LookupResult>, NodeMapError> {
        let ids = NodeFinder::parse_ids(raw_ids)?;
        let snapshot = self.source.fetch().await?;
        let results = NodeFinder::find_all(&snapshot, &ids);

        tracing::debug!(
            "looked up {} ids, {} found",
            results.len(),
            results.iter().filter(|r| r.node.is_some()).count()
        );

        Ok(results)
    }
}
