//! Node Location Resolver
//!
//! Drives a GeoProvider over a list of IPs one unit at a time, spacing
//! units with a RateLimiter and accumulating whatever resolves.

use crate::domain::entities::{unique_in_order, ClusterSnapshot, GeoIndex};
use crate::domain::errors::NodeMapError;
use crate::domain::ports::{GeoProvider, RateLimiter};
use std::collections::HashSet;
use std::sync::Arc;

/// Outcome of one resolution run.
///
/// IPs in `requested` without an entry in `index` are the resolution gap.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resolution {
    /// Successfully resolved IPs
    pub index: GeoIndex,
    /// Deduplicated IPs, in first-occurrence order
    pub requested: Vec<String>,
    /// Number of provider calls issued
    pub units: usize,
    /// Number of provider calls that failed as a whole
    pub failed_units: usize,
}

impl Resolution {
    /// IPs that were requested but have no location.
    pub fn gaps(&self) -> Vec<&str> {
        self.requested
            .iter()
            .map(String::as_str)
            .filter(|ip| !self.index.contains(ip))
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.index.len() == self.requested.len()
    }
}

/// Sequential, rate limited IP resolution.
///
/// Units are issued one at a time and never concurrently. Every unit,
/// the first included, takes a permit from the limiter, so consecutive
/// units are spaced whether or not the previous one succeeded. A failed
/// unit is logged and skipped.
pub struct NodeLocationResolver {
    limiter: Arc<dyn RateLimiter>,
}

impl NodeLocationResolver {
    pub fn new(limiter: Arc<dyn RateLimiter>) -> Self {
        Self { limiter }
    }

    /// Resolve `ips` and return only the index.
    pub async fn resolve(
        &self,
        ips: &[String],
        provider: &dyn GeoProvider,
    ) -> Result<GeoIndex, NodeMapError> {
        Ok(self.resolve_report(ips, provider).await?.index)
    }

    /// Resolve the unique IPs of a snapshot.
    ///
    /// Nodes without an IP are skipped; they stay unlocated instead of
    /// failing the whole run.
    pub async fn resolve_snapshot(
        &self,
        snapshot: &ClusterSnapshot,
        provider: &dyn GeoProvider,
    ) -> Result<Resolution, NodeMapError> {
        let (ips, blank): (Vec<String>, Vec<String>) = snapshot
            .unique_ips()
            .into_iter()
            .partition(|ip| !ip.trim().is_empty());
        if !blank.is_empty() {
            tracing::debug!(
                "skipping {} blank ip(s) in snapshot of {} nodes",
                blank.len(),
                snapshot.len()
            );
        }
        self.resolve_report(&ips, provider).await
    }

    /// Resolve `ips`, reporting gaps and failed units.
    ///
    /// Fails only when an entry is blank, before any provider call.
    pub async fn resolve_report(
        &self,
        ips: &[String],
        provider: &dyn GeoProvider,
    ) -> Result<Resolution, NodeMapError> {
        if let Some(pos) = ips.iter().position(|ip| ip.trim().is_empty()) {
            return Err(NodeMapError::InvalidInput(format!(
                "ip list entry #{} is empty",
                pos
            )));
        }

        let requested = unique_in_order(ips.iter().map(String::as_str));
        let mut resolution = Resolution {
            requested,
            ..Default::default()
        };

        if resolution.requested.is_empty() {
            return Ok(resolution);
        }

        let unit_size = self.unit_size(provider);
        let total_units = resolution.requested.len().div_ceil(unit_size);
        let mut index = GeoIndex::new();

        for (n, unit) in resolution.requested.chunks(unit_size).enumerate() {
            self.limiter.throttle().await;
            resolution.units += 1;

            match provider.locate(unit).await {
                Ok(fragment) => {
                    let allowed: HashSet<&str> = unit.iter().map(String::as_str).collect();
                    let stray = index.absorb(fragment, &allowed);
                    if stray > 0 {
                        tracing::warn!(
                            "{}: discarded {} results for ips outside unit {}/{}",
                            provider.name(),
                            stray,
                            n + 1,
                            total_units
                        );
                    }
                }
                Err(e) => {
                    resolution.failed_units += 1;
                    tracing::warn!(
                        "{}: unit {}/{} ({} ips) failed: {}",
                        provider.name(),
                        n + 1,
                        total_units,
                        unit.len(),
                        e
                    );
                }
            }
        }

        resolution.index = index;

        tracing::info!(
            "{}: resolved {}/{} ips in {} units ({} failed)",
            provider.name(),
            resolution.index.len(),
            resolution.requested.len(),
            resolution.units,
            resolution.failed_units
        );

        Ok(resolution)
    }

    fn unit_size(&self, provider: &dyn GeoProvider) -> usize {
        let size = provider.max_batch().max(1);
        match self.limiter.max_batch() {
            Some(cap) => size.min(cap.max(1)),
            None => size,
        }
    }
}
