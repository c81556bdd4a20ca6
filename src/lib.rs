//! cluster-geomap Library
//!
//! Fetches a cluster's node list, resolves node IPs to coordinates through
//! rate limited third-party geolocation services, and prepares the result
//! for a map or a per-node status lookup.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

// Re-export commonly used types
pub use application::{NodeLocationResolver, NodeMapService, Resolution};
pub use config::{load_config, Config, ConfigError};
pub use domain::entities::{ClusterSnapshot, GeoIndex, GeoResult, NodeRecord};
pub use domain::errors::NodeMapError;
pub use domain::ports::{ClusterSource, GeoProvider, RateLimiter};
pub use domain::services::{LookupResult, LookupStatus, MapLayout, MapView, NodeFinder};
pub use domain::value_objects::{GeoProviderKind, NodeState};
