//! Application Layer
//!
//! Use cases orchestrating the domain ports.

mod location_resolver;
mod node_map_service;

pub use location_resolver::{NodeLocationResolver, Resolution};
pub use node_map_service::NodeMapService;
