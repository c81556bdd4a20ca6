//! Map Layout Service
//!
//! Joins a snapshot with its GeoIndex into display-ready markers.
//! This service has no external dependencies.

use crate::domain::entities::{ClusterSnapshot, GeoIndex, NodeRecord};
use crate::domain::services::node_lookup::shorten_id;
use crate::domain::value_objects::NodeState;
use serde::Serialize;
use std::collections::HashMap;

/// World view used when nothing is plotted.
pub const DEFAULT_CENTER: (f64, f64) = (20.0, 0.0);
pub const DEFAULT_ZOOM: u8 = 2;
/// Zoom used to focus a single marker.
pub const SINGLE_MARKER_ZOOM: u8 = 5;

/// A node listed in a marker popup.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerNode {
    pub id: String,
    pub short_id: String,
    pub state: NodeState,
}

/// One map marker; all nodes sharing an IP share the marker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapMarker {
    pub ip: String,
    pub lat: f64,
    pub lon: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    pub nodes: Vec<MarkerNode>,
}

impl MapMarker {
    /// Popup text for the marker.
    pub fn popup(&self) -> String {
        let place = match (&self.city, &self.country) {
            (Some(city), Some(country)) => format!(" ({}, {})", city, country),
            (Some(place), None) | (None, Some(place)) => format!(" ({})", place),
            (None, None) => String::new(),
        };
        let ready = self.nodes.iter().filter(|n| n.state.is_ready()).count();
        format!(
            "{}{}: {} node(s), {} ready",
            self.ip,
            place,
            self.nodes.len(),
            ready
        )
    }
}

/// Counts shown alongside the map.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PlotStats {
    pub total_nodes: usize,
    pub unique_ips: usize,
    pub located_ips: usize,
    pub plotted_nodes: usize,
    pub unlocated_ips: Vec<String>,
    /// Provider calls that failed as a whole during resolution
    pub failed_units: usize,
}

/// Everything needed to draw the map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapView {
    pub markers: Vec<MapMarker>,
    pub center: (f64, f64),
    pub zoom: u8,
    pub stats: PlotStats,
}

/// Builds map views from a snapshot and its resolved locations.
pub struct MapLayout;

impl MapLayout {
    /// Join nodes with their locations.
    ///
    /// Markers follow the first-occurrence order of their IP in the
    /// snapshot. Nodes whose IP has no location are counted, not plotted.
    pub fn build(snapshot: &ClusterSnapshot, index: &GeoIndex) -> MapView {
        let mut markers: Vec<MapMarker> = Vec::new();
        let mut by_ip: HashMap<&str, usize> = HashMap::new();
        let mut unlocated: Vec<String> = Vec::new();
        let mut plotted_nodes = 0;

        for node in snapshot.nodes() {
            let Some(geo) = index.get(&node.ip) else {
                if !unlocated.contains(&node.ip) {
                    unlocated.push(node.ip.clone());
                }
                continue;
            };

            let slot = *by_ip.entry(node.ip.as_str()).or_insert_with(|| {
                markers.push(MapMarker {
                    ip: node.ip.clone(),
                    lat: geo.lat,
                    lon: geo.lon,
                    city: geo.city.clone(),
                    country: geo.country.clone(),
                    nodes: Vec::new(),
                });
                markers.len() - 1
            });
            markers[slot].nodes.push(marker_node(node));
            plotted_nodes += 1;
        }

        let (center, zoom) = Self::viewport(&markers);

        MapView {
            stats: PlotStats {
                total_nodes: snapshot.len(),
                unique_ips: markers.len() + unlocated.len(),
                located_ips: markers.len(),
                plotted_nodes,
                unlocated_ips: unlocated,
                failed_units: 0,
            },
            markers,
            center,
            zoom,
        }
    }

    /// Centre and zoom for a set of markers.
    pub fn viewport(markers: &[MapMarker]) -> ((f64, f64), u8) {
        match markers {
            [] => (DEFAULT_CENTER, DEFAULT_ZOOM),
            [only] => ((only.lat, only.lon), SINGLE_MARKER_ZOOM),
            many => {
                let n = many.len() as f64;
                let lat = many.iter().map(|m| m.lat).sum::<f64>() / n;
                let lon = many.iter().map(|m| m.lon).sum::<f64>() / n;
                ((lat, lon), DEFAULT_ZOOM)
            }
        }
    }
}

fn marker_node(node: &NodeRecord) -> MarkerNode {
    MarkerNode {
        id: node.id.clone(),
        short_id: shorten_id(&node.id),
        state: node.state.clone(),
    }
}
