//! Domain Entities - Core business objects
//!
//! These entities represent the core concepts of the node map domain.
//! They have no external dependencies beyond serde and contain only
//! business logic.

use crate::domain::errors::NodeMapError;
use crate::domain::value_objects::NodeState;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// A single participant of the monitored cluster.
///
/// Parsed from one element of the cluster info payload and never mutated
/// afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeRecord {
    /// Opaque node identifier (usually a long hex public key)
    pub id: String,
    /// Address the node announces
    pub ip: String,
    /// Reported lifecycle state
    #[serde(default)]
    pub state: NodeState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_port: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub p2p_port: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session: Option<String>,
}

impl NodeRecord {
    pub fn new(id: impl Into<String>, ip: impl Into<String>, state: NodeState) -> Self {
        Self {
            id: id.into(),
            ip: ip.into(),
            state,
            public_port: None,
            p2p_port: None,
            session: None,
        }
    }
}

/// One point-in-time fetch of the full node list.
///
/// Order is preserved as received and duplicate ids are kept.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ClusterSnapshot {
    nodes: Vec<NodeRecord>,
}

impl ClusterSnapshot {
    pub fn new(nodes: Vec<NodeRecord>) -> Self {
        Self { nodes }
    }

    /// Decode a snapshot from the raw cluster info body.
    pub fn parse(body: &str) -> Result<Self, NodeMapError> {
        let value: serde_json::Value = serde_json::from_str(body)
            .map_err(|e| NodeMapError::Format(format!("cluster payload is not JSON: {}", e)))?;
        Self::from_value(value)
    }

    /// Validate an already decoded payload as a sequence of node records.
    pub fn from_value(value: serde_json::Value) -> Result<Self, NodeMapError> {
        let items = match value {
            serde_json::Value::Array(items) => items,
            other => {
                return Err(NodeMapError::Format(format!(
                    "expected an array of nodes, got {}",
                    json_kind(&other)
                )))
            }
        };

        let mut nodes = Vec::with_capacity(items.len());
        for (idx, item) in items.into_iter().enumerate() {
            let node: NodeRecord = serde_json::from_value(item)
                .map_err(|e| NodeMapError::Format(format!("node #{}: {}", idx, e)))?;
            nodes.push(node);
        }

        Ok(Self { nodes })
    }

    /// Distinct node IPs in order of first occurrence.
    pub fn unique_ips(&self) -> Vec<String> {
        unique_in_order(self.nodes.iter().map(|n| n.ip.as_str()))
    }

    /// First node carrying the given id.
    pub fn find(&self, id: &str) -> Option<&NodeRecord> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn nodes(&self) -> &[NodeRecord] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Deduplicate strings keeping the first occurrence of each.
pub fn unique_in_order<'a, I>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for item in items {
        if seen.insert(item) {
            out.push(item.to_string());
        }
    }
    out
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

/// Coordinates resolved for one IP address.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeoResult {
    #[serde(skip)]
    pub ip: String,
    pub lat: f64,
    pub lon: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

impl GeoResult {
    /// Build a result, rejecting non-finite coordinates.
    pub fn new(ip: impl Into<String>, lat: f64, lon: f64) -> Option<Self> {
        if !lat.is_finite() || !lon.is_finite() {
            return None;
        }
        Some(Self {
            ip: ip.into(),
            lat,
            lon,
            city: None,
            country: None,
        })
    }

    /// Build a result from loosely typed JSON coordinates.
    ///
    /// Absent, null, non-numeric and non-finite values all mean "unresolved".
    pub fn from_json(
        ip: impl Into<String>,
        lat: Option<&serde_json::Value>,
        lon: Option<&serde_json::Value>,
    ) -> Option<Self> {
        let lat = lat.and_then(serde_json::Value::as_f64)?;
        let lon = lon.and_then(serde_json::Value::as_f64)?;
        Self::new(ip, lat, lon)
    }

    pub fn with_city(mut self, city: Option<String>) -> Self {
        self.city = city.filter(|c| !c.is_empty());
        self
    }

    pub fn with_country(mut self, country: Option<String>) -> Self {
        self.country = country.filter(|c| !c.is_empty());
        self
    }
}

/// Resolved ip → coordinates mapping.
///
/// Each ip is written at most once; failed lookups leave no entry, so
/// presence is the success signal.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct GeoIndex {
    entries: HashMap<String, GeoResult>,
}

impl GeoIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a result. Returns false, keeping the existing entry, when the
    /// ip is already present.
    pub fn insert(&mut self, result: GeoResult) -> bool {
        if self.entries.contains_key(&result.ip) {
            return false;
        }
        self.entries.insert(result.ip.clone(), result);
        true
    }

    pub fn get(&self, ip: &str) -> Option<&GeoResult> {
        self.entries.get(ip)
    }

    pub fn contains(&self, ip: &str) -> bool {
        self.entries.contains_key(ip)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn ips(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn results(&self) -> impl Iterator<Item = &GeoResult> {
        self.entries.values()
    }

    /// Move entries for the allowed ips into `self`, dropping the rest.
    ///
    /// Returns the number of entries dropped because their ip was not
    /// allowed.
    pub fn absorb(&mut self, other: GeoIndex, allowed: &HashSet<&str>) -> usize {
        let mut dropped = 0;
        for (ip, result) in other.entries {
            if allowed.contains(ip.as_str()) {
                self.insert(result);
            } else {
                dropped += 1;
            }
        }
        dropped
    }
}

impl FromIterator<GeoResult> for GeoIndex {
    fn from_iter<T: IntoIterator<Item = GeoResult>>(iter: T) -> Self {
        let mut index = GeoIndex::new();
        for result in iter {
            index.insert(result);
        }
        index
    }
}
