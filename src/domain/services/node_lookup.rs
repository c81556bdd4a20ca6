//! Node Lookup Service
//!
//! Pure domain logic for answering "what is the status of node X" from a
//! snapshot.

use crate::domain::entities::{ClusterSnapshot, NodeRecord};
use crate::domain::errors::NodeMapError;

const SHORT_HEAD: usize = 6;
const SHORT_TAIL: usize = 6;

/// Placeholder shown for fields a node did not report.
pub const NOT_AVAILABLE: &str = "N/A";

/// Display class of a lookup result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupStatus {
    /// Node found and `Ready`
    Ready,
    /// Node found in any other state
    Waiting,
    /// No node with the requested id
    NotFound,
}

/// Result of looking up one requested id.
#[derive(Debug, Clone, PartialEq)]
pub struct LookupResult {
    /// The id as requested
    pub query: String,
    /// First matching node, if any
    pub node: Option<NodeRecord>,
}

impl LookupResult {
    pub fn status(&self) -> LookupStatus {
        match &self.node {
            Some(node) if node.state.is_ready() => LookupStatus::Ready,
            Some(_) => LookupStatus::Waiting,
            None => LookupStatus::NotFound,
        }
    }

    pub fn short_query(&self) -> String {
        shorten_id(&self.query)
    }

    pub fn ip(&self) -> &str {
        match &self.node {
            Some(node) if !node.ip.is_empty() => &node.ip,
            _ => NOT_AVAILABLE,
        }
    }

    pub fn state(&self) -> &str {
        self.node
            .as_ref()
            .map(|n| n.state.as_str())
            .unwrap_or("Unknown")
    }

    pub fn public_port(&self) -> String {
        display_opt(self.node.as_ref().and_then(|n| n.public_port))
    }

    pub fn p2p_port(&self) -> String {
        display_opt(self.node.as_ref().and_then(|n| n.p2p_port))
    }

    pub fn session(&self) -> &str {
        self.node
            .as_ref()
            .and_then(|n| n.session.as_deref())
            .filter(|s| !s.is_empty())
            .unwrap_or(NOT_AVAILABLE)
    }
}

fn display_opt<T: std::fmt::Display>(value: Option<T>) -> String {
    value
        .map(|v| v.to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// Lookup of requested node ids against a snapshot.
pub struct NodeFinder;

impl NodeFinder {
    /// Split a free-form id list on whitespace, `,` and `;`.
    ///
    /// Returns `InvalidInput` when no id remains.
    pub fn parse_ids(raw: &str) -> Result<Vec<String>, NodeMapError> {
        let ids: Vec<String> = raw
            .split(|c: char| c.is_whitespace() || c == ',' || c == ';')
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();

        if ids.is_empty() {
            return Err(NodeMapError::InvalidInput(
                "please enter at least one node id".to_string(),
            ));
        }
        Ok(ids)
    }

    /// Look up each requested id, in request order.
    ///
    /// The first node with a matching id wins when the snapshot has
    /// duplicates.
    pub fn find_all(snapshot: &ClusterSnapshot, ids: &[String]) -> Vec<LookupResult> {
        ids.iter()
            .map(|id| LookupResult {
                query: id.clone(),
                node: snapshot.find(id).cloned(),
            })
            .collect()
    }
}

/// Abbreviate a long id as `abcdef...uvwxyz`.
///
/// Ids of 15 characters or fewer are returned unchanged.
pub fn shorten_id(id: &str) -> String {
    let len = id.chars().count();
    if len <= SHORT_HEAD + SHORT_TAIL + 3 {
        return id.to_string();
    }
    let head: String = id.chars().take(SHORT_HEAD).collect();
    let tail: String = id.chars().skip(len - SHORT_TAIL).collect();
    format!("{}...{}", head, tail)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::NodeState;

    fn snapshot() -> ClusterSnapshot {
        let mut full = NodeRecord::new("abc123def456", "8.8.8.8", NodeState::Ready);
        full.public_port = Some(9000);
        full.p2p_port = Some(9001);
        full.session = Some("1712345678".to_string());

        ClusterSnapshot::new(vec![
            full,
            NodeRecord::new("waiting-node", "1.1.1.1", NodeState::from_str("WaitingForDownload")),
            NodeRecord::new("abc123def456", "9.9.9.9", NodeState::Ready),
        ])
    }

    // ===== parse_ids Tests =====

    #[test]
    fn test_parse_ids_mixed_separators() {
        let ids = NodeFinder::parse_ids("  a1, b2;c3\nd4\t e5 ,, ;").unwrap();
        assert_eq!(ids, vec!["a1", "b2", "c3", "d4", "e5"]);
    }

    #[test]
    fn test_parse_ids_empty_input() {
        assert!(matches!(
            NodeFinder::parse_ids(" ,; \n"),
            Err(NodeMapError::InvalidInput(_))
        ));
        assert!(NodeFinder::parse_ids("").is_err());
    }

    #[test]
    fn test_parse_ids_keeps_repeats() {
        let ids = NodeFinder::parse_ids("a a").unwrap();
        assert_eq!(ids.len(), 2);
    }

    // ===== find_all Tests =====

    #[test]
    fn test_find_ready_node() {
        let results = NodeFinder::find_all(&snapshot(), &["abc123def456".to_string()]);
        let result = &results[0];

        assert_eq!(result.status(), LookupStatus::Ready);
        assert_eq!(result.state(), "Ready");
        assert_eq!(result.ip(), "8.8.8.8");
        assert_eq!(result.public_port(), "9000");
        assert_eq!(result.p2p_port(), "9001");
        assert_eq!(result.session(), "1712345678");
    }

    #[test]
    fn test_find_first_duplicate_wins() {
        let results = NodeFinder::find_all(&snapshot(), &["abc123def456".to_string()]);
        assert_eq!(results[0].ip(), "8.8.8.8");
    }

    #[test]
    fn test_find_waiting_node_has_placeholders() {
        let results = NodeFinder::find_all(&snapshot(), &["waiting-node".to_string()]);
        let result = &results[0];

        assert_eq!(result.status(), LookupStatus::Waiting);
        assert_eq!(result.state(), "WaitingForDownload");
        assert_eq!(result.public_port(), NOT_AVAILABLE);
        assert_eq!(result.p2p_port(), NOT_AVAILABLE);
        assert_eq!(result.session(), NOT_AVAILABLE);
    }

    #[test]
    fn test_find_not_found() {
        let results = NodeFinder::find_all(&snapshot(), &["missing".to_string()]);
        assert_eq!(results[0].status(), LookupStatus::NotFound);
        assert_eq!(results[0].ip(), NOT_AVAILABLE);
        assert_eq!(results[0].state(), "Unknown");
    }

    #[test]
    fn test_find_all_preserves_request_order() {
        let ids = vec!["missing".to_string(), "waiting-node".to_string()];
        let results = NodeFinder::find_all(&snapshot(), &ids);

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].query, "missing");
        assert_eq!(results[1].query, "waiting-node");
    }

    // ===== shorten_id Tests =====

    #[test]
    fn test_shorten_long_id() {
        let id = "2a4f0c9d1e7b3a5c8f6d0e2b4a6c8e0f";
        assert_eq!(shorten_id(id), "2a4f0c...6c8e0f");
    }

    #[test]
    fn test_shorten_boundary() {
        assert_eq!(shorten_id("abcdefghijklmno"), "abcdefghijklmno");
        assert_eq!(shorten_id("abcdefghijklmnop"), "abcdef...klmnop");
        assert_eq!(shorten_id(""), "");
    }

    #[test]
    fn test_shorten_non_ascii() {
        let id = "ééééééééééééééééé";
        assert_eq!(shorten_id(id), "éééééé...éééééé");
    }
}
