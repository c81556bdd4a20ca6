//! Console Reporter
//!
//! Renders lookup results, map views and failures as plain text for the
//! terminal.

use crate::domain::errors::NodeMapError;
use crate::domain::services::{LookupResult, LookupStatus, MapView};
use std::fmt::Write;

const SEPARATOR: &str = "----------------------------------------";

/// Plain text rendering of service results.
pub struct ConsoleReporter;

impl ConsoleReporter {
    /// One block per requested id, separated by a rule.
    pub fn render_lookups(results: &[LookupResult]) -> String {
        let mut out = String::new();

        for (i, result) in results.iter().enumerate() {
            if i > 0 {
                out.push_str(SEPARATOR);
                out.push('\n');
            }

            let _ = writeln!(out, "Result for ID: {}", result.short_query());
            match result.status() {
                LookupStatus::NotFound => {
                    out.push_str("  Node ID not found in the current list.\n");
                }
                status => {
                    let _ = writeln!(out, "  IP: {}", result.ip());
                    let _ = writeln!(out, "  Public Port: {}", result.public_port());
                    let _ = writeln!(out, "  P2P Port: {}", result.p2p_port());
                    let _ = writeln!(out, "  Session: {}", result.session());
                    let marker = if status == LookupStatus::Ready { "+" } else { "~" };
                    let _ = writeln!(out, "  Status: [{}] {}", marker, result.state());
                }
            }
        }

        out
    }

    /// Marker list followed by the plot statistics.
    pub fn render_map(view: &MapView) -> String {
        let mut out = String::new();

        for marker in &view.markers {
            let _ = writeln!(
                out,
                "[{:>9.4}, {:>9.4}] {}",
                marker.lat,
                marker.lon,
                marker.popup()
            );
            for node in &marker.nodes {
                let _ = writeln!(out, "    {} {}", node.short_id, node.state);
            }
        }

        let stats = &view.stats;
        let _ = writeln!(
            out,
            "Plotted {} of {} nodes; located {} of {} unique IPs.",
            stats.plotted_nodes, stats.total_nodes, stats.located_ips, stats.unique_ips
        );
        if !stats.unlocated_ips.is_empty() {
            let _ = writeln!(out, "No location for: {}", stats.unlocated_ips.join(", "));
        }
        if stats.failed_units > 0 {
            let _ = writeln!(
                out,
                "{} geolocation request(s) failed; see log for details.",
                stats.failed_units
            );
        }
        let _ = writeln!(
            out,
            "View: centre ({:.2}, {:.2}) zoom {}",
            view.center.0, view.center.1, view.zoom
        );

        out
    }

    /// Single summary line shown to the user for an aborted operation.
    pub fn render_failure(err: &NodeMapError) -> String {
        match err {
            NodeMapError::InvalidInput(msg) => format!("Error: {}.", msg),
            NodeMapError::Transport(_) => {
                "Error: could not reach the cluster endpoint. Could not retrieve or process node data. Check the log.".to_string()
            }
            NodeMapError::Format(_) => {
                "Error: the cluster endpoint returned unexpected data. Could not retrieve or process node data. Check the log.".to_string()
            }
        }
    }
}
