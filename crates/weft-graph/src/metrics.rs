//! Centrality and connectivity metrics.
//!
//! Centrality here is degree centrality (in + out), a cheap proxy for
//! coupling: a function many others flow through is a bottleneck
//! candidate regardless of what the flows carry.

use crate::graph::FlowGraph;
use petgraph::Direction;
use serde::{Deserialize, Serialize};

/// One node's centrality breakdown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CentralityEntry {
    pub id: String,
    pub name: String,
    pub in_degree: usize,
    pub out_degree: usize,
    /// in_degree + out_degree.
    pub centrality: usize,
}

/// Graph-wide connectivity metrics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphMetrics {
    /// Top 5 nodes by centrality, ties broken by id for determinism.
    pub central_nodes: Vec<CentralityEntry>,

    /// Total edges divided by total nodes; 0 for an empty graph.
    pub average_connectivity: f64,

    /// Nodes with no edges at all.
    pub isolated_count: usize,
}

impl FlowGraph {
    pub fn metrics(&self) -> GraphMetrics {
        let mut entries: Vec<CentralityEntry> = self
            .graph
            .node_indices()
            .filter_map(|index| {
                let node = self.graph.node_weight(index)?;
                let in_degree = self.graph.edges_directed(index, Direction::Incoming).count();
                let out_degree = self.graph.edges_directed(index, Direction::Outgoing).count();
                Some(CentralityEntry {
                    id: node.id.clone(),
                    name: node.name.clone(),
                    in_degree,
                    out_degree,
                    centrality: in_degree + out_degree,
                })
            })
            .collect();

        let isolated_count = entries.iter().filter(|e| e.centrality == 0).count();

        let average_connectivity = if entries.is_empty() {
            0.0
        } else {
            self.edge_count() as f64 / entries.len() as f64
        };

        entries.sort_by(|a, b| {
            b.centrality
                .cmp(&a.centrality)
                .then_with(|| a.id.cmp(&b.id))
        });
        entries.truncate(5);

        GraphMetrics {
            central_nodes: entries,
            average_connectivity,
            isolated_count,
        }
    }
}
