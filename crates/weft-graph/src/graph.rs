//! The cross-function data-flow graph.
//!
//! `FlowGraph` wraps petgraph and adds id/name indexes for resolution
//! and queries. Path enumeration works over the already-built graph;
//! nothing is recomputed per query.

use crate::edge::FlowEdge;
use crate::node::{FunctionNode, NodeRole};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// The project-wide function graph.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct FlowGraph {
    pub(crate) graph: DiGraph<FunctionNode, FlowEdge>,

    /// Maps function ids to graph indexes.
    id_index: HashMap<String, NodeIndex>,

    /// Maps bare function names to graph indexes. Several nodes may
    /// share a name across files.
    name_index: HashMap<String, Vec<NodeIndex>>,
}

impl FlowGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a function node, indexing it by id and name.
    pub fn add_node(&mut self, node: FunctionNode) -> NodeIndex {
        let id = node.id.clone();
        let name = node.name.clone();

        let index = self.graph.add_node(node);
        self.id_index.insert(id, index);
        self.name_index.entry(name).or_default().push(index);

        index
    }

    /// Adds an edge between two function ids. Unresolvable endpoints
    /// are skipped; the resulting graph is partial by design.
    pub fn add_edge(&mut self, edge: FlowEdge) {
        let (Some(&from), Some(&to)) = (self.id_index.get(&edge.from), self.id_index.get(&edge.to))
        else {
            debug!(from = %edge.from, to = %edge.to, "skipping edge with unresolved endpoint");
            return;
        };
        self.graph.add_edge(from, to, edge);
    }

    pub fn get_by_id(&self, id: &str) -> Option<&FunctionNode> {
        let index = self.id_index.get(id)?;
        self.graph.node_weight(*index)
    }

    /// All nodes sharing a bare name.
    pub fn find_by_name(&self, name: &str) -> Vec<&FunctionNode> {
        self.name_index
            .get(name)
            .map(|indexes| {
                indexes
                    .iter()
                    .filter_map(|idx| self.graph.node_weight(*idx))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Functions with edges into the named node.
    pub fn callers_of(&self, id: &str) -> Vec<&FunctionNode> {
        self.neighbors(id, Direction::Incoming)
    }

    /// Functions the named node has edges to.
    pub fn callees_of(&self, id: &str) -> Vec<&FunctionNode> {
        self.neighbors(id, Direction::Outgoing)
    }

    fn neighbors(&self, id: &str, direction: Direction) -> Vec<&FunctionNode> {
        let Some(&index) = self.id_index.get(id) else {
            return Vec::new();
        };
        let mut seen = HashSet::new();
        self.graph
            .neighbors_directed(index, direction)
            .filter(|idx| seen.insert(*idx))
            .filter_map(|idx| self.graph.node_weight(idx))
            .collect()
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &FunctionNode> {
        self.graph.node_weights()
    }

    pub fn edges(&self) -> impl Iterator<Item = &FlowEdge> {
        self.graph.edge_weights()
    }

    /// Enumerates all simple paths from `from` to `to` (by function
    /// name), as lists of function names. A visited set keeps cyclic
    /// call graphs from recursing forever. Returns an empty list when
    /// either endpoint is unknown or no directed path exists.
    pub fn find_paths(&self, from: &str, to: &str) -> Vec<Vec<String>> {
        let (Some(start), Some(goal)) = (self.first_by_name(from), self.first_by_name(to)) else {
            return Vec::new();
        };

        let mut paths = Vec::new();
        let mut visited = HashSet::new();
        visited.insert(start);
        let mut trail = vec![start];
        self.dfs_paths(start, goal, &mut visited, &mut trail, &mut paths);
        paths
    }

    fn first_by_name(&self, name: &str) -> Option<NodeIndex> {
        let indexes = self.name_index.get(name)?;
        if indexes.len() > 1 {
            debug!(name, count = indexes.len(), "ambiguous function name in path query");
        }
        indexes.first().copied()
    }

    fn dfs_paths(
        &self,
        current: NodeIndex,
        goal: NodeIndex,
        visited: &mut HashSet<NodeIndex>,
        trail: &mut Vec<NodeIndex>,
        paths: &mut Vec<Vec<String>>,
    ) {
        if current == goal {
            paths.push(
                trail
                    .iter()
                    .filter_map(|&idx| self.graph.node_weight(idx))
                    .map(|node| node.name.clone())
                    .collect(),
            );
            return;
        }

        // Parallel edges produce duplicate neighbors; visit each once.
        let mut stepped = HashSet::new();
        for neighbor in self.graph.neighbors_directed(current, Direction::Outgoing) {
            if visited.contains(&neighbor) || !stepped.insert(neighbor) {
                continue;
            }
            visited.insert(neighbor);
            trail.push(neighbor);
            self.dfs_paths(neighbor, goal, visited, trail, paths);
            trail.pop();
            visited.remove(&neighbor);
        }
    }

    /// Serializable snapshot for downstream consumers.
    pub fn export(&self) -> ProjectGraph {
        let nodes: Vec<FunctionNode> = self.graph.node_weights().cloned().collect();
        let edges: Vec<FlowEdge> = self.graph.edge_weights().cloned().collect();

        let mut roles = RoleTally::default();
        for node in &nodes {
            match node.role {
                NodeRole::Entry => roles.entry += 1,
                NodeRole::Exit => roles.exit += 1,
                NodeRole::Intermediate => roles.intermediate += 1,
                NodeRole::Isolated => roles.isolated += 1,
            }
        }

        ProjectGraph {
            meta: GraphMeta {
                node_count: nodes.len(),
                edge_count: edges.len(),
                roles,
            },
            nodes,
            edges,
        }
    }
}

/// The downstream output contract: nodes, edges, and summary metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectGraph {
    pub nodes: Vec<FunctionNode>,
    pub edges: Vec<FlowEdge>,
    pub meta: GraphMeta,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphMeta {
    pub node_count: usize,
    pub edge_count: usize,
    pub roles: RoleTally,
}

/// Node counts per role.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct RoleTally {
    pub entry: usize,
    pub exit: usize,
    pub intermediate: usize,
    pub isolated: usize,
}
