//! Builds the cross-function graph from atoms, chains, and call-site
//! analyses.
//!
//! Construction is two-pass on the edge side: call edges come from the
//! argument mappings, then a supplementary scan emits return-flow edges
//! for every callee whose result a caller consumes. The two passes are
//! not deduplicated against each other; a single call site can yield
//! both a call edge and a return-flow edge describing the same
//! relationship from opposite directions.

use crate::edge::{EdgeKind, FlowEdge};
use crate::error::GraphError;
use crate::graph::FlowGraph;
use crate::mapping::DataFlowAnalysis;
use crate::node::{ChainMembership, FunctionNode, NodeRole};
use crate::usage::UsageTracker;
use std::collections::{HashMap, HashSet};
use tracing::debug;
use weft_core::{Atom, Chain};

/// Builds a `FlowGraph` from the full project's atoms, chains, and
/// per-call-site analyses.
pub struct GraphBuilder {
    tracker: UsageTracker,
}

impl GraphBuilder {
    pub fn new() -> Result<Self, GraphError> {
        Ok(Self {
            tracker: UsageTracker::new()?,
        })
    }

    /// Constructs the graph. Mappings whose endpoints cannot be
    /// resolved to atoms are skipped; the result is partial, never an
    /// error.
    pub fn build(&self, atoms: &[Atom], chains: &[Chain], analyses: &[DataFlowAnalysis]) -> FlowGraph {
        let mut graph = FlowGraph::new();

        // Resolution indexes: qualified file::name key first, bare name
        // as fallback. Bare names are ambiguous across files; last
        // definition wins, same as upstream extraction.
        let mut by_key: HashMap<String, &Atom> = HashMap::new();
        let mut by_name: HashMap<String, &Atom> = HashMap::new();
        let project_names: HashSet<&str> = atoms.iter().map(|a| a.name.as_str()).collect();

        for atom in atoms {
            by_key.insert(atom.key(), atom);
            by_name.insert(atom.name.clone(), atom);
            graph.add_node(build_node(atom, chains, &project_names));
        }

        // Pass 1: call edges from argument mappings.
        for analysis in analyses {
            let mapping = &analysis.mapping;
            let caller = resolve(&by_key, &by_name, &mapping.caller_key, &mapping.caller);
            let callee = resolve(&by_key, &by_name, &mapping.callee_key, &mapping.callee);
            let (Some(caller), Some(callee)) = (caller, callee) else {
                debug!(
                    caller = %mapping.caller,
                    callee = %mapping.callee,
                    "skipping mapping with unresolved atom"
                );
                continue;
            };

            graph.add_edge(FlowEdge {
                id: format!("edge_{}_{}_{}", caller.id, callee.id, mapping.call_line),
                from: caller.id.clone(),
                to: callee.id.clone(),
                kind: EdgeKind::from_mappings(&mapping.arguments),
                call_line: Some(mapping.call_line),
                arguments: mapping.arguments.clone(),
                return_usage: Some(analysis.return_usage.clone()),
            });
        }

        // Pass 2: return-flow edges, scanned from caller source text.
        for atom in atoms {
            if !atom.has_return_output() {
                continue;
            }
            for caller_name in &atom.called_by {
                let Some(caller) = by_name.get(caller_name.as_str()) else {
                    debug!(caller = %caller_name, callee = %atom.name, "return-flow caller not in project");
                    continue;
                };

                let usage = self.tracker.track(&caller.source, &atom.name);
                if !usage.is_used {
                    continue;
                }

                graph.add_edge(FlowEdge {
                    id: format!("edge_{}_{}_return", atom.id, caller.id),
                    from: atom.id.clone(),
                    to: caller.id.clone(),
                    kind: EdgeKind::ReturnFlow,
                    call_line: None,
                    arguments: Vec::new(),
                    return_usage: Some(usage),
                });
            }
        }

        graph
    }
}

fn resolve<'a>(
    by_key: &HashMap<String, &'a Atom>,
    by_name: &HashMap<String, &'a Atom>,
    key: &str,
    name: &str,
) -> Option<&'a Atom> {
    by_key.get(key).or_else(|| by_name.get(name)).copied()
}

fn build_node(atom: &Atom, chains: &[Chain], project_names: &HashSet<&str>) -> FunctionNode {
    let memberships: Vec<ChainMembership> = chains
        .iter()
        .filter_map(|chain| {
            chain.position_of(&atom.id).map(|position| ChainMembership {
                chain: chain.id.clone(),
                position,
            })
        })
        .collect();

    FunctionNode {
        id: atom.id.clone(),
        name: atom.name.clone(),
        file: atom.file.clone(),
        role: NodeRole::classify(atom, project_names),
        inputs: atom.data_flow.inputs.clone(),
        outputs: atom.data_flow.outputs.clone(),
        complexity: atom.complexity,
        chains: memberships,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::analyze_data_flow;
    use weft_core::{ArgumentExpr, CallInfo, ChainPosition, DataFlow, Output, Parameter};

    fn tracker() -> UsageTracker {
        UsageTracker::new().unwrap()
    }

    /// processOrder → calculateTotal, with the total assigned and used.
    fn sample_atoms() -> Vec<Atom> {
        let process = Atom::new("a1", "processOrder", "src/order.ts")
            .exported()
            .with_source(
                "function processOrder(order) {\n  const total = calculateTotal(order.items);\n  return total;\n}",
            )
            .with_calls(vec!["calculateTotal".to_string()])
            .with_data_flow(DataFlow {
                inputs: vec![Parameter::new("order")],
                outputs: vec![Output::ret(Some("number"))],
                transformations: Vec::new(),
            });

        let calculate = Atom::new("a2", "calculateTotal", "src/cart.ts")
            .with_called_by(vec!["processOrder".to_string()])
            .with_data_flow(DataFlow {
                inputs: vec![Parameter::new("items")],
                outputs: vec![Output::ret(Some("number"))],
                transformations: Vec::new(),
            });

        vec![process, calculate]
    }

    fn sample_analysis(atoms: &[Atom]) -> DataFlowAnalysis {
        let call = CallInfo::new(
            "calculateTotal",
            vec![ArgumentExpr::property("order", "items")],
            2,
        );
        analyze_data_flow(&atoms[0], &atoms[1], &call, &tracker())
    }

    #[test]
    fn test_build_nodes_and_roles() {
        let atoms = sample_atoms();
        let builder = GraphBuilder::new().unwrap();
        let graph = builder.build(&atoms, &[], &[]);

        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.get_by_id("a1").unwrap().role, NodeRole::Entry);
        // calculateTotal makes no internal calls.
        assert_eq!(graph.get_by_id("a2").unwrap().role, NodeRole::Exit);
    }

    #[test]
    fn test_two_pass_edges_not_deduplicated() {
        let atoms = sample_atoms();
        let analysis = sample_analysis(&atoms);
        let builder = GraphBuilder::new().unwrap();
        let graph = builder.build(&atoms, &[], &[analysis]);

        // Pass 1: a1 → a2 data_transform (property access argument).
        // Pass 2: a2 → a1 return_flow (total is assigned and used).
        assert_eq!(graph.edge_count(), 2);

        let kinds: Vec<EdgeKind> = graph.edges().map(|e| e.kind).collect();
        assert!(kinds.contains(&EdgeKind::DataTransform));
        assert!(kinds.contains(&EdgeKind::ReturnFlow));

        let call_edge = graph
            .edges()
            .find(|e| e.kind == EdgeKind::DataTransform)
            .unwrap();
        assert_eq!(call_edge.id, "edge_a1_a2_2");
        assert_eq!(call_edge.arguments.len(), 1);

        let return_edge = graph
            .edges()
            .find(|e| e.kind == EdgeKind::ReturnFlow)
            .unwrap();
        assert_eq!(return_edge.id, "edge_a2_a1_return");
        assert_eq!(return_edge.from, "a2");
        assert_eq!(return_edge.to, "a1");
    }

    #[test]
    fn test_unresolved_mapping_skipped() {
        let atoms = sample_atoms();
        let mut analysis = sample_analysis(&atoms);
        analysis.mapping.callee = "ghost".to_string();
        analysis.mapping.callee_key = "nowhere.ts::ghost".to_string();

        let builder = GraphBuilder::new().unwrap();
        let graph = builder.build(&atoms, &[], &[analysis]);

        // Only the pass-2 return-flow edge survives.
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.edges().next().unwrap().kind, EdgeKind::ReturnFlow);
    }

    #[test]
    fn test_qualified_key_resolution_beats_bare_name() {
        // Two files both define "helper"; the mapping's key picks the
        // right one.
        let a = Atom::new("h1", "helper", "a.ts");
        let b = Atom::new("h2", "helper", "b.ts");
        let caller = Atom::new("c1", "use", "c.ts");
        let atoms = vec![caller.clone(), a.clone(), b];

        let call = CallInfo::new("helper", vec![], 5);
        let analysis = analyze_data_flow(&caller, &a, &call, &tracker());
        assert_eq!(analysis.mapping.callee_key, "a.ts::helper");

        let builder = GraphBuilder::new().unwrap();
        let graph = builder.build(&atoms, &[], std::slice::from_ref(&analysis));

        let edge = graph.edges().next().unwrap();
        assert_eq!(edge.to, "h1");
    }

    #[test]
    fn test_chain_positions_tagged() {
        let atoms = sample_atoms();
        let chain = Chain::new("c1", vec!["a1".to_string(), "a2".to_string()]);
        let builder = GraphBuilder::new().unwrap();
        let graph = builder.build(&atoms, &[chain], &[]);

        let entry = graph.get_by_id("a1").unwrap();
        assert_eq!(entry.chains.len(), 1);
        assert_eq!(entry.chains[0].position, ChainPosition::Entry);

        let exit = graph.get_by_id("a2").unwrap();
        assert_eq!(exit.chains[0].position, ChainPosition::Exit);
    }

    #[test]
    fn test_return_flow_needs_usage() {
        // Caller never mentions the callee: no return-flow edge.
        let mut atoms = sample_atoms();
        atoms[0].source = "function processOrder(order) { return 0; }".to_string();

        let builder = GraphBuilder::new().unwrap();
        let graph = builder.build(&atoms, &[], &[]);
        assert_eq!(graph.edge_count(), 0);
    }
}
