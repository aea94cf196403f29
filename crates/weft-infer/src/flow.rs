//! Fixed-point type propagation.

use crate::rules::{rule, OpRule};
use crate::types::{self, ANY, PROMISE, UNKNOWN, VOID};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;
use weft_core::{OpInput, OpKind, OpNode, OperationGraph};

/// Upper bound on propagation passes. Convergence usually happens well
/// before this; the cap guards against oscillating inputs.
pub const MAX_PASSES: usize = 5;

/// One node's inference result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeFlowEntry {
    pub node_id: String,
    pub inferred: String,
    pub variable: Option<String>,
    pub operation: OpKind,
    pub line: u32,
}

/// A recorded incompatibility between an input and its rule.
///
/// Currently never produced: the compatibility matrix is undecided and
/// the check hook reports nothing. The shape is kept so downstream
/// consumers do not need to change when it lands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeMismatch {
    pub node_id: String,
    pub position: usize,
    pub expected: String,
    pub actual: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeFlowSummary {
    /// Nodes with a type other than `unknown`.
    pub typed: usize,
    pub unknown: usize,
    pub mismatches: usize,
    /// Passes actually run before convergence or the cap.
    pub passes: usize,
}

/// The per-function type-inference report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeFlow {
    pub function: String,
    pub entries: Vec<TypeFlowEntry>,
    /// Variable to type; the last writer wins on name collisions.
    pub variables: HashMap<String, String>,
    pub mismatches: Vec<TypeMismatch>,
    pub summary: TypeFlowSummary,
}

/// Infers a type for every node of the operation graph.
///
/// Runs up to [`MAX_PASSES`] full passes; each pass recomputes every
/// node and the loop halts early once a pass changes nothing. The
/// result is deterministic and idempotent for a given graph.
pub fn infer(graph: &OperationGraph) -> TypeFlow {
    let mut node_types: HashMap<String, String> = HashMap::new();
    let mut var_types: HashMap<String, String> = HashMap::new();
    let mut mismatches: Vec<TypeMismatch> = Vec::new();

    let mut passes = 0;
    for _ in 0..MAX_PASSES {
        passes += 1;
        let mut changed = false;

        for node in &graph.nodes {
            let inferred = infer_node(node, &node_types, &var_types, &mut mismatches);
            if node_types.get(&node.id) != Some(&inferred) {
                node_types.insert(node.id.clone(), inferred.clone());
                changed = true;
            }
            if let Some(variable) = &node.output {
                var_types.insert(variable.clone(), inferred);
            }
        }

        if !changed {
            debug!(function = %graph.function, passes, "type inference converged");
            break;
        }
    }

    build_type_flow(graph, &node_types, mismatches, passes)
}

fn infer_node(
    node: &OpNode,
    node_types: &HashMap<String, String>,
    var_types: &HashMap<String, String>,
    mismatches: &mut Vec<TypeMismatch>,
) -> String {
    let Some(op_rule) = rule(node.kind) else {
        return heuristic_type(node).to_string();
    };

    let input_types: Vec<String> = node
        .inputs
        .iter()
        .map(|input| resolve_input(input, node_types, var_types))
        .collect();

    if let Some(mismatch) = check_mismatch(node, &op_rule, &input_types) {
        mismatches.push(mismatch);
    }

    match node.kind {
        // Branching constructs produce the union of their branch types,
        // not the rule's output.
        OpKind::Ternary | OpKind::Conditional if input_types.len() >= 2 => {
            let then_type = &input_types[input_types.len() - 2];
            let else_type = &input_types[input_types.len() - 1];
            types::union_of(then_type, else_type)
        }
        // A bare property access carries no further signal.
        OpKind::PropertyAccess => ANY.to_string(),
        _ => op_rule.output.to_string(),
    }
}

/// Resolves one operand's type: a literal's runtime type, a variable
/// from its producing node (`any` for unresolved parameters), or
/// another node's current type.
fn resolve_input(
    input: &OpInput,
    node_types: &HashMap<String, String>,
    var_types: &HashMap<String, String>,
) -> String {
    match input {
        OpInput::Literal { value } => types::literal_type(value).to_string(),
        OpInput::Variable { name } => var_types
            .get(name)
            .cloned()
            .unwrap_or_else(|| ANY.to_string()),
        OpInput::Node { id } => node_types
            .get(id)
            .cloned()
            .unwrap_or_else(|| UNKNOWN.to_string()),
    }
}

/// Mismatch hook. The compatibility matrix (e.g. whether `any` unifies
/// with everything, whether unions match their members) is undecided,
/// so nothing is reported yet.
fn check_mismatch(_node: &OpNode, _rule: &OpRule, _input_types: &[String]) -> Option<TypeMismatch> {
    None
}

/// Naming-heuristic fallback for unruled operations.
fn heuristic_type(node: &OpNode) -> &'static str {
    if node.kind == OpKind::SideEffect {
        return if node.is_async { PROMISE } else { VOID };
    }
    match &node.callee {
        Some(name) => name_heuristic(name),
        None => UNKNOWN,
    }
}

const NUMBER_PREFIXES: &[&str] = &["calculate", "sum", "count", "total", "avg", "mean"];
const ANY_PREFIXES: &[&str] = &["find", "get", "load", "fetch", "read"];
const BOOLEAN_PREFIXES: &[&str] = &["validate", "check", "is", "has", "can", "should"];
const STRING_PREFIXES: &[&str] = &["format", "stringify", "join"];
const OBJECT_PREFIXES: &[&str] = &["parse", "deserialize"];

fn name_heuristic(name: &str) -> &'static str {
    let lower = name.to_lowercase();
    let groups: [(&[&str], &str); 5] = [
        (NUMBER_PREFIXES, types::NUMBER),
        (ANY_PREFIXES, ANY),
        (BOOLEAN_PREFIXES, types::BOOLEAN),
        (STRING_PREFIXES, types::STRING),
        (OBJECT_PREFIXES, types::OBJECT),
    ];
    for (prefixes, inferred) in groups {
        if prefixes.iter().any(|prefix| lower.starts_with(prefix)) {
            return inferred;
        }
    }
    UNKNOWN
}

fn build_type_flow(
    graph: &OperationGraph,
    node_types: &HashMap<String, String>,
    mismatches: Vec<TypeMismatch>,
    passes: usize,
) -> TypeFlow {
    let entries: Vec<TypeFlowEntry> = graph
        .nodes
        .iter()
        .map(|node| TypeFlowEntry {
            node_id: node.id.clone(),
            inferred: node_types
                .get(&node.id)
                .cloned()
                .unwrap_or_else(|| UNKNOWN.to_string()),
            variable: node.output.clone(),
            operation: node.kind,
            line: node.line,
        })
        .collect();

    // Rebuilt in node order so the last writer wins deterministically.
    let mut variables: HashMap<String, String> = HashMap::new();
    for entry in &entries {
        if let Some(variable) = &entry.variable {
            variables.insert(variable.clone(), entry.inferred.clone());
        }
    }

    let typed = entries.iter().filter(|e| e.inferred != UNKNOWN).count();
    let unknown = entries.len() - typed;

    TypeFlow {
        function: graph.function.clone(),
        entries,
        variables,
        summary: TypeFlowSummary {
            typed,
            unknown,
            mismatches: mismatches.len(),
            passes,
        },
        mismatches,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn graph(nodes: Vec<OpNode>) -> OperationGraph {
        OperationGraph::new("test_fn", nodes)
    }

    #[test]
    fn test_arithmetic_with_unresolved_parameter() {
        // x is never defined: treated as a parameter of type any, but
        // the rule still says the result is a number.
        let flow = infer(&graph(vec![OpNode::new("n1", OpKind::Add)
            .with_inputs(vec![OpInput::variable("x"), OpInput::literal(json!(1))])
            .with_output("sum")]));

        assert_eq!(flow.variables.get("sum").unwrap(), "number");
        assert_eq!(flow.summary.typed, 1);
        assert_eq!(flow.summary.unknown, 0);
    }

    #[test]
    fn test_forward_reference_needs_second_pass() {
        // n1 refers to n2, which appears later in the list; the union
        // refines once n2's type lands on the next pass.
        let nodes = vec![
            OpNode::new("n1", OpKind::Ternary)
                .with_inputs(vec![
                    OpInput::literal(json!(true)),
                    OpInput::node("n2"),
                    OpInput::literal(json!(null)),
                ])
                .with_output("result"),
            OpNode::new("n2", OpKind::Multiply).with_inputs(vec![
                OpInput::literal(json!(2)),
                OpInput::literal(json!(3)),
            ]),
        ];

        let flow = infer(&graph(nodes));
        assert_eq!(flow.variables.get("result").unwrap(), "number|null");
        assert!(flow.summary.passes > 1);
        assert!(flow.summary.passes <= MAX_PASSES);
    }

    #[test]
    fn test_infer_is_idempotent() {
        let g = graph(vec![
            OpNode::new("n1", OpKind::Map)
                .with_inputs(vec![OpInput::variable("items"), OpInput::variable("fn")])
                .with_output("mapped"),
            OpNode::new("n2", OpKind::Ternary)
                .with_inputs(vec![
                    OpInput::variable("flag"),
                    OpInput::node("n1"),
                    OpInput::literal(json!(null)),
                ])
                .with_output("maybe"),
        ]);

        let first = infer(&g);
        let second = infer(&g);
        assert_eq!(first.entries, second.entries);
        assert_eq!(first.variables, second.variables);
    }

    #[test]
    fn test_terminates_within_pass_cap() {
        // A self-referential ternary never stabilizes to a fixed
        // string; the cap must stop it.
        let g = graph(vec![OpNode::new("n1", OpKind::Ternary)
            .with_inputs(vec![
                OpInput::literal(json!(true)),
                OpInput::node("n1"),
                OpInput::literal(json!(1)),
            ])
            .with_output("x")]);

        let flow = infer(&g);
        assert!(flow.summary.passes <= MAX_PASSES);
    }

    #[test]
    fn test_ternary_identical_branches_collapse() {
        let flow = infer(&graph(vec![OpNode::new("n1", OpKind::Ternary)
            .with_inputs(vec![
                OpInput::variable("flag"),
                OpInput::literal(json!(1)),
                OpInput::literal(json!(2)),
            ])
            .with_output("x")]));

        assert_eq!(flow.variables.get("x").unwrap(), "number");
    }

    #[test]
    fn test_ternary_nullable_branch() {
        let flow = infer(&graph(vec![OpNode::new("n1", OpKind::Conditional)
            .with_inputs(vec![
                OpInput::variable("flag"),
                OpInput::literal(json!(1)),
                OpInput::literal(json!(null)),
            ])
            .with_output("x")]));

        assert_eq!(flow.variables.get("x").unwrap(), "number|null");
    }

    #[test]
    fn test_property_access_is_any() {
        let flow = infer(&graph(vec![OpNode::new("n1", OpKind::PropertyAccess)
            .with_inputs(vec![OpInput::variable("order")])
            .with_output("items")]));

        assert_eq!(flow.variables.get("items").unwrap(), "any");
    }

    #[test]
    fn test_naming_heuristics() {
        let cases = [
            ("calculateTotal", "number"),
            ("sumAll", "number"),
            ("getUser", "any"),
            ("fetchRecords", "any"),
            ("isEmpty", "boolean"),
            ("validateInput", "boolean"),
            ("formatDate", "string"),
            ("parseConfig", "object"),
            ("doMystery", "unknown"),
        ];

        for (name, expected) in cases {
            let flow = infer(&graph(vec![OpNode::new("n1", OpKind::Call)
                .with_callee(name)
                .with_output("v")]));
            assert_eq!(
                flow.variables.get("v").unwrap(),
                expected,
                "callee {name}"
            );
        }
    }

    #[test]
    fn test_side_effects() {
        let sync = infer(&graph(vec![OpNode::new("n1", OpKind::SideEffect)
            .with_callee("logEvent")]));
        assert_eq!(sync.entries[0].inferred, "void");

        let asynchronous = infer(&graph(vec![OpNode::new("n1", OpKind::SideEffect)
            .with_callee("saveRecord")
            .asynchronous()]));
        assert_eq!(asynchronous.entries[0].inferred, "promise");
    }

    #[test]
    fn test_variable_map_last_writer_wins() {
        let flow = infer(&graph(vec![
            OpNode::new("n1", OpKind::Add)
                .with_inputs(vec![OpInput::literal(json!(1)), OpInput::literal(json!(2))])
                .with_output("v"),
            OpNode::new("n2", OpKind::Concat)
                .with_inputs(vec![
                    OpInput::literal(json!("a")),
                    OpInput::literal(json!("b")),
                ])
                .with_output("v"),
        ]));

        assert_eq!(flow.variables.get("v").unwrap(), "string");
        assert_eq!(flow.variables.len(), 1);
    }

    #[test]
    fn test_mismatch_hook_records_nothing() {
        // Obviously mistyped inputs, but the stub reports no mismatch.
        let flow = infer(&graph(vec![OpNode::new("n1", OpKind::Add).with_inputs(
            vec![
                OpInput::literal(json!("not")),
                OpInput::literal(json!("numbers")),
            ],
        )]));

        assert!(flow.mismatches.is_empty());
        assert_eq!(flow.summary.mismatches, 0);
    }

    #[test]
    fn test_empty_graph() {
        let flow = infer(&graph(vec![]));
        assert!(flow.entries.is_empty());
        assert_eq!(flow.summary.typed, 0);
        assert_eq!(flow.summary.passes, 1);
    }
}
