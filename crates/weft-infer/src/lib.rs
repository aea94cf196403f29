//! Weft Infer - Type inference over operation graphs
//!
//! Assigns a best-guess type to every expression-level operation in a
//! single function, by fixed-point propagation over a static
//! operation-type rule table with naming-heuristic fallback for calls.
//!
//! This is heuristic inference, not type checking: unresolvable inputs
//! degrade to `any`/`unknown`, and nothing here ever fails.
//!
//! # Example
//!
//! ```
//! use weft_core::{OpInput, OpKind, OpNode, OperationGraph};
//! use weft_infer::infer;
//!
//! let graph = OperationGraph::new(
//!     "double",
//!     vec![OpNode::new("n1", OpKind::Multiply)
//!         .with_inputs(vec![
//!             OpInput::variable("x"),
//!             OpInput::literal(serde_json::json!(2)),
//!         ])
//!         .with_output("doubled")],
//! );
//!
//! let flow = infer(&graph);
//! assert_eq!(flow.variables.get("doubled").unwrap(), "number");
//! ```

mod flow;
mod rules;
pub mod types;

pub use flow::{infer, TypeFlow, TypeFlowEntry, TypeFlowSummary, TypeMismatch, MAX_PASSES};
pub use rules::{rule, OpRule};
