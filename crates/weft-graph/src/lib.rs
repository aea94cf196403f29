//! Weft Graph - Inter-procedural data-flow analysis
//!
//! This crate turns extracted atoms and call-site records into a
//! project-wide data-flow graph. It has two layers:
//!
//! - The argument mapper correlates each call site's arguments with the
//!   callee's parameters, classifies the transformation applied, scores
//!   confidence, and tracks how the return value is used.
//! - The graph builder aggregates those mappings into a
//!   `DiGraph<FunctionNode, FlowEdge>` with role classification, path
//!   enumeration, and centrality metrics.
//!
//! Everything here is heuristic. Unresolvable names and unrecognized
//! shapes degrade to sentinel values and skipped edges; consumers get a
//! partial graph, never an error, except for the one construction-time
//! failure (`GraphError::Pattern`).
//!
//! # Example
//!
//! ```no_run
//! use weft_core::{Atom, CallInfo, ArgumentExpr};
//! use weft_graph::{analyze_data_flow, GraphBuilder, UsageTracker};
//!
//! let caller = Atom::new("a1", "processOrder", "src/order.ts");
//! let callee = Atom::new("a2", "calculateTotal", "src/cart.ts");
//! let call = CallInfo::new(
//!     "calculateTotal",
//!     vec![ArgumentExpr::property("order", "items")],
//!     14,
//! );
//!
//! let tracker = UsageTracker::new().unwrap();
//! let analysis = analyze_data_flow(&caller, &callee, &call, &tracker);
//!
//! let builder = GraphBuilder::new().unwrap();
//! let graph = builder.build(&[caller, callee], &[], &[analysis]);
//! let paths = graph.find_paths("processOrder", "calculateTotal");
//! ```

mod builder;
mod edge;
mod error;
mod graph;
mod mapping;
mod metrics;
mod node;
mod usage;

pub use builder::GraphBuilder;
pub use edge::{EdgeKind, FlowEdge};
pub use error::GraphError;
pub use graph::{FlowGraph, GraphMeta, ProjectGraph, RoleTally};
pub use mapping::{
    analyze_data_flow, map_call, map_call_typed, ArgumentMapping, ArgumentRecord, CallMapping,
    ChainedTransform, DataFlowAnalysis, FlowSummary, TransformDetail, TransformKind,
};
pub use metrics::{CentralityEntry, GraphMetrics};
pub use node::{ChainMembership, FunctionNode, NodeRole};
pub use usage::{ReturnUsage, UsageReason, UsageSite, UsageTracker};
