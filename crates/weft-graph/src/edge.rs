//! Data-flow edges between functions.

use crate::mapping::ArgumentMapping;
use crate::usage::ReturnUsage;
use serde::{Deserialize, Serialize};

/// The kind of data-flow relationship an edge carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    /// Every mapped argument passes through unchanged.
    DirectCall,
    /// At least one argument is a recognized non-direct transform.
    DataTransform,
    /// The callee's return value flows back into the caller.
    ReturnFlow,
    /// A call the classifier could not say more about.
    Call,
}

impl std::fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::DirectCall => "direct_call",
            Self::DataTransform => "data_transform",
            Self::ReturnFlow => "return_flow",
            Self::Call => "call",
        };
        write!(f, "{}", s)
    }
}

impl EdgeKind {
    /// Classifies a call edge from its argument mappings. An empty
    /// mapping list classifies as `DirectCall` (vacuously all-direct,
    /// matching zero-argument calls).
    pub fn from_mappings(mappings: &[ArgumentMapping]) -> Self {
        if mappings
            .iter()
            .all(|m| m.transform == crate::mapping::TransformKind::DirectPass)
        {
            return Self::DirectCall;
        }
        if mappings
            .iter()
            .any(|m| m.transform.is_recognized_transform())
        {
            return Self::DataTransform;
        }
        Self::Call
    }
}

/// One data-flow relationship between two functions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowEdge {
    /// `edge_{from}_{to}_{site}` key.
    pub id: String,

    /// Source node id.
    pub from: String,

    /// Target node id.
    pub to: String,

    pub kind: EdgeKind,

    /// Call-site line for call edges.
    pub call_line: Option<u32>,

    /// Per-argument data mapping for call edges; empty on return-flow
    /// edges.
    pub arguments: Vec<ArgumentMapping>,

    /// Return-flow summary, when one was tracked.
    pub return_usage: Option<ReturnUsage>,
}
