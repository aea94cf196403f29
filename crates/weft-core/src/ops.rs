//! The per-function operation graph consumed by type inference.
//!
//! This is a finer-grained graph than the cross-function one: each node
//! is one expression-level operation inside a single function body.
//! Upstream extraction flattens the AST into these records; inference
//! only propagates types over them.

use serde::{Deserialize, Serialize};

/// The operation graph of a single function.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationGraph {
    /// Name of the function this graph belongs to.
    pub function: String,

    /// Operation nodes in source order.
    pub nodes: Vec<OpNode>,
}

impl OperationGraph {
    pub fn new(function: impl Into<String>, nodes: Vec<OpNode>) -> Self {
        Self {
            function: function.into(),
            nodes,
        }
    }
}

/// One expression-level operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpNode {
    pub id: String,

    pub kind: OpKind,

    /// Operand expressions, in evaluation order.
    #[serde(default)]
    pub inputs: Vec<OpInput>,

    /// Variable the result is bound to, if any.
    #[serde(default)]
    pub output: Option<String>,

    /// Invoked function name for `Call` / `SideEffect` nodes.
    #[serde(default)]
    pub callee: Option<String>,

    #[serde(default)]
    pub is_async: bool,

    #[serde(default)]
    pub line: u32,
}

impl OpNode {
    pub fn new(id: impl Into<String>, kind: OpKind) -> Self {
        Self {
            id: id.into(),
            kind,
            inputs: Vec::new(),
            output: None,
            callee: None,
            is_async: false,
            line: 0,
        }
    }

    pub fn with_inputs(mut self, inputs: Vec<OpInput>) -> Self {
        self.inputs = inputs;
        self
    }

    pub fn with_output(mut self, variable: impl Into<String>) -> Self {
        self.output = Some(variable.into());
        self
    }

    pub fn with_callee(mut self, callee: impl Into<String>) -> Self {
        self.callee = Some(callee.into());
        self
    }

    pub fn asynchronous(mut self) -> Self {
        self.is_async = true;
        self
    }

    pub fn at_line(mut self, line: u32) -> Self {
        self.line = line;
        self
    }
}

/// An operand of an operation node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OpInput {
    /// A literal value; its runtime type is recoverable from the JSON.
    Literal { value: serde_json::Value },

    /// A named variable. Unresolved names are treated as parameters.
    Variable { name: String },

    /// The result of another operation node.
    Node { id: String },
}

impl OpInput {
    pub fn literal(value: serde_json::Value) -> Self {
        Self::Literal { value }
    }

    pub fn variable(name: impl Into<String>) -> Self {
        Self::Variable { name: name.into() }
    }

    pub fn node(id: impl Into<String>) -> Self {
        Self::Node { id: id.into() }
    }
}

/// Expression-level operation kinds.
///
/// `Call` and `SideEffect` carry no static typing rule; inference falls
/// back to naming heuristics for them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpKind {
    // Arithmetic
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Power,

    // Logic and comparison
    And,
    Or,
    Not,
    Equals,
    NotEquals,
    LessThan,
    GreaterThan,
    LessOrEqual,
    GreaterOrEqual,

    // Structural
    PropertyAccess,
    Index,
    ObjectLiteral,
    ArrayLiteral,

    // Functional
    Map,
    Filter,
    Reduce,
    Find,
    Some,
    Every,

    // Control
    Conditional,
    Ternary,

    // Strings
    Concat,

    // Untyped by rule; resolved heuristically
    Call,
    SideEffect,
}

impl std::fmt::Display for OpKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Add => "add",
            Self::Subtract => "subtract",
            Self::Multiply => "multiply",
            Self::Divide => "divide",
            Self::Modulo => "modulo",
            Self::Power => "power",
            Self::And => "and",
            Self::Or => "or",
            Self::Not => "not",
            Self::Equals => "equals",
            Self::NotEquals => "not_equals",
            Self::LessThan => "less_than",
            Self::GreaterThan => "greater_than",
            Self::LessOrEqual => "less_or_equal",
            Self::GreaterOrEqual => "greater_or_equal",
            Self::PropertyAccess => "property_access",
            Self::Index => "index",
            Self::ObjectLiteral => "object_literal",
            Self::ArrayLiteral => "array_literal",
            Self::Map => "map",
            Self::Filter => "filter",
            Self::Reduce => "reduce",
            Self::Find => "find",
            Self::Some => "some",
            Self::Every => "every",
            Self::Conditional => "conditional",
            Self::Ternary => "ternary",
            Self::Concat => "concat",
            Self::Call => "call",
            Self::SideEffect => "side_effect",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_op_node_builders() {
        let node = OpNode::new("n1", OpKind::Add)
            .with_inputs(vec![OpInput::literal(json!(1)), OpInput::variable("x")])
            .with_output("sum")
            .at_line(12);

        assert_eq!(node.inputs.len(), 2);
        assert_eq!(node.output.as_deref(), Some("sum"));
        assert_eq!(node.line, 12);
    }

    #[test]
    fn test_op_kind_serializes_snake_case() {
        let json = serde_json::to_string(&OpKind::PropertyAccess).unwrap();
        assert_eq!(json, "\"property_access\"");
    }
}
