//! Call sites and the argument-expression model.
//!
//! A `CallInfo` is one call expression observed inside a caller's body.
//! Its arguments are shape-classified by extraction; the analysis layer
//! never re-parses them, it only reads the shape.

use serde::{Deserialize, Serialize};

/// One call expression site inside a caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallInfo {
    /// Name of the called function as written.
    pub callee: String,

    /// Ordered argument expressions.
    #[serde(default)]
    pub args: Vec<ArgumentExpr>,

    /// Source line of the call.
    #[serde(default)]
    pub line: u32,
}

impl CallInfo {
    pub fn new(callee: impl Into<String>, args: Vec<ArgumentExpr>, line: u32) -> Self {
        Self {
            callee: callee.into(),
            args,
            line,
        }
    }
}

/// The shape of one argument expression at a call site.
///
/// Shapes the extractor cannot classify arrive as `Unknown` and degrade
/// downstream to sentinel values rather than errors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ArgumentExpr {
    /// A bare variable reference, e.g. `order`.
    Identifier { name: String },

    /// A property access, e.g. `order.items`.
    PropertyAccess { object: String, property: String },

    /// The result of another call, e.g. `normalize(x)`.
    Call { callee: String },

    /// A literal value. Kept as JSON so the runtime type is recoverable.
    Literal { value: serde_json::Value },

    /// A spread, e.g. `...rest`.
    Spread { source: String },

    /// Anything extraction could not classify.
    Unknown,
}

impl ArgumentExpr {
    pub fn identifier(name: impl Into<String>) -> Self {
        Self::Identifier { name: name.into() }
    }

    pub fn property(object: impl Into<String>, property: impl Into<String>) -> Self {
        Self::PropertyAccess {
            object: object.into(),
            property: property.into(),
        }
    }

    /// Textual rendering of the argument, for reports and edge payloads.
    pub fn render(&self) -> String {
        match self {
            Self::Identifier { name } => name.clone(),
            Self::PropertyAccess { object, property } => format!("{object}.{property}"),
            Self::Call { callee } => format!("{callee}(...)"),
            Self::Literal { value } => value.to_string(),
            Self::Spread { source } => format!("...{source}"),
            Self::Unknown => "unknown".to_string(),
        }
    }

    /// The variable this argument is rooted in: the identifier itself,
    /// or the object of a property access. Literals, calls, and spreads
    /// have no single root.
    pub fn root_variable(&self) -> Option<&str> {
        match self {
            Self::Identifier { name } => Some(name),
            Self::PropertyAccess { object, .. } => Some(object),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_render() {
        assert_eq!(ArgumentExpr::identifier("order").render(), "order");
        assert_eq!(ArgumentExpr::property("order", "items").render(), "order.items");
        assert_eq!(
            ArgumentExpr::Call {
                callee: "normalize".to_string()
            }
            .render(),
            "normalize(...)"
        );
        assert_eq!(ArgumentExpr::Literal { value: json!(42) }.render(), "42");
        assert_eq!(
            ArgumentExpr::Spread {
                source: "rest".to_string()
            }
            .render(),
            "...rest"
        );
    }

    #[test]
    fn test_root_variable() {
        assert_eq!(
            ArgumentExpr::identifier("order").root_variable(),
            Some("order")
        );
        assert_eq!(
            ArgumentExpr::property("order", "items").root_variable(),
            Some("order")
        );
        assert_eq!(ArgumentExpr::Literal { value: json!(1) }.root_variable(), None);
        assert_eq!(ArgumentExpr::Unknown.root_variable(), None);
    }
}
