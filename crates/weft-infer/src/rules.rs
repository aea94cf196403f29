//! The static operation-type rule table.
//!
//! Each ruled operation kind declares what it expects and what it
//! produces. `Call` and `SideEffect` carry no rule; inference resolves
//! them from the invoked function's name instead.

use crate::types::{ANY, ARRAY, BOOLEAN, FUNCTION, NUMBER, OBJECT, STRING};
use weft_core::OpKind;

/// Expected input types and produced output type for one operation.
#[derive(Debug, Clone, Copy)]
pub struct OpRule {
    pub inputs: &'static [&'static str],
    pub output: &'static str,
}

const fn op(inputs: &'static [&'static str], output: &'static str) -> OpRule {
    OpRule { inputs, output }
}

/// Looks up the typing rule for an operation kind.
pub fn rule(kind: OpKind) -> Option<OpRule> {
    let rule = match kind {
        // Arithmetic
        OpKind::Add => op(&[NUMBER, NUMBER], NUMBER),
        OpKind::Subtract => op(&[NUMBER, NUMBER], NUMBER),
        OpKind::Multiply => op(&[NUMBER, NUMBER], NUMBER),
        OpKind::Divide => op(&[NUMBER, NUMBER], NUMBER),
        OpKind::Modulo => op(&[NUMBER, NUMBER], NUMBER),
        OpKind::Power => op(&[NUMBER, NUMBER], NUMBER),

        // Logic and comparison
        OpKind::And => op(&[ANY, ANY], BOOLEAN),
        OpKind::Or => op(&[ANY, ANY], BOOLEAN),
        OpKind::Not => op(&[ANY], BOOLEAN),
        OpKind::Equals => op(&[ANY, ANY], BOOLEAN),
        OpKind::NotEquals => op(&[ANY, ANY], BOOLEAN),
        OpKind::LessThan => op(&[NUMBER, NUMBER], BOOLEAN),
        OpKind::GreaterThan => op(&[NUMBER, NUMBER], BOOLEAN),
        OpKind::LessOrEqual => op(&[NUMBER, NUMBER], BOOLEAN),
        OpKind::GreaterOrEqual => op(&[NUMBER, NUMBER], BOOLEAN),

        // Structural
        OpKind::PropertyAccess => op(&[OBJECT], ANY),
        OpKind::Index => op(&[ARRAY, NUMBER], ANY),
        OpKind::ObjectLiteral => op(&[], OBJECT),
        OpKind::ArrayLiteral => op(&[], ARRAY),

        // Functional
        OpKind::Map => op(&[ARRAY, FUNCTION], ARRAY),
        OpKind::Filter => op(&[ARRAY, FUNCTION], ARRAY),
        OpKind::Reduce => op(&[ARRAY, FUNCTION], ANY),
        OpKind::Find => op(&[ARRAY, FUNCTION], ANY),
        OpKind::Some => op(&[ARRAY, FUNCTION], BOOLEAN),
        OpKind::Every => op(&[ARRAY, FUNCTION], BOOLEAN),

        // Control: output refined to a branch union during inference
        OpKind::Conditional => op(&[BOOLEAN, ANY, ANY], ANY),
        OpKind::Ternary => op(&[BOOLEAN, ANY, ANY], ANY),

        // Strings
        OpKind::Concat => op(&[STRING, STRING], STRING),

        OpKind::Call | OpKind::SideEffect => return None,
    };
    Some(rule)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arithmetic_produces_number() {
        assert_eq!(rule(OpKind::Add).unwrap().output, NUMBER);
        assert_eq!(rule(OpKind::Power).unwrap().output, NUMBER);
    }

    #[test]
    fn test_predicates_produce_boolean() {
        assert_eq!(rule(OpKind::Every).unwrap().output, BOOLEAN);
        assert_eq!(rule(OpKind::LessThan).unwrap().output, BOOLEAN);
    }

    #[test]
    fn test_calls_are_unruled() {
        assert!(rule(OpKind::Call).is_none());
        assert!(rule(OpKind::SideEffect).is_none());
    }
}
