//! Type vocabulary for inference results.
//!
//! Types are lowercase strings rather than a closed enum because the
//! engine produces open-ended unions (`number|null`, `string|object`)
//! and downstream reporting treats them as opaque labels.

use serde_json::Value;

pub const NUMBER: &str = "number";
pub const STRING: &str = "string";
pub const BOOLEAN: &str = "boolean";
pub const OBJECT: &str = "object";
pub const ARRAY: &str = "array";
pub const FUNCTION: &str = "function";
pub const NULL: &str = "null";
pub const VOID: &str = "void";
pub const PROMISE: &str = "promise";
pub const ANY: &str = "any";
pub const UNKNOWN: &str = "unknown";

/// The runtime type of a literal value.
pub fn literal_type(value: &Value) -> &'static str {
    match value {
        Value::Null => NULL,
        Value::Bool(_) => BOOLEAN,
        Value::Number(_) => NUMBER,
        Value::String(_) => STRING,
        Value::Array(_) => ARRAY,
        Value::Object(_) => OBJECT,
    }
}

/// Joins two branch types into a union. Identical branches collapse to
/// the single type; a nullable branch collapses to `T|null`; anything
/// else joins with `|`.
pub fn union_of(a: &str, b: &str) -> String {
    if a == b {
        a.to_string()
    } else if a == NULL {
        format!("{b}|{NULL}")
    } else if b == NULL {
        format!("{a}|{NULL}")
    } else {
        format!("{a}|{b}")
    }
}
