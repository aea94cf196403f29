//! Argument-to-parameter mapping for one call site.
//!
//! Pairs a caller's argument expressions with the callee's declared
//! parameters, classifies how each value was transformed on the way in,
//! and scores how confident the heuristics are about the pairing.
//! Failure modes never raise; they degrade to `Unknown` transforms and
//! empty records.

use crate::usage::{ReturnUsage, UsageTracker};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use weft_core::{ArgumentExpr, Atom, CallInfo, Parameter};

/// How an argument value relates to its source at the call boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransformKind {
    /// Same variable passed straight through.
    DirectPass,
    /// A property of some object, e.g. `order.items`.
    PropertyAccess,
    /// The result of another call.
    CallResult,
    /// A literal value.
    Literal,
    /// A spread of some source.
    Spread,
    /// Shape not recognized.
    Unknown,
}

impl TransformKind {
    /// True for the recognized non-direct transforms. `Unknown` is not
    /// a recognized transform; it only means the classifier gave up.
    pub fn is_recognized_transform(&self) -> bool {
        matches!(
            self,
            Self::PropertyAccess | Self::CallResult | Self::Literal | Self::Spread
        )
    }
}

/// Captured detail for non-direct transforms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TransformDetail {
    PropertyAccess { object: String, property: String },
    CallResult { callee: String },
    Literal { value: serde_json::Value },
    Spread { source: String },
}

/// The argument side of one mapped position.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArgumentRecord {
    /// Textual rendering of the argument expression.
    pub text: String,

    /// Root variable the argument is built from, when there is one.
    pub variable: Option<String>,

    /// Declared or inferred type of the root variable, when known.
    pub data_type: Option<String>,
}

/// One argument paired with one callee parameter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArgumentMapping {
    pub position: usize,
    pub argument: ArgumentRecord,
    pub parameter: Parameter,
    pub transform: TransformKind,
    pub detail: Option<TransformDetail>,
    /// Pairing confidence, clamped to [0, 1].
    pub confidence: f64,
}

/// The full mapping of one call site.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallMapping {
    pub caller: String,
    pub callee: String,

    /// Qualified `file::name` keys, preferred over bare names when the
    /// graph builder resolves this mapping back to atoms.
    pub caller_key: String,
    pub callee_key: String,

    pub call_line: u32,
    pub arguments: Vec<ArgumentMapping>,
    pub has_spread: bool,
    pub has_destructuring: bool,
}

/// A caller-side transformation feeding a mapped argument.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainedTransform {
    /// The shared variable linking the two sides.
    pub variable: String,
    /// Transformation kind in the caller that produced the variable.
    pub from_transform: String,
    /// Callee input the variable flows into.
    pub to_input: String,
}

/// Aggregate flags over one call-site analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowSummary {
    pub has_data_transformation: bool,
    pub has_return_usage: bool,
    /// Non-direct mappings + (1 if the return is used) + distinct
    /// return-usage sites. A rough knottiness score for ranking.
    pub chain_complexity: usize,
}

/// `map_call` extended with return-usage and chained-transform analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataFlowAnalysis {
    pub mapping: CallMapping,
    pub return_usage: ReturnUsage,
    pub chained: Vec<ChainedTransform>,
    pub summary: FlowSummary,
}

/// Maps one call site's arguments onto the callee's parameters.
///
/// Arguments and parameters pair positionally; positions present on
/// only one side (arity mismatch) are dropped rather than reported.
pub fn map_call(caller: &Atom, callee: &Atom, call: &CallInfo) -> CallMapping {
    map_call_typed(caller, callee, call, &HashMap::new())
}

/// `map_call` with an inferred variable-type map from a prior type
/// inference run, used to strengthen confidence scoring.
pub fn map_call_typed(
    caller: &Atom,
    callee: &Atom,
    call: &CallInfo,
    var_types: &HashMap<String, String>,
) -> CallMapping {
    let params = &callee.data_flow.inputs;
    let upper = call.args.len().max(params.len());

    let mut arguments = Vec::new();
    for position in 0..upper {
        let (Some(arg), Some(param)) = (call.args.get(position), params.get(position)) else {
            continue;
        };

        let (transform, detail) = classify(arg, param);
        let arg_type = argument_type(arg, caller, var_types);
        let confidence = score_confidence(transform, arg_type.as_deref(), param);

        arguments.push(ArgumentMapping {
            position,
            argument: ArgumentRecord {
                text: arg.render(),
                variable: arg.root_variable().map(str::to_string),
                data_type: arg_type,
            },
            parameter: param.clone(),
            transform,
            detail,
            confidence,
        });
    }

    CallMapping {
        caller: caller.name.clone(),
        callee: callee.name.clone(),
        caller_key: caller.key(),
        callee_key: callee.key(),
        call_line: call.line,
        arguments,
        has_spread: call
            .args
            .iter()
            .any(|a| matches!(a, ArgumentExpr::Spread { .. })),
        has_destructuring: params.iter().any(|p| p.is_destructured),
    }
}

/// Classifies the transformation between an argument and its parameter.
/// Precedence is fixed: property access beats a name match, so
/// `obj.field` is never a direct pass even when `field` equals the
/// parameter name.
fn classify(arg: &ArgumentExpr, param: &Parameter) -> (TransformKind, Option<TransformDetail>) {
    if let ArgumentExpr::PropertyAccess { object, property } = arg {
        return (
            TransformKind::PropertyAccess,
            Some(TransformDetail::PropertyAccess {
                object: object.clone(),
                property: property.clone(),
            }),
        );
    }

    if arg.root_variable() == Some(param.name.as_str()) || arg.render() == param.name {
        return (TransformKind::DirectPass, None);
    }

    match arg {
        ArgumentExpr::Call { callee } => (
            TransformKind::CallResult,
            Some(TransformDetail::CallResult {
                callee: callee.clone(),
            }),
        ),
        ArgumentExpr::Literal { value } => (
            TransformKind::Literal,
            Some(TransformDetail::Literal {
                value: value.clone(),
            }),
        ),
        ArgumentExpr::Spread { source } => (
            TransformKind::Spread,
            Some(TransformDetail::Spread {
                source: source.clone(),
            }),
        ),
        _ => (TransformKind::Unknown, None),
    }
}

/// Resolves the argument's type from the inferred variable map first,
/// then from the caller's own declared parameters.
fn argument_type(
    arg: &ArgumentExpr,
    caller: &Atom,
    var_types: &HashMap<String, String>,
) -> Option<String> {
    let root = arg.root_variable()?;
    if let Some(inferred) = var_types.get(root) {
        return Some(inferred.clone());
    }
    caller
        .data_flow
        .inputs
        .iter()
        .find(|p| p.name == root)
        .and_then(|p| p.data_type.clone())
}

/// Base 0.5, adjusted by what the heuristics could corroborate.
fn score_confidence(kind: TransformKind, arg_type: Option<&str>, param: &Parameter) -> f64 {
    let mut confidence: f64 = 0.5;

    if let (Some(arg_ty), Some(param_ty)) = (arg_type, param.data_type.as_deref()) {
        if arg_ty == param_ty {
            confidence += 0.3;
        }
    }
    if kind == TransformKind::PropertyAccess {
        confidence += 0.2;
    }
    if kind == TransformKind::DirectPass {
        confidence += 0.1;
    }
    if kind == TransformKind::Spread || param.is_destructured {
        confidence -= 0.2;
    }

    confidence.clamp(0.0, 1.0)
}

/// Full data-flow analysis for one call site: the argument mapping plus
/// return-usage tracking and chained-transform detection.
pub fn analyze_data_flow(
    caller: &Atom,
    callee: &Atom,
    call: &CallInfo,
    tracker: &UsageTracker,
) -> DataFlowAnalysis {
    let mapping = map_call(caller, callee, call);

    let return_usage = if callee.has_return_output() {
        tracker.track(&caller.source, &call.callee)
    } else {
        ReturnUsage::no_return()
    };

    let chained = detect_chained_transforms(caller, &mapping);

    let non_direct = mapping
        .arguments
        .iter()
        .filter(|m| m.transform != TransformKind::DirectPass)
        .count();
    let summary = FlowSummary {
        has_data_transformation: non_direct > 0,
        has_return_usage: return_usage.is_used,
        chain_complexity: non_direct
            + usize::from(return_usage.is_used)
            + return_usage.usages.len(),
    };

    DataFlowAnalysis {
        mapping,
        return_usage,
        chained,
        summary,
    }
}

/// Finds caller transformations whose outputs feed mapped arguments:
/// a `caller.transform → callee.input` chain keyed by the shared
/// variable.
fn detect_chained_transforms(caller: &Atom, mapping: &CallMapping) -> Vec<ChainedTransform> {
    let mut chained = Vec::new();
    for arg in &mapping.arguments {
        let Some(variable) = &arg.argument.variable else {
            continue;
        };
        for transform in &caller.data_flow.transformations {
            if transform.outputs.iter().any(|out| out == variable) {
                chained.push(ChainedTransform {
                    variable: variable.clone(),
                    from_transform: transform.kind.clone(),
                    to_input: arg.parameter.name.clone(),
                });
            }
        }
    }
    chained
}
