//! Return-usage tracking.
//!
//! The tracker scans a caller's source text for how a callee's return
//! value is consumed. This is regex-level heuristics on purpose: the
//! interface is kept narrow so a scope-aware implementation can replace
//! it without touching mapping or graph construction.

use crate::error::GraphError;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Scans caller source text for return-value usage.
pub struct UsageTracker {
    /// Matches `const x = callee(`, `let x = await callee(`, etc.
    /// Group 1 is the bound variable, group 2 the callee name.
    assignment: Regex,
}

impl UsageTracker {
    pub fn new() -> Result<Self, GraphError> {
        let assignment = Regex::new(
            r"\b(?:const|let|var)\s+([A-Za-z_$][A-Za-z0-9_$]*)\s*=\s*(?:await\s+)?([A-Za-z_$][A-Za-z0-9_$]*)\s*\(",
        )?;
        Ok(Self { assignment })
    }

    /// Tracks how `callee`'s result is used inside `source`.
    ///
    /// Assignment binding is preferred: the first `const|let|var x =
    /// callee(...)` wins, and every later line mentioning `x` is
    /// recorded as a usage site. Without a binding, a plain
    /// `callee(` occurrence counts as direct usage (`return callee(...)`
    /// and expression-position calls look the same at this level).
    pub fn track(&self, source: &str, callee: &str) -> ReturnUsage {
        for (index, line) in source.lines().enumerate() {
            for caps in self.assignment.captures_iter(line) {
                if &caps[2] == callee {
                    let variable = caps[1].to_string();
                    let usages = collect_usages(source, index + 1, &variable);
                    return ReturnUsage::assigned(variable, (index + 1) as u32, usages);
                }
            }
        }

        if source.contains(&format!("{callee}(")) {
            return ReturnUsage::direct();
        }

        ReturnUsage::unused()
    }
}

/// Collects lines after `start` that mention `variable` as a whole token.
fn collect_usages(source: &str, start: usize, variable: &str) -> Vec<UsageSite> {
    source
        .lines()
        .enumerate()
        .skip(start)
        .filter(|(_, line)| mentions(line, variable))
        .map(|(index, line)| UsageSite {
            line: (index + 1) as u32,
            context: line.trim().to_string(),
        })
        .collect()
}

/// Token-level containment check, so `total` does not match `subtotal`.
fn mentions(line: &str, variable: &str) -> bool {
    line.split(|c: char| !(c.is_alphanumeric() || c == '_' || c == '$'))
        .any(|token| token == variable)
}

/// How a callee's return value is consumed by one caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReturnUsage {
    pub is_used: bool,

    pub reason: UsageReason,

    /// Variable the result was bound to, for `Assigned`.
    #[serde(default)]
    pub variable: Option<String>,

    /// Line of the binding, for `Assigned`.
    #[serde(default)]
    pub assignment_line: Option<u32>,

    /// Lines where the bound variable is subsequently used.
    #[serde(default)]
    pub usages: Vec<UsageSite>,
}

impl ReturnUsage {
    /// The callee has no return-valued output; nothing to track.
    pub fn no_return() -> Self {
        Self {
            is_used: false,
            reason: UsageReason::NoReturn,
            variable: None,
            assignment_line: None,
            usages: Vec::new(),
        }
    }

    pub fn assigned(variable: String, line: u32, usages: Vec<UsageSite>) -> Self {
        Self {
            is_used: true,
            reason: UsageReason::Assigned,
            variable: Some(variable),
            assignment_line: Some(line),
            usages,
        }
    }

    pub fn direct() -> Self {
        Self {
            is_used: true,
            reason: UsageReason::Direct,
            variable: None,
            assignment_line: None,
            usages: Vec::new(),
        }
    }

    pub fn unused() -> Self {
        Self {
            is_used: false,
            reason: UsageReason::Unused,
            variable: None,
            assignment_line: None,
            usages: Vec::new(),
        }
    }
}

/// Why (or why not) the return value counts as used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UsageReason {
    /// Callee declares no return output.
    NoReturn,
    /// Result bound to a variable.
    Assigned,
    /// Result consumed in expression position.
    Direct,
    /// No usage detected.
    Unused,
}

/// One occurrence of the bound variable after its assignment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsageSite {
    pub line: u32,
    pub context: String,
}
