//! Function nodes and role classification.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use weft_core::{Atom, ChainPosition, Output, Parameter};

/// Role of a function within the project graph.
///
/// Evaluated in a fixed precedence order (entry > exit > intermediate >
/// isolated); exactly one role applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeRole {
    /// Exported, or called from outside the project.
    Entry,
    /// Makes no internal calls.
    Exit,
    /// Has callers and makes internal calls.
    Intermediate,
    /// No callers, but makes internal calls.
    Isolated,
}

impl std::fmt::Display for NodeRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Entry => "entry",
            Self::Exit => "exit",
            Self::Intermediate => "intermediate",
            Self::Isolated => "isolated",
        };
        write!(f, "{}", s)
    }
}

impl NodeRole {
    /// Classifies an atom's role given the set of project-local names.
    ///
    /// Callers with names not in `project_names` are external, which
    /// makes the atom an entry point even when it is not exported.
    pub fn classify(atom: &Atom, project_names: &HashSet<&str>) -> Self {
        let externally_called = atom
            .called_by
            .iter()
            .any(|caller| !project_names.contains(caller.as_str()));
        if atom.is_exported || externally_called {
            return Self::Entry;
        }

        let makes_internal_calls = atom
            .calls
            .iter()
            .any(|callee| project_names.contains(callee.as_str()));
        if !makes_internal_calls {
            return Self::Exit;
        }

        if !atom.called_by.is_empty() {
            return Self::Intermediate;
        }

        Self::Isolated
    }
}

/// Membership of a function in one chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainMembership {
    pub chain: String,
    pub position: ChainPosition,
}

/// One function in the cross-function graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionNode {
    pub id: String,
    pub name: String,
    pub file: String,
    pub role: NodeRole,

    /// Typed input summary, straight from the atom's data flow.
    pub inputs: Vec<Parameter>,

    /// Typed output summary.
    pub outputs: Vec<Output>,

    pub complexity: u32,

    /// Chains this function participates in, with its position in each.
    pub chains: Vec<ChainMembership>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names<'a>(list: &[&'a str]) -> HashSet<&'a str> {
        list.iter().copied().collect()
    }

    #[test]
    fn test_exported_is_always_entry() {
        let atom = Atom::new("a", "handler", "api.ts")
            .exported()
            .with_calls(vec!["helper".to_string()]);
        let project = names(&["handler", "helper"]);
        assert_eq!(NodeRole::classify(&atom, &project), NodeRole::Entry);
    }

    #[test]
    fn test_external_caller_is_entry() {
        let atom = Atom::new("a", "hook", "hook.ts")
            .with_called_by(vec!["framework_runtime".to_string()]);
        let project = names(&["hook"]);
        assert_eq!(NodeRole::classify(&atom, &project), NodeRole::Entry);
    }

    #[test]
    fn test_no_internal_calls_is_exit() {
        // Not exported, no callers, no calls: exit wins over isolated.
        let atom = Atom::new("a", "leaf", "leaf.ts");
        let project = names(&["leaf", "other"]);
        assert_eq!(NodeRole::classify(&atom, &project), NodeRole::Exit);
    }

    #[test]
    fn test_intermediate() {
        let atom = Atom::new("a", "mid", "mid.ts")
            .with_calls(vec!["leaf".to_string()])
            .with_called_by(vec!["top".to_string()]);
        let project = names(&["mid", "leaf", "top"]);
        assert_eq!(NodeRole::classify(&atom, &project), NodeRole::Intermediate);
    }

    #[test]
    fn test_isolated() {
        // Makes internal calls but nothing calls it.
        let atom = Atom::new("a", "orphan", "x.ts").with_calls(vec!["leaf".to_string()]);
        let project = names(&["orphan", "leaf"]);
        assert_eq!(NodeRole::classify(&atom, &project), NodeRole::Isolated);
    }

    #[test]
    fn test_external_only_calls_count_as_exit() {
        // Calls only names outside the project.
        let atom = Atom::new("a", "wrapper", "x.ts")
            .with_calls(vec!["console_log".to_string()])
            .with_called_by(vec!["wrapper_user".to_string()]);
        let project = names(&["wrapper", "wrapper_user"]);
        assert_eq!(NodeRole::classify(&atom, &project), NodeRole::Exit);
    }
}
