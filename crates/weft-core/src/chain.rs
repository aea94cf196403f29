//! Chains: observed call paths through the program.

use serde::{Deserialize, Serialize};

/// An ordered call path through atoms, recorded by upstream analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chain {
    pub id: String,

    /// Atom ids in call order.
    pub steps: Vec<String>,
}

impl Chain {
    pub fn new(id: impl Into<String>, steps: Vec<String>) -> Self {
        Self {
            id: id.into(),
            steps,
        }
    }

    /// Where an atom sits within this chain, if it participates.
    /// The first step wins for single-step chains.
    pub fn position_of(&self, atom_id: &str) -> Option<ChainPosition> {
        let index = self.steps.iter().position(|s| s == atom_id)?;
        Some(if index == 0 {
            ChainPosition::Entry
        } else if index == self.steps.len() - 1 {
            ChainPosition::Exit
        } else {
            ChainPosition::Middle
        })
    }
}

/// Position of an atom within one chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChainPosition {
    Entry,
    Middle,
    Exit,
}
