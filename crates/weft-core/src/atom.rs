//! Atoms: the per-function units everything else is built from.
//!
//! An atom is one extracted function or method together with what the
//! extractor could observe about it: declared inputs and outputs,
//! recorded transformations, and who it calls / is called by. Atoms are
//! read-only to the analysis layer.

use serde::{Deserialize, Serialize};

/// One extracted function or method.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Atom {
    /// Stable identifier assigned by extraction.
    pub id: String,

    /// Bare function name.
    pub name: String,

    /// Path of the file defining this atom.
    pub file: String,

    /// The function's source text, used for usage scanning.
    #[serde(default)]
    pub source: String,

    /// Declared inputs, outputs, and recorded transformations.
    #[serde(default)]
    pub data_flow: DataFlow,

    /// Names of functions this atom calls.
    #[serde(default)]
    pub calls: Vec<String>,

    /// Names of functions recorded as calling this atom.
    #[serde(default)]
    pub called_by: Vec<String>,

    /// Cyclomatic complexity estimate from extraction.
    #[serde(default)]
    pub complexity: u32,

    #[serde(default)]
    pub has_side_effects: bool,

    #[serde(default)]
    pub is_exported: bool,
}

impl Atom {
    /// Creates a bare atom. Extraction normally fills the rest in;
    /// tests use the `with_*` helpers.
    pub fn new(id: impl Into<String>, name: impl Into<String>, file: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            file: file.into(),
            source: String::new(),
            data_flow: DataFlow::default(),
            calls: Vec::new(),
            called_by: Vec::new(),
            complexity: 0,
            has_side_effects: false,
            is_exported: false,
        }
    }

    /// Qualified resolution key. Bare names collide across files, so
    /// resolution prefers this key and falls back to the name.
    pub fn key(&self) -> String {
        format!("{}::{}", self.file, self.name)
    }

    /// True if the atom declares a return-valued output.
    pub fn has_return_output(&self) -> bool {
        self.data_flow
            .outputs
            .iter()
            .any(|o| o.kind == OutputKind::Return)
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    pub fn with_data_flow(mut self, data_flow: DataFlow) -> Self {
        self.data_flow = data_flow;
        self
    }

    pub fn with_calls(mut self, calls: Vec<String>) -> Self {
        self.calls = calls;
        self
    }

    pub fn with_called_by(mut self, called_by: Vec<String>) -> Self {
        self.called_by = called_by;
        self
    }

    pub fn with_complexity(mut self, complexity: u32) -> Self {
        self.complexity = complexity;
        self
    }

    pub fn exported(mut self) -> Self {
        self.is_exported = true;
        self
    }
}

/// What flows in and out of one atom.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DataFlow {
    pub inputs: Vec<Parameter>,
    pub outputs: Vec<Output>,
    pub transformations: Vec<Transformation>,
}

/// A declared parameter of an atom.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,

    /// Declared type, when extraction could recover one.
    #[serde(default)]
    pub data_type: Option<String>,

    /// True for destructured patterns like `{ a, b }`.
    #[serde(default)]
    pub is_destructured: bool,
}

impl Parameter {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: None,
            is_destructured: false,
        }
    }

    pub fn with_type(mut self, data_type: impl Into<String>) -> Self {
        self.data_type = Some(data_type.into());
        self
    }

    pub fn destructured(mut self) -> Self {
        self.is_destructured = true;
        self
    }
}

/// How an atom's effect leaves the function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputKind {
    /// Value returned to the caller.
    Return,
    /// Mutation of state visible outside the function.
    Mutation,
    /// Event or message emitted.
    Emit,
}

/// One declared output of an atom.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Output {
    pub kind: OutputKind,

    #[serde(default)]
    pub data_type: Option<String>,
}

impl Output {
    /// A return-valued output with an optional declared type.
    pub fn ret(data_type: Option<&str>) -> Self {
        Self {
            kind: OutputKind::Return,
            data_type: data_type.map(str::to_string),
        }
    }
}

/// A transformation recorded inside an atom's body, e.g. a `map` over
/// one variable producing another.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transformation {
    /// Transformation kind as recorded by extraction ("map", "reduce", ...).
    pub kind: String,

    /// Variable names consumed.
    #[serde(default)]
    pub inputs: Vec<String>,

    /// Variable names produced.
    #[serde(default)]
    pub outputs: Vec<String>,
}
