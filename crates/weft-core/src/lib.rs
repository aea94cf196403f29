//! Weft Core - Shared analysis model
//!
//! This crate defines the vocabulary the rest of Weft speaks: atoms
//! (per-function units produced by upstream extraction), call sites,
//! chains, and the per-function operation graph consumed by type
//! inference. Nothing here parses source text; these records arrive
//! already materialized from the extraction pipeline.

mod atom;
mod call;
mod chain;
mod ops;

pub use atom::{Atom, DataFlow, Output, OutputKind, Parameter, Transformation};
pub use call::{ArgumentExpr, CallInfo};
pub use chain::{Chain, ChainPosition};
pub use ops::{OpInput, OpKind, OpNode, OperationGraph};
