//! Taproot core — canonical data model, symbol table, and graph structures

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod graph;
pub mod model;
pub mod symbols;

#[cfg(test)]
mod tests;

pub use config::{AnalysisConfig, DuplicateConfig, ResolutionPolicy};
pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
pub use error::Error;
pub use graph::{CallGraph, ImportGraph};
pub use model::{
    CallEdge, CallRef, DuplicateCluster, FileNode, Import, ImportTarget, Language, Param,
    Signature, Symbol, SymbolId, SymbolKind,
};
pub use symbols::{SymbolTable, SymbolTableBuilder};
