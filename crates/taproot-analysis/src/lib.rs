//! Taproot analysis — import resolution, call graph construction, and the
//! cross-file passes (cycle detection, dead code, duplicate clustering)
//!
//! Everything here operates on the language-agnostic model from
//! `taproot-core`; no stage ever sees a language-specific parse tree.

pub mod callgraph;
pub mod cycles;
pub mod dead;
pub mod duplicates;
pub mod pipeline;
pub mod resolve;


pub use cycles::ImportCycle;
pub use pipeline::{AnalysisReport, Analyzer, SourceFile};
