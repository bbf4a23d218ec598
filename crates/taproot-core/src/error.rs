//! Error taxonomy: invariant violations abort the run, configuration errors
//! are rejected before analysis starts. Per-file failures are diagnostics,
//! not errors (see `diagnostics`).

use std::path::PathBuf;

use thiserror::Error;

use crate::model::SymbolId;

#[derive(Debug, Error)]
pub enum Error {
    /// Two extracted symbols produced the same id. Ids embed file, qualified
    /// name, and start line, so a collision means an upstream extractor bug.
    #[error("duplicate symbol id `{0}`")]
    DuplicateSymbol(SymbolId),

    #[error("malformed symbol `{id}` in {file}: {detail}", file = .file.display())]
    MalformedSymbol {
        id: SymbolId,
        file: PathBuf,
        detail: String,
    },

    #[error("similarity threshold {0} is outside [0, 1]")]
    InvalidThreshold(f64),

    #[error("minimum duplicate body token count must be at least 1")]
    ZeroMinTokens,

    #[error("invalid test name pattern `{pattern}`: {source}")]
    InvalidTestPattern {
        pattern: String,
        #[source]
        source: Box<regex::Error>,
    },

    #[error("no languages configured for analysis")]
    EmptyLanguageSet,
}
