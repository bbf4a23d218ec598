//! Language extractor capability interface

use std::path::{Path, PathBuf};

use thiserror::Error;

use taproot_core::{FileNode, Language, Symbol};

use crate::languages;

/// Everything one file contributes to the run: its node and its symbols.
#[derive(Debug, Clone)]
pub struct FileExtraction {
    pub file: FileNode,
    pub symbols: Vec<Symbol>,
}

/// Per-file extraction failure. Non-fatal: the pipeline records it as a
/// diagnostic and the file contributes no symbols.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("{file}:{line}: syntax error: {detail}", file = .file.display())]
    Parse {
        file: PathBuf,
        line: u32,
        detail: String,
    },

    #[error("{file}: {detail}", file = .file.display())]
    Grammar { file: PathBuf, detail: String },
}

impl ExtractError {
    pub fn line(&self) -> Option<u32> {
        match self {
            ExtractError::Parse { line, .. } => Some(*line),
            ExtractError::Grammar { .. } => None,
        }
    }
}

/// Turns one file's parse tree into symbol records and import specifiers.
/// One implementation per supported language; callers never see the tree.
pub trait Extractor: Send + Sync {
    fn language(&self) -> Language;

    fn extract(&self, path: &Path, source: &str) -> Result<FileExtraction, ExtractError>;
}

/// The extractor for a language. Total over the supported set.
pub fn extractor_for(language: Language) -> Box<dyn Extractor> {
    match language {
        Language::Python => Box::new(languages::python::PythonExtractor),
        Language::JavaScript | Language::TypeScript => {
            Box::new(languages::ecma::EcmaExtractor::new(language))
        }
        Language::C | Language::Cpp => Box::new(languages::cfamily::CFamilyExtractor::new(language)),
        Language::Java => Box::new(languages::java::JavaExtractor),
        Language::Go => Box::new(languages::go::GoExtractor),
    }
}
