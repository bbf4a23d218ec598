//! Taproot extract — per-language symbol extraction over tree-sitter
//!
//! One extractor per supported language turns a file's parse tree into the
//! language-agnostic records of `taproot-core`: symbols with signatures,
//! spans, raw call references, and raw import specifiers. Everything
//! downstream operates only on that model, never on language-specific trees.

pub mod extractor;
pub mod languages;
pub mod parser;

#[cfg(test)]
mod tests;

pub use extractor::{ExtractError, Extractor, FileExtraction, extractor_for};
