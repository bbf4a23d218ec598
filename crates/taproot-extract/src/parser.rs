//! Tree-sitter parser construction and parse-failure detection.
//!
//! Extraction workers are rayon tasks; each call builds its own `Parser`
//! rather than sharing one, since tree-sitter parsers are not Sync. A tree
//! containing ERROR or MISSING nodes is reported as a structured failure
//! with the first error location, and the file contributes no symbols.

use std::path::Path;

use tree_sitter::{Node, Parser, Tree};

use taproot_core::Language;

use crate::extractor::ExtractError;

/// The tree-sitter grammar for a language.
pub fn grammar(language: Language) -> tree_sitter::Language {
    match language {
        Language::Python => tree_sitter_python::LANGUAGE.into(),
        Language::JavaScript => tree_sitter_javascript::LANGUAGE.into(),
        Language::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
        Language::C => tree_sitter_c::LANGUAGE.into(),
        Language::Cpp => tree_sitter_cpp::LANGUAGE.into(),
        Language::Java => tree_sitter_java::LANGUAGE.into(),
        Language::Go => tree_sitter_go::LANGUAGE.into(),
    }
}

/// Parse `source`, failing on any syntax error.
pub fn parse(language: Language, path: &Path, source: &str) -> Result<Tree, ExtractError> {
    let mut parser = Parser::new();
    parser
        .set_language(&grammar(language))
        .map_err(|e| ExtractError::Grammar {
            file: path.to_path_buf(),
            detail: format!("cannot load {} grammar: {e}", language.tag()),
        })?;

    let tree = parser
        .parse(source, None)
        .ok_or_else(|| ExtractError::Grammar {
            file: path.to_path_buf(),
            detail: "parser produced no tree".to_string(),
        })?;

    if let Some((line, detail)) = first_syntax_error(tree.root_node()) {
        return Err(ExtractError::Parse {
            file: path.to_path_buf(),
            line,
            detail,
        });
    }
    Ok(tree)
}

/// First ERROR or MISSING node in document order, if any.
fn first_syntax_error(root: Node) -> Option<(u32, String)> {
    if !root.has_error() {
        return None;
    }
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if node.is_error() {
            return Some((node.start_position().row as u32 + 1, "invalid syntax".into()));
        }
        if node.is_missing() {
            return Some((
                node.start_position().row as u32 + 1,
                format!("missing {}", node.kind()),
            ));
        }
        // Push in reverse so document order comes off the stack first.
        let mut cursor = node.walk();
        let children: Vec<Node> = node.children(&mut cursor).filter(|c| c.has_error()).collect();
        for child in children.into_iter().rev() {
            stack.push(child);
        }
    }
    // has_error() was set but no concrete node found; report the root.
    Some((root.start_position().row as u32 + 1, "invalid syntax".into()))
}
