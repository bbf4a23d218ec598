//! Per-language tree-walking extractors.
//!
//! JavaScript and TypeScript share one walker (their grammars agree on the
//! node kinds used here), as do C and C++.

pub mod cfamily;
pub mod ecma;
pub mod go;
pub mod java;
pub mod python;

use std::path::Path;

use tree_sitter::Node;

use taproot_core::{
    CallRef, Language, Signature, Symbol, SymbolId, SymbolKind,
};

/// Node source text; tree-sitter byte ranges are always valid for the
/// source the tree was parsed from.
pub(crate) fn text<'a>(node: Node, source: &'a str) -> &'a str {
    node.utf8_text(source.as_bytes()).unwrap_or("")
}

pub(crate) fn start_line(node: Node) -> u32 {
    node.start_position().row as u32 + 1
}

pub(crate) fn end_line(node: Node) -> u32 {
    node.end_position().row as u32 + 1
}

/// Module name used to qualify symbols: the file stem.
pub(crate) fn module_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Accumulates symbols during one file walk, tracking the enclosing scope
/// chain for qualified names and the innermost enclosing callable so call
/// references attach to their caller.
pub(crate) struct SymbolSink<'a> {
    pub path: &'a Path,
    pub module: String,
    pub language: Language,
    pub symbols: Vec<Symbol>,
    scope: Vec<String>,
    open_callables: Vec<usize>,
}

impl<'a> SymbolSink<'a> {
    pub fn new(path: &'a Path, language: Language) -> Self {
        SymbolSink {
            path,
            module: module_name(path),
            language,
            symbols: Vec::new(),
            scope: Vec::new(),
            open_callables: Vec::new(),
        }
    }

    pub fn at_top_level(&self) -> bool {
        self.scope.is_empty()
    }

    pub fn qualified(&self, name: &str) -> String {
        let mut parts = Vec::with_capacity(self.scope.len() + 2);
        parts.push(self.module.as_str());
        parts.extend(self.scope.iter().map(String::as_str));
        parts.push(name);
        parts.join(".")
    }

    /// Open a new symbol scope. Returns the symbol's index for
    /// [`close`](Self::close).
    pub fn open(
        &mut self,
        name: &str,
        kind: SymbolKind,
        node: Node,
        source: &str,
        signature: Signature,
        exported: bool,
        bases: Vec<String>,
    ) -> usize {
        let qualified = self.qualified(name);
        let start = start_line(node);
        let symbol = Symbol {
            id: SymbolId::new(self.path, &qualified, start),
            name: name.to_string(),
            qualified_name: qualified,
            kind,
            language: self.language,
            file: self.path.to_path_buf(),
            start_line: start,
            end_line: end_line(node),
            signature,
            body: text(node, source).to_string(),
            call_refs: Vec::new(),
            exported,
            parent_class: if matches!(kind, SymbolKind::Method | SymbolKind::Constructor) {
                self.scope.last().cloned()
            } else {
                None
            },
            bases,
        };
        let idx = self.symbols.len();
        self.symbols.push(symbol);
        self.scope.push(name.to_string());
        if kind != SymbolKind::Class {
            self.open_callables.push(idx);
        }
        idx
    }

    /// Enter a named scope without creating a symbol, for out-of-line
    /// member definitions (`void Foo::bar() { ... }`).
    pub fn push_scope(&mut self, name: &str) {
        self.scope.push(name.to_string());
    }

    pub fn pop_scope(&mut self) {
        self.scope.pop();
    }

    pub fn close(&mut self, idx: usize) {
        self.scope.pop();
        if self.open_callables.last() == Some(&idx) {
            self.open_callables.pop();
        }
    }

    /// Record a call reference against the innermost enclosing callable.
    /// Calls at file or class scope have no caller symbol and are dropped.
    pub fn record_call(&mut self, name: &str, line: u32) {
        if name.is_empty() {
            return;
        }
        if let Some(&idx) = self.open_callables.last() {
            self.symbols[idx].call_refs.push(CallRef {
                name: name.to_string(),
                line,
            });
        }
    }

    /// Retroactively mark symbols exported (Python `__all__` is seen after
    /// the definitions it names).
    pub fn mark_exported<F: Fn(&Symbol) -> bool>(&mut self, predicate: F) {
        for symbol in &mut self.symbols {
            if predicate(symbol) {
                symbol.exported = true;
            }
        }
    }
}
