//! Process-wide symbol index.
//!
//! Extraction workers register symbols concurrently through
//! [`SymbolTableBuilder`]; once every file has merged, [`finish`] produces
//! the immutable [`SymbolTable`] snapshot that the call graph builder and
//! cross-file analyzer read without locking.
//!
//! [`finish`]: SymbolTableBuilder::finish

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use dashmap::DashMap;

use crate::error::Error;
use crate::model::{FileNode, Symbol, SymbolId};

/// Concurrent write side of the symbol table.
#[derive(Default)]
pub struct SymbolTableBuilder {
    symbols: DashMap<SymbolId, Symbol>,
}

impl SymbolTableBuilder {
    pub fn new() -> Self {
        SymbolTableBuilder::default()
    }

    /// Register one extracted symbol. Fails on id collision or a malformed
    /// record; both indicate an extractor bug and abort the run.
    pub fn register(&self, symbol: Symbol) -> Result<(), Error> {
        symbol.validate()?;
        match self.symbols.entry(symbol.id.clone()) {
            dashmap::mapref::entry::Entry::Occupied(_) => {
                Err(Error::DuplicateSymbol(symbol.id))
            }
            dashmap::mapref::entry::Entry::Vacant(slot) => {
                slot.insert(symbol);
                Ok(())
            }
        }
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Freeze into the read-only snapshot. `files` carries the resolved
    /// [`FileNode`] records (one per scanned file, parse failures included
    /// with empty symbol lists).
    pub fn finish(self, files: Vec<FileNode>) -> SymbolTable {
        let mut symbols: Vec<Symbol> = self.symbols.into_iter().map(|(_, s)| s).collect();
        symbols.sort_by(|a, b| a.id.cmp(&b.id));

        let mut by_id = HashMap::with_capacity(symbols.len());
        let mut by_name: HashMap<String, Vec<usize>> = HashMap::new();
        let mut by_qualified: HashMap<String, Vec<usize>> = HashMap::new();
        for (idx, symbol) in symbols.iter().enumerate() {
            by_id.insert(symbol.id.clone(), idx);
            by_name.entry(symbol.name.clone()).or_default().push(idx);
            by_qualified
                .entry(symbol.qualified_name.clone())
                .or_default()
                .push(idx);
        }

        // Name lookups are ordered by (file, start_line) for determinism.
        let span_order = |indices: &mut Vec<usize>| {
            indices.sort_by(|&a, &b| {
                (&symbols[a].file, symbols[a].start_line)
                    .cmp(&(&symbols[b].file, symbols[b].start_line))
            });
        };
        for indices in by_name.values_mut() {
            span_order(indices);
        }
        for indices in by_qualified.values_mut() {
            span_order(indices);
        }

        let mut files = files;
        files.sort_by(|a, b| a.path.cmp(&b.path));
        let file_index = files
            .iter()
            .enumerate()
            .map(|(idx, f)| (f.path.clone(), idx))
            .collect();

        SymbolTable {
            symbols,
            by_id,
            by_name,
            by_qualified,
            files,
            file_index,
        }
    }
}

/// Immutable symbol index for one run. Owns every [`Symbol`] and
/// [`FileNode`]; downstream stages hold only ids into it.
pub struct SymbolTable {
    /// All symbols, sorted by id.
    symbols: Vec<Symbol>,
    by_id: HashMap<SymbolId, usize>,
    by_name: HashMap<String, Vec<usize>>,
    by_qualified: HashMap<String, Vec<usize>>,
    /// All file nodes, sorted by path.
    files: Vec<FileNode>,
    file_index: HashMap<PathBuf, usize>,
}

impl SymbolTable {
    pub fn get(&self, id: &SymbolId) -> Option<&Symbol> {
        self.by_id.get(id).map(|&idx| &self.symbols[idx])
    }

    /// Every symbol sharing this bare name, across all files, ordered by
    /// (file path, start_line).
    pub fn lookup_by_name(&self, name: &str) -> Vec<&Symbol> {
        self.by_name
            .get(name)
            .map(|indices| indices.iter().map(|&idx| &self.symbols[idx]).collect())
            .unwrap_or_default()
    }

    /// Exact qualified-name lookup. If source-level redefinition produced
    /// several symbols with one qualified name, the earliest definition wins.
    pub fn lookup_by_qualified_name(&self, qualified: &str) -> Option<&Symbol> {
        self.by_qualified
            .get(qualified)
            .and_then(|indices| indices.first())
            .map(|&idx| &self.symbols[idx])
    }

    /// All symbols, sorted by id.
    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    /// All file nodes, sorted by path.
    pub fn files(&self) -> &[FileNode] {
        &self.files
    }

    pub fn file(&self, path: &Path) -> Option<&FileNode> {
        self.file_index.get(path).map(|&idx| &self.files[idx])
    }

    pub fn symbols_in_file<'a>(&'a self, path: &'a Path) -> impl Iterator<Item = &'a Symbol> {
        self.symbols.iter().filter(move |s| s.file == path)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}
