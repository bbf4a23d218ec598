//! Call graph and import graph over petgraph, keyed by stable ids.
//!
//! Both graphs are adjacency structures indexed through an id→node map, so
//! cycles and self-loops (mutual and direct recursion, circular imports)
//! cost nothing to build or drop. Nodes are inserted in sorted order by the
//! pipeline, which keeps traversal and SCC output stable across runs.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use petgraph::Direction;
use petgraph::stable_graph::{NodeIndex, StableDiGraph};
use petgraph::visit::EdgeRef;

use crate::model::{CallEdge, SymbolId};

/// Directed caller→callee graph. May contain cycles and self-loops; both
/// are valid.
#[derive(Default)]
pub struct CallGraph {
    inner: StableDiGraph<SymbolId, CallEdge>,
    index: HashMap<SymbolId, NodeIndex>,
}

impl CallGraph {
    pub fn new() -> Self {
        CallGraph::default()
    }

    pub fn add_symbol(&mut self, id: SymbolId) -> NodeIndex {
        match self.index.get(&id) {
            Some(&idx) => idx,
            None => {
                let idx = self.inner.add_node(id.clone());
                self.index.insert(id, idx);
                idx
            }
        }
    }

    /// Add one resolved call edge. Both endpoints must already be nodes;
    /// the builder registers every symbol before resolving any call.
    pub fn add_edge(&mut self, edge: CallEdge) {
        let (Some(&caller), Some(&callee)) =
            (self.index.get(&edge.caller), self.index.get(&edge.callee))
        else {
            debug_assert!(false, "call edge endpoint not registered");
            return;
        };
        self.inner.add_edge(caller, callee, edge);
    }

    pub fn contains(&self, id: &SymbolId) -> bool {
        self.index.contains_key(id)
    }

    pub fn node_count(&self) -> usize {
        self.inner.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.inner.edge_count()
    }

    /// Incoming edge count. Ambiguous edges and self-loops both count; the
    /// dead-code pass relies on that.
    pub fn in_degree(&self, id: &SymbolId) -> usize {
        self.index
            .get(id)
            .map(|&idx| self.inner.edges_directed(idx, Direction::Incoming).count())
            .unwrap_or(0)
    }

    pub fn edges_from<'a>(&'a self, id: &SymbolId) -> impl Iterator<Item = &'a CallEdge> {
        self.index
            .get(id)
            .into_iter()
            .flat_map(move |&idx| {
                self.inner
                    .edges_directed(idx, Direction::Outgoing)
                    .map(|e| e.weight())
            })
    }

    pub fn edges_to<'a>(&'a self, id: &SymbolId) -> impl Iterator<Item = &'a CallEdge> {
        self.index
            .get(id)
            .into_iter()
            .flat_map(move |&idx| {
                self.inner
                    .edges_directed(idx, Direction::Incoming)
                    .map(|e| e.weight())
            })
    }

    /// All edges in insertion order (the builder inserts them pre-sorted).
    pub fn edges(&self) -> impl Iterator<Item = &CallEdge> {
        self.inner.edge_indices().filter_map(|e| self.inner.edge_weight(e))
    }

    /// Node ids in insertion order.
    pub fn symbol_ids(&self) -> impl Iterator<Item = &SymbolId> {
        self.inner.node_indices().filter_map(|n| self.inner.node_weight(n))
    }
}

impl std::fmt::Debug for CallGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallGraph")
            .field("nodes", &self.inner.node_count())
            .field("edges", &self.inner.edge_count())
            .finish()
    }
}

/// Directed file→file dependency graph built from resolved imports only.
/// Edges are set-like: repeated imports of one file collapse to one edge.
#[derive(Default)]
pub struct ImportGraph {
    inner: StableDiGraph<PathBuf, ()>,
    index: HashMap<PathBuf, NodeIndex>,
}

impl ImportGraph {
    pub fn new() -> Self {
        ImportGraph::default()
    }

    pub fn add_file(&mut self, path: PathBuf) -> NodeIndex {
        match self.index.get(&path) {
            Some(&idx) => idx,
            None => {
                let idx = self.inner.add_node(path.clone());
                self.index.insert(path, idx);
                idx
            }
        }
    }

    /// Add an import edge; both files must already be nodes.
    pub fn add_import(&mut self, from: &Path, to: &Path) {
        let (Some(&from), Some(&to)) = (self.index.get(from), self.index.get(to)) else {
            debug_assert!(false, "import edge endpoint not registered");
            return;
        };
        if !self.inner.contains_edge(from, to) {
            self.inner.add_edge(from, to, ());
        }
    }

    pub fn has_edge(&self, from: &Path, to: &Path) -> bool {
        match (self.index.get(from), self.index.get(to)) {
            (Some(&from), Some(&to)) => self.inner.contains_edge(from, to),
            _ => false,
        }
    }

    /// Files directly imported by `path`, in insertion order.
    pub fn imports_of<'a>(&'a self, path: &Path) -> impl Iterator<Item = &'a PathBuf> {
        self.index.get(path).into_iter().flat_map(move |&idx| {
            self.inner
                .edges_directed(idx, Direction::Outgoing)
                .filter_map(|e| self.inner.node_weight(e.target()))
        })
    }

    pub fn node_count(&self) -> usize {
        self.inner.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.inner.edge_count()
    }

    /// The underlying petgraph structure, for graph algorithms (SCC).
    pub fn graph(&self) -> &StableDiGraph<PathBuf, ()> {
        &self.inner
    }
}

impl std::fmt::Debug for ImportGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImportGraph")
            .field("nodes", &self.inner.node_count())
            .field("edges", &self.inner.edge_count())
            .finish()
    }
}
