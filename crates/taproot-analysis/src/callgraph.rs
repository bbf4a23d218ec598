//! Call graph construction.
//!
//! Resolution ladder per call reference, against the frozen symbol table:
//!   1. exact qualified-name match,
//!   2. bare-name match within the caller's own file,
//!   3. bare-name match within a file the caller's file imports,
//!   4. bare-name match anywhere in the project (best effort; dynamic and
//!      cross-language calls cannot always be traced precisely).
//! Remaining ties either fan out into one ambiguous edge per candidate or
//! collapse to the first candidate, per the configured policy. References
//! resolving to nothing are recorded as diagnostics, never errors.
//!
//! Resolution is sharded by caller over rayon; the table is immutable by
//! now, so lookups need no locking. Shard outputs merge in sorted order so
//! the final edge list is identical run to run.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use rayon::prelude::*;

use taproot_core::{
    AnalysisConfig, CallEdge, CallGraph, Diagnostic, DiagnosticKind, Diagnostics, ImportGraph,
    ResolutionPolicy, Symbol, SymbolTable,
};

pub fn build_call_graph(
    table: &SymbolTable,
    imports: &ImportGraph,
    config: &AnalysisConfig,
) -> (CallGraph, Diagnostics) {
    // Direct successors per file, for the imported-call tier.
    let imported_by_file: HashMap<&Path, HashSet<&PathBuf>> = table
        .files()
        .iter()
        .map(|f| (f.path.as_path(), imports.imports_of(&f.path).collect()))
        .collect();

    let shards: Vec<(Vec<CallEdge>, Vec<Diagnostic>)> = table
        .symbols()
        .par_iter()
        .map(|caller| resolve_caller(caller, table, &imported_by_file, config.resolution))
        .collect();

    let mut edges = Vec::new();
    let mut diagnostics = Diagnostics::new();
    for (shard_edges, shard_diags) in shards {
        edges.extend(shard_edges);
        for diag in shard_diags {
            diagnostics.push(diag);
        }
    }
    edges.sort_by(|a, b| {
        (&a.caller, &a.callee, a.line).cmp(&(&b.caller, &b.callee, b.line))
    });

    let mut graph = CallGraph::new();
    for symbol in table.symbols() {
        graph.add_symbol(symbol.id.clone());
    }
    for edge in edges {
        graph.add_edge(edge);
    }

    tracing::debug!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "call graph built"
    );
    (graph, diagnostics)
}

fn resolve_caller(
    caller: &Symbol,
    table: &SymbolTable,
    imported_by_file: &HashMap<&Path, HashSet<&PathBuf>>,
    policy: ResolutionPolicy,
) -> (Vec<CallEdge>, Vec<Diagnostic>) {
    let imported = imported_by_file.get(caller.file.as_path());
    let mut edges = Vec::new();
    let mut diagnostics = Vec::new();

    for call in &caller.call_refs {
        let candidates = resolve_ref(&call.name, caller, table, imported);
        if candidates.is_empty() {
            diagnostics.push(Diagnostic::new(
                DiagnosticKind::UnresolvedCall,
                &caller.file,
                Some(call.line),
                format!("`{}` called from `{}` matches no known symbol", call.name, caller.qualified_name),
            ));
            continue;
        }

        match policy {
            ResolutionPolicy::FanOut => {
                let ambiguous = candidates.len() > 1;
                for callee in candidates {
                    edges.push(CallEdge {
                        caller: caller.id.clone(),
                        callee: callee.id.clone(),
                        line: call.line,
                        ambiguous,
                    });
                }
            }
            ResolutionPolicy::FirstCandidate => {
                // lookup_by_name order is (file, start_line), so first is
                // deterministic.
                edges.push(CallEdge {
                    caller: caller.id.clone(),
                    callee: candidates[0].id.clone(),
                    line: call.line,
                    ambiguous: false,
                });
            }
        }
    }

    (edges, diagnostics)
}

fn resolve_ref<'t>(
    name: &str,
    caller: &Symbol,
    table: &'t SymbolTable,
    imported: Option<&HashSet<&PathBuf>>,
) -> Vec<&'t Symbol> {
    // A dotted reference is already qualified.
    if name.contains('.') {
        if let Some(symbol) = table.lookup_by_qualified_name(name) {
            return vec![symbol];
        }
    }

    let all = table.lookup_by_name(name);
    if all.is_empty() {
        return all;
    }

    let local: Vec<&Symbol> = all
        .iter()
        .copied()
        .filter(|s| s.file == caller.file)
        .collect();
    if !local.is_empty() {
        return local;
    }

    if let Some(imported) = imported {
        let via_import: Vec<&Symbol> = all
            .iter()
            .copied()
            .filter(|s| imported.contains(&s.file))
            .collect();
        if !via_import.is_empty() {
            return via_import;
        }
    }

    all
}
