//! Run-scoped orchestration of the full pipeline: parallel extraction,
//! symbol table aggregation, import resolution, call graph construction,
//! and the three cross-file passes. One [`Analyzer`] call owns everything
//! for one run; there is no process-wide state, and all graphs are rebuilt
//! from scratch each time.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use regex::Regex;

use taproot_core::{
    AnalysisConfig, CallGraph, Diagnostic, DiagnosticKind, Diagnostics, DuplicateCluster, Error,
    FileNode, ImportGraph, Language, Symbol, SymbolId, SymbolTable, SymbolTableBuilder,
};
use taproot_extract::extractor_for;

use crate::cycles::ImportCycle;
use crate::{callgraph, cycles, dead, duplicates, resolve};

/// One scanner entry: a file to analyze, relative to the project root,
/// and its language tag. Root-relative paths keep symbol ids identical
/// across machines and runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    pub language: Language,
}

/// Everything one run produces, handed to the caller as in-memory
/// structures for serialization elsewhere.
pub struct AnalysisReport {
    pub table: SymbolTable,
    pub call_graph: CallGraph,
    pub import_graph: ImportGraph,
    pub cycles: Vec<ImportCycle>,
    pub dead_symbols: Vec<SymbolId>,
    pub duplicate_clusters: Vec<DuplicateCluster>,
    pub diagnostics: Diagnostics,
}

/// Run-scoped analysis context. Construction validates the configuration;
/// nothing outlives [`analyze`](Analyzer::analyze)'s return value.
pub struct Analyzer {
    config: AnalysisConfig,
    test_name: Regex,
}

impl Analyzer {
    pub fn new(config: AnalysisConfig) -> Result<Self, Error> {
        config.validate()?;
        let test_name = config.test_name_regex()?;
        Ok(Analyzer { config, test_name })
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Analyze the scanner's file list under `root`. Per-file failures
    /// degrade to diagnostics; only invariant violations (extractor bugs)
    /// abort.
    pub fn analyze(&self, root: &Path, files: &[SourceFile]) -> Result<AnalysisReport, Error> {
        // One file node per path, first scanner entry wins; languages the
        // configuration excludes are skipped.
        let mut seen = HashSet::new();
        let inputs: Vec<&SourceFile> = files
            .iter()
            .filter(|f| self.config.languages.contains(&f.language))
            .filter(|f| seen.insert(f.path.clone()))
            .collect();

        tracing::info!(files = inputs.len(), "extraction started");
        let builder = SymbolTableBuilder::new();
        let per_file: Vec<Result<(FileNode, Vec<Diagnostic>), Error>> = inputs
            .par_iter()
            .map(|source| {
                let (file, symbols, diagnostics) = extract_file(root, source);
                // The single merge point for this file's symbols.
                for symbol in symbols {
                    builder.register(symbol)?;
                }
                Ok((file, diagnostics))
            })
            .collect();

        let mut diagnostics = Diagnostics::new();
        let mut file_nodes = Vec::with_capacity(per_file.len());
        for result in per_file {
            let (file, file_diags) = result?;
            file_nodes.push(file);
            for diag in file_diags {
                diagnostics.push(diag);
            }
        }

        let (file_nodes, import_graph, import_diags) = resolve::resolve_imports(file_nodes);
        diagnostics.extend(import_diags);

        // Extraction is done; the table is read-only from here on.
        let table = builder.finish(file_nodes);
        tracing::info!(
            symbols = table.len(),
            import_edges = import_graph.edge_count(),
            "symbol table frozen"
        );

        let (call_graph, call_diags) = callgraph::build_call_graph(&table, &import_graph, &self.config);
        diagnostics.extend(call_diags);

        let cycles = cycles::detect_cycles(&import_graph);
        let dead_symbols = dead::detect_dead_code(&table, &call_graph, &self.config, &self.test_name);
        let duplicate_clusters = duplicates::detect_duplicates(&table, &self.config.duplicates);
        diagnostics.sort();

        tracing::info!(
            cycles = cycles.len(),
            dead = dead_symbols.len(),
            clusters = duplicate_clusters.len(),
            diagnostics = diagnostics.len(),
            "analysis finished"
        );

        Ok(AnalysisReport {
            table,
            call_graph,
            import_graph,
            cycles,
            dead_symbols,
            duplicate_clusters,
            diagnostics,
        })
    }
}

/// Read and extract one file. Every failure mode here is per-file and
/// non-fatal: the file keeps its node, contributes no symbols, and the
/// reason lands in the diagnostics.
fn extract_file(root: &Path, source: &SourceFile) -> (FileNode, Vec<Symbol>, Vec<Diagnostic>) {
    let empty = || FileNode {
        path: source.path.clone(),
        language: source.language,
        imports: Vec::new(),
    };

    let content = match fs::read(root.join(&source.path)) {
        Ok(bytes) => match String::from_utf8(bytes) {
            Ok(content) => content,
            Err(_) => {
                return (
                    empty(),
                    Vec::new(),
                    vec![Diagnostic::new(
                        DiagnosticKind::ParseFailure,
                        &source.path,
                        None,
                        "file is not valid UTF-8",
                    )],
                );
            }
        },
        Err(e) => {
            return (
                empty(),
                Vec::new(),
                vec![Diagnostic::new(
                    DiagnosticKind::ParseFailure,
                    &source.path,
                    None,
                    format!("cannot read file: {e}"),
                )],
            );
        }
    };

    match extractor_for(source.language).extract(&source.path, &content) {
        Ok(extraction) => (extraction.file, extraction.symbols, Vec::new()),
        Err(e) => {
            tracing::debug!(file = %source.path.display(), error = %e, "extraction skipped file");
            (
                empty(),
                Vec::new(),
                vec![Diagnostic::new(
                    DiagnosticKind::ParseFailure,
                    &source.path,
                    e.line(),
                    e.to_string(),
                )],
            )
        }
    }
}
