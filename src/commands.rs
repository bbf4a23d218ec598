//! CLI command implementations

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, bail};

use taproot_analysis::{AnalysisReport, Analyzer};
use taproot_core::{AnalysisConfig, ImportTarget, Language, ResolutionPolicy};

use crate::scanner;

pub struct AnalyzeOptions {
    pub output: Option<PathBuf>,
    pub languages: Vec<String>,
    pub excludes: Vec<String>,
    pub threshold: f64,
    pub min_tokens: usize,
    pub entry_points: Vec<String>,
    pub first_candidate: bool,
}

pub fn analyze(root: PathBuf, options: AnalyzeOptions) -> anyhow::Result<()> {
    let mut config = AnalysisConfig::default();
    if !options.languages.is_empty() {
        config.languages = options
            .languages
            .iter()
            .map(|tag| match Language::from_tag(tag) {
                Some(language) => Ok(language),
                None => bail!("unknown language tag `{tag}`"),
            })
            .collect::<anyhow::Result<_>>()?;
    }
    config.entry_point_names.extend(options.entry_points);
    config.duplicates.similarity_threshold = options.threshold;
    config.duplicates.min_body_tokens = options.min_tokens;
    if options.first_candidate {
        config.resolution = ResolutionPolicy::FirstCandidate;
    }

    let analyzer = Analyzer::new(config).context("invalid configuration")?;

    tracing::info!("Analyzing project: {}", root.display());
    let excludes = scanner::build_excludes(&options.excludes)?;
    let files = scanner::scan(&root, &analyzer.config().languages, &excludes);
    tracing::info!("Found {} source files", files.len());

    let report = analyzer
        .analyze(&root, &files)
        .context("analysis failed")?;

    let json = render_report(&root, &report)?;
    match options.output {
        Some(path) => {
            fs::write(&path, json).with_context(|| format!("cannot write {}", path.display()))?;
            tracing::info!("Report written to {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

/// Serialize the in-memory result set. The analysis core deliberately has
/// no output format of its own; this is the report-generation side.
fn render_report(root: &std::path::Path, report: &AnalysisReport) -> anyhow::Result<String> {
    let files: Vec<_> = report
        .table
        .files()
        .iter()
        .map(|file| {
            let imports: Vec<_> = file
                .imports
                .iter()
                .map(|import| {
                    serde_json::json!({
                        "spec": import.spec,
                        "line": import.line,
                        "resolved": match &import.target {
                            ImportTarget::Resolved(path) => Some(path.display().to_string()),
                            ImportTarget::External => None,
                        },
                    })
                })
                .collect();
            serde_json::json!({
                "path": file.path.display().to_string(),
                "language": file.language.tag(),
                "imports": imports,
            })
        })
        .collect();

    let symbols: Vec<_> = report
        .table
        .symbols()
        .iter()
        .map(|symbol| {
            serde_json::json!({
                "id": symbol.id.as_str(),
                "name": symbol.name,
                "qualified_name": symbol.qualified_name,
                "kind": symbol.kind,
                "language": symbol.language.tag(),
                "file": symbol.file.display().to_string(),
                "lines": [symbol.start_line, symbol.end_line],
                "exported": symbol.exported,
            })
        })
        .collect();

    let edges: Vec<_> = report
        .call_graph
        .edges()
        .map(|edge| {
            serde_json::json!({
                "caller": edge.caller.as_str(),
                "callee": edge.callee.as_str(),
                "line": edge.line,
                "ambiguous": edge.ambiguous,
            })
        })
        .collect();

    let dead: Vec<&str> = report.dead_symbols.iter().map(|id| id.as_str()).collect();

    let report_json = serde_json::json!({
        "root": root.display().to_string(),
        "files": files,
        "symbols": symbols,
        "call_graph": {
            "node_count": report.call_graph.node_count(),
            "edges": edges,
        },
        "import_graph": {
            "node_count": report.import_graph.node_count(),
            "edge_count": report.import_graph.edge_count(),
        },
        "cycles": report.cycles,
        "dead_code": dead,
        "duplicate_clusters": report.duplicate_clusters,
        "diagnostics": report.diagnostics,
    });

    Ok(serde_json::to_string_pretty(&report_json)?)
}
