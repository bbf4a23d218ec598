//! Integration tests for taproot
//!
//! These drive the full pipeline over fixture repositories and the CLI
//! binary end to end.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;

use taproot_analysis::{AnalysisReport, Analyzer, SourceFile};
use taproot_core::{AnalysisConfig, DiagnosticKind, Language};

fn write_repo(files: &[(&str, &str)]) -> (TempDir, Vec<SourceFile>) {
    let dir = TempDir::new().unwrap();
    let mut sources = Vec::new();
    for (rel, content) in files {
        let path = dir.path().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        sources.push(SourceFile {
            language: Language::from_path(Path::new(rel)).unwrap(),
            path: PathBuf::from(rel),
        });
    }
    sources.sort_by(|a, b| a.path.cmp(&b.path));
    (dir, sources)
}

fn run(files: &[(&str, &str)]) -> (TempDir, AnalysisReport) {
    let (dir, sources) = write_repo(files);
    let report = Analyzer::new(AnalysisConfig::default())
        .unwrap()
        .analyze(dir.path(), &sources)
        .unwrap();
    (dir, report)
}

/// A small project mixing three languages, a circular import, a dead
/// function, and a near-duplicate pair.
const MIXED_PROJECT: &[(&str, &str)] = &[
    (
        "app/main.py",
        concat!(
            "from app.parser import parse\n",
            "from app.report import render\n\n",
            "def main():\n",
            "    data = parse(\"input\")\n",
            "    render(data)\n",
        ),
    ),
    (
        "app/parser.py",
        concat!(
            "from app.report import footer\n\n",
            "def parse(raw):\n",
            "    out = tokenize(raw)\n",
            "    return out\n\n",
            "def tokenize(raw):\n",
            "    return raw.split()\n\n",
            "def forgotten(raw):\n",
            "    return raw\n",
        ),
    ),
    (
        "app/report.py",
        concat!(
            "from app.parser import parse\n\n",
            "def render(data):\n",
            "    print(data)\n\n",
            "def footer():\n",
            "    return \"--\"\n",
        ),
    ),
    (
        "web/index.js",
        concat!(
            "import { fmt } from './util';\n\n",
            "export function main() {\n",
            "    return fmt(1, 2);\n",
            "}\n",
        ),
    ),
    (
        "web/util.js",
        concat!(
            "export function fmt(a, b) {\n",
            "    let out = a + b;\n",
            "    out = out * a;\n",
            "    out = out - b;\n",
            "    return out;\n",
            "}\n\n",
            "function fmtCopy(x, y) {\n",
            "    let res = x + y;\n",
            "    res = res * x;\n",
            "    res = res - y;\n",
            "    return res;\n",
            "}\n",
        ),
    ),
    (
        "native/core.c",
        concat!(
            "#include \"core.h\"\n\n",
            "static int twice(int n) {\n",
            "    return n * 2;\n",
            "}\n\n",
            "int entry(int n) {\n",
            "    return twice(n);\n",
            "}\n",
        ),
    ),
];

#[test]
fn mixed_language_project_end_to_end() {
    let (_dir, report) = run(MIXED_PROJECT);

    // Symbols from all three languages made it into one table.
    let langs: Vec<Language> = {
        let mut l: Vec<Language> = report.table.symbols().iter().map(|s| s.language).collect();
        l.sort();
        l.dedup();
        l
    };
    assert_eq!(
        langs,
        vec![Language::Python, Language::JavaScript, Language::C]
    );

    // parser.py and report.py import each other through resolved imports.
    assert_eq!(report.cycles.len(), 1);
    let members: Vec<_> = report.cycles[0]
        .members
        .iter()
        .map(|p| p.display().to_string())
        .collect();
    assert_eq!(members, vec!["app/parser.py", "app/report.py"]);

    // forgotten() and fmtCopy() are never referenced; C's static helper is
    // called, and `entry` is exempt only if configured, so it shows too.
    let dead: Vec<&str> = report
        .dead_symbols
        .iter()
        .map(|id| report.table.get(id).unwrap().name.as_str())
        .collect();
    assert!(dead.contains(&"forgotten"));
    assert!(dead.contains(&"fmtCopy"));
    assert!(!dead.contains(&"twice"));
    assert!(!dead.contains(&"parse"));

    // fmt and fmtCopy differ only by names.
    assert_eq!(report.duplicate_clusters.len(), 1);
    let cluster = &report.duplicate_clusters[0];
    let cluster_names: Vec<&str> = cluster
        .symbols
        .iter()
        .map(|id| report.table.get(id).unwrap().name.as_str())
        .collect();
    assert_eq!(cluster_names, vec!["fmt", "fmtCopy"]);
    assert!((cluster.similarity - 1.0).abs() < 1e-9);

    // Cross-file python call resolved through the import edge.
    let parse_id = &report
        .table
        .symbols()
        .iter()
        .find(|s| s.qualified_name == "parser.parse")
        .unwrap()
        .id;
    assert!(report.call_graph.in_degree(parse_id) >= 1);
}

#[test]
fn two_runs_are_byte_identical() {
    let (_dir_a, first) = run(MIXED_PROJECT);
    let (_dir_b, second) = run(MIXED_PROJECT);

    let ids = |r: &AnalysisReport| -> Vec<String> {
        r.table
            .symbols()
            .iter()
            .map(|s| s.id.as_str().to_string())
            .collect()
    };
    let edges = |r: &AnalysisReport| -> Vec<(String, String, u32, bool)> {
        r.call_graph
            .edges()
            .map(|e| {
                (
                    e.caller.as_str().to_string(),
                    e.callee.as_str().to_string(),
                    e.line,
                    e.ambiguous,
                )
            })
            .collect()
    };

    assert_eq!(ids(&first), ids(&second));
    assert_eq!(edges(&first), edges(&second));
    assert_eq!(first.cycles, second.cycles);
    assert_eq!(first.dead_symbols, second.dead_symbols);
    assert_eq!(first.duplicate_clusters, second.duplicate_clusters);
    assert_eq!(first.diagnostics, second.diagnostics);
}

#[test]
fn broken_file_degrades_to_diagnostic() {
    let (_dir, report) = run(&[
        ("ok.py", "def main():\n    pass\n"),
        ("broken.py", "def oops(:\n    pass\n"),
    ]);

    assert_eq!(report.table.len(), 1);
    assert_eq!(
        report
            .diagnostics
            .of_kind(DiagnosticKind::ParseFailure)
            .count(),
        1
    );
}

#[test]
fn cli_help_mentions_analyze() {
    let output = Command::new("cargo")
        .args(["run", "--quiet", "--", "--help"])
        .output()
        .expect("failed to run CLI");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("taproot"));
    assert!(stdout.contains("analyze"));
}

#[test]
fn cli_analyze_emits_json_report() {
    let (dir, _sources) = write_repo(&[
        ("a.py", "import b\n\ndef main():\n    helper()\n"),
        ("b.py", "import a\n\ndef helper():\n    pass\n"),
    ]);

    let output = Command::new("cargo")
        .args([
            "run",
            "--quiet",
            "--",
            "--root",
            dir.path().to_str().unwrap(),
            "analyze",
        ])
        .output()
        .expect("failed to run CLI");
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let report: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout is not valid JSON");

    assert_eq!(report["files"].as_array().unwrap().len(), 2);
    assert_eq!(report["cycles"].as_array().unwrap().len(), 1);
    assert_eq!(report["dead_code"].as_array().unwrap().len(), 0);

    let edges = report["call_graph"]["edges"].as_array().unwrap();
    assert_eq!(edges.len(), 1);
    assert!(edges[0]["caller"].as_str().unwrap().contains("main"));
    assert!(edges[0]["callee"].as_str().unwrap().contains("helper"));
}
