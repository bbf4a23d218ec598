//! Import resolution: map raw specifiers to project files where the
//! target language's module-naming convention allows it, mark the rest
//! external, and build the file dependency graph from what resolved.
//!
//! Resolution never fails a run. A specifier that looks project-relative
//! (`from . import x`, `./util`, `#include "util.h"`) but matches nothing
//! gets an UnresolvedImport diagnostic; bare package specifiers (`os`,
//! `fmt`, `<stdio.h>`) are ordinary externals and only recorded on the
//! file node.

use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};

use taproot_core::{
    Diagnostic, DiagnosticKind, Diagnostics, FileNode, ImportGraph, ImportTarget, Language,
};

/// Resolve every import in `files` against the project file set and build
/// the import graph. Files come back with their targets filled in.
pub fn resolve_imports(mut files: Vec<FileNode>) -> (Vec<FileNode>, ImportGraph, Diagnostics) {
    let file_set: HashSet<PathBuf> = files.iter().map(|f| f.path.clone()).collect();
    let mut diagnostics = Diagnostics::new();

    let mut graph = ImportGraph::new();
    let mut paths: Vec<&Path> = files.iter().map(|f| f.path.as_path()).collect();
    paths.sort();
    for path in paths {
        graph.add_file(path.to_path_buf());
    }

    for file in &mut files {
        for import in &mut file.imports {
            match resolve_one(&file.path, file.language, &import.spec, &file_set) {
                Resolution::Resolved(target) => {
                    graph.add_import(&file.path, &target);
                    import.target = ImportTarget::Resolved(target);
                }
                Resolution::External => {
                    import.target = ImportTarget::External;
                }
                Resolution::Unresolved => {
                    import.target = ImportTarget::External;
                    diagnostics.push(Diagnostic::new(
                        DiagnosticKind::UnresolvedImport,
                        &file.path,
                        Some(import.line),
                        format!("`{}` does not resolve to a project file", import.spec),
                    ));
                }
            }
        }
    }

    (files, graph, diagnostics)
}

enum Resolution {
    Resolved(PathBuf),
    /// A package outside the project; expected, not diagnosed.
    External,
    /// Looked project-relative but matched nothing.
    Unresolved,
}

fn resolve_one(
    from: &Path,
    language: Language,
    spec: &str,
    file_set: &HashSet<PathBuf>,
) -> Resolution {
    match language {
        Language::Python => resolve_python(from, spec, file_set),
        Language::JavaScript | Language::TypeScript => resolve_ecma(from, spec, file_set),
        Language::C | Language::Cpp => resolve_cfamily(from, spec, file_set),
        Language::Java => resolve_java(from, spec, file_set),
        // Go import paths name packages (directories), not files; see
        // DESIGN.md.
        Language::Go => Resolution::External,
    }
}

fn resolve_python(from: &Path, spec: &str, file_set: &HashSet<PathBuf>) -> Resolution {
    let dots = spec.chars().take_while(|&c| c == '.').count();
    let rest = &spec[dots..];
    let rel: PathBuf = rest.split('.').filter(|s| !s.is_empty()).collect();

    let mut candidates = Vec::new();
    if dots > 0 {
        // Relative import: one leading dot is the file's own package, each
        // further dot walks one package up.
        let mut base = from.parent().unwrap_or(Path::new("")).to_path_buf();
        for _ in 1..dots {
            base = base.parent().unwrap_or(Path::new("")).to_path_buf();
        }
        candidates.push(base.join(&rel));
    } else {
        candidates.push(from.parent().unwrap_or(Path::new("")).join(&rel));
        candidates.push(rel.clone());
    }

    for candidate in candidates {
        for probe in [
            candidate.with_extension("py"),
            candidate.join("__init__.py"),
        ] {
            if let Some(hit) = lookup(&probe, file_set) {
                return Resolution::Resolved(hit);
            }
        }
    }

    if dots > 0 {
        Resolution::Unresolved
    } else {
        Resolution::External
    }
}

fn resolve_ecma(from: &Path, spec: &str, file_set: &HashSet<PathBuf>) -> Resolution {
    if !spec.starts_with("./") && !spec.starts_with("../") && spec != "." && spec != ".." {
        // Bare specifier: a package.
        return Resolution::External;
    }
    let base = from.parent().unwrap_or(Path::new("")).join(spec);

    let mut probes = vec![base.clone()];
    for ext in ["js", "jsx", "ts", "tsx", "mjs", "cjs"] {
        probes.push(base.with_extension(ext));
    }
    for index in ["index.js", "index.ts"] {
        probes.push(base.join(index));
    }

    for probe in probes {
        if let Some(hit) = lookup(&probe, file_set) {
            return Resolution::Resolved(hit);
        }
    }
    Resolution::Unresolved
}

fn resolve_cfamily(from: &Path, spec: &str, file_set: &HashSet<PathBuf>) -> Resolution {
    if spec.starts_with('<') {
        // System include.
        return Resolution::External;
    }
    let header = spec.trim_matches('"');
    if header.is_empty() {
        return Resolution::Unresolved;
    }
    let candidates = [
        from.parent().unwrap_or(Path::new("")).join(header),
        PathBuf::from(header),
    ];
    for candidate in candidates {
        if let Some(hit) = lookup(&candidate, file_set) {
            return Resolution::Resolved(hit);
        }
    }
    Resolution::Unresolved
}

fn resolve_java(from: &Path, spec: &str, file_set: &HashSet<PathBuf>) -> Resolution {
    if spec.ends_with(".*") {
        // Wildcard imports name a package, not a file.
        return Resolution::External;
    }
    let rel: PathBuf = spec.split('.').collect();
    let rel = rel.with_extension("java");
    let candidates = [
        rel.clone(),
        from.parent().unwrap_or(Path::new("")).join(&rel),
    ];
    for candidate in candidates {
        if let Some(hit) = lookup(&candidate, file_set) {
            return Resolution::Resolved(hit);
        }
    }
    Resolution::External
}

/// Membership check after lexically removing `.` and `..` components.
fn lookup(candidate: &Path, file_set: &HashSet<PathBuf>) -> Option<PathBuf> {
    let normalized = normalize(candidate);
    file_set.contains(&normalized).then_some(normalized)
}

fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other),
        }
    }
    out
}
