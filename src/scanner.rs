//! Project file discovery.
//!
//! Walks the root with gitignore semantics, keeps files of the configured
//! languages, applies exclude globs, and hands the core an ordered list of
//! root-relative `(path, language)` pairs. The analysis core never touches
//! the directory tree itself.

use std::path::Path;

use anyhow::Context;
use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;

use taproot_analysis::SourceFile;
use taproot_core::Language;

pub fn build_excludes(patterns: &[String]) -> anyhow::Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern).with_context(|| format!("bad exclude glob `{pattern}`"))?);
    }
    Ok(builder.build()?)
}

pub fn scan(root: &Path, languages: &[Language], excludes: &GlobSet) -> Vec<SourceFile> {
    let mut files = Vec::new();

    for entry in WalkBuilder::new(root).build().flatten() {
        if !entry.file_type().is_some_and(|t| t.is_file()) {
            continue;
        }
        let Some(language) = Language::from_path(entry.path()) else {
            continue;
        };
        if !languages.contains(&language) {
            continue;
        }
        let Ok(relative) = entry.path().strip_prefix(root) else {
            continue;
        };
        if excludes.is_match(relative) {
            continue;
        }
        files.push(SourceFile {
            path: relative.to_path_buf(),
            language,
        });
    }

    files.sort_by(|a, b| a.path.cmp(&b.path));
    tracing::debug!(files = files.len(), "scan complete");
    files
}
