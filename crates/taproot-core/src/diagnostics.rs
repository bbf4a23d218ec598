//! Non-fatal per-file findings. These never escalate; they annotate the
//! best-effort result set with what was skipped and why.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiagnosticKind {
    /// The file failed to parse and contributes no symbols.
    ParseFailure,
    /// An import specifier did not resolve to a project file; recorded as
    /// external.
    UnresolvedImport,
    /// A call reference matched no known symbol; no edge was created.
    UnresolvedCall,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub file: PathBuf,
    pub line: Option<u32>,
    pub detail: String,
}

impl Diagnostic {
    pub fn new(
        kind: DiagnosticKind,
        file: impl Into<PathBuf>,
        line: Option<u32>,
        detail: impl Into<String>,
    ) -> Self {
        Diagnostic {
            kind,
            file: file.into(),
            line,
            detail: detail.into(),
        }
    }
}

/// All diagnostics collected over one run, in deterministic order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Diagnostics::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.entries.push(diagnostic);
    }

    pub fn extend(&mut self, other: Diagnostics) {
        self.entries.extend(other.entries);
    }

    /// Sort by (file, line, kind) so output is stable across runs.
    pub fn sort(&mut self) {
        self.entries
            .sort_by(|a, b| (&a.file, a.line, a.kind as u8).cmp(&(&b.file, b.line, b.kind as u8)));
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    pub fn of_kind(&self, kind: DiagnosticKind) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter().filter(move |d| d.kind == kind)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
