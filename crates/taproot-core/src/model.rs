//! Core data structures shared by every analysis stage

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Stable, run-unique symbol identifier: `file#qualified_name#start_line`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SymbolId(String);

impl SymbolId {
    pub fn new(file: &Path, qualified_name: &str, start_line: u32) -> Self {
        SymbolId(format!(
            "{}#{}#{}",
            file.display(),
            qualified_name,
            start_line
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SymbolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Discriminates what kind of definition a symbol represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SymbolKind {
    Function,
    Method,
    Class,
    Constructor,
}

/// Supported source languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Language {
    Python,
    JavaScript,
    TypeScript,
    C,
    Cpp,
    Java,
    Go,
}

impl Language {
    /// Detect language from file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("py") | Some("pyi") => Some(Language::Python),
            Some("js") | Some("jsx") | Some("mjs") | Some("cjs") => Some(Language::JavaScript),
            Some("ts") | Some("tsx") => Some(Language::TypeScript),
            Some("c") | Some("h") => Some(Language::C),
            Some("cpp") | Some("cc") | Some("cxx") | Some("hpp") | Some("hh") => {
                Some(Language::Cpp)
            }
            Some("java") => Some(Language::Java),
            Some("go") => Some(Language::Go),
            _ => None,
        }
    }

    /// Inverse of [`tag`](Self::tag).
    pub fn from_tag(tag: &str) -> Option<Self> {
        Language::all().iter().copied().find(|l| l.tag() == tag)
    }

    pub fn tag(&self) -> &'static str {
        match self {
            Language::Python => "python",
            Language::JavaScript => "javascript",
            Language::TypeScript => "typescript",
            Language::C => "c",
            Language::Cpp => "cpp",
            Language::Java => "java",
            Language::Go => "go",
        }
    }

    pub fn all() -> &'static [Language] {
        &[
            Language::Python,
            Language::JavaScript,
            Language::TypeScript,
            Language::C,
            Language::Cpp,
            Language::Java,
            Language::Go,
        ]
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// One parameter in a symbol's signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Param {
    pub name: String,
    pub type_hint: Option<String>,
}

/// Ordered parameter list plus optional return type hint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    pub params: Vec<Param>,
    pub return_hint: Option<String>,
}

/// A raw callee-name reference observed in a symbol body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallRef {
    pub name: String,
    pub line: u32,
}

/// One function, method, class, or constructor definition.
///
/// Created once during extraction, registered with the symbol table, and
/// immutable for the rest of the run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Symbol {
    pub id: SymbolId,
    pub name: String,
    pub qualified_name: String,
    pub kind: SymbolKind,
    pub language: Language,
    pub file: PathBuf,
    pub start_line: u32,
    pub end_line: u32,
    pub signature: Signature,
    /// Raw body source text; duplicate detection tokenizes it lazily.
    pub body: String,
    pub call_refs: Vec<CallRef>,
    /// Part of the file's exported/public API surface.
    pub exported: bool,
    /// Enclosing class name for methods and constructors.
    pub parent_class: Option<String>,
    /// Base class names, populated for class symbols.
    pub bases: Vec<String>,
}

impl Symbol {
    /// Check record well-formedness. A violation indicates an extractor bug
    /// and aborts the run rather than being absorbed.
    pub fn validate(&self) -> Result<(), Error> {
        if self.start_line > self.end_line {
            return Err(Error::MalformedSymbol {
                id: self.id.clone(),
                file: self.file.clone(),
                detail: format!(
                    "start_line {} > end_line {}",
                    self.start_line, self.end_line
                ),
            });
        }
        Ok(())
    }
}

/// Where an import statement resolved to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImportTarget {
    /// Another file in this run's file set.
    Resolved(PathBuf),
    /// An external package, or a specifier that could not be resolved.
    External,
}

/// One import/include statement in a file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Import {
    /// Raw specifier as written in source (`os.path`, `./util`, `stdio.h`).
    pub spec: String,
    pub line: u32,
    pub target: ImportTarget,
}

impl Import {
    /// A freshly extracted import; the resolver fills in the target.
    pub fn unresolved(spec: impl Into<String>, line: u32) -> Self {
        Import {
            spec: spec.into(),
            line,
            target: ImportTarget::External,
        }
    }
}

/// One analyzed source file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileNode {
    pub path: PathBuf,
    pub language: Language,
    pub imports: Vec<Import>,
}

/// A caller→callee edge in the call graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallEdge {
    pub caller: SymbolId,
    pub callee: SymbolId,
    pub line: u32,
    /// More than one candidate survived resolution; one edge exists per
    /// tied candidate.
    pub ambiguous: bool,
}

/// A set of mutually similar symbols found by duplicate detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuplicateCluster {
    /// Member ids, sorted.
    pub symbols: Vec<SymbolId>,
    /// Highest candidate-pair similarity inside the cluster.
    pub similarity: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbol_id_is_deterministic() {
        let a = SymbolId::new(Path::new("src/app.py"), "app.run", 10);
        let b = SymbolId::new(Path::new("src/app.py"), "app.run", 10);
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "src/app.py#app.run#10");

        let c = SymbolId::new(Path::new("src/app.py"), "app.run", 20);
        assert_ne!(a, c);
    }

    #[test]
    fn language_detection() {
        let cases = [
            ("lib.py", Some(Language::Python)),
            ("app.ts", Some(Language::TypeScript)),
            ("index.jsx", Some(Language::JavaScript)),
            ("main.c", Some(Language::C)),
            ("vec.hpp", Some(Language::Cpp)),
            ("Main.java", Some(Language::Java)),
            ("server.go", Some(Language::Go)),
            ("notes.txt", None),
            ("Makefile", None),
        ];
        for (name, expected) in cases {
            assert_eq!(Language::from_path(Path::new(name)), expected, "{name}");
        }
    }

    #[test]
    fn malformed_span_is_rejected() {
        let sym = Symbol {
            id: SymbolId::new(Path::new("a.py"), "a.f", 9),
            name: "f".into(),
            qualified_name: "a.f".into(),
            kind: SymbolKind::Function,
            language: Language::Python,
            file: PathBuf::from("a.py"),
            start_line: 9,
            end_line: 3,
            signature: Signature::default(),
            body: String::new(),
            call_refs: Vec::new(),
            exported: false,
            parent_class: None,
            bases: Vec::new(),
        };
        assert!(matches!(
            sym.validate(),
            Err(Error::MalformedSymbol { .. })
        ));
    }
}
