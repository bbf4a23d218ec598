//! Python extractor

use std::path::Path;

use tree_sitter::Node;

use taproot_core::{FileNode, Import, Language, Param, Signature, SymbolKind};

use super::{SymbolSink, start_line, text};
use crate::extractor::{ExtractError, Extractor, FileExtraction};
use crate::parser;

pub struct PythonExtractor;

impl Extractor for PythonExtractor {
    fn language(&self) -> Language {
        Language::Python
    }

    fn extract(&self, path: &Path, source: &str) -> Result<FileExtraction, ExtractError> {
        let tree = parser::parse(Language::Python, path, source)?;
        let mut sink = SymbolSink::new(path, Language::Python);
        let mut imports = Vec::new();
        let mut dunder_all = Vec::new();

        walk(
            tree.root_node(),
            source,
            &mut sink,
            &mut imports,
            &mut dunder_all,
            false,
        );

        // `__all__` names the module's exported surface; nothing else in
        // Python marks a symbol exported.
        if !dunder_all.is_empty() {
            let prefix = format!("{}.", sink.module);
            sink.mark_exported(|s| {
                dunder_all.iter().any(|n| n == &s.name)
                    && s.qualified_name == format!("{prefix}{}", s.name)
            });
        }

        Ok(FileExtraction {
            file: FileNode {
                path: path.to_path_buf(),
                language: Language::Python,
                imports,
            },
            symbols: sink.symbols,
        })
    }
}

fn walk(
    node: Node,
    source: &str,
    sink: &mut SymbolSink,
    imports: &mut Vec<Import>,
    dunder_all: &mut Vec<String>,
    in_class: bool,
) {
    match node.kind() {
        "import_statement" => {
            // `import a.b, c as d`
            let mut cursor = node.walk();
            for child in node.named_children(&mut cursor) {
                let spec = match child.kind() {
                    "dotted_name" => text(child, source),
                    "aliased_import" => child
                        .child_by_field_name("name")
                        .map(|n| text(n, source))
                        .unwrap_or(""),
                    _ => "",
                };
                if !spec.is_empty() {
                    imports.push(Import::unresolved(spec, start_line(node)));
                }
            }
            return;
        }
        "import_from_statement" => {
            // `from a.b import c`; relative dots stay in the specifier.
            if let Some(module) = node.child_by_field_name("module_name") {
                imports.push(Import::unresolved(text(module, source), start_line(node)));
            }
            return;
        }
        "function_definition" => {
            let Some(name_node) = node.child_by_field_name("name") else {
                return;
            };
            let name = text(name_node, source).to_string();
            let kind = if in_class {
                if name == "__init__" {
                    SymbolKind::Constructor
                } else {
                    SymbolKind::Method
                }
            } else {
                SymbolKind::Function
            };
            let signature = signature_of(node, source);
            let idx = sink.open(&name, kind, node, source, signature, false, Vec::new());
            if let Some(body) = node.child_by_field_name("body") {
                walk(body, source, sink, imports, dunder_all, false);
            }
            sink.close(idx);
            return;
        }
        "class_definition" => {
            let Some(name_node) = node.child_by_field_name("name") else {
                return;
            };
            let name = text(name_node, source).to_string();
            let bases = node
                .child_by_field_name("superclasses")
                .map(|args| {
                    let mut cursor = args.walk();
                    args.named_children(&mut cursor)
                        .filter(|c| matches!(c.kind(), "identifier" | "attribute"))
                        .map(|c| base_name(c, source))
                        .collect()
                })
                .unwrap_or_default();
            let idx = sink.open(
                &name,
                SymbolKind::Class,
                node,
                source,
                Signature::default(),
                false,
                bases,
            );
            if let Some(body) = node.child_by_field_name("body") {
                walk(body, source, sink, imports, dunder_all, true);
            }
            sink.close(idx);
            return;
        }
        "call" => {
            if let Some(func) = node.child_by_field_name("function") {
                let callee = match func.kind() {
                    "identifier" => text(func, source),
                    // obj.method() resolves by the rightmost name.
                    "attribute" => func
                        .child_by_field_name("attribute")
                        .map(|n| text(n, source))
                        .unwrap_or(""),
                    _ => "",
                };
                sink.record_call(callee, start_line(node));
            }
        }
        "assignment" => {
            if sink.at_top_level() {
                collect_dunder_all(node, source, dunder_all);
            }
        }
        _ => {}
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        walk(child, source, sink, imports, dunder_all, in_class);
    }
}

/// `Base` or the rightmost name of `pkg.Base`.
fn base_name(node: Node, source: &str) -> String {
    if node.kind() == "attribute" {
        node.child_by_field_name("attribute")
            .map(|n| text(n, source).to_string())
            .unwrap_or_default()
    } else {
        text(node, source).to_string()
    }
}

fn collect_dunder_all(node: Node, source: &str, dunder_all: &mut Vec<String>) {
    let Some(left) = node.child_by_field_name("left") else {
        return;
    };
    if left.kind() != "identifier" || text(left, source) != "__all__" {
        return;
    }
    let Some(right) = node.child_by_field_name("right") else {
        return;
    };
    let mut cursor = right.walk();
    for item in right.named_children(&mut cursor) {
        if item.kind() == "string" {
            dunder_all.push(string_content(item, source));
        }
    }
}

/// The content of a Python string literal node, quotes stripped.
fn string_content(node: Node, source: &str) -> String {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|c| c.kind() == "string_content")
        .map(|c| text(c, source))
        .collect()
}

fn signature_of(node: Node, source: &str) -> Signature {
    let mut params = Vec::new();
    if let Some(parameters) = node.child_by_field_name("parameters") {
        let mut cursor = parameters.walk();
        for child in parameters.named_children(&mut cursor) {
            let param = match child.kind() {
                "identifier" => Some(Param {
                    name: text(child, source).to_string(),
                    type_hint: None,
                }),
                "typed_parameter" => child.named_child(0).map(|name| Param {
                    name: text(name, source).to_string(),
                    type_hint: child
                        .child_by_field_name("type")
                        .map(|t| text(t, source).to_string()),
                }),
                "default_parameter" | "typed_default_parameter" => {
                    child.child_by_field_name("name").map(|name| Param {
                        name: text(name, source).to_string(),
                        type_hint: child
                            .child_by_field_name("type")
                            .map(|t| text(t, source).to_string()),
                    })
                }
                "list_splat_pattern" | "dictionary_splat_pattern" => Some(Param {
                    name: text(child, source).to_string(),
                    type_hint: None,
                }),
                _ => None,
            };
            params.extend(param);
        }
    }
    Signature {
        params,
        return_hint: node
            .child_by_field_name("return_type")
            .map(|t| text(t, source).to_string()),
    }
}
