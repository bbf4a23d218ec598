//! Go extractor
//!
//! Go import paths name packages (directories), not files, so they are
//! recorded and left to the resolver, which treats them as external. A
//! capitalized name is Go's export marker.

use std::path::Path;

use tree_sitter::Node;

use taproot_core::{FileNode, Import, Language, Param, Signature, SymbolKind};

use super::{SymbolSink, start_line, text};
use crate::extractor::{ExtractError, Extractor, FileExtraction};
use crate::parser;

pub struct GoExtractor;

impl Extractor for GoExtractor {
    fn language(&self) -> Language {
        Language::Go
    }

    fn extract(&self, path: &Path, source: &str) -> Result<FileExtraction, ExtractError> {
        let tree = parser::parse(Language::Go, path, source)?;
        let mut sink = SymbolSink::new(path, Language::Go);
        let mut imports = Vec::new();

        walk(tree.root_node(), source, &mut sink, &mut imports);

        Ok(FileExtraction {
            file: FileNode {
                path: path.to_path_buf(),
                language: Language::Go,
                imports,
            },
            symbols: sink.symbols,
        })
    }
}

fn is_exported(name: &str) -> bool {
    name.chars().next().is_some_and(|c| c.is_uppercase())
}

fn walk(node: Node, source: &str, sink: &mut SymbolSink, imports: &mut Vec<Import>) {
    match node.kind() {
        "import_spec" => {
            if let Some(path_node) = node.child_by_field_name("path") {
                imports.push(Import::unresolved(
                    text(path_node, source).trim_matches('"'),
                    start_line(node),
                ));
            }
            return;
        }
        "function_declaration" => {
            if let Some(name_node) = node.child_by_field_name("name") {
                let name = text(name_node, source).to_string();
                let idx = sink.open(
                    &name,
                    SymbolKind::Function,
                    node,
                    source,
                    signature_of(node, source),
                    is_exported(&name),
                    Vec::new(),
                );
                if let Some(body) = node.child_by_field_name("body") {
                    walk(body, source, sink, imports);
                }
                sink.close(idx);
            }
            return;
        }
        "method_declaration" => {
            let Some(name_node) = node.child_by_field_name("name") else {
                return;
            };
            let name = text(name_node, source).to_string();
            let receiver = receiver_type(node, source);
            if let Some(receiver) = receiver.as_deref() {
                sink.push_scope(receiver);
            }
            let idx = sink.open(
                &name,
                SymbolKind::Method,
                node,
                source,
                signature_of(node, source),
                is_exported(&name),
                Vec::new(),
            );
            if let Some(body) = node.child_by_field_name("body") {
                walk(body, source, sink, imports);
            }
            sink.close(idx);
            if receiver.is_some() {
                sink.pop_scope();
            }
            return;
        }
        "call_expression" => {
            if let Some(func) = node.child_by_field_name("function") {
                let callee = match func.kind() {
                    "identifier" => text(func, source),
                    // `pkg.F(...)` / `recv.Method(...)`
                    "selector_expression" => func
                        .child_by_field_name("field")
                        .map(|f| text(f, source))
                        .unwrap_or(""),
                    _ => "",
                };
                sink.record_call(callee, start_line(node));
            }
        }
        _ => {}
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        walk(child, source, sink, imports);
    }
}

/// The receiver's type name, pointer stripped: `func (s *Server) ...` → Server.
fn receiver_type(node: Node, source: &str) -> Option<String> {
    let receiver = node.child_by_field_name("receiver")?;
    let mut cursor = receiver.walk();
    for child in receiver.named_children(&mut cursor) {
        if child.kind() == "parameter_declaration" {
            if let Some(type_node) = child.child_by_field_name("type") {
                let name = match type_node.kind() {
                    "pointer_type" => type_node
                        .named_child(0)
                        .map(|t| text(t, source))
                        .unwrap_or(""),
                    _ => text(type_node, source),
                };
                if !name.is_empty() {
                    return Some(name.to_string());
                }
            }
        }
    }
    None
}

fn signature_of(node: Node, source: &str) -> Signature {
    let mut params = Vec::new();
    if let Some(list) = node.child_by_field_name("parameters") {
        let mut cursor = list.walk();
        for child in list.named_children(&mut cursor) {
            if child.kind() != "parameter_declaration" {
                continue;
            }
            let type_hint = child
                .child_by_field_name("type")
                .map(|t| text(t, source).to_string());
            if let Some(name_node) = child.child_by_field_name("name") {
                params.push(Param {
                    name: text(name_node, source).to_string(),
                    type_hint,
                });
            }
        }
    }
    Signature {
        params,
        return_hint: node
            .child_by_field_name("result")
            .map(|r| text(r, source).to_string()),
    }
}
