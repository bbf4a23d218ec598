//! Java extractor

use std::path::Path;

use tree_sitter::Node;

use taproot_core::{FileNode, Import, Language, Param, Signature, SymbolKind};

use super::{SymbolSink, start_line, text};
use crate::extractor::{ExtractError, Extractor, FileExtraction};
use crate::parser;

pub struct JavaExtractor;

impl Extractor for JavaExtractor {
    fn language(&self) -> Language {
        Language::Java
    }

    fn extract(&self, path: &Path, source: &str) -> Result<FileExtraction, ExtractError> {
        let tree = parser::parse(Language::Java, path, source)?;
        let mut sink = SymbolSink::new(path, Language::Java);
        let mut imports = Vec::new();

        walk(tree.root_node(), source, &mut sink, &mut imports, false);

        Ok(FileExtraction {
            file: FileNode {
                path: path.to_path_buf(),
                language: Language::Java,
                imports,
            },
            symbols: sink.symbols,
        })
    }
}

fn walk(node: Node, source: &str, sink: &mut SymbolSink, imports: &mut Vec<Import>, in_type: bool) {
    match node.kind() {
        "import_declaration" => {
            // `import a.b.C;` — wildcard imports keep the `.*` and resolve
            // to nothing, which records them external.
            let mut cursor = node.walk();
            for child in node.named_children(&mut cursor) {
                if matches!(child.kind(), "scoped_identifier" | "identifier") {
                    let mut spec = text(child, source).to_string();
                    if node.children(&mut node.walk()).any(|c| c.kind() == "asterisk") {
                        spec.push_str(".*");
                    }
                    imports.push(Import::unresolved(spec, start_line(node)));
                    break;
                }
            }
            return;
        }
        "class_declaration" | "interface_declaration" => {
            let Some(name_node) = node.child_by_field_name("name") else {
                return;
            };
            let name = text(name_node, source).to_string();
            let idx = sink.open(
                &name,
                SymbolKind::Class,
                node,
                source,
                Signature::default(),
                is_public(node, source),
                supertypes(node, source),
            );
            if let Some(body) = node.child_by_field_name("body") {
                walk(body, source, sink, imports, true);
            }
            sink.close(idx);
            return;
        }
        "method_declaration" => {
            let Some(name_node) = node.child_by_field_name("name") else {
                return;
            };
            let name = text(name_node, source).to_string();
            let kind = if in_type {
                SymbolKind::Method
            } else {
                SymbolKind::Function
            };
            let idx = sink.open(
                &name,
                kind,
                node,
                source,
                signature_of(node, source),
                is_public(node, source),
                Vec::new(),
            );
            if let Some(body) = node.child_by_field_name("body") {
                walk(body, source, sink, imports, false);
            }
            sink.close(idx);
            return;
        }
        "constructor_declaration" => {
            let Some(name_node) = node.child_by_field_name("name") else {
                return;
            };
            let name = text(name_node, source).to_string();
            let idx = sink.open(
                &name,
                SymbolKind::Constructor,
                node,
                source,
                signature_of(node, source),
                is_public(node, source),
                Vec::new(),
            );
            if let Some(body) = node.child_by_field_name("body") {
                walk(body, source, sink, imports, false);
            }
            sink.close(idx);
            return;
        }
        "method_invocation" => {
            if let Some(name_node) = node.child_by_field_name("name") {
                sink.record_call(text(name_node, source), start_line(node));
            }
        }
        "object_creation_expression" => {
            // `new Foo(...)` references the class / its constructor.
            if let Some(type_node) = node.child_by_field_name("type") {
                if type_node.kind() == "type_identifier" {
                    sink.record_call(text(type_node, source), start_line(node));
                }
            }
        }
        _ => {}
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        walk(child, source, sink, imports, in_type);
    }
}

fn is_public(node: Node, source: &str) -> bool {
    let mut cursor = node.walk();
    node.children(&mut cursor).any(|c| {
        c.kind() == "modifiers"
            && c.children(&mut c.walk())
                .any(|m| text(m, source) == "public")
    })
}

/// `extends` and `implements` names, rightmost segment only.
fn supertypes(node: Node, source: &str) -> Vec<String> {
    let mut bases = Vec::new();
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            "superclass" | "super_interfaces" | "extends_interfaces" => {
                collect_type_names(child, source, &mut bases);
            }
            _ => {}
        }
    }
    bases
}

fn collect_type_names(node: Node, source: &str, out: &mut Vec<String>) {
    if node.kind() == "type_identifier" {
        out.push(text(node, source).to_string());
        return;
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_type_names(child, source, out);
    }
}

fn signature_of(node: Node, source: &str) -> Signature {
    let mut params = Vec::new();
    if let Some(list) = node.child_by_field_name("parameters") {
        let mut cursor = list.walk();
        for child in list.named_children(&mut cursor) {
            if !matches!(child.kind(), "formal_parameter" | "spread_parameter") {
                continue;
            }
            if let Some(name_node) = child.child_by_field_name("name") {
                params.push(Param {
                    name: text(name_node, source).to_string(),
                    type_hint: child
                        .child_by_field_name("type")
                        .map(|t| text(t, source).to_string()),
                });
            }
        }
    }
    Signature {
        params,
        return_hint: node
            .child_by_field_name("type")
            .map(|t| text(t, source).to_string()),
    }
}
