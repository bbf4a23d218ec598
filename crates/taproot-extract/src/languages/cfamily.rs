//! C / C++ extractor. One walker covers both grammars; the C++-only node
//! kinds simply never appear in C trees.
//!
//! C has no export marker, and external linkage alone would exempt nearly
//! every function from dead-code analysis, so `exported` stays false here;
//! entry-point configuration carries the exemptions instead.

use std::path::Path;

use tree_sitter::Node;

use taproot_core::{FileNode, Import, Language, Param, Signature, SymbolKind};

use super::{SymbolSink, start_line, text};
use crate::extractor::{ExtractError, Extractor, FileExtraction};
use crate::parser;

pub struct CFamilyExtractor {
    language: Language,
}

impl CFamilyExtractor {
    pub fn new(language: Language) -> Self {
        debug_assert!(matches!(language, Language::C | Language::Cpp));
        CFamilyExtractor { language }
    }
}

impl Extractor for CFamilyExtractor {
    fn language(&self) -> Language {
        self.language
    }

    fn extract(&self, path: &Path, source: &str) -> Result<FileExtraction, ExtractError> {
        let tree = parser::parse(self.language, path, source)?;
        let mut sink = SymbolSink::new(path, self.language);
        let mut imports = Vec::new();

        walk(tree.root_node(), source, &mut sink, &mut imports, None);

        Ok(FileExtraction {
            file: FileNode {
                path: path.to_path_buf(),
                language: self.language,
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
    class_name: Option<&str>,
) {
    match node.kind() {
        "preproc_include" => {
            // Specifier keeps its delimiters: `"util.h"` resolves within the
            // project, `<stdio.h>` is always external.
            if let Some(path_node) = node.child_by_field_name("path") {
                imports.push(Import::unresolved(
                    text(path_node, source).trim(),
                    start_line(node),
                ));
            }
            return;
        }
        "function_definition" => {
            extract_function(node, source, sink, imports, class_name);
            return;
        }
        "class_specifier" | "struct_specifier" => {
            // Only C++ class-like bodies become symbols; a bodyless
            // `struct foo;` or a C struct declaration does not.
            if node.kind() == "struct_specifier" && sink.language == Language::C {
                return;
            }
            let (Some(name_node), Some(body)) = (
                node.child_by_field_name("name"),
                node.child_by_field_name("body"),
            ) else {
                return;
            };
            let name = text(name_node, source).to_string();
            let idx = sink.open(
                &name,
                SymbolKind::Class,
                node,
                source,
                Signature::default(),
                false,
                base_classes(node, source),
            );
            walk(body, source, sink, imports, Some(&name));
            sink.close(idx);
            return;
        }
        "call_expression" => {
            if let Some(func) = node.child_by_field_name("function") {
                let callee = match func.kind() {
                    "identifier" => text(func, source),
                    // `obj.method(...)` / `ptr->method(...)`
                    "field_expression" => func
                        .child_by_field_name("field")
                        .map(|f| text(f, source))
                        .unwrap_or(""),
                    // `ns::f(...)`
                    "qualified_identifier" => func
                        .child_by_field_name("name")
                        .map(|n| text(n, source))
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
        walk(child, source, sink, imports, class_name);
    }
}

fn extract_function(
    node: Node,
    source: &str,
    sink: &mut SymbolSink,
    imports: &mut Vec<Import>,
    class_name: Option<&str>,
) {
    let Some(declarator) = function_declarator(node) else {
        return;
    };
    let Some(name_node) = declarator.child_by_field_name("declarator") else {
        return;
    };

    // `void Foo::bar()` defines a member outside its class body.
    let (name, out_of_line_class) = match name_node.kind() {
        "qualified_identifier" => {
            let scope = name_node
                .child_by_field_name("scope")
                .map(|s| text(s, source).to_string());
            let name = name_node
                .child_by_field_name("name")
                .map(|n| text(n, source).to_string());
            match (name, scope) {
                (Some(name), scope) => (name, scope),
                _ => return,
            }
        }
        "identifier" | "field_identifier" | "destructor_name" | "operator_name" => {
            (text(name_node, source).to_string(), None)
        }
        _ => return,
    };

    let enclosing = out_of_line_class.as_deref().or(class_name);
    let kind = match enclosing {
        Some(class) if name == class => SymbolKind::Constructor,
        Some(_) => SymbolKind::Method,
        None => SymbolKind::Function,
    };

    let signature = Signature {
        params: parameters(declarator, source),
        return_hint: node
            .child_by_field_name("type")
            .map(|t| text(t, source).to_string()),
    };

    if let Some(class) = out_of_line_class.as_deref() {
        sink.push_scope(class);
    }
    let idx = sink.open(&name, kind, node, source, signature, false, Vec::new());
    if let Some(body) = node.child_by_field_name("body") {
        walk(body, source, sink, imports, None);
    }
    sink.close(idx);
    if out_of_line_class.is_some() {
        sink.pop_scope();
    }
}

/// Descend through pointer/reference declarators to the function declarator.
fn function_declarator(node: Node) -> Option<Node> {
    let mut current = node.child_by_field_name("declarator")?;
    loop {
        match current.kind() {
            "function_declarator" => return Some(current),
            "pointer_declarator" | "reference_declarator" => {
                current = current.child_by_field_name("declarator")?;
            }
            _ => return None,
        }
    }
}

fn parameters(declarator: Node, source: &str) -> Vec<Param> {
    let Some(list) = declarator.child_by_field_name("parameters") else {
        return Vec::new();
    };
    let mut params = Vec::new();
    let mut cursor = list.walk();
    for child in list.named_children(&mut cursor) {
        if child.kind() != "parameter_declaration" {
            continue;
        }
        let name = child
            .child_by_field_name("declarator")
            .and_then(declarator_identifier)
            .map(|n| text(n, source).to_string());
        if let Some(name) = name {
            params.push(Param {
                name,
                type_hint: child
                    .child_by_field_name("type")
                    .map(|t| text(t, source).to_string()),
            });
        }
    }
    params
}

fn declarator_identifier(node: Node) -> Option<Node> {
    match node.kind() {
        "identifier" => Some(node),
        "pointer_declarator" | "reference_declarator" | "array_declarator" => {
            node.child_by_field_name("declarator")
                .and_then(declarator_identifier)
        }
        _ => None,
    }
}

fn base_classes(class_node: Node, source: &str) -> Vec<String> {
    let mut bases = Vec::new();
    let mut cursor = class_node.walk();
    for child in class_node.children(&mut cursor) {
        if child.kind() == "base_class_clause" {
            let mut inner = child.walk();
            for base in child.named_children(&mut inner) {
                if matches!(base.kind(), "type_identifier" | "qualified_identifier") {
                    bases.push(rightmost_type_name(base, source));
                }
            }
        }
    }
    bases
}

fn rightmost_type_name(node: Node, source: &str) -> String {
    if node.kind() == "qualified_identifier" {
        node.child_by_field_name("name")
            .map(|n| text(n, source).to_string())
            .unwrap_or_default()
    } else {
        text(node, source).to_string()
    }
}
