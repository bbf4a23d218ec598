//! JavaScript / TypeScript extractor. The two grammars agree on every node
//! kind used here; TypeScript adds type annotations, handled where present.

use std::path::Path;

use tree_sitter::Node;

use taproot_core::{FileNode, Import, Language, Param, Signature, SymbolKind};

use super::{SymbolSink, start_line, text};
use crate::extractor::{ExtractError, Extractor, FileExtraction};
use crate::parser;

pub struct EcmaExtractor {
    language: Language,
}

impl EcmaExtractor {
    pub fn new(language: Language) -> Self {
        debug_assert!(matches!(
            language,
            Language::JavaScript | Language::TypeScript
        ));
        EcmaExtractor { language }
    }
}

impl Extractor for EcmaExtractor {
    fn language(&self) -> Language {
        self.language
    }

    fn extract(&self, path: &Path, source: &str) -> Result<FileExtraction, ExtractError> {
        let tree = parser::parse(self.language, path, source)?;
        let mut sink = SymbolSink::new(path, self.language);
        let mut imports = Vec::new();

        walk(
            tree.root_node(),
            source,
            &mut sink,
            &mut imports,
            Flags {
                in_class: false,
                exported: false,
            },
        );

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

#[derive(Clone, Copy)]
struct Flags {
    in_class: bool,
    exported: bool,
}

fn walk(node: Node, source: &str, sink: &mut SymbolSink, imports: &mut Vec<Import>, flags: Flags) {
    match node.kind() {
        "import_statement" => {
            if let Some(spec) = node.child_by_field_name("source") {
                imports.push(Import::unresolved(
                    string_content(spec, source),
                    start_line(node),
                ));
            }
            return;
        }
        "export_statement" => {
            // `export function f() {}` / `export default class C {}`
            if let Some(declaration) = node.child_by_field_name("declaration") {
                walk(
                    declaration,
                    source,
                    sink,
                    imports,
                    Flags {
                        exported: true,
                        ..flags
                    },
                );
            }
            return;
        }
        "function_declaration" | "generator_function_declaration" => {
            if let Some(name_node) = node.child_by_field_name("name") {
                let name = text(name_node, source).to_string();
                let idx = sink.open(
                    &name,
                    SymbolKind::Function,
                    node,
                    source,
                    signature_of(node, source),
                    flags.exported,
                    Vec::new(),
                );
                walk_body(node, source, sink, imports);
                sink.close(idx);
            }
            return;
        }
        "variable_declarator" => {
            // `const f = () => {}` and `const f = function () {}`
            let func = node.child_by_field_name("value").filter(|v| {
                matches!(
                    v.kind(),
                    "arrow_function" | "function_expression" | "generator_function"
                )
            });
            if let (Some(name_node), Some(value)) = (node.child_by_field_name("name"), func) {
                if name_node.kind() == "identifier" {
                    let name = text(name_node, source).to_string();
                    let idx = sink.open(
                        &name,
                        SymbolKind::Function,
                        node,
                        source,
                        signature_of(value, source),
                        flags.exported,
                        Vec::new(),
                    );
                    walk_body(value, source, sink, imports);
                    sink.close(idx);
                    return;
                }
            }
        }
        "class_declaration" => {
            if let Some(name_node) = node.child_by_field_name("name") {
                let name = text(name_node, source).to_string();
                let idx = sink.open(
                    &name,
                    SymbolKind::Class,
                    node,
                    source,
                    Signature::default(),
                    flags.exported,
                    heritage_bases(node, source),
                );
                if let Some(body) = node.child_by_field_name("body") {
                    walk(
                        body,
                        source,
                        sink,
                        imports,
                        Flags {
                            in_class: true,
                            exported: false,
                        },
                    );
                }
                sink.close(idx);
            }
            return;
        }
        "method_definition" => {
            if let Some(name_node) = node.child_by_field_name("name") {
                let name = text(name_node, source).to_string();
                let kind = if flags.in_class && name == "constructor" {
                    SymbolKind::Constructor
                } else if flags.in_class {
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
                    false,
                    Vec::new(),
                );
                walk_body(node, source, sink, imports);
                sink.close(idx);
            }
            return;
        }
        "call_expression" => {
            if let Some(func) = node.child_by_field_name("function") {
                let callee = match func.kind() {
                    "identifier" => text(func, source),
                    "member_expression" => func
                        .child_by_field_name("property")
                        .map(|p| text(p, source))
                        .unwrap_or(""),
                    _ => "",
                };
                sink.record_call(callee, start_line(node));
            }
        }
        "new_expression" => {
            // `new Foo()` references Foo's constructor (or the class).
            if let Some(ctor) = node.child_by_field_name("constructor") {
                if ctor.kind() == "identifier" {
                    sink.record_call(text(ctor, source), start_line(node));
                }
            }
        }
        _ => {}
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        walk(child, source, sink, imports, flags);
    }
}

fn walk_body(node: Node, source: &str, sink: &mut SymbolSink, imports: &mut Vec<Import>) {
    if let Some(body) = node.child_by_field_name("body") {
        walk(
            body,
            source,
            sink,
            imports,
            Flags {
                in_class: false,
                exported: false,
            },
        );
    }
}

/// Base class names under `extends`; covers both the JS and TS heritage
/// shapes by scanning the clause for identifiers.
fn heritage_bases(class_node: Node, source: &str) -> Vec<String> {
    let mut bases = Vec::new();
    let mut cursor = class_node.walk();
    for child in class_node.children(&mut cursor) {
        if child.kind() == "class_heritage" {
            collect_identifiers(child, source, &mut bases);
        }
    }
    bases
}

fn collect_identifiers(node: Node, source: &str, out: &mut Vec<String>) {
    if matches!(node.kind(), "identifier" | "type_identifier") {
        out.push(text(node, source).to_string());
        return;
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_identifiers(child, source, out);
    }
}

fn string_content(node: Node, source: &str) -> String {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|c| c.kind() == "string_fragment")
        .map(|c| text(c, source))
        .collect()
}

fn signature_of(node: Node, source: &str) -> Signature {
    let mut params = Vec::new();
    if let Some(parameters) = node.child_by_field_name("parameters") {
        let mut cursor = parameters.walk();
        for child in parameters.named_children(&mut cursor) {
            match child.kind() {
                "identifier" => params.push(Param {
                    name: text(child, source).to_string(),
                    type_hint: None,
                }),
                // TypeScript parameter forms.
                "required_parameter" | "optional_parameter" => {
                    if let Some(pattern) = child.child_by_field_name("pattern") {
                        params.push(Param {
                            name: text(pattern, source).to_string(),
                            type_hint: child
                                .child_by_field_name("type")
                                .map(|t| type_annotation(t, source)),
                        });
                    }
                }
                "assignment_pattern" => {
                    if let Some(left) = child.child_by_field_name("left") {
                        params.push(Param {
                            name: text(left, source).to_string(),
                            type_hint: None,
                        });
                    }
                }
                "rest_pattern" => params.push(Param {
                    name: text(child, source).to_string(),
                    type_hint: None,
                }),
                _ => {}
            }
        }
    }
    Signature {
        params,
        return_hint: node
            .child_by_field_name("return_type")
            .map(|t| type_annotation(t, source)),
    }
}

/// `: T` with the leading colon stripped.
fn type_annotation(node: Node, source: &str) -> String {
    text(node, source).trim_start_matches(':').trim().to_string()
}
