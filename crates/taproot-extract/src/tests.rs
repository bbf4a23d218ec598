//! Unit tests for the language extractors

use std::path::Path;

use taproot_core::{ImportTarget, Language, SymbolKind};

use crate::extractor::{ExtractError, extractor_for};

#[test]
fn python_functions_classes_and_calls() {
    let source = r#"
import os
from app import helper

def top(x, y=1):
    return helper(x) + y

class Parser(Base):
    def __init__(self, path):
        self.path = path

    def parse(self):
        return top(self.path, 2)
"#;
    let path = Path::new("pkg/mod.py");
    let result = extractor_for(Language::Python)
        .extract(path, source)
        .unwrap();

    let names: Vec<(&str, SymbolKind)> = result
        .symbols
        .iter()
        .map(|s| (s.name.as_str(), s.kind))
        .collect();
    assert_eq!(
        names,
        vec![
            ("top", SymbolKind::Function),
            ("Parser", SymbolKind::Class),
            ("__init__", SymbolKind::Constructor),
            ("parse", SymbolKind::Method),
        ]
    );

    let top = &result.symbols[0];
    assert_eq!(top.qualified_name, "mod.top");
    assert_eq!(top.signature.params.len(), 2);
    assert_eq!(top.signature.params[0].name, "x");
    assert_eq!(
        top.call_refs.iter().map(|c| c.name.as_str()).collect::<Vec<_>>(),
        vec!["helper"]
    );

    let class = &result.symbols[1];
    assert_eq!(class.bases, vec!["Base"]);

    let parse = &result.symbols[3];
    assert_eq!(parse.qualified_name, "mod.Parser.parse");
    assert_eq!(parse.parent_class.as_deref(), Some("Parser"));
    assert!(parse.call_refs.iter().any(|c| c.name == "top"));

    let specs: Vec<&str> = result.file.imports.iter().map(|i| i.spec.as_str()).collect();
    assert_eq!(specs, vec!["os", "app"]);
    assert!(
        result
            .file
            .imports
            .iter()
            .all(|i| i.target == ImportTarget::External)
    );
}

#[test]
fn python_dunder_all_marks_exports() {
    let source = r#"
__all__ = ["visible"]

def visible():
    pass

def hidden():
    pass
"#;
    let result = extractor_for(Language::Python)
        .extract(Path::new("api.py"), source)
        .unwrap();

    let visible = result.symbols.iter().find(|s| s.name == "visible").unwrap();
    let hidden = result.symbols.iter().find(|s| s.name == "hidden").unwrap();
    assert!(visible.exported);
    assert!(!hidden.exported);
}

#[test]
fn python_syntax_error_is_a_parse_failure() {
    let err = extractor_for(Language::Python)
        .extract(Path::new("bad.py"), "def broken(:\n    pass\n")
        .unwrap_err();
    assert!(matches!(err, ExtractError::Parse { .. }));
    assert!(err.line().is_some());
}

#[test]
fn javascript_exports_and_arrow_functions() {
    let source = r#"
import { helper } from './util';

export function visible() {
    return helper();
}

const local = (a, b) => a + b;

class Widget extends Base {
    constructor(name) {
        this.name = name;
    }

    render() {
        return local(1, 2);
    }
}
"#;
    let result = extractor_for(Language::JavaScript)
        .extract(Path::new("src/widget.js"), source)
        .unwrap();

    let visible = result.symbols.iter().find(|s| s.name == "visible").unwrap();
    assert!(visible.exported);
    assert_eq!(visible.kind, SymbolKind::Function);
    assert_eq!(visible.call_refs[0].name, "helper");

    let local = result.symbols.iter().find(|s| s.name == "local").unwrap();
    assert!(!local.exported);
    assert_eq!(local.signature.params.len(), 2);

    let ctor = result
        .symbols
        .iter()
        .find(|s| s.kind == SymbolKind::Constructor)
        .unwrap();
    assert_eq!(ctor.parent_class.as_deref(), Some("Widget"));

    let widget = result.symbols.iter().find(|s| s.name == "Widget").unwrap();
    assert_eq!(widget.bases, vec!["Base"]);

    assert_eq!(result.file.imports[0].spec, "./util");
}

#[test]
fn typescript_type_hints() {
    let source = r#"
export function add(a: number, b: number): number {
    return a + b;
}
"#;
    let result = extractor_for(Language::TypeScript)
        .extract(Path::new("math.ts"), source)
        .unwrap();

    let add = &result.symbols[0];
    assert_eq!(add.signature.params[0].type_hint.as_deref(), Some("number"));
    assert_eq!(add.signature.return_hint.as_deref(), Some("number"));
}

#[test]
fn c_functions_and_includes() {
    let source = r#"
#include "util.h"
#include <stdio.h>

static int helper(int x) {
    return x * 2;
}

int compute(int a, int b) {
    printf("%d\n", a);
    return helper(a) + b;
}
"#;
    let result = extractor_for(Language::C)
        .extract(Path::new("src/compute.c"), source)
        .unwrap();

    let names: Vec<&str> = result.symbols.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["helper", "compute"]);

    let compute = &result.symbols[1];
    assert_eq!(compute.qualified_name, "compute.compute");
    assert_eq!(compute.signature.params.len(), 2);
    assert_eq!(compute.signature.return_hint.as_deref(), Some("int"));
    let callees: Vec<&str> = compute.call_refs.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(callees, vec!["printf", "helper"]);

    let specs: Vec<&str> = result.file.imports.iter().map(|i| i.spec.as_str()).collect();
    assert_eq!(specs, vec![r#""util.h""#, "<stdio.h>"]);
}

#[test]
fn cpp_methods_inline_and_out_of_line() {
    let source = r#"
class Counter : public Base {
public:
    Counter() : value_(0) {}
    int get() { return value_; }
    void bump(int by);
private:
    int value_;
};

void Counter::bump(int by) {
    value_ += by;
}
"#;
    let result = extractor_for(Language::Cpp)
        .extract(Path::new("counter.cpp"), source)
        .unwrap();

    let class = result.symbols.iter().find(|s| s.name == "Counter" && s.kind == SymbolKind::Class);
    assert!(class.is_some());
    assert_eq!(class.unwrap().bases, vec!["Base"]);

    let ctor = result
        .symbols
        .iter()
        .find(|s| s.kind == SymbolKind::Constructor)
        .unwrap();
    assert_eq!(ctor.name, "Counter");

    let bump = result.symbols.iter().find(|s| s.name == "bump").unwrap();
    assert_eq!(bump.kind, SymbolKind::Method);
    assert_eq!(bump.parent_class.as_deref(), Some("Counter"));
    assert_eq!(bump.qualified_name, "counter.Counter.bump");
}

#[test]
fn java_classes_and_invocations() {
    let source = r#"
import com.example.util.Strings;

public class Greeter extends Base {
    public Greeter() {
    }

    public String greet(String name) {
        return Strings.join("hello", name);
    }

    private void unused() {
    }
}
"#;
    let result = extractor_for(Language::Java)
        .extract(Path::new("Greeter.java"), source)
        .unwrap();

    let class = result.symbols.iter().find(|s| s.kind == SymbolKind::Class).unwrap();
    assert!(class.exported);
    assert_eq!(class.bases, vec!["Base"]);

    let greet = result.symbols.iter().find(|s| s.name == "greet").unwrap();
    assert!(greet.exported);
    assert_eq!(greet.signature.params[0].type_hint.as_deref(), Some("String"));
    assert_eq!(greet.call_refs[0].name, "join");

    let unused = result.symbols.iter().find(|s| s.name == "unused").unwrap();
    assert!(!unused.exported);

    assert_eq!(result.file.imports[0].spec, "com.example.util.Strings");
}

#[test]
fn go_receivers_and_export_convention() {
    let source = r#"
package server

import "fmt"

type Server struct{}

func (s *Server) Start() {
    fmt.Println("up")
    s.warmup()
}

func (s *Server) warmup() {}

func helper(n int) int {
    return n + 1
}
"#;
    let result = extractor_for(Language::Go)
        .extract(Path::new("server.go"), source)
        .unwrap();

    let start = result.symbols.iter().find(|s| s.name == "Start").unwrap();
    assert_eq!(start.kind, SymbolKind::Method);
    assert_eq!(start.parent_class.as_deref(), Some("Server"));
    assert_eq!(start.qualified_name, "server.Server.Start");
    assert!(start.exported);
    let callees: Vec<&str> = start.call_refs.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(callees, vec!["Println", "warmup"]);

    let helper = result.symbols.iter().find(|s| s.name == "helper").unwrap();
    assert!(!helper.exported);
    assert_eq!(helper.signature.params[0].type_hint.as_deref(), Some("int"));

    assert_eq!(result.file.imports[0].spec, "fmt");
}

#[test]
fn symbol_ids_are_stable_across_extractions() {
    let source = "def f():\n    return 1\n";
    let path = Path::new("a.py");
    let first = extractor_for(Language::Python).extract(path, source).unwrap();
    let second = extractor_for(Language::Python).extract(path, source).unwrap();
    assert_eq!(first.symbols[0].id, second.symbols[0].id);
    assert_eq!(first.symbols[0].id.as_str(), "a.py#a.f#1");
}
