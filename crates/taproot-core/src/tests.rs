//! Unit tests for the symbol table and graph wrappers

use std::path::{Path, PathBuf};

use crate::*;

fn symbol(file: &str, qualified: &str, name: &str, start: u32, end: u32) -> Symbol {
    Symbol {
        id: SymbolId::new(Path::new(file), qualified, start),
        name: name.to_string(),
        qualified_name: qualified.to_string(),
        kind: SymbolKind::Function,
        language: Language::Python,
        file: PathBuf::from(file),
        start_line: start,
        end_line: end,
        signature: Signature::default(),
        body: String::new(),
        call_refs: Vec::new(),
        exported: false,
        parent_class: None,
        bases: Vec::new(),
    }
}

#[test]
fn register_rejects_duplicate_ids() {
    let builder = SymbolTableBuilder::new();
    builder.register(symbol("a.py", "a.f", "f", 1, 5)).unwrap();

    let err = builder
        .register(symbol("a.py", "a.f", "f", 1, 5))
        .unwrap_err();
    assert!(matches!(err, Error::DuplicateSymbol(_)));
}

#[test]
fn register_rejects_inverted_spans() {
    let builder = SymbolTableBuilder::new();
    let err = builder
        .register(symbol("a.py", "a.f", "f", 10, 2))
        .unwrap_err();
    assert!(matches!(err, Error::MalformedSymbol { .. }));
    assert!(builder.is_empty());
}

#[test]
fn lookup_by_name_is_ordered_by_file_then_line() {
    let builder = SymbolTableBuilder::new();
    // Insert out of order on purpose.
    builder.register(symbol("z.py", "z.f", "f", 3, 4)).unwrap();
    builder.register(symbol("a.py", "a.f", "f", 9, 12)).unwrap();
    builder.register(symbol("a.py", "a.C.f", "f", 2, 4)).unwrap();
    let table = builder.finish(Vec::new());

    let found = table.lookup_by_name("f");
    let order: Vec<(&Path, u32)> = found
        .iter()
        .map(|s| (s.file.as_path(), s.start_line))
        .collect();
    assert_eq!(
        order,
        vec![
            (Path::new("a.py"), 2),
            (Path::new("a.py"), 9),
            (Path::new("z.py"), 3),
        ]
    );
}

#[test]
fn qualified_lookup_is_exact() {
    let builder = SymbolTableBuilder::new();
    builder.register(symbol("a.py", "a.f", "f", 1, 5)).unwrap();
    let table = builder.finish(Vec::new());

    assert!(table.lookup_by_qualified_name("a.f").is_some());
    assert!(table.lookup_by_qualified_name("b.f").is_none());
    assert!(table.lookup_by_qualified_name("f").is_none());
}

#[test]
fn files_are_sorted_by_path() {
    let builder = SymbolTableBuilder::new();
    let table = builder.finish(vec![
        FileNode {
            path: PathBuf::from("b.py"),
            language: Language::Python,
            imports: Vec::new(),
        },
        FileNode {
            path: PathBuf::from("a.py"),
            language: Language::Python,
            imports: Vec::new(),
        },
    ]);

    let paths: Vec<&Path> = table.files().iter().map(|f| f.path.as_path()).collect();
    assert_eq!(paths, vec![Path::new("a.py"), Path::new("b.py")]);
    assert!(table.file(Path::new("a.py")).is_some());
}

#[test]
fn call_graph_counts_self_loops_as_incoming() {
    let mut graph = CallGraph::new();
    let id = SymbolId::new(Path::new("a.py"), "a.fact", 1);
    graph.add_symbol(id.clone());
    graph.add_edge(CallEdge {
        caller: id.clone(),
        callee: id.clone(),
        line: 3,
        ambiguous: false,
    });

    assert_eq!(graph.in_degree(&id), 1);
    assert_eq!(graph.edge_count(), 1);
    let edge = graph.edges_from(&id).next().unwrap();
    assert_eq!(edge.caller, edge.callee);
}

#[test]
fn call_graph_keeps_parallel_ambiguous_edges() {
    let mut graph = CallGraph::new();
    let caller = SymbolId::new(Path::new("a.py"), "a.f", 1);
    let c1 = SymbolId::new(Path::new("b.py"), "b.g", 1);
    let c2 = SymbolId::new(Path::new("c.py"), "c.g", 1);
    for id in [&caller, &c1, &c2] {
        graph.add_symbol(id.clone());
    }
    for callee in [&c1, &c2] {
        graph.add_edge(CallEdge {
            caller: caller.clone(),
            callee: callee.clone(),
            line: 2,
            ambiguous: true,
        });
    }

    assert_eq!(graph.edges_from(&caller).count(), 2);
    assert_eq!(graph.in_degree(&c1), 1);
    assert_eq!(graph.in_degree(&c2), 1);
    assert!(graph.edges().all(|e| e.ambiguous));
}

#[test]
fn import_graph_deduplicates_edges() {
    let mut graph = ImportGraph::new();
    graph.add_file(PathBuf::from("a.py"));
    graph.add_file(PathBuf::from("b.py"));
    graph.add_import(Path::new("a.py"), Path::new("b.py"));
    graph.add_import(Path::new("a.py"), Path::new("b.py"));

    assert_eq!(graph.edge_count(), 1);
    assert!(graph.has_edge(Path::new("a.py"), Path::new("b.py")));
    assert!(!graph.has_edge(Path::new("b.py"), Path::new("a.py")));

    let imports: Vec<&PathBuf> = graph.imports_of(Path::new("a.py")).collect();
    assert_eq!(imports, vec![&PathBuf::from("b.py")]);
}

#[test]
fn symbol_serialization_round_trips() {
    let sym = symbol("a.py", "a.f", "f", 1, 5);
    let json = serde_json::to_string(&sym).unwrap();
    let back: Symbol = serde_json::from_str(&json).unwrap();
    assert_eq!(sym, back);
}
