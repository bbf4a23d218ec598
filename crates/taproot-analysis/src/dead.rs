//! Dead code detection over the call graph.
//!
//! A symbol is dead iff its in-degree is zero (ambiguous edges count) and
//! it is not an entry point. Entry points: configured entry names, the
//! exported surface, test-convention names, and constructors or classes
//! with known subclasses (inheritance implies reachability the static
//! graph cannot observe). The policy is conservative: a missed dead symbol
//! costs less than flagging live entry or API code.

use std::collections::HashSet;

use regex::Regex;

use taproot_core::{AnalysisConfig, CallGraph, SymbolId, SymbolKind, SymbolTable};

pub fn detect_dead_code(
    table: &SymbolTable,
    graph: &CallGraph,
    config: &AnalysisConfig,
    test_name: &Regex,
) -> Vec<SymbolId> {
    // Names that appear as a base of any class.
    let subclassed: HashSet<&str> = table
        .symbols()
        .iter()
        .filter(|s| s.kind == SymbolKind::Class)
        .flat_map(|s| s.bases.iter().map(String::as_str))
        .collect();

    let mut dead = Vec::new();
    for symbol in table.symbols() {
        if graph.in_degree(&symbol.id) > 0 {
            continue;
        }
        if config.is_entry_point_name(&symbol.name) {
            continue;
        }
        if symbol.exported {
            continue;
        }
        if test_name.is_match(&symbol.name) {
            continue;
        }
        let inherited = match symbol.kind {
            SymbolKind::Constructor => symbol
                .parent_class
                .as_deref()
                .is_some_and(|class| subclassed.contains(class)),
            SymbolKind::Class => subclassed.contains(symbol.name.as_str()),
            _ => false,
        };
        if inherited {
            continue;
        }
        dead.push(symbol.id.clone());
    }
    // table.symbols() is id-sorted, so `dead` already is too.
    dead
}
