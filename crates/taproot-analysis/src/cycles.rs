//! Circular dependency detection over the import graph.
//!
//! Strongly connected components via Tarjan; every SCC with more than one
//! file, or a single file importing itself, is a cycle. Full membership is
//! reported so multi-file cycles are not misread as pairwise, plus one
//! minimal closed walk. Files enter the graph in lexical path order, so
//! output is stable across runs.

use std::collections::{HashMap, HashSet, VecDeque};
use std::path::PathBuf;

use petgraph::algo::tarjan_scc;
use petgraph::stable_graph::NodeIndex;
use serde::Serialize;

use taproot_core::ImportGraph;

/// One detected import cycle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportCycle {
    /// Every file in the strongly connected component, sorted.
    pub members: Vec<PathBuf>,
    /// A closed walk: each file imports the next, the last imports the
    /// first.
    pub walk: Vec<PathBuf>,
}

pub fn detect_cycles(imports: &ImportGraph) -> Vec<ImportCycle> {
    let graph = imports.graph();
    let mut cycles = Vec::new();

    for scc in tarjan_scc(graph) {
        let is_cycle = scc.len() > 1 || graph.neighbors(scc[0]).any(|n| n == scc[0]);
        if !is_cycle {
            continue;
        }

        let mut members: Vec<PathBuf> = scc
            .iter()
            .filter_map(|&idx| graph.node_weight(idx).cloned())
            .collect();
        members.sort();

        let walk = representative_walk(imports, &scc);
        cycles.push(ImportCycle { members, walk });
    }

    cycles.sort_by(|a, b| a.members.cmp(&b.members));
    cycles
}

/// Shortest closed walk through the SCC from its lexically first file,
/// found by BFS restricted to component nodes. Strong connectivity
/// guarantees a path back to the start; sorted neighbor order makes the
/// result deterministic.
fn representative_walk(imports: &ImportGraph, scc: &[NodeIndex]) -> Vec<PathBuf> {
    let graph = imports.graph();
    let component: HashSet<NodeIndex> = scc.iter().copied().collect();

    let mut by_path: Vec<(&PathBuf, NodeIndex)> = scc
        .iter()
        .filter_map(|&idx| graph.node_weight(idx).map(|p| (p, idx)))
        .collect();
    by_path.sort();
    let start = by_path[0].1;

    if scc.len() == 1 {
        return vec![graph.node_weight(start).cloned().unwrap_or_default()];
    }

    let sorted_neighbors = |idx: NodeIndex| {
        let mut next: Vec<NodeIndex> = graph
            .neighbors(idx)
            .filter(|n| component.contains(n))
            .collect();
        next.sort_by_key(|&n| graph.node_weight(n).cloned());
        next
    };

    let mut predecessor: HashMap<NodeIndex, NodeIndex> = HashMap::new();
    let mut queue = VecDeque::from([start]);
    while let Some(node) = queue.pop_front() {
        for next in sorted_neighbors(node) {
            if next == start {
                // Closing edge found; unwind node → ... → start.
                let mut walk = vec![node];
                let mut current = node;
                while current != start {
                    current = predecessor[&current];
                    walk.push(current);
                }
                walk.reverse();
                return walk
                    .into_iter()
                    .filter_map(|idx| graph.node_weight(idx).cloned())
                    .collect();
            }
            if next != start && !predecessor.contains_key(&next) {
                predecessor.insert(next, node);
                queue.push_back(next);
            }
        }
    }

    // Unreachable for a genuine SCC; fall back to the membership list.
    scc.iter()
        .filter_map(|&idx| graph.node_weight(idx).cloned())
        .collect()
}
