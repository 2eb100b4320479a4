//! Step graph analysis: cycle detection and normalization

use crate::graph::StepGraph;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Visiting,
    Done,
}

/// Analyzes step graphs: cycle detection over unrestricted branching and
/// normalization into the canonical minimal-edge form.
#[derive(Debug, Clone, Default)]
pub struct StepGraphAnalyzer;

impl StepGraphAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Detects a cycle anywhere in the graph. A step may have multiple
    /// successors, so this is a full three-color depth-first search.
    pub fn has_circle(&self, graph: &StepGraph) -> bool {
        let mut marks: HashMap<&str, Mark> = HashMap::new();
        for name in graph.names() {
            if !marks.contains_key(name) && self.visit(graph, name, &mut marks) {
                return true;
            }
        }
        false
    }

    fn visit<'g>(
        &self,
        graph: &'g StepGraph,
        name: &'g str,
        marks: &mut HashMap<&'g str, Mark>,
    ) -> bool {
        match marks.get(name) {
            Some(Mark::Done) => return false,
            Some(Mark::Visiting) => return true,
            None => {}
        }
        marks.insert(name, Mark::Visiting);

        if let Some(node) = graph.node(name) {
            for next in node.next() {
                // Edge targets always exist in the arena, so the lookup
                // inside the recursive call cannot dangle.
                let target = graph.node(next).map(|n| n.name()).unwrap_or(next.as_str());
                if self.visit(graph, target, marks) {
                    return true;
                }
            }
        }

        marks.insert(name, Mark::Done);
        false
    }

    /// Returns the canonical form of an acyclic graph: the transitive
    /// reduction. An edge `u -> v` is dropped when `v` is reachable from
    /// another direct successor of `u`, so no edge duplicates a longer
    /// path. Reachability is unchanged, the operation is idempotent, and
    /// the zero-indegree node set is the canonical first-step set.
    pub fn normalize(&self, graph: &StepGraph) -> StepGraph {
        let mut reduced = StepGraph::new();
        for name in graph.names() {
            reduced.add_node(name);
        }

        for node in graph.nodes() {
            for target in node.next() {
                let implied = node
                    .next()
                    .iter()
                    .filter(|other| *other != target)
                    .any(|other| self.reachable(graph, other, target));
                if !implied {
                    reduced.link(node.name(), target.clone());
                }
            }
        }

        reduced
    }

    /// True if `to` is reachable from `from` by following one or more
    /// edges.
    fn reachable(&self, graph: &StepGraph, from: &str, to: &str) -> bool {
        let mut stack = vec![from.to_string()];
        let mut seen = std::collections::HashSet::new();
        while let Some(current) = stack.pop() {
            if current == to {
                return true;
            }
            if !seen.insert(current.clone()) {
                continue;
            }
            if let Some(node) = graph.node(&current) {
                stack.extend(node.next().iter().cloned());
            }
        }
        false
    }
}
