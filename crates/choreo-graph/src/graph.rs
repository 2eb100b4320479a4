//! Step graph arena
//!
//! Nodes live in a `BTreeMap` keyed by step name; edges are name sets.
//! Name-indexed edges avoid shared ownership between sibling nodes, and
//! the ordered collections make iteration order (and therefore
//! normalization output) deterministic.

use std::collections::{BTreeMap, BTreeSet};

/// One step of an action, with its forward and backward edges.
///
/// `prev` is bookkeeping only: it mirrors the `next` sets of other nodes
/// and is what makes zero-indegree (first step) detection cheap.
///
/// Two nodes are equal iff their names and both edge name-sets match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    name: String,
    next: BTreeSet<String>,
    prev: BTreeSet<String>,
}

impl Node {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            next: BTreeSet::new(),
            prev: BTreeSet::new(),
        }
    }

    /// The step name this node represents.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Names of the nodes this node points to.
    pub fn next(&self) -> &BTreeSet<String> {
        &self.next
    }

    /// Names of the nodes pointing at this node.
    pub fn prev(&self) -> &BTreeSet<String> {
        &self.prev
    }

    /// True if no node points at this one.
    pub fn is_source(&self) -> bool {
        self.prev.is_empty()
    }

    /// True if this node points at nothing.
    pub fn is_terminal(&self) -> bool {
        self.next.is_empty()
    }
}

/// A directed graph of the steps of a single action.
///
/// Invariant: every name referenced by a `next`/`prev` edge exists as a
/// node in the same graph ([`link`](Self::link) inserts missing
/// endpoints).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepGraph {
    nodes: BTreeMap<String, Node>,
}

impl StepGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a node with the given name if not already present.
    pub fn add_node(&mut self, name: impl Into<String>) {
        let name = name.into();
        self.nodes.entry(name.clone()).or_insert_with(|| Node::new(name));
    }

    /// Adds the edge `from -> to`, inserting either endpoint if missing.
    pub fn link(&mut self, from: impl Into<String>, to: impl Into<String>) {
        let from = from.into();
        let to = to.into();
        self.add_node(from.clone());
        self.add_node(to.clone());
        if let Some(node) = self.nodes.get_mut(&from) {
            node.next.insert(to.clone());
        }
        if let Some(node) = self.nodes.get_mut(&to) {
            node.prev.insert(from);
        }
    }

    /// Looks up a node by exact name.
    pub fn node(&self, name: &str) -> Option<&Node> {
        self.nodes.get(name)
    }

    /// True if a node with the given name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.nodes.contains_key(name)
    }

    /// All node names, in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.nodes.keys().map(String::as_str)
    }

    /// All nodes, in name order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True if the graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Names of all zero-indegree nodes, in sorted order. For a
    /// normalized graph this is the canonical first-step set.
    pub fn source_names(&self) -> Vec<String> {
        self.nodes
            .values()
            .filter(|n| n.is_source())
            .map(|n| n.name.clone())
            .collect()
    }
}
