//! core::graph
//!
//! Constraint graph representation and ordering.
//!
//! # Architecture
//!
//! The constraint graph is a directed graph where:
//! - Nodes are registry keys, each carrying a priority
//! - An edge `a -> b` means `a` must come before `b`
//!
//! The graph is rebuilt from scratch for every resolution and never
//! patched incrementally.
//!
//! # Invariants
//!
//! - A topological order exists only if the graph is acyclic
//! - Among nodes with no ordering constraint between them, the lower
//!   priority comes first; equal priorities fall back to insertion order

use std::cmp::Reverse;
use std::collections::{BTreeSet, BinaryHeap, HashMap};

#[derive(Debug)]
struct Node<P> {
    key: String,
    priority: P,
}

/// A directed "must precede" graph over string keys.
#[derive(Debug)]
pub struct ConstraintGraph<P> {
    nodes: Vec<Node<P>>,
    index: HashMap<String, usize>,
    /// Successor sets, indexed like `nodes`
    successors: Vec<BTreeSet<usize>>,
}

impl<P> Default for ConstraintGraph<P> {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            index: HashMap::new(),
            successors: Vec::new(),
        }
    }
}

impl<P: Ord + Copy> ConstraintGraph<P> {
    /// Create an empty constraint graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node, or update the priority of an existing one.
    pub fn add_node(&mut self, key: impl Into<String>, priority: P) {
        let key = key.into();
        if let Some(&i) = self.index.get(&key) {
            self.nodes[i].priority = priority;
            return;
        }
        self.index.insert(key.clone(), self.nodes.len());
        self.nodes.push(Node { key, priority });
        self.successors.push(BTreeSet::new());
    }

    /// Add a "must precede" edge.
    ///
    /// Returns `false` and adds nothing if either endpoint is not a node.
    pub fn add_edge(&mut self, from: &str, to: &str) -> bool {
        match (self.index.get(from), self.index.get(to)) {
            (Some(&f), Some(&t)) => {
                self.successors[f].insert(t);
                true
            }
            _ => false,
        }
    }

    /// Whether `key` is a node.
    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of edges.
    pub fn edge_count(&self) -> usize {
        self.successors.iter().map(BTreeSet::len).sum()
    }

    /// Keys that must come directly after `key`.
    pub fn successors(&self, key: &str) -> Vec<&str> {
        self.index
            .get(key)
            .map(|&i| {
                self.successors[i]
                    .iter()
                    .map(|&s| self.nodes[s].key.as_str())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Check if the graph contains cycles.
    ///
    /// Returns the keys along one cycle, in edge order, if one exists.
    /// Nodes are visited in insertion order so the reported cycle is
    /// deterministic.
    pub fn find_cycle(&self) -> Option<Vec<String>> {
        let mut visited = vec![false; self.nodes.len()];
        let mut on_path = vec![false; self.nodes.len()];
        let mut path = Vec::new();

        for start in 0..self.nodes.len() {
            if let Some(cycle) = self.cycle_from(start, &mut visited, &mut on_path, &mut path) {
                return Some(cycle.into_iter().map(|i| self.nodes[i].key.clone()).collect());
            }
        }
        None
    }

    fn cycle_from(
        &self,
        node: usize,
        visited: &mut [bool],
        on_path: &mut [bool],
        path: &mut Vec<usize>,
    ) -> Option<Vec<usize>> {
        if on_path[node] {
            let start = path.iter().position(|&n| n == node).unwrap_or(0);
            return Some(path[start..].to_vec());
        }
        if visited[node] {
            return None;
        }

        visited[node] = true;
        on_path[node] = true;
        path.push(node);

        for &next in &self.successors[node] {
            if let Some(cycle) = self.cycle_from(next, visited, on_path, path) {
                return Some(cycle);
            }
        }

        path.pop();
        on_path[node] = false;
        None
    }

    /// Compute a topological ordering.
    ///
    /// Uses Kahn's algorithm with a min-heap keyed on
    /// `(priority, insertion index)`: whenever several nodes are free to go
    /// next, the one with the lowest priority wins. The result therefore
    /// depends only on the node set, the edges and the priorities, never on
    /// hash iteration order.
    ///
    /// # Errors
    ///
    /// Returns the keys along one cycle if the graph is not acyclic.
    ///
    /// # Example
    ///
    /// ```
    /// use composeweave::core::graph::ConstraintGraph;
    ///
    /// let mut graph = ConstraintGraph::new();
    /// graph.add_node("c", 0);
    /// graph.add_node("b", 1);
    /// graph.add_node("a", 2);
    /// graph.add_edge("a", "b");
    ///
    /// // "c" is unconstrained and has the lowest priority.
    /// assert_eq!(graph.topological_order().unwrap(), vec!["c", "a", "b"]);
    /// ```
    pub fn topological_order(&self) -> Result<Vec<String>, Vec<String>> {
        let mut in_degree = vec![0usize; self.nodes.len()];
        for succ in &self.successors {
            for &s in succ {
                in_degree[s] += 1;
            }
        }

        let mut ready: BinaryHeap<Reverse<(P, usize)>> = in_degree
            .iter()
            .enumerate()
            .filter(|(_, &d)| d == 0)
            .map(|(i, _)| Reverse((self.nodes[i].priority, i)))
            .collect();

        let mut order = Vec::with_capacity(self.nodes.len());
        while let Some(Reverse((_, i))) = ready.pop() {
            order.push(self.nodes[i].key.clone());
            for &s in &self.successors[i] {
                in_degree[s] -= 1;
                if in_degree[s] == 0 {
                    ready.push(Reverse((self.nodes[s].priority, s)));
                }
            }
        }

        if order.len() == self.nodes.len() {
            Ok(order)
        } else {
            Err(self.find_cycle().unwrap_or_default())
        }
    }
}
