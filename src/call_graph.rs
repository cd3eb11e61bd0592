//! Call-transition graph construction
//!
//! Folds an ordered call sequence into a simple directed graph:
//!
//! ```text
//! open → read → read → close
//!
//!   open ──1──▶ read ──1──▶ close
//!               ▲  │
//!               └1─┘   (self-loop)
//! ```
//!
//! - One node per distinct call name
//! - One edge per observed ordered pair `calls[i] → calls[i + 1]`
//! - Edge weight = number of times that adjacency occurred
//!
//! Node indices follow the lexicographic order of call names, so the same
//! trace always produces the same indices. Edges are stored in the order their
//! pair was first observed.

use crate::classify::{classify, SyscallCategory};
use crate::config::SyscallSets;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use thiserror::Error;

/// Internal invariant violations during graph construction
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("Call '{0}' is missing from the node mapping")]
    UnmappedToken(String),

    #[error("Edge {src} -> {dst} references a node outside 0..{nodes}")]
    EdgeOutOfRange { src: usize, dst: usize, nodes: usize },

    #[error("Centrality scores cover {scores} nodes but the graph has {nodes}")]
    ScoreLengthMismatch { scores: usize, nodes: usize },
}

/// Directed weighted graph of call transitions
#[derive(Debug, Clone, PartialEq)]
pub struct CallGraph {
    /// Index → call name
    names: Vec<String>,

    /// Call name → index
    index: BTreeMap<String, usize>,

    /// Index → category
    categories: Vec<SyscallCategory>,

    /// Directed edges as (src, dst) index pairs, first-observed order
    edges: Vec<(usize, usize)>,

    /// Parallel to `edges`: adjacency counts
    weights: Vec<u64>,

    /// Outgoing (dst, weight) per node
    out_adj: Vec<Vec<(usize, u64)>>,

    /// Incoming (src, weight) per node
    in_adj: Vec<Vec<(usize, u64)>>,
}

impl CallGraph {
    /// Build the transition graph from an ordered call sequence
    ///
    /// Sequences shorter than two calls produce no edges.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::UnmappedToken`] if a call is missing from the
    /// node mapping, which indicates a defect in the builder itself.
    ///
    /// # Example
    ///
    /// ```
    /// use stracegraph::call_graph::CallGraph;
    /// use stracegraph::config::SyscallSets;
    ///
    /// # fn main() -> Result<(), stracegraph::call_graph::GraphError> {
    /// let sets = SyscallSets::new(&["open"], &["read"], &[]);
    /// let calls: Vec<String> = ["open", "read", "read"].iter().map(|s| s.to_string()).collect();
    ///
    /// let graph = CallGraph::from_calls(&calls, &sets)?;
    /// assert_eq!(graph.node_count(), 2);
    /// assert_eq!(graph.edge_count(), 2); // open→read, read→read
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_calls(calls: &[String], sets: &SyscallSets) -> Result<Self, GraphError> {
        let distinct: BTreeSet<&str> = calls.iter().map(String::as_str).collect();
        let names: Vec<String> = distinct.into_iter().map(str::to_string).collect();

        let mut edges = Vec::new();
        let mut slots: HashMap<(usize, usize), usize> = HashMap::new();
        let mut weights = Vec::new();

        let mut graph = Self::with_nodes(names, sets);

        for pair in calls.windows(2) {
            let src = graph.lookup(&pair[0])?;
            let dst = graph.lookup(&pair[1])?;

            match slots.get(&(src, dst)) {
                Some(&slot) => weights[slot] += 1,
                None => {
                    slots.insert((src, dst), edges.len());
                    edges.push((src, dst));
                    weights.push(1);
                }
            }
        }

        graph.set_edges(edges, weights)?;

        tracing::debug!(
            calls = calls.len(),
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "built call graph"
        );

        Ok(graph)
    }

    /// Build a graph from explicit nodes and weighted edges
    ///
    /// Repeated (src, dst) pairs are merged by adding their weights.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::EdgeOutOfRange`] if an edge references a node
    /// index that does not exist.
    pub fn from_edges(
        names: &[&str],
        edges: &[(usize, usize, u64)],
        sets: &SyscallSets,
    ) -> Result<Self, GraphError> {
        let mut graph = Self::with_nodes(names.iter().map(|s| s.to_string()).collect(), sets);

        let mut merged: Vec<(usize, usize)> = Vec::new();
        let mut weights: Vec<u64> = Vec::new();
        let mut slots: HashMap<(usize, usize), usize> = HashMap::new();

        for &(src, dst, weight) in edges {
            match slots.get(&(src, dst)) {
                Some(&slot) => weights[slot] += weight,
                None => {
                    slots.insert((src, dst), merged.len());
                    merged.push((src, dst));
                    weights.push(weight);
                }
            }
        }

        graph.set_edges(merged, weights)?;
        Ok(graph)
    }

    fn with_nodes(names: Vec<String>, sets: &SyscallSets) -> Self {
        let index = names
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), i))
            .collect();
        let categories = names.iter().map(|name| classify(name, sets)).collect();
        let n = names.len();

        Self {
            names,
            index,
            categories,
            edges: Vec::new(),
            weights: Vec::new(),
            out_adj: vec![Vec::new(); n],
            in_adj: vec![Vec::new(); n],
        }
    }

    fn lookup(&self, name: &str) -> Result<usize, GraphError> {
        self.index
            .get(name)
            .copied()
            .ok_or_else(|| GraphError::UnmappedToken(name.to_string()))
    }

    fn set_edges(
        &mut self,
        edges: Vec<(usize, usize)>,
        weights: Vec<u64>,
    ) -> Result<(), GraphError> {
        let n = self.names.len();

        for (&(src, dst), &weight) in edges.iter().zip(weights.iter()) {
            if src >= n || dst >= n {
                return Err(GraphError::EdgeOutOfRange { src, dst, nodes: n });
            }
            self.out_adj[src].push((dst, weight));
            self.in_adj[dst].push((src, weight));
        }

        self.edges = edges;
        self.weights = weights;
        Ok(())
    }

    /// Get the number of nodes in the graph
    pub fn node_count(&self) -> usize {
        self.names.len()
    }

    /// Get the number of edges in the graph
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn name_of(&self, node: usize) -> Option<&str> {
        self.names.get(node).map(String::as_str)
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Name → index mapping
    pub fn mapping(&self) -> &BTreeMap<String, usize> {
        &self.index
    }

    pub fn categories(&self) -> &[SyscallCategory] {
        &self.categories
    }

    /// Directed edges as (src, dst) pairs
    pub fn edges(&self) -> &[(usize, usize)] {
        &self.edges
    }

    /// Edge weights, parallel to [`CallGraph::edges`]
    pub fn weights(&self) -> &[u64] {
        &self.weights
    }

    /// Weight of the edge `src → dst`, if it exists
    pub fn weight(&self, src: usize, dst: usize) -> Option<u64> {
        self.out_adj
            .get(src)?
            .iter()
            .find(|(n, _)| *n == dst)
            .map(|(_, w)| *w)
    }

    /// Outgoing neighbors with edge weights
    pub fn successors(&self, node: usize) -> &[(usize, u64)] {
        &self.out_adj[node]
    }

    /// Incoming neighbors with edge weights
    pub fn predecessors(&self, node: usize) -> &[(usize, u64)] {
        &self.in_adj[node]
    }

    pub fn out_degree(&self, node: usize) -> usize {
        self.out_adj[node].len()
    }

    pub fn in_degree(&self, node: usize) -> usize {
        self.in_adj[node].len()
    }

    /// Sum of outgoing edge weights
    pub fn out_weight(&self, node: usize) -> u64 {
        self.out_adj[node].iter().map(|(_, w)| w).sum()
    }

    /// Sum of all edge weights (number of counted adjacencies)
    pub fn total_weight(&self) -> u64 {
        self.weights.iter().sum()
    }

    /// Dense weighted adjacency matrix, `a[src][dst] = weight`
    pub fn adjacency_matrix(&self) -> Vec<Vec<f64>> {
        let n = self.node_count();
        let mut matrix = vec![vec![0.0; n]; n];
        for (&(src, dst), &weight) in self.edges.iter().zip(self.weights.iter()) {
            matrix[src][dst] = weight as f64;
        }
        matrix
    }
}
