//! Per-node feature assembly
//!
//! Pairs the one-hot category of each node with its six centrality scores and
//! freezes the result, together with the edge list and name mapping, into a
//! [`FeatureGraph`].

use crate::call_graph::{CallGraph, GraphError};
use crate::centrality::CentralityScores;
use crate::classify::SyscallCategory;
use std::collections::BTreeMap;

/// Number of columns in a node feature vector
pub const FEATURE_DIM: usize = 9;

/// Column labels for the node feature matrix
pub const FEATURE_NAMES: [&str; FEATURE_DIM] = [
    "is_file",
    "is_network",
    "is_other",
    "katz",
    "betweenness",
    "closeness",
    "degree",
    "eigenvector",
    "pagerank",
];

/// Encoded trace: node features, weighted edges and the name mapping
///
/// Built once by [`FeatureGraph::assemble`] and read-only afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureGraph {
    names: Vec<String>,
    mapping: BTreeMap<String, usize>,
    categories: Vec<SyscallCategory>,
    features: Vec<[f64; FEATURE_DIM]>,
    edges: Vec<(usize, usize)>,
    weights: Vec<u64>,
}

impl FeatureGraph {
    /// Combine a call graph with its centrality scores
    ///
    /// # Errors
    ///
    /// Returns a [`GraphError`] if the mapping is not the inverse of the node
    /// names, an edge points outside the node range, or the scores do not
    /// cover every node. Each indicates a builder defect.
    pub fn assemble(graph: CallGraph, scores: CentralityScores) -> Result<Self, GraphError> {
        let n = graph.node_count();

        check_mapping(graph.names(), graph.mapping())?;
        for &(src, dst) in graph.edges() {
            if src >= n || dst >= n {
                return Err(GraphError::EdgeOutOfRange { src, dst, nodes: n });
            }
        }
        if scores.len() != n {
            return Err(GraphError::ScoreLengthMismatch {
                scores: scores.len(),
                nodes: n,
            });
        }

        let mut features = Vec::with_capacity(n);
        for (node, category) in graph.categories().iter().enumerate() {
            let metrics = scores.row(node).ok_or(GraphError::ScoreLengthMismatch {
                scores: node,
                nodes: n,
            })?;
            let mut row = [0.0; FEATURE_DIM];
            row[..3].copy_from_slice(&category.one_hot());
            row[3..].copy_from_slice(&metrics);
            features.push(row);
        }

        Ok(Self {
            names: graph.names().to_vec(),
            mapping: graph.mapping().clone(),
            categories: graph.categories().to_vec(),
            features,
            edges: graph.edges().to_vec(),
            weights: graph.weights().to_vec(),
        })
    }

    pub fn node_count(&self) -> usize {
        self.names.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Index → call name
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Call name → index
    pub fn mapping(&self) -> &BTreeMap<String, usize> {
        &self.mapping
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.mapping.get(name).copied()
    }

    pub fn name_of(&self, node: usize) -> Option<&str> {
        self.names.get(node).map(String::as_str)
    }

    pub fn category_of(&self, node: usize) -> Option<SyscallCategory> {
        self.categories.get(node).copied()
    }

    /// The N × 9 node feature matrix
    pub fn feature_matrix(&self) -> &[[f64; FEATURE_DIM]] {
        &self.features
    }

    pub fn features(&self, node: usize) -> Option<&[f64; FEATURE_DIM]> {
        self.features.get(node)
    }

    /// Directed edges as (src, dst) index pairs
    pub fn edges(&self) -> &[(usize, usize)] {
        &self.edges
    }

    /// Parallel to [`edges`](Self::edges)
    pub fn weights(&self) -> &[u64] {
        &self.weights
    }

    /// Sum of edge weights; `len - 1` for a trace of `len >= 1` calls
    pub fn total_weight(&self) -> u64 {
        self.weights.iter().sum()
    }

    /// Weight of the transition `src → dst`, looked up by call name
    pub fn edge_weight(&self, src: &str, dst: &str) -> Option<u64> {
        let key = (self.index_of(src)?, self.index_of(dst)?);
        self.edges
            .iter()
            .position(|&edge| edge == key)
            .map(|i| self.weights[i])
    }

    /// Iterate `(src name, dst name, weight)` in edge order
    pub fn weighted_edges(&self) -> impl Iterator<Item = (&str, &str, u64)> + '_ {
        self.edges
            .iter()
            .zip(self.weights.iter())
            .map(|(&(src, dst), &w)| (self.names[src].as_str(), self.names[dst].as_str(), w))
    }
}

/// Check that `mapping` is the exact inverse of `names`
///
/// Every position `i` must map back to `i`, and the mapping may hold no keys
/// beyond the names.
fn check_mapping(names: &[String], mapping: &BTreeMap<String, usize>) -> Result<(), GraphError> {
    for (i, name) in names.iter().enumerate() {
        if mapping.get(name) != Some(&i) {
            return Err(GraphError::UnmappedToken(name.clone()));
        }
    }
    if mapping.len() != names.len() {
        let stray = mapping
            .iter()
            .find(|&(name, &i)| names.get(i) != Some(name))
            .map(|(name, _)| name.clone())
            .unwrap_or_default();
        return Err(GraphError::UnmappedToken(stray));
    }
    Ok(())
}
