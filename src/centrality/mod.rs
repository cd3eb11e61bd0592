// Structural centrality metrics over the call-transition graph
//
// Six metrics, each an explicit function of the `CallGraph` so the numeric
// semantics (damping, normalization, convergence) are pinned down here rather
// than inherited from a graph library:
//
//   katz         weighted in-neighbor recursion with constant bias, L2-normalized
//   betweenness  Brandes shortest-path counting, unweighted, directed
//   closeness    outward BFS distances with reachability correction
//   degree       (in + out) / (n - 1)
//   eigenvector  principal eigenvector of the weighted adjacency (direct solve)
//   pagerank     weighted random walk with uniform restart
//
// Degenerate graphs get zero-filled scores instead of NaN. A metric whose
// solver runs out of iterations returns `CentralityError::NotConverged`, which
// callers can tell apart from a legitimate zero.
//
// Cost: betweenness and closeness run one BFS per node, O(n·(n + m)); the
// eigenvector solve is O(n³) dense. Both dominate for large traces.

mod betweenness;
mod closeness;
mod degree;
mod eigenvector;
mod katz;
pub mod linalg;
mod pagerank;

pub use betweenness::betweenness_centrality;
pub use closeness::closeness_centrality;
pub use degree::degree_centrality;
pub use eigenvector::eigenvector_centrality;
pub use katz::katz_centrality;
pub use pagerank::pagerank;

use crate::call_graph::CallGraph;
use crate::config::CentralityConfig;
use thiserror::Error;

/// Errors for centrality computation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CentralityError {
    #[error("{metric} centrality did not converge within {iterations} iterations")]
    NotConverged {
        metric: &'static str,
        iterations: usize,
    },

    #[error("Invalid parameter for {metric} centrality: {reason}")]
    InvalidParameter {
        metric: &'static str,
        reason: String,
    },
}

pub type Result<T> = std::result::Result<T, CentralityError>;

/// Metric names in feature-column order
pub const METRIC_NAMES: [&str; 6] = [
    "katz",
    "betweenness",
    "closeness",
    "degree",
    "eigenvector",
    "pagerank",
];

/// All six metrics, each indexed by node index
#[derive(Debug, Clone, PartialEq)]
pub struct CentralityScores {
    pub katz: Vec<f64>,
    pub betweenness: Vec<f64>,
    pub closeness: Vec<f64>,
    pub degree: Vec<f64>,
    pub eigenvector: Vec<f64>,
    pub pagerank: Vec<f64>,
}

impl CentralityScores {
    /// Compute every metric over the graph
    pub fn compute(graph: &CallGraph, config: &CentralityConfig) -> Result<Self> {
        let scores = Self {
            katz: katz_centrality(graph, config)?,
            betweenness: betweenness_centrality(graph),
            closeness: closeness_centrality(graph),
            degree: degree_centrality(graph),
            eigenvector: eigenvector_centrality(graph, config)?,
            pagerank: pagerank(graph, config)?,
        };

        tracing::debug!(nodes = graph.node_count(), "computed centrality metrics");
        Ok(scores)
    }

    pub fn len(&self) -> usize {
        self.degree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.degree.is_empty()
    }

    /// The six scores for one node in `METRIC_NAMES` order
    ///
    /// `None` if any metric vector is shorter than `node + 1`.
    pub fn row(&self, node: usize) -> Option<[f64; 6]> {
        Some([
            *self.katz.get(node)?,
            *self.betweenness.get(node)?,
            *self.closeness.get(node)?,
            *self.degree.get(node)?,
            *self.eigenvector.get(node)?,
            *self.pagerank.get(node)?,
        ])
    }
}

/// Replace NaN/inf with the zero fallback
pub(crate) fn zero_fill(values: &mut [f64]) {
    for v in values.iter_mut() {
        if !v.is_finite() {
            *v = 0.0;
        }
    }
}
