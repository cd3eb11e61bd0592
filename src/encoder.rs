//! Trace-to-feature-graph pipeline
//!
//! read → filter → build graph → centrality → assemble. Each call is a pure
//! function of its inputs; nothing is shared between runs.

use crate::call_graph::{CallGraph, GraphError};
use crate::centrality::{CentralityError, CentralityScores};
use crate::config::EncoderConfig;
use crate::features::FeatureGraph;
use crate::trace_reader::{self, TraceError};
use std::path::Path;
use thiserror::Error;

/// Errors for the encoding pipeline
#[derive(Error, Debug)]
pub enum EncodeError {
    #[error(transparent)]
    Trace(#[from] TraceError),

    #[error("Graph invariant violated: {0}")]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Centrality(#[from] CentralityError),

    #[error("Invalid encoder configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, EncodeError>;

/// Encode an already-parsed call sequence
pub fn encode_calls(calls: &[String], config: &EncoderConfig) -> Result<FeatureGraph> {
    config.centrality.validate().map_err(EncodeError::Config)?;

    let graph = CallGraph::from_calls(calls, &config.syscalls)?;
    tracing::info!(
        calls = calls.len(),
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "built call graph"
    );
    if graph.node_count() > 5_000 {
        tracing::warn!(
            nodes = graph.node_count(),
            "large graph; betweenness and closeness are quadratic in node count"
        );
    }

    let scores = CentralityScores::compute(&graph, &config.centrality)?;
    Ok(FeatureGraph::assemble(graph, scores)?)
}

/// Encode a strace text file
///
/// With `filter` set, only calls in the relevant allow-list are kept before
/// the graph is built.
///
/// # Errors
///
/// - [`EncodeError::Trace`] if the file cannot be read
/// - [`EncodeError::Centrality`] if a metric does not converge
/// - [`EncodeError::Graph`] on an internal builder defect
///
/// # Example
///
/// ```no_run
/// use stracegraph::config::EncoderConfig;
/// use stracegraph::encoder::encode_trace;
///
/// # fn main() -> anyhow::Result<()> {
/// let config = EncoderConfig::builtin()?;
/// let graph = encode_trace("trace.txt", true, &config)?;
/// println!("{} nodes, {} edges", graph.node_count(), graph.edge_count());
/// # Ok(())
/// # }
/// ```
pub fn encode_trace<P: AsRef<Path>>(
    path: P,
    filter: bool,
    config: &EncoderConfig,
) -> Result<FeatureGraph> {
    let path = path.as_ref();
    let calls = trace_reader::read_syscalls(path, filter, &config.syscalls)?;
    tracing::info!(path = %path.display(), calls = calls.len(), filter, "read trace");
    encode_calls(&calls, config)
}
