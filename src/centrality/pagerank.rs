use super::{CentralityError, Result};
use crate::call_graph::CallGraph;
use crate::config::CentralityConfig;

/// PageRank with weighted transitions
///
/// A walker at `u` follows edge `u → v` with probability
/// `w(u, v) / Σ w(u, ·)` scaled by the damping factor, and otherwise restarts
/// uniformly. Mass sitting on dangling nodes (no outgoing edges) is spread
/// uniformly. Power iteration from the uniform vector stops once the L1 change
/// is below `n * tolerance`.
///
/// The result sums to one for any non-empty graph; an edgeless graph gives
/// `1 / n` everywhere.
pub fn pagerank(graph: &CallGraph, config: &CentralityConfig) -> Result<Vec<f64>> {
    let n = graph.node_count();
    if n == 0 {
        return Ok(Vec::new());
    }

    let alpha = config.pagerank_damping;
    if !(0.0..1.0).contains(&alpha) {
        return Err(CentralityError::InvalidParameter {
            metric: "pagerank",
            reason: format!("damping must be in [0, 1), got {}", alpha),
        });
    }

    let uniform = 1.0 / n as f64;
    if graph.edge_count() == 0 {
        return Ok(vec![uniform; n]);
    }

    let out_weight: Vec<f64> = (0..n).map(|u| graph.out_weight(u) as f64).collect();
    let dangling: Vec<usize> = (0..n).filter(|&u| out_weight[u] == 0.0).collect();

    let mut x = vec![uniform; n];
    for iteration in 1..=config.pagerank_max_iter {
        let dangling_mass: f64 = alpha * dangling.iter().map(|&u| x[u]).sum::<f64>();
        let base = dangling_mass * uniform + (1.0 - alpha) * uniform;

        let mut next = vec![base; n];
        for u in 0..n {
            if out_weight[u] == 0.0 {
                continue;
            }
            let share = alpha * x[u] / out_weight[u];
            for &(v, w) in graph.successors(u) {
                next[v] += share * w as f64;
            }
        }

        let error: f64 = next.iter().zip(x.iter()).map(|(a, b)| (a - b).abs()).sum();
        x = next;

        if error < n as f64 * config.pagerank_tolerance {
            tracing::debug!(iterations = iteration, "pagerank converged");
            return Ok(x);
        }
    }

    Err(CentralityError::NotConverged {
        metric: "pagerank",
        iterations: config.pagerank_max_iter,
    })
}
