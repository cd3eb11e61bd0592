use super::linalg::spectral_radius;
use super::{CentralityError, Result};
use crate::call_graph::CallGraph;
use crate::config::CentralityConfig;

/// Katz centrality with edge weights as adjacency strength
///
/// Iterates `x[v] = alpha * Σ_{u→v} w(u, v) * x[u] + beta` from `x = 0` until
/// the L1 change drops below `n * tolerance`, then scales to unit L2 norm.
/// Converges only when `alpha < 1 / λ_max`. With `katz_adaptive` set the
/// configured alpha is capped at `katz_alpha_fraction / λ_max`, so repeated
/// calls cannot push the graph out of range. A fixed alpha that is too large
/// grows without bound and `NotConverged` is returned.
///
/// Graphs without edges score zero.
pub fn katz_centrality(graph: &CallGraph, config: &CentralityConfig) -> Result<Vec<f64>> {
    let n = graph.node_count();
    if graph.edge_count() == 0 {
        return Ok(vec![0.0; n]);
    }

    if config.katz_alpha <= 0.0 {
        return Err(CentralityError::InvalidParameter {
            metric: "katz",
            reason: format!("alpha must be positive, got {}", config.katz_alpha),
        });
    }
    let alpha = effective_alpha(graph, config);
    let beta = config.katz_beta;

    let mut x = vec![0.0; n];
    for iteration in 1..=config.katz_max_iter {
        let mut next = vec![0.0; n];
        for (v, slot) in next.iter_mut().enumerate() {
            let inflow: f64 = graph
                .predecessors(v)
                .iter()
                .map(|&(u, w)| x[u] * w as f64)
                .sum();
            *slot = alpha * inflow + beta;
        }

        let error: f64 = next.iter().zip(x.iter()).map(|(a, b)| (a - b).abs()).sum();
        x = next;

        if !error.is_finite() {
            break;
        }
        if error < n as f64 * config.katz_tolerance {
            tracing::debug!(iterations = iteration, "katz converged");
            let norm = x.iter().map(|v| v * v).sum::<f64>().sqrt();
            if norm == 0.0 {
                return Ok(vec![0.0; n]);
            }
            return Ok(x.into_iter().map(|v| v / norm).collect());
        }
    }

    tracing::warn!(alpha, "katz iteration diverged or stalled");
    Err(CentralityError::NotConverged {
        metric: "katz",
        iterations: config.katz_max_iter,
    })
}

/// Attenuation used for this graph
///
/// The weight-sum bound on `λ_max` skips the eigen solve when the configured
/// alpha is already safe.
fn effective_alpha(graph: &CallGraph, config: &CentralityConfig) -> f64 {
    let alpha = config.katz_alpha;
    if !config.katz_adaptive {
        return alpha;
    }

    let bound = weight_sum_bound(graph);
    if alpha * bound < config.katz_alpha_fraction {
        return alpha;
    }

    let rho = spectral_radius(&graph.adjacency_matrix(), config.eigen_max_sweeps)
        .unwrap_or_else(|| {
            tracing::debug!(bound, "spectral radius unavailable, using weight-sum bound");
            bound
        });
    if rho <= 0.0 {
        return alpha;
    }

    let capped = config.katz_alpha_fraction / rho;
    if capped < alpha {
        tracing::debug!(
            configured = alpha,
            used = capped,
            spectral_radius = rho,
            "capped katz alpha"
        );
        capped
    } else {
        alpha
    }
}

/// `min(max out-weight, max in-weight)`, an upper bound on `λ_max`
fn weight_sum_bound(graph: &CallGraph) -> f64 {
    let nodes = 0..graph.node_count();
    let max_out = nodes.clone().map(|v| graph.out_weight(v)).max().unwrap_or(0);
    let max_in = nodes
        .map(|v| graph.predecessors(v).iter().map(|&(_, w)| w).sum::<u64>())
        .max()
        .unwrap_or(0);
    max_out.min(max_in) as f64
}
