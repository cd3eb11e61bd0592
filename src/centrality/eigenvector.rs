use super::linalg::{spectral_radius, LuDecomposition};
use super::{CentralityError, Result};
use crate::call_graph::CallGraph;
use crate::config::CentralityConfig;

/// Eigenvector centrality from the weighted adjacency matrix
///
/// Scores satisfy `λ x[v] = Σ_{u→v} w(u, v) x[u]`, i.e. `x` is the principal
/// eigenvector of `Aᵀ`. The Perron root `λ` comes from a full eigenvalue
/// decomposition (Hessenberg + Francis QR); the vector is then read off by
/// inverse iteration at a shift just above `λ`, which converges in a handful
/// of solves. The result has unit L2 norm and non-negative entries.
///
/// A graph without cycles (including one without edges) has `λ = 0` and no
/// meaningful principal vector; it scores zero everywhere.
pub fn eigenvector_centrality(graph: &CallGraph, config: &CentralityConfig) -> Result<Vec<f64>> {
    let n = graph.node_count();
    if graph.edge_count() == 0 || is_acyclic(graph) {
        return Ok(vec![0.0; n]);
    }

    let adjacency = graph.adjacency_matrix();
    let rho = spectral_radius(&adjacency, config.eigen_max_sweeps).ok_or(
        CentralityError::NotConverged {
            metric: "eigenvector",
            iterations: config.eigen_max_sweeps,
        },
    )?;
    tracing::debug!(spectral_radius = rho, "eigenvalue decomposition finished");

    // (σI - Aᵀ) with σ a hair above the Perron root
    let shift = rho * (1.0 + 1e-10);
    let mut shifted = vec![vec![0.0; n]; n];
    for (i, row) in shifted.iter_mut().enumerate() {
        for (j, cell) in row.iter_mut().enumerate() {
            *cell = -adjacency[j][i];
        }
        row[i] += shift;
    }
    let lu = LuDecomposition::factor(&shifted);

    let mut x = vec![1.0 / (n as f64).sqrt(); n];
    for iteration in 1..=config.eigen_max_iter {
        let mut next = lu.solve(&x);
        if !normalize(&mut next) {
            break;
        }

        let change: f64 = next.iter().zip(x.iter()).map(|(a, b)| (a - b).abs()).sum();
        x = next;

        if change < n as f64 * config.eigen_tolerance {
            tracing::debug!(iterations = iteration, "eigenvector converged");
            for v in x.iter_mut() {
                if *v < 0.0 {
                    *v = 0.0;
                }
            }
            normalize(&mut x);
            return Ok(x);
        }
    }

    Err(CentralityError::NotConverged {
        metric: "eigenvector",
        iterations: config.eigen_max_iter,
    })
}

/// Scale to unit L2 norm with a non-negative sum; false if degenerate
fn normalize(x: &mut [f64]) -> bool {
    let norm = x.iter().map(|v| v * v).sum::<f64>().sqrt();
    if norm == 0.0 || !norm.is_finite() {
        return false;
    }
    let signed = if x.iter().sum::<f64>() < 0.0 { -norm } else { norm };
    for v in x.iter_mut() {
        *v /= signed;
    }
    true
}

/// Kahn's algorithm; self-loops count as cycles
fn is_acyclic(graph: &CallGraph) -> bool {
    let n = graph.node_count();
    let mut indegree: Vec<usize> = (0..n).map(|v| graph.in_degree(v)).collect();
    let mut ready: Vec<usize> = (0..n).filter(|&v| indegree[v] == 0).collect();
    let mut visited = 0;

    while let Some(u) = ready.pop() {
        visited += 1;
        for &(v, _) in graph.successors(u) {
            indegree[v] -= 1;
            if indegree[v] == 0 {
                ready.push(v);
            }
        }
    }

    visited == n
}
