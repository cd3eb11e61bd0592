use crate::call_graph::CallGraph;

/// Degree centrality: `(in_degree + out_degree) / (n - 1)`
///
/// Degrees count distinct edges, not weights. A self-loop adds one to each
/// side. Zero for graphs with a single node.
pub fn degree_centrality(graph: &CallGraph) -> Vec<f64> {
    let n = graph.node_count();
    if n < 2 {
        return vec![0.0; n];
    }

    let scale = 1.0 / (n - 1) as f64;
    (0..n)
        .map(|v| (graph.in_degree(v) + graph.out_degree(v)) as f64 * scale)
        .collect()
}
