use crate::call_graph::CallGraph;
use std::collections::VecDeque;

/// Betweenness centrality (Brandes 2001), directed and unweighted
///
/// For every source, a BFS counts shortest paths (`sigma`) and records
/// predecessors; dependencies are then accumulated in reverse BFS order.
/// Scores are normalized by `(n - 1)(n - 2)`, the number of ordered pairs not
/// involving the node. Graphs with fewer than three nodes score zero.
///
/// Self-loops never lie on a shortest path and are ignored. Unreachable pairs
/// contribute nothing.
pub fn betweenness_centrality(graph: &CallGraph) -> Vec<f64> {
    let n = graph.node_count();
    let mut scores = vec![0.0; n];
    if n < 3 {
        return scores;
    }

    for source in 0..n {
        let mut order: Vec<usize> = Vec::with_capacity(n);
        let mut preds: Vec<Vec<usize>> = vec![Vec::new(); n];
        let mut sigma = vec![0.0_f64; n];
        let mut dist: Vec<Option<usize>> = vec![None; n];

        sigma[source] = 1.0;
        dist[source] = Some(0);

        let mut queue = VecDeque::from([source]);
        while let Some(v) = queue.pop_front() {
            order.push(v);
            let dv = dist[v].unwrap_or(0);

            for &(w, _) in graph.successors(v) {
                if dist[w].is_none() {
                    dist[w] = Some(dv + 1);
                    queue.push_back(w);
                }
                if dist[w] == Some(dv + 1) {
                    sigma[w] += sigma[v];
                    preds[w].push(v);
                }
            }
        }

        let mut delta = vec![0.0_f64; n];
        while let Some(w) = order.pop() {
            for &v in &preds[w] {
                delta[v] += sigma[v] / sigma[w] * (1.0 + delta[w]);
            }
            if w != source {
                scores[w] += delta[w];
            }
        }
    }

    let scale = 1.0 / ((n - 1) * (n - 2)) as f64;
    for score in scores.iter_mut() {
        *score *= scale;
    }
    super::zero_fill(&mut scores);
    scores
}
