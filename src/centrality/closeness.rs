use crate::call_graph::CallGraph;
use std::collections::VecDeque;

/// Closeness centrality over outgoing hop distances
///
/// For node `u` reaching `r` other nodes at total distance `d`:
///
/// ```text
/// closeness(u) = (r / d) * (r / (n - 1))
/// ```
///
/// The first factor is the reciprocal mean distance over reachable nodes only;
/// the second scales by the reachable fraction of the graph (Wasserman–Faust
/// correction). Nodes that reach nothing score zero.
pub fn closeness_centrality(graph: &CallGraph) -> Vec<f64> {
    let n = graph.node_count();
    let mut scores = vec![0.0; n];
    if n < 2 {
        return scores;
    }

    for (source, score) in scores.iter_mut().enumerate() {
        let dist = bfs_distances(graph, source);
        let (reached, total) = dist
            .iter()
            .enumerate()
            .filter(|&(node, _)| node != source)
            .filter_map(|(_, d)| *d)
            .fold((0usize, 0usize), |(count, sum), d| (count + 1, sum + d));

        if total > 0 {
            let r = reached as f64;
            *score = (r / total as f64) * (r / (n - 1) as f64);
        }
    }

    scores
}

/// Hop distances from `source` following edge direction
fn bfs_distances(graph: &CallGraph, source: usize) -> Vec<Option<usize>> {
    let mut dist = vec![None; graph.node_count()];
    dist[source] = Some(0);

    let mut queue = VecDeque::from([(source, 0usize)]);
    while let Some((v, dv)) = queue.pop_front() {
        for &(w, _) in graph.successors(v) {
            if dist[w].is_none() {
                dist[w] = Some(dv + 1);
                queue.push_back((w, dv + 1));
            }
        }
    }

    dist
}
