//! Partition evaluation metrics.
//!
//! Measures for assessing the quality of a community partition against
//! the graph it was computed on.

use petgraph::graph::UnGraph;
use petgraph::visit::EdgeRef;

/// Newman modularity Q of a partition.
///
/// Compares the number of edges within communities to the expected
/// number in a random graph with the same degree sequence:
///
/// ```text
/// Q = Σ_c [ e_c/m - (d_c/(2m))² ]
/// ```
///
/// where m is the edge count, e_c the number of edges internal to
/// community c, and d_c the sum of member degrees. Q lies in [-1, 1];
/// higher is better. Degrees follow the engine's convention: a self-loop
/// counts once toward its endpoint's degree.
///
/// `labels` maps node index to community label. Returns 0.0 for an
/// edgeless graph or a label slice of the wrong length.
///
/// # Example
///
/// ```rust
/// use petgraph::graph::UnGraph;
/// use commune::metrics::modularity;
///
/// let mut graph = UnGraph::<(), ()>::new_undirected();
/// let a = graph.add_node(());
/// let b = graph.add_node(());
/// graph.add_edge(a, b, ());
///
/// // One community holding both vertices.
/// assert!((modularity(&graph, &[0, 0]) - 0.0).abs() < 1e-9);
/// ```
pub fn modularity<N, E>(graph: &UnGraph<N, E>, labels: &[usize]) -> f64 {
    let m = graph.edge_count() as f64;
    if m == 0.0 || labels.len() != graph.node_count() {
        return 0.0;
    }

    let n_communities = labels.iter().copied().max().map_or(0, |label| label + 1);
    let mut internal = vec![0.0f64; n_communities];
    let mut degree_sum = vec![0.0f64; n_communities];

    for edge in graph.edge_references() {
        let u = edge.source().index();
        let v = edge.target().index();
        degree_sum[labels[u]] += 1.0;
        if u != v {
            degree_sum[labels[v]] += 1.0;
        }
        if labels[u] == labels[v] {
            internal[labels[u]] += 1.0;
        }
    }

    let two_m = 2.0 * m;
    (0..n_communities)
        .map(|c| internal[c] / m - (degree_sum[c] / two_m).powi(2))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_triangles_with_bridge() -> UnGraph<(), ()> {
        let mut graph = UnGraph::new_undirected();
        let nodes: Vec<_> = (0..6).map(|_| graph.add_node(())).collect();
        for (i, j) in [(0, 1), (1, 2), (0, 2), (3, 4), (4, 5), (3, 5), (2, 3)] {
            graph.add_edge(nodes[i], nodes[j], ());
        }
        graph
    }

    #[test]
    fn test_modularity_of_good_partition_is_positive() {
        let graph = two_triangles_with_bridge();
        let q = modularity(&graph, &[0, 0, 0, 1, 1, 1]);
        assert!(q > 0.3);
    }

    #[test]
    fn test_modularity_of_single_community_is_zero() {
        let graph = two_triangles_with_bridge();
        let q = modularity(&graph, &[0, 0, 0, 0, 0, 0]);
        assert!(q.abs() < 1e-9);
    }

    #[test]
    fn test_modularity_of_singletons_is_negative() {
        let graph = two_triangles_with_bridge();
        let q = modularity(&graph, &[0, 1, 2, 3, 4, 5]);
        assert!(q < 0.0);
    }

    #[test]
    fn test_modularity_of_edgeless_graph_is_zero() {
        let mut graph = UnGraph::<(), ()>::new_undirected();
        graph.add_node(());
        graph.add_node(());
        assert_eq!(modularity(&graph, &[0, 1]), 0.0);
    }

    #[test]
    fn test_modularity_rejects_wrong_label_length() {
        let graph = two_triangles_with_bridge();
        assert_eq!(modularity(&graph, &[0, 0]), 0.0);
    }
}
