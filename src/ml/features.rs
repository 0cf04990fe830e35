//! Graph featurization for exported solver models.
//!
//! Exported models consume a flattened weighted adjacency matrix in
//! row-major order, `[1, n * n]`, with node ids compacted to `0..n` by
//! their rank in the sorted node set.

use crate::domain::Graph;

/// Flatten `graph` into the row-major weighted adjacency form.
///
/// The matrix is symmetric; both `(u, v)` and `(v, u)` carry the edge
/// weight. Absent edges stay 0.
pub fn adjacency_features(graph: &Graph) -> Vec<f32> {
    let nodes = graph.nodes();
    let n = nodes.len();
    let mut features = vec![0.0f32; n * n];

    for &(u, v, w) in graph.edges() {
        let (Ok(u), Ok(v)) = (nodes.binary_search(&u), nodes.binary_search(&v)) else {
            continue;
        };
        features[u * n + v] = w as f32;
        features[v * n + u] = w as f32;
    }
    features
}
