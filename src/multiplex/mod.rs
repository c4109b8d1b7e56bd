//! Algorithms computed directly on the multiplexed representation
//!
//! Each family offers a materialize-and-run baseline next to variants that
//! fold the layer dimension into one traversal of the shared topology.
//! Per-layer results are always laid out `[layer][node]`.

pub mod aggregate;
pub mod betweenness;
pub mod clustering;
pub mod degree;

pub use aggregate::{coexistence_graph, correlation_graph};
pub use betweenness::{betweenness, betweenness_baseline, betweenness_multiplex};
pub use clustering::{
    clustering_coefficients, clustering_baseline, clustering_neighbor_comb, clustering_vectorized,
};
pub use degree::{
    coexistence_degrees, layer_degrees, max_layer_degrees, neighbor_existence_range,
    NeighborExistence,
};

/// Turn per-node rows of `layers` values into per-layer columns
pub(crate) fn transpose<T: Copy>(rows: &[Vec<T>], layers: usize) -> Vec<Vec<T>> {
    (0..layers)
        .map(|t| rows.iter().map(|row| row[t]).collect())
        .collect()
}
