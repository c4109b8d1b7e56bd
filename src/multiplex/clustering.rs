//! Clustering coefficients for every node in every layer

use itertools::Itertools;
use rayon::prelude::*;

use crate::config::Strategy;
use crate::graph::algorithms::{self, local_coefficient};
use crate::graph::LayeredGraph;
use crate::multiplex::transpose;

/// Clustering coefficients `[layer][node]` with the selected strategy
pub fn clustering_coefficients(graph: &LayeredGraph, strategy: Strategy) -> Vec<Vec<f64>> {
    match strategy {
        Strategy::Baseline => clustering_baseline(graph),
        Strategy::NeighborCombination => clustering_neighbor_comb(graph),
        Strategy::Vectorized => clustering_vectorized(graph),
    }
}

/// Materialize each layer and count triangles on it
pub fn clustering_baseline(graph: &LayeredGraph) -> Vec<Vec<f64>> {
    log::info!(
        "Clustering coefficients (materialized) over {} layers",
        graph.layer_count()
    );
    graph.par_map_layers(|subgraph, _| algorithms::clustering_coefficients(subgraph))
}

/// Materialize each layer and enumerate neighbor pairs on it
pub fn clustering_neighbor_comb(graph: &LayeredGraph) -> Vec<Vec<f64>> {
    log::info!(
        "Clustering coefficients (neighbor combinations) over {} layers",
        graph.layer_count()
    );
    graph.par_map_layers(|subgraph, _| algorithms::clustering_coefficients_neighbor_comb(subgraph))
}

/// All layers at once from a single pass over each node's neighbor pairs
///
/// For node `u`, the layer degree comes from `exists(u) & exists(v)` over
/// its neighbors, and every connected neighbor pair `(i, j)` adds a
/// triangle to each layer in `exists(u) & exists(i) & exists(j)`. Counters
/// are local to the node being processed.
pub fn clustering_vectorized(graph: &LayeredGraph) -> Vec<Vec<f64>> {
    log::info!(
        "Clustering coefficients (vectorized) over {} layers",
        graph.layer_count()
    );
    let layers = graph.layer_count();
    let topology = graph.topology();

    let rows: Vec<Vec<f64>> = (0..graph.node_count())
        .into_par_iter()
        .map(|u| {
            let neighbors = topology.neighbors(u);
            if neighbors.len() < 2 {
                return vec![0.0; layers];
            }

            let own = graph.layers_of(u);
            let mut degrees = vec![0u64; layers];
            let mut triangles = vec![0u64; layers];

            for &v in neighbors {
                for t in own.and(graph.layers_of(v as usize)) {
                    degrees[t] += 1;
                }
            }

            for (&i, &j) in neighbors.iter().tuple_combinations() {
                if topology.has_edge(i as usize, j) {
                    let closing = own.and3(graph.layers_of(i as usize), graph.layers_of(j as usize));
                    for t in closing {
                        triangles[t] += 1;
                    }
                }
            }

            degrees
                .iter()
                .zip(&triangles)
                .map(|(&d, &tri)| local_coefficient(tri, d))
                .collect()
        })
        .collect();

    transpose(&rows, layers)
}
