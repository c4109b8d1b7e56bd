//! Degree and coexistence statistics across layers

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::graph::LayeredGraph;
use crate::multiplex::transpose;

/// Per-layer degree of every node, `[layer][node]`
///
/// One parallel pass over nodes; every edge scatters into the counters of
/// the layers where it is active.
pub fn layer_degrees(graph: &LayeredGraph) -> Vec<Vec<u32>> {
    log::info!(
        "Computing layer degrees over {} layers",
        graph.layer_count()
    );
    let rows: Vec<Vec<u32>> = (0..graph.node_count())
        .into_par_iter()
        .map(|u| node_layer_degrees(graph, u))
        .collect();
    transpose(&rows, graph.layer_count())
}

fn node_layer_degrees(graph: &LayeredGraph, u: usize) -> Vec<u32> {
    let mut degrees = vec![0u32; graph.layer_count()];
    let own = graph.layers_of(u);
    for &v in graph.topology().neighbors(u) {
        for t in own.and(graph.layers_of(v as usize)) {
            degrees[t] += 1;
        }
    }
    degrees
}

/// For every node, the maximum of its per-layer degrees (0 with no layers)
pub fn max_layer_degrees(graph: &LayeredGraph) -> Vec<u32> {
    (0..graph.node_count())
        .into_par_iter()
        .map(|u| {
            node_layer_degrees(graph, u)
                .into_iter()
                .max()
                .unwrap_or(0)
        })
        .collect()
}

/// For every node, the number of neighbors sharing at least one layer with it
pub fn coexistence_degrees(graph: &LayeredGraph) -> Vec<u32> {
    (0..graph.node_count())
        .into_par_iter()
        .map(|u| {
            let own = graph.layers_of(u);
            graph
                .topology()
                .neighbors(u)
                .iter()
                .filter(|&&v| own.intersects(graph.layers_of(v as usize)))
                .count() as u32
        })
        .collect()
}

/// Minimum and maximum existence count among coexisting neighbors
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NeighborExistence {
    /// Smallest number of layers of any coexisting neighbor (layer count if none)
    pub min: Vec<u32>,
    /// Largest number of layers of any coexisting neighbor (0 if none)
    pub max: Vec<u32>,
}

/// For every node, the min/max number of layers a neighbor exists in, over
/// the neighbors that share at least one layer with the node
pub fn neighbor_existence_range(graph: &LayeredGraph) -> NeighborExistence {
    let width = graph.layer_count() as u32;
    let (min, max) = (0..graph.node_count())
        .into_par_iter()
        .map(|u| {
            let own = graph.layers_of(u);
            graph
                .topology()
                .neighbors(u)
                .iter()
                .map(|&v| graph.layers_of(v as usize))
                .filter(|theirs| own.intersects(*theirs))
                .map(|theirs| theirs.count() as u32)
                .fold((width, 0), |(lo, hi), c| (lo.min(c), hi.max(c)))
        })
        .unzip();
    NeighborExistence { min, max }
}
