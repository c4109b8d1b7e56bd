//! Aggregate graphs collapsing all layers into one weighted graph
//!
//! Both builders keep the node set and numbering of the shared topology and
//! score every topology edge exactly once.

use petgraph::graph::{NodeIndex, UnGraph};
use rayon::prelude::*;

use crate::graph::{LayerRow, LayeredGraph};

/// Fraction of shared layers relative to the busier endpoint
///
/// `c_uv / max(c_u, c_v)`, 0 when both endpoints exist in no layer.
pub fn coexistence_score(count_u: usize, count_v: usize, count_uv: usize) -> f64 {
    let max_count = count_u.max(count_v);
    if max_count == 0 {
        return 0.0;
    }
    count_uv as f64 / max_count as f64
}

/// Pearson correlation of two 0/1 layer vectors, rescaled to `[0, 1]`
///
/// The correlation is taken as 0 when either vector is constant (all zeros
/// or all ones), which gives the rescaled score 0.5.
pub fn correlation_score(count_u: usize, count_v: usize, count_uv: usize, layers: usize) -> f64 {
    let constant = |c: usize| c == 0 || c == layers;
    let correlation = if constant(count_u) || constant(count_v) {
        0.0
    } else {
        let (n, cu, cv, cuv) = (layers as i64, count_u as i64, count_v as i64, count_uv as i64);
        let numerator = n * cuv - cu * cv;
        let denominator = (n * cu - cu * cu) * (n * cv - cv * cv);
        numerator as f64 / (denominator as f64).sqrt()
    };
    (0.5 + 0.5 * correlation).clamp(0.0, 1.0)
}

/// Graph whose edge weights are [`coexistence_score`] of the endpoint bitsets
pub fn coexistence_graph(graph: &LayeredGraph) -> UnGraph<(), f64> {
    log::info!("Building coexistence-count graph");
    weighted_aggregate(graph, |u, v| {
        coexistence_score(u.count(), v.count(), u.and_count(v))
    })
}

/// Graph whose edge weights are [`correlation_score`] of the endpoint bitsets
pub fn correlation_graph(graph: &LayeredGraph) -> UnGraph<(), f64> {
    log::info!("Building correlation graph");
    let layers = graph.layer_count();
    weighted_aggregate(graph, |u, v| {
        correlation_score(u.count(), v.count(), u.and_count(v), layers)
    })
}

fn weighted_aggregate<F>(graph: &LayeredGraph, score: F) -> UnGraph<(), f64>
where
    F: Fn(LayerRow<'_>, LayerRow<'_>) -> f64 + Sync + Send,
{
    let edges: Vec<(u32, u32)> = graph.topology().edges().collect();
    let weights: Vec<f64> = edges
        .par_iter()
        .map(|&(u, v)| score(graph.layers_of(u as usize), graph.layers_of(v as usize)))
        .collect();

    let mut result = UnGraph::with_capacity(graph.node_count(), edges.len());
    for _ in 0..graph.node_count() {
        result.add_node(());
    }
    for (&(u, v), weight) in edges.iter().zip(weights) {
        result.add_edge(NodeIndex::new(u as usize), NodeIndex::new(v as usize), weight);
    }
    result
}
