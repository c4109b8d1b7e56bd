//! Betweenness centrality per layer

use rayon::prelude::*;

use crate::config::Strategy;
use crate::graph::algorithms::{self, halve_undirected, ShortestPathDag};
use crate::graph::LayeredGraph;

/// Betweenness `[layer][node]`; only [`Strategy::Vectorized`] avoids materializing layers
pub fn betweenness(graph: &LayeredGraph, strategy: Strategy) -> Vec<Vec<f64>> {
    match strategy {
        Strategy::Baseline | Strategy::NeighborCombination => betweenness_baseline(graph),
        Strategy::Vectorized => betweenness_multiplex(graph),
    }
}

/// Brandes on every materialized layer, in parallel across layers
pub fn betweenness_baseline(graph: &LayeredGraph) -> Vec<Vec<f64>> {
    log::info!(
        "Betweenness (materialized) over {} layers",
        graph.layer_count()
    );
    graph.par_map_layers(|subgraph, _| algorithms::betweenness(subgraph))
}

/// Brandes on the shared topology with traversal restricted to each layer
///
/// Sources absent from layer `t` are skipped, and an edge `(v, w)` is only
/// followed if `w` exists in `t`. Since every visited node exists in `t`,
/// this is exactly the layer-induced subgraph.
pub fn betweenness_multiplex(graph: &LayeredGraph) -> Vec<Vec<f64>> {
    log::info!(
        "Betweenness (multiplex) over {} layers",
        graph.layer_count()
    );
    let n = graph.node_count();
    let topology = graph.topology();
    let existence = graph.existence();

    (0..graph.layer_count())
        .into_par_iter()
        .map(|layer| {
            let mut scores = vec![0.0; n];
            let mut dag = ShortestPathDag::new(n);

            for source in 0..n {
                if !existence.contains(source, layer) {
                    continue;
                }
                dag.accumulate(
                    source,
                    |v| {
                        topology
                            .neighbors(v)
                            .iter()
                            .copied()
                            .filter(move |&w| existence.contains(w as usize, layer))
                    },
                    &mut scores,
                );
            }

            halve_undirected(&mut scores);
            scores
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_with_missing_center() {
        let graph = LayeredGraph::from_parts(
            3,
            &[(0, 1), (1, 2)],
            &[vec![true, true], vec![true, false], vec![true, true]],
        )
        .unwrap();

        let expected = vec![vec![0.0, 1.0, 0.0], vec![0.0; 3]];
        assert_eq!(betweenness_baseline(&graph), expected);
        assert_eq!(betweenness_multiplex(&graph), expected);
    }

    #[test]
    fn test_strategies_agree() {
        // two 4-cycles joined by a bridge, with layer gaps
        let edges = [
            (0, 1),
            (1, 2),
            (2, 3),
            (3, 0),
            (3, 4),
            (4, 5),
            (5, 6),
            (6, 7),
            (7, 4),
        ];
        let existence = [
            vec![true, true, false],
            vec![true, false, true],
            vec![true, true, true],
            vec![true, true, true],
            vec![true, true, false],
            vec![true, false, true],
            vec![true, true, true],
            vec![false, true, true],
        ];
        let graph = LayeredGraph::from_parts(8, &edges, &existence).unwrap();

        let baseline = betweenness_baseline(&graph);
        let multiplex = betweenness_multiplex(&graph);
        assert_eq!(baseline, multiplex);
        assert_eq!(betweenness(&graph, Strategy::Baseline), baseline);
        assert_eq!(betweenness(&graph, Strategy::Vectorized), multiplex);
    }

    #[test]
    fn test_isolated_nodes_score_zero() {
        let graph = LayeredGraph::from_parts(2, &[], &[vec![true], vec![true]]).unwrap();
        assert_eq!(betweenness_multiplex(&graph), vec![vec![0.0, 0.0]]);
    }
}
