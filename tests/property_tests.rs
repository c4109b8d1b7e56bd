//! Property-based tests for tissue-graph
//!
//! Strategy agreement and structural invariants on random multiplex graphs

use proptest::prelude::*;
use tissue_graph::cluster::propagation::{
    label_propagation_baseline, label_propagation_vec, label_propagation_vec_from, Propagation,
};
use tissue_graph::multiplex::{
    betweenness_baseline, betweenness_multiplex, clustering_baseline, clustering_neighbor_comb,
    clustering_vectorized, coexistence_degrees, coexistence_graph, correlation_graph,
    layer_degrees, max_layer_degrees,
};
use tissue_graph::LayeredGraph;

/// Random graph with up to 12 nodes, 5 layers and 30 candidate edges
fn prop_layered_graph() -> impl Strategy<Value = LayeredGraph> {
    (1usize..12, 1usize..6)
        .prop_flat_map(|(n, layers)| {
            (
                Just(n),
                prop::collection::vec((0..n as u32, 0..n as u32), 0..30),
                prop::collection::vec(prop::collection::vec(any::<bool>(), layers), n),
            )
        })
        .prop_map(|(n, edges, existence)| LayeredGraph::from_parts(n, &edges, &existence).unwrap())
}

// Property: the three clustering strategies agree exactly
proptest! {
    #[test]
    fn prop_clustering_strategies_agree(graph in prop_layered_graph()) {
        let baseline = clustering_baseline(&graph);
        prop_assert_eq!(&clustering_neighbor_comb(&graph), &baseline);
        prop_assert_eq!(&clustering_vectorized(&graph), &baseline);
    }
}

// Property: both betweenness strategies agree
proptest! {
    #[test]
    fn prop_betweenness_strategies_agree(graph in prop_layered_graph()) {
        let baseline = betweenness_baseline(&graph);
        let multiplex = betweenness_multiplex(&graph);
        for (a, b) in baseline.iter().flatten().zip(multiplex.iter().flatten()) {
            prop_assert!((a - b).abs() < 1e-9, "{} != {}", a, b);
        }
    }
}

// Property: coexistence degree counts neighbors with a nonzero per-layer contribution
proptest! {
    #[test]
    fn prop_coexistence_matches_layer_degrees(graph in prop_layered_graph()) {
        let coexistence = coexistence_degrees(&graph);
        let max_degree = max_layer_degrees(&graph);
        let degrees = layer_degrees(&graph);

        for u in 0..graph.node_count() {
            let expected = graph
                .topology()
                .neighbors(u)
                .iter()
                .filter(|&&v| (0..graph.layer_count()).any(|t| graph.is_edge_active(u, v as usize, t)))
                .count() as u32;
            prop_assert_eq!(coexistence[u], expected);
            prop_assert!(max_degree[u] <= coexistence[u]);

            for t in 0..graph.layer_count() {
                prop_assert_eq!(degrees[t][u] as usize, graph.subgraph(t).unwrap().degree(u));
            }
        }
    }
}

// Property: aggregate edge weights stay within [0, 1]
proptest! {
    #[test]
    fn prop_aggregate_weights_bounded(graph in prop_layered_graph()) {
        for aggregate in [coexistence_graph(&graph), correlation_graph(&graph)] {
            prop_assert_eq!(aggregate.node_count(), graph.node_count());
            prop_assert_eq!(aggregate.edge_count(), graph.edge_count());
            for &w in aggregate.edge_weights() {
                prop_assert!((0.0..=1.0).contains(&w));
            }
        }
    }
}

// Property: materialized layers keep node ids and only contain active edges
proptest! {
    #[test]
    fn prop_subgraph_contains_active_edges(graph in prop_layered_graph()) {
        for t in 0..graph.layer_count() {
            let subgraph = graph.subgraph(t).unwrap();
            prop_assert_eq!(subgraph.node_count(), graph.node_count());
            prop_assert_eq!(subgraph.edge_count(), graph.layer_edge_count(t));
            for (u, v) in subgraph.edges() {
                prop_assert!(graph.is_edge_active(u as usize, v as usize, t));
            }
        }
    }
}

// Property: with threshold 0 both strategies reach the same fixed point, and
// restarting from it changes nothing
proptest! {
    #[test]
    fn prop_label_propagation_fixed_point(graph in prop_layered_graph()) {
        let baseline = label_propagation_baseline(&graph, Some(0));
        let outcome = label_propagation_vec(&graph, Some(0));
        prop_assert_eq!(&outcome.partitions, &baseline);

        let again = label_propagation_vec_from(&graph, outcome.partitions.clone(), Some(0)).unwrap();
        prop_assert_eq!(&again.partitions, &outcome.partitions);
        prop_assert!(again.rounds <= 1);
        prop_assert!(again.updates.iter().flatten().all(|&u| u == 0));
    }
}

// Property: a run stopped at a threshold is a prefix of the exact run, so one
// more round from the preserved state is the next round of the exact run and
// continuing with threshold 0 reaches the same fixed point
proptest! {
    #[test]
    fn prop_label_propagation_continues_after_threshold(
        graph in prop_layered_graph(),
        threshold in 1usize..4,
    ) {
        let exact = label_propagation_vec(&graph, Some(0));

        let mut propagation = Propagation::new(&graph);
        let rounds = propagation.run(threshold);
        prop_assert!(rounds <= exact.rounds);
        prop_assert_eq!(propagation.history(), &exact.updates[..rounds]);
        if let Some(last) = propagation.history().last() {
            prop_assert!(last.iter().all(|&u| u <= threshold) || propagation.is_settled());
        }

        let next = propagation.round();
        let expected = exact
            .updates
            .get(rounds)
            .cloned()
            .unwrap_or_else(|| vec![0; graph.layer_count()]);
        prop_assert_eq!(next, expected);

        propagation.run(0);
        prop_assert!(propagation.is_settled());
        prop_assert_eq!(propagation.partitions(), exact.partitions);
    }
}
