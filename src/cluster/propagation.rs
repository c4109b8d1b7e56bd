//! Label propagation on every layer of a multiplex graph
//!
//! Rounds stop once the largest per-layer number of label changes in the
//! last round is at most the update threshold. This is an approximate
//! convergence criterion: with a threshold above 0 some nodes may still
//! be able to change. Only a threshold of 0 guarantees a fixed point.

use fixedbitset::FixedBitSet;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::cluster::Partition;
use crate::config::Strategy;
use crate::error::{Error, Result};
use crate::graph::algorithms::{self, heaviest_label};
use crate::graph::{LayerMatrix, LayeredGraph};

/// `max(1, N / 1e5)`
pub fn default_update_threshold(node_count: usize) -> usize {
    ((node_count as f64 / 1e5) as usize).max(1)
}

/// Result of a multiplex propagation run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropagationOutcome {
    /// One partition per layer
    pub partitions: Vec<Partition>,
    /// Number of rounds executed
    pub rounds: usize,
    /// Label changes per round, per layer
    pub updates: Vec<Vec<usize>>,
}

/// Partitions of every layer with the selected strategy
pub fn label_propagation(
    graph: &LayeredGraph,
    strategy: Strategy,
    update_threshold: Option<usize>,
) -> Vec<Partition> {
    match strategy {
        Strategy::Baseline | Strategy::NeighborCombination => {
            label_propagation_baseline(graph, update_threshold)
        }
        Strategy::Vectorized => label_propagation_vec(graph, update_threshold).partitions,
    }
}

/// Single-graph propagation on each materialized layer, in parallel
pub fn label_propagation_baseline(
    graph: &LayeredGraph,
    update_threshold: Option<usize>,
) -> Vec<Partition> {
    let threshold = update_threshold.unwrap_or_else(|| default_update_threshold(graph.node_count()));
    log::info!(
        "Label propagation (materialized) over {} layers, threshold {}",
        graph.layer_count(),
        threshold
    );

    graph.par_map_layers(|subgraph, layer| {
        let (partition, rounds) = algorithms::label_propagation(subgraph, threshold);
        log::debug!("Layer {} converged after {} rounds", layer, rounds);
        partition
    })
}

/// All layers in one pass per round, starting from singleton labels
pub fn label_propagation_vec(
    graph: &LayeredGraph,
    update_threshold: Option<usize>,
) -> PropagationOutcome {
    let threshold = update_threshold.unwrap_or_else(|| default_update_threshold(graph.node_count()));
    let mut propagation = Propagation::new(graph);
    propagation.run(threshold);
    propagation.into_outcome()
}

/// All layers in one pass per round, from the given per-layer labels
///
/// # Errors
///
/// [`Error::PartitionCountMismatch`] unless there is exactly one partition
/// per layer, and [`Error::PartitionSizeMismatch`] if a partition does not
/// cover every node.
pub fn label_propagation_vec_from(
    graph: &LayeredGraph,
    initial: Vec<Partition>,
    update_threshold: Option<usize>,
) -> Result<PropagationOutcome> {
    let threshold = update_threshold.unwrap_or_else(|| default_update_threshold(graph.node_count()));
    let mut propagation = Propagation::from_partitions(graph, initial)?;
    propagation.run(threshold);
    Ok(propagation.into_outcome())
}

/// Vectorized propagation state that can be advanced round by round
///
/// Nodes are visited in ascending id order and each node's labels in all
/// layers are updated in place after one scan of its neighbor list.
///
/// `active` holds one bitset per node; bit `t` is set while the node may
/// still change in layer `t`. It is always a subset of the existence bits
/// and carries over between calls to [`run`](Self::run) and
/// [`round`](Self::round).
#[derive(Debug)]
pub struct Propagation<'g> {
    graph: &'g LayeredGraph,
    labels: Vec<Vec<u32>>,
    active: LayerMatrix,
    history: Vec<Vec<usize>>,
    buckets: Vec<Vec<u32>>,
    pending: Vec<usize>,
    changed: FixedBitSet,
}

impl<'g> Propagation<'g> {
    /// Singleton labels in every layer
    pub fn new(graph: &'g LayeredGraph) -> Self {
        let labels = (0..graph.layer_count())
            .map(|_| Partition::singletons(graph.node_count()).into_labels())
            .collect();
        Self::with_labels(graph, labels)
    }

    /// Start from one partition per layer
    ///
    /// # Errors
    ///
    /// [`Error::PartitionCountMismatch`] or [`Error::PartitionSizeMismatch`]
    /// if `initial` does not match the graph shape.
    pub fn from_partitions(graph: &'g LayeredGraph, initial: Vec<Partition>) -> Result<Self> {
        if initial.len() != graph.layer_count() {
            return Err(Error::PartitionCountMismatch {
                partitions: initial.len(),
                layers: graph.layer_count(),
            });
        }
        if let Some(partition) = initial.iter().find(|p| p.len() != graph.node_count()) {
            return Err(Error::PartitionSizeMismatch {
                partition: partition.len(),
                nodes: graph.node_count(),
            });
        }

        let labels = initial.into_iter().map(Partition::into_labels).collect();
        Ok(Self::with_labels(graph, labels))
    }

    fn with_labels(graph: &'g LayeredGraph, labels: Vec<Vec<u32>>) -> Self {
        let layers = graph.layer_count();
        Self {
            graph,
            labels,
            active: initial_active(graph),
            history: Vec::new(),
            buckets: vec![Vec::new(); layers],
            pending: Vec::with_capacity(layers),
            changed: FixedBitSet::with_capacity(layers),
        }
    }

    /// True once no node can change in any layer
    pub fn is_settled(&self) -> bool {
        !self.active.any()
    }

    pub fn rounds(&self) -> usize {
        self.history.len()
    }

    /// Label changes per round, per layer
    pub fn history(&self) -> &[Vec<usize>] {
        &self.history
    }

    /// Run rounds until the largest per-layer change count of the last one
    /// is at most `threshold`, or no node is active
    ///
    /// Returns the number of rounds executed by this call.
    pub fn run(&mut self, threshold: usize) -> usize {
        log::info!(
            "Label propagation (vectorized) over {} nodes, {} layers, threshold {}",
            self.graph.node_count(),
            self.graph.layer_count(),
            threshold
        );

        let start = self.rounds();
        let mut max_updates = usize::MAX;
        while max_updates > threshold && !self.is_settled() {
            max_updates = self.round().into_iter().max().unwrap_or(0);
        }

        log::info!("Label propagation finished after {} rounds", self.rounds());
        self.rounds() - start
    }

    /// Execute one round and return its label changes per layer
    pub fn round(&mut self) -> Vec<usize> {
        let graph = self.graph;
        let topology = graph.topology();
        let mut updates = vec![0usize; graph.layer_count()];

        for v in 0..graph.node_count() {
            self.pending.clear();
            self.pending.extend(self.active.row(v).ones());
            if self.pending.is_empty() {
                continue;
            }

            for &t in &self.pending {
                self.buckets[t].clear();
            }
            let own = self.active.row(v);
            for &w in topology.neighbors(v) {
                for t in own.and(graph.layers_of(w as usize)) {
                    self.buckets[t].push(self.labels[t][w as usize]);
                }
            }

            self.changed.clear();
            for &t in &self.pending {
                let current = self.labels[t][v];
                let heaviest = heaviest_label(&mut self.buckets[t], current);
                if heaviest == current {
                    self.active.remove(v, t);
                } else {
                    self.labels[t][v] = heaviest;
                    updates[t] += 1;
                    self.changed.insert(t);
                }
            }

            if !self.changed.is_clear() {
                for &w in topology.neighbors(v) {
                    let w = w as usize;
                    for t in self.changed.intersection(graph.layers_of(w).bits()) {
                        self.active.insert(w, t);
                    }
                }
            }
        }

        log::debug!(
            "Label propagation round {}: max {} updates in a layer, {} in total",
            self.history.len() + 1,
            updates.iter().copied().max().unwrap_or(0),
            updates.iter().sum::<usize>()
        );
        self.history.push(updates.clone());
        updates
    }

    /// Current labels as one partition per layer
    pub fn partitions(&self) -> Vec<Partition> {
        self.labels.iter().cloned().map(Partition::from_labels).collect()
    }

    pub fn into_outcome(self) -> PropagationOutcome {
        PropagationOutcome {
            rounds: self.history.len(),
            partitions: self.labels.into_iter().map(Partition::from_labels).collect(),
            updates: self.history,
        }
    }
}

/// Node `u` starts active in layer `t` iff it has a neighbor in `t`
fn initial_active(graph: &LayeredGraph) -> LayerMatrix {
    let rows: Vec<FixedBitSet> = (0..graph.node_count())
        .into_par_iter()
        .map(|u| {
            let own = graph.layers_of(u);
            let mut row = FixedBitSet::with_capacity(graph.layer_count());
            for &v in graph.topology().neighbors(u) {
                row.extend(own.and(graph.layers_of(v as usize)));
            }
            row
        })
        .collect();

    let mut active = LayerMatrix::new(graph.node_count(), graph.layer_count());
    for (u, row) in rows.into_iter().enumerate() {
        active.set_row(u, row);
    }
    active
}
