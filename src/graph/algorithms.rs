//! Single-graph algorithms
//!
//! These run on one (materialized) layer. The multiplex algorithms reduce to
//! them for a single layer and reuse their shared kernels.

use std::collections::VecDeque;

use itertools::Itertools;
use rayon::prelude::*;

use crate::cluster::Partition;
use crate::graph::Topology;

/// Degree of every node
pub fn degrees(graph: &Topology) -> Vec<u32> {
    (0..graph.node_count())
        .map(|u| graph.degree(u) as u32)
        .collect()
}

/// Local clustering coefficient from a triangle count and a degree
///
/// `c = 2 * triangles / (degree * (degree - 1))`, and 0 when `degree < 2`.
/// Every clustering strategy goes through this function so that equal
/// counts give bit-identical coefficients.
pub fn local_coefficient(triangles: u64, degree: u64) -> f64 {
    if degree < 2 {
        return 0.0;
    }
    2.0 * triangles as f64 / (degree * (degree - 1)) as f64
}

/// Exact local clustering coefficients by triangle counting
///
/// For each node `u`, every neighbor `v` contributes `|N(u) ∩ N(v)|`; each
/// triangle through `u` is seen once from each of its two other corners.
pub fn clustering_coefficients(graph: &Topology) -> Vec<f64> {
    (0..graph.node_count())
        .into_par_iter()
        .map(|u| {
            let neighbors = graph.neighbors(u);
            let closed: u64 = neighbors
                .iter()
                .map(|&v| sorted_intersection_count(neighbors, graph.neighbors(v as usize)))
                .sum();
            local_coefficient(closed / 2, neighbors.len() as u64)
        })
        .collect()
}

/// Local clustering coefficients by enumerating unordered neighbor pairs
///
/// Every pair `(i, j)` of neighbors of `u` is tested for an edge once, so
/// each triangle is counted exactly once per corner.
pub fn clustering_coefficients_neighbor_comb(graph: &Topology) -> Vec<f64> {
    (0..graph.node_count())
        .into_par_iter()
        .map(|u| {
            let neighbors = graph.neighbors(u);
            if neighbors.len() < 2 {
                return 0.0;
            }
            let triangles = neighbors
                .iter()
                .tuple_combinations()
                .filter(|&(&i, &j)| graph.has_edge(i as usize, j))
                .count();
            local_coefficient(triangles as u64, neighbors.len() as u64)
        })
        .collect()
}

fn sorted_intersection_count(a: &[u32], b: &[u32]) -> u64 {
    let (mut i, mut j, mut count) = (0, 0, 0);
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                count += 1;
                i += 1;
                j += 1;
            }
        }
    }
    count
}

/// Reusable buffers for one single-source shortest-path accumulation (Brandes)
pub(crate) struct ShortestPathDag {
    /// BFS distance from the source, `u32::MAX` if unvisited
    distance: Vec<u32>,
    /// Number of shortest paths from the source
    paths: Vec<f64>,
    parents: Vec<Vec<u32>>,
    /// Visited nodes in BFS discovery order
    order: Vec<u32>,
    dependency: Vec<f64>,
    queue: VecDeque<u32>,
}

impl ShortestPathDag {
    pub(crate) fn new(node_count: usize) -> Self {
        Self {
            distance: vec![u32::MAX; node_count],
            paths: vec![0.0; node_count],
            parents: vec![Vec::new(); node_count],
            order: Vec::with_capacity(node_count),
            dependency: vec![0.0; node_count],
            queue: VecDeque::new(),
        }
    }

    /// BFS from `source` over `neighbors`, then add every visited node's
    /// dependency into `scores` in order of decreasing distance
    pub(crate) fn accumulate<F, I>(&mut self, source: usize, neighbors: F, scores: &mut [f64])
    where
        F: Fn(usize) -> I,
        I: Iterator<Item = u32>,
    {
        // only nodes touched by the previous run need resetting
        for &v in &self.order {
            let v = v as usize;
            self.distance[v] = u32::MAX;
            self.paths[v] = 0.0;
            self.parents[v].clear();
            self.dependency[v] = 0.0;
        }
        self.order.clear();

        self.distance[source] = 0;
        self.paths[source] = 1.0;
        self.queue.push_back(source as u32);

        while let Some(v) = self.queue.pop_front() {
            let v_idx = v as usize;
            self.order.push(v);
            let next = self.distance[v_idx] + 1;

            for w in neighbors(v_idx) {
                let w_idx = w as usize;
                if self.distance[w_idx] == u32::MAX {
                    self.distance[w_idx] = next;
                    self.queue.push_back(w);
                }
                if self.distance[w_idx] == next {
                    self.paths[w_idx] += self.paths[v_idx];
                    self.parents[w_idx].push(v);
                }
            }
        }

        for &w in self.order.iter().rev() {
            let w_idx = w as usize;
            for &v in &self.parents[w_idx] {
                let v_idx = v as usize;
                self.dependency[v_idx] +=
                    self.paths[v_idx] / self.paths[w_idx] * (1.0 + self.dependency[w_idx]);
            }
            if w_idx != source {
                scores[w_idx] += self.dependency[w_idx];
            }
        }
    }
}

/// Undirected betweenness: every unordered pair counted once
pub(crate) fn halve_undirected(scores: &mut [f64]) {
    for score in scores {
        *score /= 2.0;
    }
}

/// Unnormalized betweenness centrality of every node
pub fn betweenness(graph: &Topology) -> Vec<f64> {
    let n = graph.node_count();
    let mut scores = vec![0.0; n];
    let mut dag = ShortestPathDag::new(n);

    for source in 0..n {
        if graph.degree(source) == 0 {
            continue;
        }
        dag.accumulate(source, |v| graph.neighbors(v).iter().copied(), &mut scores);
    }

    halve_undirected(&mut scores);
    scores
}

/// Most frequent label among `candidates`
///
/// The current label wins any tie it is part of; otherwise the smallest of
/// the tied labels is chosen. With no candidates the current label is kept.
pub(crate) fn heaviest_label(candidates: &mut [u32], current: u32) -> u32 {
    candidates.sort_unstable();

    let mut best = current;
    let mut best_count = 0;
    let mut current_count = 0;
    for (count, &label) in candidates.iter().dedup_with_count() {
        if label == current {
            current_count = count;
        }
        // ascending order: strict comparison keeps the smallest tied label
        if count > best_count {
            best = label;
            best_count = count;
        }
    }

    if current_count == best_count {
        current
    } else {
        best
    }
}

/// Label propagation on one graph, starting from singleton labels
///
/// Returns the partition and the number of rounds executed.
pub fn label_propagation(graph: &Topology, update_threshold: usize) -> (Partition, usize) {
    label_propagation_from(graph, Partition::singletons(graph.node_count()), update_threshold)
}

/// Label propagation on one graph from the given initial labels
///
/// Nodes are visited in ascending id order and labels are updated in place.
/// A node stays active only while it keeps changing; a change re-activates
/// its neighbors. Rounds stop once the number of changes in the last round
/// is at most `update_threshold`, or no node is active.
pub fn label_propagation_from(
    graph: &Topology,
    initial: Partition,
    update_threshold: usize,
) -> (Partition, usize) {
    let n = graph.node_count();
    let mut labels = initial;
    let mut active: Vec<bool> = (0..n).map(|v| graph.degree(v) > 0).collect();
    let mut candidates = Vec::new();

    let mut updated = usize::MAX;
    let mut rounds = 0;

    while updated > update_threshold && active.iter().any(|&a| a) {
        rounds += 1;
        updated = 0;

        for v in 0..n {
            if !active[v] {
                continue;
            }

            candidates.clear();
            candidates.extend(graph.neighbors(v).iter().map(|&w| labels.label(w as usize)));
            let current = labels.label(v);
            let heaviest = heaviest_label(&mut candidates, current);

            if heaviest == current {
                active[v] = false;
            } else {
                labels.set_label(v, heaviest);
                updated += 1;
                for &w in graph.neighbors(v) {
                    active[w as usize] = true;
                }
            }
        }

        log::debug!("Label propagation round {}: {} updates", rounds, updated);
    }

    (labels, rounds)
}
