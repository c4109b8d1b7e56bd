//! Partition quality and cluster size statistics

use std::collections::{BTreeMap, HashMap};

use petgraph::graph::UnGraph;
use petgraph::visit::EdgeRef;

use crate::cluster::Partition;
use crate::error::{Error, Result};

/// Modularity contribution of every cluster
///
/// For cluster `c`: `cov(c) - (vol(c) / 2W)^2`, where `cov(c)` is the
/// fraction of the total edge weight `W` inside `c` and `vol(c)` the sum of
/// weighted degrees of its members. A self-loop adds its weight twice to the
/// volume.
///
/// # Errors
///
/// [`Error::PartitionSizeMismatch`] if the partition does not cover the graph,
/// [`Error::UndefinedModularity`] if the total edge weight is 0.
pub fn modularity_per_cluster(
    partition: &Partition,
    graph: &UnGraph<(), f64>,
) -> Result<BTreeMap<u32, f64>> {
    if partition.len() != graph.node_count() {
        return Err(Error::PartitionSizeMismatch {
            partition: partition.len(),
            nodes: graph.node_count(),
        });
    }

    let total_weight: f64 = graph.edge_weights().sum();
    if total_weight == 0.0 {
        return Err(Error::UndefinedModularity);
    }

    let mut volume: HashMap<u32, f64> = HashMap::new();
    let mut intra: HashMap<u32, f64> = HashMap::new();
    for edge in graph.edge_references() {
        let (u, v, weight) = (edge.source().index(), edge.target().index(), *edge.weight());
        let (c, d) = (partition.label(u), partition.label(v));

        if u == v {
            *volume.entry(c).or_insert(0.0) += 2.0 * weight;
        } else {
            *volume.entry(c).or_insert(0.0) += weight;
            *volume.entry(d).or_insert(0.0) += weight;
        }
        if c == d {
            *intra.entry(c).or_insert(0.0) += weight;
        }
    }

    Ok(partition
        .subset_sizes()
        .into_keys()
        .map(|label| {
            let coverage = intra.get(&label).copied().unwrap_or(0.0) / total_weight;
            let incident = volume.get(&label).copied().unwrap_or(0.0) / total_weight / 2.0;
            (label, coverage - incident * incident)
        })
        .collect())
}

/// Total modularity of a partition
pub fn modularity(partition: &Partition, graph: &UnGraph<(), f64>) -> Result<f64> {
    Ok(modularity_per_cluster(partition, graph)?.values().sum())
}

/// Cluster size -> number of clusters of that size, over all partitions
pub fn cluster_size_histogram(partitions: &[Partition]) -> BTreeMap<usize, usize> {
    let mut histogram = BTreeMap::new();
    for partition in partitions {
        for size in partition.subset_sizes().into_values() {
            *histogram.entry(size).or_insert(0) += 1;
        }
    }
    histogram
}

/// Expected size of the cluster containing a uniformly chosen node
pub fn weighted_mean_cluster_size(partition: &Partition) -> f64 {
    if partition.is_empty() {
        return 0.0;
    }
    let squares: usize = partition.subset_sizes().values().map(|&s| s * s).sum();
    squares as f64 / partition.len() as f64
}

/// Size of the cluster containing the median node when nodes are ordered by cluster size
pub fn weighted_median_cluster_size(partition: &Partition) -> usize {
    let mut sizes: Vec<usize> = partition.subset_sizes().into_values().collect();
    sizes.sort_unstable();

    let half = partition.len() as f64 / 2.0;
    let mut covered = 0;
    for &size in &sizes {
        covered += size;
        if covered as f64 >= half {
            return size;
        }
    }
    sizes.last().copied().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Topology;

    /// Two triangles joined by the edge 2-3
    fn barbell() -> UnGraph<(), f64> {
        Topology::from_edges(6, &[(0, 1), (1, 2), (0, 2), (3, 4), (4, 5), (3, 5), (2, 3)])
            .unwrap()
            .to_weighted()
    }

    #[test]
    fn test_modularity_of_natural_split() {
        let graph = barbell();
        let partition = Partition::from_labels(vec![8, 8, 8, 1, 1, 1]);

        let per_cluster = modularity_per_cluster(&partition, &graph).unwrap();
        let expected = 3.0 / 7.0 - 0.25;
        assert_eq!(per_cluster.len(), 2);
        assert!((per_cluster[&8] - expected).abs() < 1e-12);
        assert!((per_cluster[&1] - expected).abs() < 1e-12);

        let total = modularity(&partition, &graph).unwrap();
        assert!((total - (6.0 / 7.0 - 0.5)).abs() < 1e-12);
    }

    #[test]
    fn test_single_cluster_has_zero_modularity() {
        let graph = barbell();
        let total = modularity(&Partition::from_labels(vec![0; 6]), &graph).unwrap();
        assert!(total.abs() < 1e-12);
    }

    #[test]
    fn test_self_loop_counts_twice_in_volume() {
        let mut graph = UnGraph::<(), f64>::new_undirected();
        let a = graph.add_node(());
        let b = graph.add_node(());
        graph.add_edge(a, a, 1.0);
        graph.add_edge(a, b, 1.0);

        let per_cluster =
            modularity_per_cluster(&Partition::from_labels(vec![0, 1]), &graph).unwrap();
        // W = 2, vol(0) = 3, vol(1) = 1
        assert!((per_cluster[&0] - (0.5 - 0.5625)).abs() < 1e-12);
        assert!((per_cluster[&1] - (0.0 - 0.0625)).abs() < 1e-12);
    }

    #[test]
    fn test_modularity_errors() {
        let empty = Topology::empty(3).to_weighted();
        assert!(matches!(
            modularity(&Partition::singletons(3), &empty),
            Err(Error::UndefinedModularity)
        ));
        assert!(matches!(
            modularity(&Partition::singletons(2), &barbell()),
            Err(Error::PartitionSizeMismatch {
                partition: 2,
                nodes: 6
            })
        ));
    }

    #[test]
    fn test_cluster_sizes() {
        let a = Partition::from_labels(vec![0, 0, 0, 1, 2, 2]);
        let b = Partition::singletons(2);

        let histogram = cluster_size_histogram(&[a.clone(), b]);
        assert_eq!(histogram, BTreeMap::from([(1, 3), (2, 1), (3, 1)]));

        // (9 + 1 + 4) / 6
        assert!((weighted_mean_cluster_size(&a) - 14.0 / 6.0).abs() < 1e-12);
        assert_eq!(weighted_median_cluster_size(&a), 2);
        assert_eq!(weighted_median_cluster_size(&Partition::from_labels(vec![])), 0);
        assert_eq!(weighted_mean_cluster_size(&Partition::from_labels(vec![])), 0.0);
    }
}
