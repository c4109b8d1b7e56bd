//! Layer partitions, label propagation and partition quality

pub mod metrics;
pub mod propagation;

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

/// Assignment of an opaque cluster label to every node of one layer
///
/// Labels are not contiguous and are only comparable within one partition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Partition {
    labels: Vec<u32>,
}

impl Partition {
    /// Every node in its own cluster, labelled by its id
    pub fn singletons(node_count: usize) -> Self {
        Self {
            labels: (0..node_count as u32).collect(),
        }
    }

    pub fn from_labels(labels: Vec<u32>) -> Self {
        Self { labels }
    }

    pub fn label(&self, node: usize) -> u32 {
        self.labels[node]
    }

    pub fn set_label(&mut self, node: usize, label: u32) {
        self.labels[node] = label;
    }

    pub fn labels(&self) -> &[u32] {
        &self.labels
    }

    pub fn into_labels(self) -> Vec<u32> {
        self.labels
    }

    /// Number of nodes covered
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Cluster label -> number of members
    pub fn subset_sizes(&self) -> BTreeMap<u32, usize> {
        let mut sizes = BTreeMap::new();
        for &label in &self.labels {
            *sizes.entry(label).or_insert(0) += 1;
        }
        sizes
    }

    pub fn number_of_subsets(&self) -> usize {
        self.subset_sizes().len()
    }

    /// Members of the cluster with the given label, in ascending id order
    pub fn members(&self, label: u32) -> Vec<u32> {
        self.labels
            .iter()
            .enumerate()
            .filter(|&(_, &l)| l == label)
            .map(|(node, _)| node as u32)
            .collect()
    }

    /// Same clustering relabelled to `0..k` in order of first appearance
    pub fn compact(&self) -> Self {
        let mut relabel: HashMap<u32, u32> = HashMap::new();
        let labels = self
            .labels
            .iter()
            .map(|&label| {
                let next = relabel.len() as u32;
                *relabel.entry(label).or_insert(next)
            })
            .collect();
        Self { labels }
    }
}
