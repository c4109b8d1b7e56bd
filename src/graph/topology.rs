//! Memory-efficient undirected graph representation

use std::mem;

use petgraph::graph::{NodeIndex, UnGraph};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Compressed sparse representation of an undirected simple graph
///
/// Every edge `{u, v}` is stored twice, once in the adjacency of each
/// endpoint. Adjacency lists are sorted, which keeps neighbor iteration
/// deterministic and allows binary-search edge lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topology {
    /// Number of nodes in the graph
    node_count: usize,

    /// Offset array: `offsets[i]..offsets[i+1]` is the neighbor range of node i
    offsets: Vec<u32>,

    /// Concatenated, sorted neighbor lists
    adjacency: Vec<u32>,

    /// Number of undirected edges
    edge_count: usize,
}

impl Topology {
    /// Create a graph with `node_count` nodes and no edges
    pub fn empty(node_count: usize) -> Self {
        Self {
            node_count,
            offsets: vec![0; node_count + 1],
            adjacency: Vec::new(),
            edge_count: 0,
        }
    }

    /// Build a graph from an undirected edge list
    ///
    /// Self-loops and repeated edges (in either orientation) are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NodeOutOfRange`] if an endpoint is `>= node_count`.
    pub fn from_edges(node_count: usize, edges: &[(u32, u32)]) -> Result<Self> {
        let mut adjacency_lists: Vec<Vec<u32>> = vec![Vec::new(); node_count];
        let mut self_loops = 0usize;

        for &(u, v) in edges {
            for node in [u, v] {
                if node as usize >= node_count {
                    return Err(Error::NodeOutOfRange {
                        node: node as usize,
                        node_count,
                    });
                }
            }
            if u == v {
                self_loops += 1;
                continue;
            }
            adjacency_lists[u as usize].push(v);
            adjacency_lists[v as usize].push(u);
        }

        if self_loops > 0 {
            log::warn!("Dropped {} self-loops from edge list", self_loops);
        }

        let graph = Self::from_adjacency_lists(adjacency_lists);

        let duplicates = edges.len() - self_loops - graph.edge_count;
        if duplicates > 0 {
            log::warn!("Dropped {} duplicate edges from edge list", duplicates);
        }

        Ok(graph)
    }

    /// Build the CSR arrays from per-node neighbor lists (sorted and deduplicated here)
    pub(crate) fn from_adjacency_lists(mut adjacency_lists: Vec<Vec<u32>>) -> Self {
        let node_count = adjacency_lists.len();
        let mut offsets = Vec::with_capacity(node_count + 1);
        offsets.push(0);

        for list in &mut adjacency_lists {
            list.sort_unstable();
            list.dedup();
        }

        let total: usize = adjacency_lists.iter().map(Vec::len).sum();
        let mut adjacency = Vec::with_capacity(total);
        let mut offset = 0u32;
        for list in &adjacency_lists {
            offset += list.len() as u32;
            offsets.push(offset);
            adjacency.extend_from_slice(list);
        }

        Self {
            node_count,
            offsets,
            edge_count: total / 2,
            adjacency,
        }
    }

    /// Get the sorted neighbors of a node
    pub fn neighbors(&self, node: usize) -> &[u32] {
        let start = self.offsets[node] as usize;
        let end = self.offsets[node + 1] as usize;
        &self.adjacency[start..end]
    }

    /// Check if the undirected edge `{u, v}` exists
    pub fn has_edge(&self, u: usize, v: u32) -> bool {
        self.neighbors(u).binary_search(&v).is_ok()
    }

    pub fn degree(&self, node: usize) -> usize {
        (self.offsets[node + 1] - self.offsets[node]) as usize
    }

    pub fn node_count(&self) -> usize {
        self.node_count
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Iterate every undirected edge once as `(u, v)` with `u < v`
    pub fn edges(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        (0..self.node_count).flat_map(move |u| {
            self.neighbors(u)
                .iter()
                .filter(move |&&v| (u as u32) < v)
                .map(move |&v| (u as u32, v))
        })
    }

    /// Copy of this graph keeping only the edges accepted by `keep`
    ///
    /// The node set and node numbering are preserved.
    pub fn filter_edges<F>(&self, keep: F) -> Self
    where
        F: Fn(u32, u32) -> bool,
    {
        let adjacency_lists = (0..self.node_count)
            .map(|u| {
                self.neighbors(u)
                    .iter()
                    .copied()
                    .filter(|&v| keep(u as u32, v))
                    .collect()
            })
            .collect();
        Self::from_adjacency_lists(adjacency_lists)
    }

    /// Weighted petgraph view of this graph with every edge weight set to 1
    pub fn to_weighted(&self) -> UnGraph<(), f64> {
        let mut graph = UnGraph::with_capacity(self.node_count, self.edge_count);
        for _ in 0..self.node_count {
            graph.add_node(());
        }
        for (u, v) in self.edges() {
            graph.add_edge(NodeIndex::new(u as usize), NodeIndex::new(v as usize), 1.0);
        }
        graph
    }

    /// Estimate memory usage in bytes
    pub fn memory_usage(&self) -> usize {
        let base = mem::size_of::<Self>();
        let offsets = self.offsets.capacity() * mem::size_of::<u32>();
        let adjacency = self.adjacency.capacity() * mem::size_of::<u32>();

        base + offsets + adjacency
    }
}
