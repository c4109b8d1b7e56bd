//! Graph construction module

use crate::graph::mapping::NameMap;
use crate::graph::Topology;

/// Builder for incrementally constructing a [`Topology`] keyed by node names
pub struct TopologyBuilder {
    /// Mapping from string names to node indices
    names: NameMap,

    /// Adjacency lists for each node
    adjacency_lists: Vec<Vec<u32>>,

    /// Number of `add_edge` calls rejected as self-loops
    self_loops: usize,

    /// Number of accepted `add_edge` calls (before deduplication)
    added: usize,
}

impl TopologyBuilder {
    /// Create a new builder with room for `capacity` nodes
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            names: NameMap::new(),
            adjacency_lists: Vec::with_capacity(capacity),
            self_loops: 0,
            added: 0,
        }
    }

    /// Get or create the node id for the given name
    pub fn get_or_create_node(&mut self, name: &str) -> u32 {
        let idx = self.names.get_or_insert(name);
        if idx as usize == self.adjacency_lists.len() {
            self.adjacency_lists.push(Vec::new());
        }
        idx
    }

    /// Add an undirected edge between two named nodes
    pub fn add_edge(&mut self, a: &str, b: &str) {
        let a_idx = self.get_or_create_node(a);
        let b_idx = self.get_or_create_node(b);

        if a_idx == b_idx {
            self.self_loops += 1;
            return;
        }

        self.adjacency_lists[a_idx as usize].push(b_idx);
        self.adjacency_lists[b_idx as usize].push(a_idx);
        self.added += 1;
    }

    pub fn node_count(&self) -> usize {
        self.adjacency_lists.len()
    }

    /// Build the topology together with the name mapping
    pub fn build(self) -> (Topology, NameMap) {
        if self.self_loops > 0 {
            log::warn!("Dropped {} self-loop interactions", self.self_loops);
        }

        let topology = Topology::from_adjacency_lists(self.adjacency_lists);

        let duplicates = self.added - topology.edge_count();
        if duplicates > 0 {
            log::warn!("Dropped {} duplicate interactions", duplicates);
        }

        (topology, self.names)
    }
}
