//! Multiplex graph: one shared topology plus per-node layer existence
//!
//! An edge `{u, v}` is active in layer `t` iff both `u` and `v` exist in
//! `t`. Edge activity is always derived from the node bitsets and never
//! stored per edge.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::graph::layers::{LayerMatrix, LayerRow};
use crate::graph::Topology;

/// Shared topology annotated with one existence bitset per node
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayeredGraph {
    topology: Topology,
    existence: LayerMatrix,
}

impl LayeredGraph {
    /// Wrap a topology and its existence matrix
    ///
    /// # Errors
    ///
    /// Returns [`Error::LayerCountMismatch`] if the matrix does not have
    /// exactly one row per topology node, and
    /// [`Error::InconsistentLayerWidth`] if a row is not as wide as the
    /// matrix.
    pub fn new(topology: Topology, existence: LayerMatrix) -> Result<Self> {
        if topology.node_count() != existence.row_count() {
            return Err(Error::LayerCountMismatch {
                nodes: topology.node_count(),
                bitsets: existence.row_count(),
            });
        }
        existence.check_width()?;

        log::debug!(
            "Layered graph: {} nodes, {} edges, {} layers, topology ~{} bytes",
            topology.node_count(),
            topology.edge_count(),
            existence.width(),
            topology.memory_usage()
        );

        Ok(Self {
            topology,
            existence,
        })
    }

    /// Build from an edge list and boolean existence rows (width taken from row 0)
    pub fn from_parts<R: AsRef<[bool]>>(
        node_count: usize,
        edges: &[(u32, u32)],
        existence: &[R],
    ) -> Result<Self> {
        if existence.len() != node_count {
            return Err(Error::LayerCountMismatch {
                nodes: node_count,
                bitsets: existence.len(),
            });
        }
        let topology = Topology::from_edges(node_count, edges)?;
        let existence = LayerMatrix::from_rows(existence)?;
        Self::new(topology, existence)
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    pub fn existence(&self) -> &LayerMatrix {
        &self.existence
    }

    pub fn into_parts(self) -> (Topology, LayerMatrix) {
        (self.topology, self.existence)
    }

    /// Layers in which `node` exists
    pub fn layers_of(&self, node: usize) -> LayerRow<'_> {
        self.existence.row(node)
    }

    pub fn exists(&self, node: usize, layer: usize) -> bool {
        self.existence.contains(node, layer)
    }

    /// True if the edge `{u, v}` of the shared topology is active in `layer`
    pub fn is_edge_active(&self, u: usize, v: usize, layer: usize) -> bool {
        self.exists(u, layer) && self.exists(v, layer)
    }

    pub fn layer_count(&self) -> usize {
        self.existence.width()
    }

    pub fn node_count(&self) -> usize {
        self.topology.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.topology.edge_count()
    }

    /// Number of nodes that exist in `layer`
    pub fn layer_node_count(&self, layer: usize) -> usize {
        (0..self.node_count())
            .filter(|&u| self.exists(u, layer))
            .count()
    }

    /// Number of topology edges active in `layer`, without materializing it
    pub fn layer_edge_count(&self, layer: usize) -> usize {
        self.topology
            .edges()
            .filter(|&(u, v)| self.is_edge_active(u as usize, v as usize, layer))
            .count()
    }

    /// Materialize the layer-induced subgraph as an independent copy
    ///
    /// # Errors
    ///
    /// Returns [`Error::LayerOutOfRange`] if `layer >= layer_count()`.
    pub fn subgraph(&self, layer: usize) -> Result<Topology> {
        if layer >= self.layer_count() {
            return Err(Error::LayerOutOfRange {
                layer,
                layer_count: self.layer_count(),
            });
        }
        Ok(self.materialize(layer))
    }

    fn materialize(&self, layer: usize) -> Topology {
        self.topology
            .filter_edges(|u, v| self.is_edge_active(u as usize, v as usize, layer))
    }

    /// Materialize every layer in order and hand it to `handle`
    pub fn for_each_layer<F>(&self, mut handle: F)
    where
        F: FnMut(Topology, usize),
    {
        for layer in 0..self.layer_count() {
            handle(self.materialize(layer), layer);
        }
    }

    /// Materialize every layer in parallel; each call gets a private subgraph
    pub fn par_for_each_layer<F>(&self, handle: F)
    where
        F: Fn(Topology, usize) + Sync + Send,
    {
        (0..self.layer_count())
            .into_par_iter()
            .for_each(|layer| handle(self.materialize(layer), layer));
    }

    /// Collect one result per materialized layer, computed in parallel and
    /// returned in layer order
    pub fn par_map_layers<R, F>(&self, handle: F) -> Vec<R>
    where
        R: Send,
        F: Fn(&Topology, usize) -> R + Sync + Send,
    {
        (0..self.layer_count())
            .into_par_iter()
            .map(|layer| handle(&self.materialize(layer), layer))
            .collect()
    }
}
