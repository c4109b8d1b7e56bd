//! Error types for the multiplex graph engine

use thiserror::Error;

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by graph construction, mapping and scoring
#[derive(Debug, Error)]
pub enum Error {
    /// The topology and the existence matrix disagree on the node count
    #[error("topology has {nodes} nodes but {bitsets} existence bitsets were supplied")]
    LayerCountMismatch { nodes: usize, bitsets: usize },

    /// An existence row has a different width than row 0
    #[error("existence row {node} has width {found}, expected {expected}")]
    InconsistentLayerWidth {
        node: usize,
        expected: usize,
        found: usize,
    },

    #[error("node {node} out of range for graph with {node_count} nodes")]
    NodeOutOfRange { node: usize, node_count: usize },

    #[error("layer {layer} out of range for graph with {layer_count} layers")]
    LayerOutOfRange { layer: usize, layer_count: usize },

    /// Reversing a name/id map that is not one-to-one
    #[error("mapping is not one-to-one: value `{value}` appears more than once")]
    InconsistentMapping { value: String },

    #[error("unknown name `{name}`")]
    UnknownName { name: String },

    /// Modularity needs a strictly positive total edge weight
    #[error("modularity is undefined for graphs without edge weight")]
    UndefinedModularity,

    #[error("partition covers {partition} nodes but the graph has {nodes}")]
    PartitionSizeMismatch { partition: usize, nodes: usize },

    #[error("expected one partition per layer ({layers}), got {partitions}")]
    PartitionCountMismatch { partitions: usize, layers: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
