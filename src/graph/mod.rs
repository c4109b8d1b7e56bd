//! Graph representation and algorithms module

pub mod algorithms;
pub mod builder;
pub mod layered;
pub mod layers;
pub mod mapping;
pub mod topology;

pub use layered::LayeredGraph;
pub use layers::{LayerMatrix, LayerRow};
pub use mapping::NameMap;
pub use topology::Topology;
