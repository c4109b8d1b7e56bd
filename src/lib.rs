//! Metrics on multiplex graphs: one shared interaction topology with
//! per-node layer membership (e.g. the tissues a gene is expressed in)

pub mod cluster;
pub mod config;
pub mod data;
pub mod error;
pub mod graph;
pub mod multiplex;
pub mod storage;

pub use cluster::Partition;
pub use config::{Algorithm, Config, DatasetSpec, Strategy};
pub use error::{Error, Result};
pub use graph::{LayerMatrix, LayerRow, LayeredGraph, NameMap, Topology};
