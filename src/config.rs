//! Configuration management for the multiplex graph engine

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::cluster::propagation::default_update_threshold;

/// Which implementation of an algorithm family to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Materialize every layer and run the single-graph algorithm on it
    Baseline,
    /// Per-layer neighbor pair enumeration (clustering only, otherwise `Baseline`)
    NeighborCombination,
    /// All layers within one traversal of the shared topology
    #[default]
    Vectorized,
}

impl Strategy {
    pub const ALL: [Strategy; 3] = [
        Strategy::Baseline,
        Strategy::NeighborCombination,
        Strategy::Vectorized,
    ];
}

/// Algorithm families selectable from the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    /// Layer, max-layer and coexistence degrees
    Degree,
    /// Clustering coefficient
    Cc,
    /// Betweenness centrality
    Bw,
    /// Label propagation
    Plp,
    /// Coexistence and correlation aggregate graphs
    Aggregate,
    All,
}

impl Algorithm {
    /// True if running `self` includes `family`
    pub fn includes(self, family: Algorithm) -> bool {
        self == Algorithm::All || self == family
    }
}

/// One network/expression pair to analyze
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetSpec {
    /// Protein interaction network
    pub network: String,
    /// Tissue expression table
    pub expression: String,
}

/// Runtime configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Label propagation stops once a round changes at most this many labels
    /// in every layer; `None` selects [`default_update_threshold`]
    pub update_threshold: Option<usize>,

    /// Implementation used for every algorithm family
    pub strategy: Strategy,

    /// Worker threads (0 = use all available cores)
    pub threads: usize,

    /// Datasets to run over, in order
    pub datasets: Vec<DatasetSpec>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            update_threshold: None,
            strategy: Strategy::default(),
            threads: 0,
            datasets: Vec::new(),
        }
    }
}

impl Config {
    /// Create a new configuration with custom values
    pub fn new(
        update_threshold: Option<usize>,
        strategy: Strategy,
        threads: usize,
        datasets: Vec<DatasetSpec>,
    ) -> Self {
        Self {
            update_threshold,
            strategy,
            threads,
            datasets,
        }
    }

    /// Effective label propagation threshold for a graph of `node_count` nodes
    pub fn resolved_threshold(&self, node_count: usize) -> usize {
        self.update_threshold
            .unwrap_or_else(|| default_update_threshold(node_count))
    }

    /// Effective worker thread count
    pub fn resolved_threads(&self) -> usize {
        if self.threads > 0 {
            self.threads
        } else {
            num_cpus::get()
        }
    }
}
