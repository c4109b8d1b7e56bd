//! Dataset model and loaders

pub mod json;
pub mod parquet;
pub mod preprocessing;

use serde::{Deserialize, Serialize};

/// An interaction network together with tissue expression calls, by name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub name: String,

    /// Undirected interactions `(gene_a, gene_b)`
    pub edges: Vec<(String, String)>,

    /// `(gene, tissue)`: the gene is expressed in the tissue
    #[serde(default)]
    pub expression: Vec<(String, String)>,
}

impl Dataset {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn add_edge(&mut self, a: impl Into<String>, b: impl Into<String>) -> &mut Self {
        self.edges.push((a.into(), b.into()));
        self
    }

    pub fn add_expression(&mut self, gene: impl Into<String>, tissue: impl Into<String>) -> &mut Self {
        self.expression.push((gene.into(), tissue.into()));
        self
    }
}
