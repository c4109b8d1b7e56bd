//! Turning a named dataset into a multiplex graph

use std::collections::BTreeSet;

use crate::data::Dataset;
use crate::error::Result;
use crate::graph::builder::TopologyBuilder;
use crate::graph::{LayerMatrix, LayeredGraph, NameMap};

/// A multiplex graph with gene names for nodes and tissue names for layers
#[derive(Debug, Clone)]
pub struct TissueGraph {
    pub name: String,
    pub graph: LayeredGraph,
    pub genes: NameMap,
    pub tissues: NameMap,
}

/// Build the tissue-layered interaction graph of a dataset
///
/// Gene ids follow first appearance over the interactions, then the
/// expression calls. Tissue ids follow sorted tissue names. A gene without
/// expression calls exists in no layer; an expressed gene absent from the
/// network becomes an isolated node.
pub fn build_layered(dataset: &Dataset) -> Result<TissueGraph> {
    log::info!("Building layered graph for {}", dataset.name);

    let mut builder = TopologyBuilder::with_capacity(dataset.edges.len());
    for (a, b) in &dataset.edges {
        builder.add_edge(a, b);
    }
    let network_genes = builder.node_count();

    let calls: Vec<(u32, &str)> = dataset
        .expression
        .iter()
        .map(|(gene, tissue)| (builder.get_or_create_node(gene), tissue.as_str()))
        .collect();
    if builder.node_count() > network_genes {
        log::warn!(
            "{} expressed genes are not part of the network",
            builder.node_count() - network_genes
        );
    }

    let tissue_names: BTreeSet<&str> = calls.iter().map(|&(_, tissue)| tissue).collect();
    let tissues = NameMap::from_names(tissue_names)?;

    let (topology, genes) = builder.build();
    let mut existence = LayerMatrix::new(topology.node_count(), tissues.len());
    for (gene, tissue) in calls {
        existence.insert(gene as usize, tissues.require_id(tissue)? as usize);
    }

    let unexpressed = (0..topology.node_count())
        .filter(|&u| !existence.row(u).any())
        .count();
    if unexpressed > 0 {
        log::warn!("{} genes are not expressed in any tissue", unexpressed);
    }

    let graph = LayeredGraph::new(topology, existence)?;
    log::info!(
        "{}: {} genes, {} interactions, {} tissues",
        dataset.name,
        graph.node_count(),
        graph.edge_count(),
        graph.layer_count()
    );

    Ok(TissueGraph {
        name: dataset.name.clone(),
        graph,
        genes,
        tissues,
    })
}
