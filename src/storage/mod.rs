//! Results persistence module

pub mod snapshot;

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Result;
use petgraph::graph::UnGraph;
use petgraph::visit::EdgeRef;
use serde_json::{json, to_string_pretty, Map, Value};

use crate::cluster::{metrics, Partition};
use crate::data::preprocessing::TissueGraph;
use crate::error::Error;
use crate::multiplex::NeighborExistence;

/// Per-node results of one run; families that were not computed stay `None`
///
/// Per-layer vectors are laid out `[layer][node]`.
#[derive(Debug, Clone, Default)]
pub struct NodeProperties {
    pub degree: Option<Vec<u32>>,
    pub max_layer_degree: Option<Vec<u32>>,
    pub coexistence_degree: Option<Vec<u32>>,
    pub neighbor_existence: Option<NeighborExistence>,
    pub layer_degree: Option<Vec<Vec<u32>>>,
    pub clustering: Option<Vec<Vec<f64>>>,
    pub betweenness: Option<Vec<Vec<f64>>>,
    pub clusters: Option<Vec<Partition>>,
}

/// Write `<name>_node_properties.json`: one object per gene, with per-tissue
/// values for the tissues the gene is expressed in
pub fn save_node_properties(
    output_dir: impl AsRef<Path>,
    tissue_graph: &TissueGraph,
    properties: &NodeProperties,
) -> Result<PathBuf> {
    let output_dir = output_dir.as_ref();
    fs::create_dir_all(output_dir)?;
    let path = output_dir.join(format!("{}_node_properties.json", tissue_graph.name));
    log::info!("Saving node properties to {}", path.display());

    let graph = &tissue_graph.graph;
    let nodes: Vec<Value> = tissue_graph
        .genes
        .names()
        .iter()
        .enumerate()
        .map(|(u, gene)| {
            let mut node = Map::new();
            node.insert("gene".into(), json!(gene));
            insert_scalar(&mut node, "degree", properties.degree.as_deref(), u);
            insert_scalar(&mut node, "max_layer_degree", properties.max_layer_degree.as_deref(), u);
            insert_scalar(&mut node, "coexistence_degree", properties.coexistence_degree.as_deref(), u);
            if let Some(range) = &properties.neighbor_existence {
                node.insert("neighbor_existence_min".into(), json!(range.min[u]));
                node.insert("neighbor_existence_max".into(), json!(range.max[u]));
            }

            let mut tissues = Map::new();
            for t in graph.layers_of(u).ones() {
                let mut values = Map::new();
                insert_scalar(&mut values, "degree", layer(&properties.layer_degree, t), u);
                insert_scalar(&mut values, "clustering", layer(&properties.clustering, t), u);
                insert_scalar(&mut values, "betweenness", layer(&properties.betweenness, t), u);
                if let Some(clusters) = &properties.clusters {
                    values.insert("cluster".into(), json!(clusters[t].label(u)));
                }
                let tissue = tissue_graph.tissues.name(t as u32).unwrap_or_default();
                tissues.insert(tissue.to_string(), Value::Object(values));
            }
            node.insert("tissues".into(), Value::Object(tissues));

            Value::Object(node)
        })
        .collect();

    let mut file = File::create(&path)?;
    file.write_all(to_string_pretty(&nodes)?.as_bytes())?;
    Ok(path)
}

fn insert_scalar<T: serde::Serialize>(
    object: &mut Map<String, Value>,
    key: &str,
    values: Option<&[T]>,
    index: usize,
) {
    if let Some(values) = values {
        object.insert(key.to_string(), json!(values[index]));
    }
}

fn layer<T>(values: &Option<Vec<Vec<T>>>, t: usize) -> Option<&[T]> {
    values.as_ref().map(|layers| layers[t].as_slice())
}

/// Write `<name>_summary.json` with graph, layer and cluster statistics
///
/// Each layer partition is scored by its modularity on the layer subgraph;
/// layers without edges have no modularity and report `null`.
pub fn save_summary(
    output_dir: impl AsRef<Path>,
    tissue_graph: &TissueGraph,
    clusters: Option<&[Partition]>,
) -> Result<PathBuf> {
    let output_dir = output_dir.as_ref();
    fs::create_dir_all(output_dir)?;
    let path = output_dir.join(format!("{}_summary.json", tissue_graph.name));
    log::info!("Saving summary information to {}", path.display());

    let graph = &tissue_graph.graph;
    let mut layers = Vec::with_capacity(graph.layer_count());
    for t in 0..graph.layer_count() {
        let mut entry = json!({
            "tissue": tissue_graph.tissues.name(t as u32),
            "node_count": graph.layer_node_count(t),
            "edge_count": graph.layer_edge_count(t),
        });
        if let Some(partition) = clusters.map(|c| &c[t]) {
            let weighted = graph.subgraph(t)?.to_weighted();
            let modularity = match metrics::modularity(partition, &weighted) {
                Ok(value) => Some(value),
                Err(Error::UndefinedModularity) => None,
                Err(err) => return Err(err.into()),
            };
            entry["cluster_count"] = json!(partition.number_of_subsets());
            entry["modularity"] = json!(modularity);
            entry["weighted_mean_cluster_size"] =
                json!(metrics::weighted_mean_cluster_size(partition));
            entry["weighted_median_cluster_size"] =
                json!(metrics::weighted_median_cluster_size(partition));
        }
        layers.push(entry);
    }

    let avg_degree = if graph.node_count() == 0 {
        0.0
    } else {
        2.0 * graph.edge_count() as f64 / graph.node_count() as f64
    };
    let mut summary = json!({
        "name": tissue_graph.name,
        "graph_stats": {
            "node_count": graph.node_count(),
            "edge_count": graph.edge_count(),
            "layer_count": graph.layer_count(),
            "avg_degree": avg_degree,
        },
        "layers": layers,
    });
    if let Some(partitions) = clusters {
        let histogram: Map<String, Value> = metrics::cluster_size_histogram(partitions)
            .into_iter()
            .map(|(size, count)| (size.to_string(), json!(count)))
            .collect();
        summary["cluster_size_histogram"] = Value::Object(histogram);
    }

    let mut file = File::create(&path)?;
    file.write_all(to_string_pretty(&summary)?.as_bytes())?;
    Ok(path)
}

/// Write `<name>_<label>.json`: the weighted edge list of an aggregate graph
pub fn save_aggregate(
    output_dir: impl AsRef<Path>,
    tissue_graph: &TissueGraph,
    label: &str,
    aggregate: &UnGraph<(), f64>,
) -> Result<PathBuf> {
    let output_dir = output_dir.as_ref();
    fs::create_dir_all(output_dir)?;
    let path = output_dir.join(format!("{}_{}.json", tissue_graph.name, label));
    log::info!("Saving {} graph to {}", label, path.display());

    let gene = |index: usize| tissue_graph.genes.name(index as u32).unwrap_or_default();
    let edges: Vec<Value> = aggregate
        .edge_references()
        .map(|e| {
            json!({
                "gene_a": gene(e.source().index()),
                "gene_b": gene(e.target().index()),
                "weight": e.weight(),
            })
        })
        .collect();

    let mut file = File::create(&path)?;
    file.write_all(to_string_pretty(&edges)?.as_bytes())?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::preprocessing::build_layered;
    use crate::data::Dataset;
    use crate::multiplex;
    use tempfile::tempdir;

    fn tissue_graph() -> TissueGraph {
        let mut dataset = Dataset::new("toy");
        dataset
            .add_edge("A", "B")
            .add_edge("B", "C")
            .add_edge("A", "C")
            .add_expression("A", "liver")
            .add_expression("B", "liver")
            .add_expression("C", "liver")
            .add_expression("C", "brain");
        build_layered(&dataset).unwrap()
    }

    fn read(path: &Path) -> Value {
        serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
    }

    #[test]
    fn test_node_properties() {
        let tissue_graph = tissue_graph();
        let graph = &tissue_graph.graph;
        let properties = NodeProperties {
            degree: Some(vec![2, 2, 2]),
            layer_degree: Some(multiplex::layer_degrees(graph)),
            clustering: Some(multiplex::clustering_vectorized(graph)),
            ..NodeProperties::default()
        };

        let dir = tempdir().unwrap();
        let path = save_node_properties(dir.path(), &tissue_graph, &properties).unwrap();
        let nodes = read(&path);

        assert_eq!(nodes[0]["gene"], "A");
        assert_eq!(nodes[0]["degree"], 2);
        assert_eq!(nodes[0]["tissues"]["liver"]["clustering"], 1.0);
        assert!(nodes[0]["tissues"].get("brain").is_none());
        assert_eq!(nodes[2]["tissues"]["brain"]["degree"], 0);
        assert!(nodes[0].get("betweenness").is_none());
    }

    #[test]
    fn test_summary() {
        let tissue_graph = tissue_graph();
        let clusters = vec![
            Partition::singletons(3),
            Partition::from_labels(vec![0, 0, 0]),
        ];

        let dir = tempdir().unwrap();
        let path = save_summary(dir.path(), &tissue_graph, Some(clusters.as_slice())).unwrap();
        let summary = read(&path);

        assert_eq!(summary["graph_stats"]["edge_count"], 3);
        // brain has a single gene and no edges
        assert_eq!(summary["layers"][0]["tissue"], "brain");
        assert!(summary["layers"][0]["modularity"].is_null());
        assert_eq!(summary["layers"][1]["edge_count"], 3);
        assert_eq!(summary["layers"][1]["cluster_count"], 1);
        assert_eq!(summary["cluster_size_histogram"]["1"], 3);
        assert_eq!(summary["cluster_size_histogram"]["3"], 1);
    }

    #[test]
    fn test_aggregate() {
        let tissue_graph = tissue_graph();
        let aggregate = multiplex::coexistence_graph(&tissue_graph.graph);

        let dir = tempdir().unwrap();
        let path = save_aggregate(dir.path(), &tissue_graph, "coexistence", &aggregate).unwrap();
        let edges = read(&path);

        assert_eq!(edges.as_array().unwrap().len(), 3);
        assert_eq!(edges[0]["gene_a"], "A");
        assert_eq!(edges[0]["weight"], 1.0);
    }
}
