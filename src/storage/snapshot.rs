//! JSON snapshots of layered graphs and layer partitions
//!
//! Unlike the report writers these return the crate [`Result`], so a corrupt
//! or truncated snapshot surfaces as [`Error::Json`] and a missing file as
//! [`Error::Io`].

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use crate::cluster::Partition;
use crate::error::{Error, Result};
use crate::graph::LayeredGraph;

/// Write the topology and existence matrix of `graph`
pub fn save_graph(path: impl AsRef<Path>, graph: &LayeredGraph) -> Result<()> {
    let path = path.as_ref();
    log::info!("Saving layered graph to {}", path.display());
    let mut file = File::create(path)?;
    file.write_all(serde_json::to_string(graph)?.as_bytes())?;
    Ok(())
}

/// Read a graph written by [`save_graph`]
///
/// The shape is checked again on load: one existence row per node, all of
/// the same width.
pub fn load_graph(path: impl AsRef<Path>) -> Result<LayeredGraph> {
    let path = path.as_ref();
    log::info!("Loading layered graph from {}", path.display());
    let graph: LayeredGraph = serde_json::from_str(&fs::read_to_string(path)?)?;
    let (topology, existence) = graph.into_parts();
    LayeredGraph::new(topology, existence)
}

/// Write one partition per layer
pub fn save_partitions(path: impl AsRef<Path>, partitions: &[Partition]) -> Result<()> {
    let path = path.as_ref();
    log::info!("Saving {} partitions to {}", partitions.len(), path.display());
    let mut file = File::create(path)?;
    file.write_all(serde_json::to_string(partitions)?.as_bytes())?;
    Ok(())
}

/// Read partitions written by [`save_partitions`] for a graph with
/// `node_count` nodes
///
/// # Errors
///
/// [`Error::PartitionSizeMismatch`] if a partition does not cover exactly
/// `node_count` nodes.
pub fn load_partitions(path: impl AsRef<Path>, node_count: usize) -> Result<Vec<Partition>> {
    let path = path.as_ref();
    let partitions: Vec<Partition> = serde_json::from_str(&fs::read_to_string(path)?)?;
    if let Some(partition) = partitions.iter().find(|p| p.len() != node_count) {
        return Err(Error::PartitionSizeMismatch {
            partition: partition.len(),
            nodes: node_count,
        });
    }
    Ok(partitions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::propagation::label_propagation_vec;
    use crate::multiplex;
    use tempfile::tempdir;

    fn sample() -> LayeredGraph {
        LayeredGraph::from_parts(
            4,
            &[(0, 1), (1, 2), (0, 2), (2, 3)],
            &[
                vec![true, false],
                vec![true, true],
                vec![true, true],
                vec![false, true],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_graph_round_trip() {
        let graph = sample();
        let dir = tempdir().unwrap();
        let path = dir.path().join("graph.json");

        save_graph(&path, &graph).unwrap();
        let loaded = load_graph(&path).unwrap();

        assert_eq!(loaded.topology(), graph.topology());
        assert_eq!(loaded.existence(), graph.existence());
        assert_eq!(
            multiplex::clustering_vectorized(&loaded),
            multiplex::clustering_vectorized(&graph)
        );
    }

    #[test]
    fn test_partitions_round_trip() {
        let graph = sample();
        let partitions = label_propagation_vec(&graph, Some(0)).partitions;
        let dir = tempdir().unwrap();
        let path = dir.path().join("partitions.json");

        save_partitions(&path, &partitions).unwrap();
        assert_eq!(load_partitions(&path, 4).unwrap(), partitions);

        let err = load_partitions(&path, 5).unwrap_err();
        assert!(matches!(
            err,
            Error::PartitionSizeMismatch {
                partition: 4,
                nodes: 5
            }
        ));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempdir().unwrap();
        let err = load_graph(dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_corrupt_snapshot() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("graph.json");
        fs::write(&path, "{\"topology\":").unwrap();
        assert!(matches!(load_graph(&path).unwrap_err(), Error::Json(_)));
    }

    #[test]
    fn test_inconsistent_snapshot_rejected() {
        let graph = sample();
        let dir = tempdir().unwrap();
        let path = dir.path().join("graph.json");
        save_graph(&path, &graph).unwrap();

        // drop the last existence row
        let mut value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        value["existence"]["rows"].as_array_mut().unwrap().pop();
        fs::write(&path, value.to_string()).unwrap();

        assert!(matches!(
            load_graph(&path).unwrap_err(),
            Error::LayerCountMismatch {
                nodes: 4,
                bitsets: 3
            }
        ));
    }

    #[test]
    fn test_ragged_snapshot_rejected() {
        let graph = sample();
        let dir = tempdir().unwrap();
        let path = dir.path().join("graph.json");
        save_graph(&path, &graph).unwrap();

        let mut value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        value["existence"]["rows"][2]["length"] = serde_json::json!(1);
        fs::write(&path, value.to_string()).unwrap();

        assert!(matches!(
            load_graph(&path).unwrap_err(),
            Error::InconsistentLayerWidth {
                node: 2,
                expected: 2,
                found: 1
            }
        ));
    }
}
