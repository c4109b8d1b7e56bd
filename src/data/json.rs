//! JSON dataset files

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use anyhow::{anyhow, Context, Result};

use crate::data::Dataset;

/// Load a dataset; an empty `name` is replaced by the file stem
pub fn load_dataset(path: impl AsRef<Path>) -> Result<Dataset> {
    let path = path.as_ref();
    log::info!("Reading dataset file: {}", path.display());

    if !path.exists() {
        return Err(anyhow!("File not found: {}", path.display()));
    }

    let reader = BufReader::new(File::open(path)?);
    let mut dataset: Dataset = serde_json::from_reader(reader)
        .with_context(|| format!("Malformed dataset file {}", path.display()))?;

    if dataset.name.is_empty() {
        dataset.name = stem(path);
    }

    log::info!(
        "Loaded dataset {}: {} interactions, {} expression calls",
        dataset.name,
        dataset.edges.len(),
        dataset.expression.len()
    );
    Ok(dataset)
}

pub fn save_dataset(dataset: &Dataset, path: impl AsRef<Path>) -> Result<()> {
    let writer = BufWriter::new(File::create(path.as_ref())?);
    serde_json::to_writer_pretty(writer, dataset)?;
    Ok(())
}

pub(crate) fn stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_load_names_from_stem() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ccsb.json");
        let mut file = File::create(&path).unwrap();
        write!(
            file,
            r#"{{"edges": [["A", "B"]], "expression": [["A", "liver"]]}}"#
        )
        .unwrap();

        let dataset = load_dataset(&path).unwrap();
        assert_eq!(dataset.name, "ccsb");
        assert_eq!(dataset.edges, vec![("A".to_string(), "B".to_string())]);
        assert_eq!(dataset.expression.len(), 1);
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.json");
        let mut dataset = Dataset::new("small");
        dataset.add_edge("A", "B").add_expression("B", "brain");

        save_dataset(&dataset, &path).unwrap();
        assert_eq!(load_dataset(&path).unwrap(), dataset);
    }

    #[test]
    fn test_missing_file() {
        assert!(load_dataset("/nonexistent/dataset.json").is_err());
    }
}
