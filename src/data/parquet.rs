//! Parquet file handling for interaction and expression tables

use std::path::Path;

use anyhow::{anyhow, Result};
use polars::prelude::*;

use crate::data::json::stem;
use crate::data::Dataset;

/// Load a dataset from an interaction table (`gene_a`, `gene_b`) and an
/// expression table (`gene`, `tissue`)
///
/// Rows with a null in either column are skipped.
pub fn load_dataset(edges_path: impl AsRef<Path>, expression_path: impl AsRef<Path>) -> Result<Dataset> {
    let edges_path = edges_path.as_ref();
    let mut dataset = Dataset::new(stem(edges_path));

    dataset.edges = read_pairs(edges_path, "gene_a", "gene_b")?;
    dataset.expression = read_pairs(expression_path.as_ref(), "gene", "tissue")?;

    log::info!(
        "Loaded dataset {}: {} interactions, {} expression calls",
        dataset.name,
        dataset.edges.len(),
        dataset.expression.len()
    );
    Ok(dataset)
}

fn read_pairs(path: &Path, first: &str, second: &str) -> Result<Vec<(String, String)>> {
    log::info!("Reading parquet file: {}", path.display());

    if !path.exists() {
        return Err(anyhow!("File not found: {}", path.display()));
    }

    let df = LazyFrame::scan_parquet(path, Default::default())?
        .select([col(first), col(second)])
        .collect()?;

    log::debug!("File schema: {:?}", df.schema());

    let a = df.column(first)?.str()?;
    let b = df.column(second)?.str()?;

    let mut skipped = 0usize;
    let mut pairs = Vec::with_capacity(df.height());
    for (x, y) in a.into_iter().zip(b.into_iter()) {
        match (x, y) {
            (Some(x), Some(y)) => pairs.push((x.to_string(), y.to_string())),
            _ => skipped += 1,
        }
    }

    if skipped > 0 {
        log::warn!("Skipped {} rows with missing {} or {}", skipped, first, second);
    }
    Ok(pairs)
}
