use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use anyhow::{Context, Result};
use log::info;

use phantasus_data::io::write_tsv;
use phantasus_data::{GeoReader, Matrix};

use crate::config::CliConfig;
use crate::util::{ensure_output_dir, tsv_path};

/// One line of the load report.
#[derive(Debug, Clone, PartialEq)]
pub struct MatrixSummary {
    pub name: String,
    pub rows: usize,
    pub columns: usize,
    pub platform: Option<String>,
    pub tsv: Option<PathBuf>,
}

impl MatrixSummary {
    fn of(matrix: &Matrix) -> Self {
        MatrixSummary {
            name: matrix.name().to_string(),
            rows: matrix.row_count(),
            columns: matrix.column_count(),
            platform: matrix
                .properties()
                .get_str("platform_id")
                .map(str::to_string),
            tsv: None,
        }
    }
}

pub async fn run_load(identifier: &str, config: &CliConfig) -> Result<Vec<MatrixSummary>> {
    let reader = GeoReader::new(&config.loader).context("Failed to set up the GEO reader")?;
    let matrices = reader
        .load(identifier)
        .await
        .with_context(|| format!("Failed to load {identifier}"))?;

    let out_dir = config
        .output_dir
        .as_deref()
        .map(ensure_output_dir)
        .transpose()?;

    let mut summaries = Vec::with_capacity(matrices.len());
    for matrix in &matrices {
        let mut summary = MatrixSummary::of(matrix);
        if let Some(dir) = &out_dir {
            let path = tsv_path(dir, matrix.name());
            let file = File::create(&path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            write_tsv(matrix, BufWriter::new(file))
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Wrote {}", path.display());
            summary.tsv = Some(path);
        }
        summaries.push(summary);
    }
    Ok(summaries)
}
