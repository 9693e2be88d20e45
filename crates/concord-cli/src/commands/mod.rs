//! CLI command implementations.

pub mod compare;
pub mod export;
pub mod serve;

use std::path::PathBuf;

use colored::Colorize;
use concord::{read_sources, SourceBatch};

/// Read the files concurrently and keep the ones a run can use.
pub async fn read_batch(files: &[PathBuf]) -> concord::Result<SourceBatch> {
    let batch = SourceBatch::from_results(read_sources(files).await)?;
    for dropped in &batch.dropped {
        eprintln!("{} {}", "Warning:".yellow(), dropped);
    }
    Ok(batch)
}

/// Read the files on a fresh runtime.
pub fn read_batch_blocking(files: &[PathBuf]) -> Result<SourceBatch, Box<dyn std::error::Error>> {
    let runtime = tokio::runtime::Runtime::new()?;
    Ok(runtime.block_on(read_batch(files))?)
}
