//! Concurrent source reads with per-source failure reporting.

use std::path::{Path, PathBuf};

use futures::future::join_all;
use tracing::{debug, warn};

use crate::error::{ConcordError, Result};
use crate::reconcile::{MAX_SOURCES, REQUIRED_SOURCES};

use super::source::SourceText;

/// Sources that were read successfully for one run.
#[derive(Debug, Default)]
pub struct SourceBatch {
    /// Texts in slot order, ready to reconcile.
    pub texts: Vec<SourceText>,
    /// Failures of the optional slot that were dropped from the run.
    pub dropped: Vec<ConcordError>,
}

impl SourceBatch {
    /// Assemble a batch from per-slot read results.
    ///
    /// Any failure in a required slot fails the whole batch, and the error
    /// carries every required slot's read failure. A failure in the
    /// optional slot drops that slot, and the run continues without it.
    pub fn from_results(results: Vec<Result<SourceText>>) -> Result<Self> {
        if results.len() > MAX_SOURCES {
            return Err(ConcordError::TooManySources {
                max: MAX_SOURCES,
                provided: results.len(),
            });
        }

        let mut batch = SourceBatch::default();
        let mut required_ok = 0;
        let mut failures = Vec::new();

        for (index, result) in results.into_iter().enumerate() {
            let required = index < REQUIRED_SOURCES;
            match result {
                Ok(text) => {
                    if required {
                        required_ok += 1;
                    }
                    batch.texts.push(text);
                }
                Err(err) if required => {
                    warn!(slot = index + 1, error = %err, "Required source failed to load");
                    failures.push(err);
                }
                Err(err) => {
                    warn!(slot = index + 1, error = %err, "Dropping optional source");
                    batch.dropped.push(err);
                }
            }
        }

        if required_ok < REQUIRED_SOURCES {
            return Err(ConcordError::InsufficientSources {
                required: REQUIRED_SOURCES,
                provided: required_ok,
                failures,
            });
        }

        Ok(batch)
    }

    /// Whether the optional slot is part of this batch.
    pub fn has_optional(&self) -> bool {
        self.texts.len() > REQUIRED_SOURCES
    }
}

/// Read every path concurrently and wait for all of them.
///
/// Each read reports its own outcome; one failing read never cancels the
/// others. Results come back in the order of `paths`.
pub async fn read_sources(paths: &[PathBuf]) -> Vec<Result<SourceText>> {
    let reads = paths
        .iter()
        .enumerate()
        .map(|(index, path)| read_source(index + 1, path));
    join_all(reads).await
}

async fn read_source(slot: usize, path: &Path) -> Result<SourceText> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| ConcordError::SourceRead {
            slot,
            path: path.to_path_buf(),
            source,
        })?;
    debug!(slot, path = %path.display(), bytes = bytes.len(), "Read source");

    let name = path
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| format!("Data {slot}"));
    let text = String::from_utf8_lossy(&bytes).into_owned();

    Ok(SourceText { name, text })
}
