//! The latest reconciled worksheet of a review session.

use std::sync::Arc;

use tracing::{info, warn};

use crate::concord::Concord;
use crate::error::{ConcordError, Result};
use crate::input::SourceText;
use crate::projection::{filter_features, Worksheet};
use crate::reconcile::RunState;

/// Holds the worksheet of the newest installed run.
///
/// A run replaces the previous worksheet in one step, and only when it is
/// newer than what is installed. A failed run leaves the current worksheet as
/// it was.
#[derive(Debug)]
pub struct Session {
    engine: Arc<Concord>,
    worksheet: Option<Worksheet>,
}

impl Session {
    /// Create a session with a default engine.
    pub fn new() -> Self {
        Self::with_engine(Arc::new(Concord::new()))
    }

    /// Create a session whose runs come from `engine`.
    pub fn with_engine(engine: Arc<Concord>) -> Self {
        Self {
            engine,
            worksheet: None,
        }
    }

    /// The engine producing this session's runs.
    pub fn engine(&self) -> &Arc<Concord> {
        &self.engine
    }

    /// Reconcile `texts` and install the result.
    pub fn load_sources(&mut self, texts: Vec<SourceText>) -> Result<&Worksheet> {
        let run = self.engine.reconcile(&texts)?;
        self.install(run)
    }

    /// Replace the current worksheet with a fresh one for `run`.
    ///
    /// Rejects a run that is not newer than the installed one.
    pub fn install(&mut self, run: RunState) -> Result<&Worksheet> {
        if let Some(current) = &self.worksheet {
            if run.generation <= current.generation() {
                warn!(
                    generation = run.generation,
                    current = current.generation(),
                    "Discarding superseded run"
                );
                return Err(ConcordError::Superseded {
                    generation: run.generation,
                    current: current.generation(),
                });
            }
        }

        info!(
            generation = run.generation,
            features = run.stats.total_features,
            "Installed run"
        );
        Ok(self.worksheet.insert(Worksheet::new(Arc::new(run))))
    }

    /// The current worksheet.
    pub fn worksheet(&self) -> Result<&Worksheet> {
        self.worksheet.as_ref().ok_or(ConcordError::NoRun)
    }

    /// The current worksheet, for editing.
    pub fn worksheet_mut(&mut self) -> Result<&mut Worksheet> {
        self.worksheet.as_mut().ok_or(ConcordError::NoRun)
    }

    /// Override the final value of a feature.
    pub fn set_final_value(&mut self, feature: &str, value: impl Into<String>) -> Result<()> {
        self.worksheet_mut()?.set_final_value(feature, value)
    }

    /// Restore the recommended final value of a feature.
    pub fn reset_final_value(&mut self, feature: &str) -> Result<()> {
        self.worksheet_mut()?.reset_final_value(feature)
    }

    /// Final-data CSV of the current worksheet.
    pub fn export_csv(&self) -> Result<String> {
        Ok(self.worksheet()?.export_csv())
    }

    /// Visibility of each row for a search query.
    pub fn filter(&self, query: &str) -> Result<Vec<bool>> {
        let worksheet = self.worksheet()?;
        Ok(filter_features(
            worksheet.run().rows.iter().map(|r| r.feature.as_str()),
            query,
        ))
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
