//! Immutable result of one reconciliation run.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::input::{Source, SourceMetadata};

use super::aligner::{align_features, SlotLayout};
use super::classifier::{AgreementClass, CellTag, Classification, RowClassifier};
use super::stats::{AggregateStats, StatsAccumulator};

/// One feature with its per-slot values and classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedRow {
    /// Feature name.
    pub feature: String,
    /// One value per active slot; "" where the source lacks the feature.
    pub values: Vec<String>,
    /// Agreement class.
    pub class: AgreementClass,
    /// Recommended final value.
    pub recommended: String,
    /// Whether `recommended` was filled in automatically.
    pub auto_filled: bool,
    /// One tag per active slot.
    pub cells: Vec<CellTag>,
}

impl ClassifiedRow {
    fn new(feature: String, values: Vec<String>, classification: Classification) -> Self {
        Self {
            feature,
            values,
            class: classification.class,
            auto_filled: classification.auto_filled(),
            recommended: classification.final_value,
            cells: classification.cells,
        }
    }
}

/// Everything one run produced. Never modified after it is built; a new run
/// replaces it wholesale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunState {
    /// Run number, increasing across runs of one engine.
    pub generation: u64,
    /// Active slot layout.
    pub layout: SlotLayout,
    /// Metadata of each source, in slot order.
    pub sources: Vec<SourceMetadata>,
    /// Rows sorted by feature name.
    pub rows: Vec<ClassifiedRow>,
    /// Aggregate statistics over `rows`.
    pub stats: AggregateStats,
    /// When the run was built.
    pub created_at: DateTime<Utc>,
}

impl RunState {
    /// Align, classify and summarize decoded sources.
    pub fn build(generation: u64, sources: &[Source], classifier: &RowClassifier) -> Result<Self> {
        let layout = SlotLayout::for_sources(sources.len())?;
        let features = align_features(sources.iter().map(|s| &s.features));

        let mut stats = StatsAccumulator::new(layout);
        let mut rows = Vec::with_capacity(features.len());
        for feature in features {
            let values: Vec<String> = sources
                .iter()
                .map(|s| s.value(&feature).to_string())
                .collect();
            let classification = classifier.classify(&values);
            stats.observe(&values, classification.class);
            rows.push(ClassifiedRow::new(feature, values, classification));
        }
        let stats = stats.finish();

        debug!(
            generation,
            features = stats.total_features,
            same = stats.same,
            partial = stats.partial,
            different = stats.different,
            "Built run"
        );

        Ok(Self {
            generation,
            layout,
            sources: sources.iter().map(|s| s.metadata.clone()).collect(),
            rows,
            stats,
            created_at: Utc::now(),
        })
    }

    /// Position of a feature's row.
    pub fn row_index(&self, feature: &str) -> Option<usize> {
        self.rows
            .binary_search_by(|row| row.feature.as_str().cmp(feature))
            .ok()
    }

    /// Row for a feature.
    pub fn row(&self, feature: &str) -> Option<&ClassifiedRow> {
        self.row_index(feature).map(|i| &self.rows[i])
    }

    /// Display names of the sources, in slot order.
    pub fn source_names(&self) -> Vec<&str> {
        self.sources.iter().map(|s| s.name.as_str()).collect()
    }
}
