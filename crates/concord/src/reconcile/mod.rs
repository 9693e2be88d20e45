//! Alignment, classification and aggregate statistics.

mod aligner;
mod classifier;
mod run;
mod stats;

pub use aligner::{align_features, SlotLayout};
pub use classifier::{
    classify_row, AgreementClass, CellTag, Classification, ClassifierConfig, RowClassifier,
};
pub use run::{ClassifiedRow, RunState};
pub use stats::{AggregateStats, SlotDiff, StatsAccumulator};

/// Sources every run needs.
pub const REQUIRED_SOURCES: usize = 3;

/// Largest number of sources a run accepts.
pub const MAX_SOURCES: usize = 4;
