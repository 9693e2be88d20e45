//! Concord: reconcile feature values reported by several CSV sources.
//!
//! Three or four sources each map feature names to values. Concord aligns them
//! on feature name, classifies how well the sources agree on every feature, and
//! recommends a final value that a reviewer can then override and export.
//!
//! # Core Principles
//!
//! - **Pure classification**: a row's agreement depends only on its values
//! - **Whole-run snapshots**: every run produces a fresh, immutable [`RunState`]
//! - **Non-destructive review**: user edits live beside the recommendations
//!
//! # Example
//!
//! ```
//! use concord::{Session, SourceText};
//!
//! let mut session = Session::new();
//! let worksheet = session
//!     .load_sources(vec![
//!         SourceText::new("a.csv", "Feature,Data\ncolor,red\nsize,10"),
//!         SourceText::new("b.csv", "Feature,Data\ncolor,red\nsize,12"),
//!         SourceText::new("c.csv", "Feature,Data\ncolor,red\nsize,12"),
//!     ])
//!     .unwrap();
//!
//! assert_eq!(worksheet.run().stats.same, 1);
//! assert_eq!(worksheet.final_value("size"), Some("12"));
//! ```

pub mod error;
pub mod input;
pub mod projection;
pub mod reconcile;

mod concord;
mod session;

pub use crate::concord::{Concord, ConcordConfig};
pub use error::{ConcordError, Result};
pub use input::{
    read_sources, Decoder, DecoderConfig, FeatureMap, Source, SourceBatch, SourceMetadata,
    SourceText,
};
pub use projection::{
    export_file_name, exports_verbatim, filter_features, ExportConfig, FillTag, RenderCell,
    RenderRow, Worksheet,
};
pub use reconcile::{
    AgreementClass, AggregateStats, CellTag, Classification, ClassifiedRow, ClassifierConfig,
    RowClassifier, RunState, SlotDiff, SlotLayout,
};
pub use session::Session;
