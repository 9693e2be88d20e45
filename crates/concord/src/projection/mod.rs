//! Projection of a run into renderable rows, user overrides and exports.
//!
//! The reconciliation core hands a [`RunState`](crate::RunState) to a
//! [`Worksheet`], which owns the reviewer's current final values. Rendering,
//! filtering and exporting are all pure reads of the worksheet; editing a final
//! value never re-runs classification.

mod export;
mod filter;
mod table;

pub use export::{
    export_csv, export_file_name, exports_verbatim, write_report, ExportConfig, EXPORT_HEADER,
};
pub use filter::{feature_matches, filter_features};
pub use table::{FillTag, RenderCell, RenderRow, Worksheet};
