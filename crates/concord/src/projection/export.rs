//! Final-data export and full comparison reports.

use std::io::Write;

use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::input::split_line;
use crate::reconcile::RunState;

/// Header line of the final-data export.
pub const EXPORT_HEADER: &str = "Feature,Final Data";

/// Export configuration.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// File name prefix, followed by a timestamp.
    pub file_prefix: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            file_prefix: "final_data".to_string(),
        }
    }
}

/// Render `(feature, final value)` pairs as final-data CSV.
///
/// Both fields are wrapped in double quotes verbatim and nothing is escaped.
/// The output decodes back with [`Decoder`](crate::Decoder) for every value
/// that passes [`exports_verbatim`]; a value such as `a","b` decodes as `a`.
pub fn export_csv<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> String {
    let mut out = String::from(EXPORT_HEADER);
    out.push('\n');
    for (feature, value) in pairs {
        out.push_str(&format!("\"{feature}\",\"{value}\"\n"));
    }
    out
}

/// Whether `value` decodes back unchanged after [`export_csv`].
///
/// Fails for values with surrounding whitespace and for values where a quote
/// is followed by a delimiter.
pub fn exports_verbatim(value: &str) -> bool {
    let line = format!("\"f\",\"{value}\"");
    let tokens = split_line(&line, ',', '"');
    tokens.len() == 2 && tokens[1] == value
}

/// File name for an export taken at `at`, e.g.
/// `final_data_2024-03-01_14-05-09.csv`.
pub fn export_file_name(prefix: &str, at: DateTime<Utc>) -> String {
    format!("{}_{}.csv", prefix, at.format("%Y-%m-%d_%H-%M-%S"))
}

/// Write every row of a run as standard CSV: the feature, one column per
/// source, the agreement status and the final value.
pub fn write_report<W: Write>(run: &RunState, final_values: &[String], writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    let mut header = vec!["Feature"];
    header.extend(run.source_names());
    header.extend(["Status", "Final Data"]);
    wtr.write_record(&header)?;

    for (row, final_value) in run.rows.iter().zip(final_values) {
        let mut record: Vec<&str> = Vec::with_capacity(row.values.len() + 3);
        record.push(&row.feature);
        record.extend(row.values.iter().map(String::as_str));
        record.push(row.class.label());
        record.push(final_value);
        wtr.write_record(&record)?;
    }

    wtr.flush().map_err(csv::Error::from)?;
    Ok(())
}
