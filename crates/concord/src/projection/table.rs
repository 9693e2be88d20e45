//! Worksheet: a run plus the reviewer's final values.

use std::io::Write;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{ConcordError, Result};
use crate::reconcile::{AgreementClass, CellTag, RunState};

use super::export::{export_csv, write_report};
use super::filter::feature_matches;

/// Background of the final-value field, showing how it was pre-filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FillTag {
    /// Copied from unanimous sources.
    Green,
    /// Copied from the most common value.
    Yellow,
    /// Not pre-filled.
    Unfilled,
}

/// One source value as displayed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderCell {
    pub value: String,
    pub tag: CellTag,
}

/// One row as displayed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderRow {
    pub feature: String,
    pub cells: Vec<RenderCell>,
    pub class: AgreementClass,
    /// Current final value, including user edits.
    pub final_value: String,
    /// The value the classifier recommended.
    pub recommended: String,
    pub fill: FillTag,
    /// Whether the user has overridden the recommendation.
    pub edited: bool,
}

/// A run together with the current final value of every row.
#[derive(Debug, Clone)]
pub struct Worksheet {
    run: Arc<RunState>,
    final_values: Vec<String>,
    edited: Vec<bool>,
}

impl Worksheet {
    /// Start a worksheet with every final value set to its recommendation.
    pub fn new(run: Arc<RunState>) -> Self {
        let final_values = run.rows.iter().map(|r| r.recommended.clone()).collect();
        let edited = vec![false; run.rows.len()];
        Self {
            run,
            final_values,
            edited,
        }
    }

    /// The run behind this worksheet.
    pub fn run(&self) -> &Arc<RunState> {
        &self.run
    }

    /// Generation of the run.
    pub fn generation(&self) -> u64 {
        self.run.generation
    }

    /// Current final value of a feature.
    pub fn final_value(&self, feature: &str) -> Option<&str> {
        self.run
            .row_index(feature)
            .map(|i| self.final_values[i].as_str())
    }

    /// Override the final value of a feature.
    ///
    /// Any value is accepted; see [`exports_verbatim`](super::exports_verbatim)
    /// for the values the final-data export cannot carry unchanged.
    pub fn set_final_value(&mut self, feature: &str, value: impl Into<String>) -> Result<()> {
        let index = self.index_of(feature)?;
        self.final_values[index] = value.into();
        self.edited[index] = true;
        Ok(())
    }

    /// Restore the recommended value of a feature.
    pub fn reset_final_value(&mut self, feature: &str) -> Result<()> {
        let index = self.index_of(feature)?;
        self.final_values[index] = self.run.rows[index].recommended.clone();
        self.edited[index] = false;
        Ok(())
    }

    /// Number of rows the user has overridden.
    pub fn edited_count(&self) -> usize {
        self.edited.iter().filter(|e| **e).count()
    }

    /// `(feature, final value)` pairs in feature order.
    pub fn final_values(&self) -> impl Iterator<Item = (&str, &str)> {
        self.run
            .rows
            .iter()
            .zip(&self.final_values)
            .map(|(row, value)| (row.feature.as_str(), value.as_str()))
    }

    /// Every row as displayed.
    pub fn render(&self) -> Vec<RenderRow> {
        (0..self.run.rows.len()).map(|i| self.render_at(i)).collect()
    }

    /// One row as displayed.
    pub fn render_row(&self, feature: &str) -> Result<RenderRow> {
        self.index_of(feature).map(|i| self.render_at(i))
    }

    /// Features whose name contains `query`, ignoring case.
    pub fn visible_features(&self, query: &str) -> Vec<&str> {
        self.run
            .rows
            .iter()
            .map(|r| r.feature.as_str())
            .filter(|feature| feature_matches(feature, query))
            .collect()
    }

    /// Final-data CSV of the current final values.
    pub fn export_csv(&self) -> String {
        export_csv(self.final_values())
    }

    /// Write the full comparison report as CSV.
    pub fn write_report<W: Write>(&self, writer: W) -> Result<()> {
        write_report(&self.run, &self.final_values, writer)
    }

    fn render_at(&self, index: usize) -> RenderRow {
        let row = &self.run.rows[index];
        RenderRow {
            feature: row.feature.clone(),
            cells: row
                .values
                .iter()
                .zip(&row.cells)
                .map(|(value, tag)| RenderCell {
                    value: value.clone(),
                    tag: *tag,
                })
                .collect(),
            class: row.class,
            final_value: self.final_values[index].clone(),
            recommended: row.recommended.clone(),
            fill: match row.class {
                AgreementClass::Same => FillTag::Green,
                AgreementClass::Partial if row.auto_filled => FillTag::Yellow,
                _ => FillTag::Unfilled,
            },
            edited: self.edited[index],
        }
    }

    fn index_of(&self, feature: &str) -> Result<usize> {
        self.run
            .row_index(feature)
            .ok_or_else(|| ConcordError::UnknownFeature(feature.to_string()))
    }
}
