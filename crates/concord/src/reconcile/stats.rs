//! Corpus-wide statistics over classified rows.

use serde::{Deserialize, Serialize};

use super::aligner::SlotLayout;
use super::classifier::AgreementClass;

/// Disagreement between one non-primary slot and slot 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotDiff {
    /// Slot compared against slot 1 (2..=4).
    pub slot: usize,
    /// Rows where slot 1 and this slot are both non-empty.
    pub compared: usize,
    /// Compared rows where the two values differ.
    pub differing: usize,
    /// `differing / compared` as a percentage rounded to one decimal place,
    /// 0.0 when nothing was compared.
    pub percent: f64,
}

impl SlotDiff {
    fn new(slot: usize) -> Self {
        Self {
            slot,
            compared: 0,
            differing: 0,
            percent: 0.0,
        }
    }

    /// Display label such as `File2 Diff`.
    pub fn name(&self) -> String {
        format!("File{} Diff", self.slot)
    }

    /// Percentage formatted to one decimal place, e.g. `50.0%`.
    pub fn percent_label(&self) -> String {
        format!("{:.1}%", self.percent)
    }
}

/// Aggregate statistics for one run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregateStats {
    /// Number of features (rows).
    pub total_features: usize,
    /// Rows classified Same.
    pub same: usize,
    /// Rows classified Partial.
    pub partial: usize,
    /// Rows classified Different.
    pub different: usize,
    /// Rows classified AllMissing.
    pub all_missing: usize,
    /// Empty cells across all rows and active slots.
    pub missing_cells: usize,
    /// One entry per non-primary active slot, in slot order.
    pub slot_diffs: Vec<SlotDiff>,
}

impl AggregateStats {
    /// Diff entry for a slot.
    pub fn slot_diff(&self, slot: usize) -> Option<&SlotDiff> {
        self.slot_diffs.iter().find(|d| d.slot == slot)
    }
}

/// Folds classified rows into [`AggregateStats`].
#[derive(Debug)]
pub struct StatsAccumulator {
    stats: AggregateStats,
}

impl StatsAccumulator {
    /// Start an empty fold for the given layout.
    pub fn new(layout: SlotLayout) -> Self {
        let slot_diffs = (2..=layout.slot_count()).map(SlotDiff::new).collect();
        Self {
            stats: AggregateStats {
                slot_diffs,
                ..AggregateStats::default()
            },
        }
    }

    /// Add one row.
    pub fn observe<S: AsRef<str>>(&mut self, values: &[S], class: AgreementClass) {
        let stats = &mut self.stats;
        stats.total_features += 1;
        match class {
            AgreementClass::Same => stats.same += 1,
            AgreementClass::Partial => stats.partial += 1,
            AgreementClass::Different => stats.different += 1,
            AgreementClass::AllMissing => stats.all_missing += 1,
        }
        stats.missing_cells += values.iter().filter(|v| v.as_ref().is_empty()).count();

        let primary = values.first().map_or("", |v| v.as_ref());
        if primary.is_empty() {
            return;
        }
        for diff in &mut stats.slot_diffs {
            let other = values.get(diff.slot - 1).map_or("", |v| v.as_ref());
            if other.is_empty() {
                continue;
            }
            diff.compared += 1;
            if other != primary {
                diff.differing += 1;
            }
        }
    }

    /// Finish the fold.
    pub fn finish(mut self) -> AggregateStats {
        for diff in &mut self.stats.slot_diffs {
            diff.percent = if diff.compared == 0 {
                0.0
            } else {
                (diff.differing as f64 / diff.compared as f64 * 1000.0).round() / 10.0
            };
        }
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconcile::classify_row;

    fn fold(layout: SlotLayout, rows: &[&[&str]]) -> AggregateStats {
        let mut acc = StatsAccumulator::new(layout);
        for row in rows {
            acc.observe(*row, classify_row(*row).class);
        }
        acc.finish()
    }

    #[test]
    fn test_missing_cells_and_diff_percent() {
        let stats = fold(SlotLayout::ThreeWay, &[&["1", "1", "1"], &["2", "3", ""]]);

        assert_eq!(stats.total_features, 2);
        assert_eq!(stats.same, 1);
        assert_eq!(stats.different, 1);
        assert_eq!(stats.missing_cells, 1);

        let file2 = stats.slot_diff(2).unwrap();
        assert_eq!((file2.compared, file2.differing), (2, 1));
        assert_eq!(file2.percent, 50.0);
        assert_eq!(file2.percent_label(), "50.0%");
        assert_eq!(file2.name(), "File2 Diff");

        let file3 = stats.slot_diff(3).unwrap();
        assert_eq!((file3.compared, file3.differing), (1, 0));
        assert!(stats.slot_diff(4).is_none());
    }

    #[test]
    fn test_zero_denominator_is_zero_percent() {
        let stats = fold(SlotLayout::FourWay, &[&["", "a", "b", "c"]]);

        assert_eq!(stats.slot_diffs.len(), 3);
        for diff in &stats.slot_diffs {
            assert_eq!(diff.compared, 0);
            assert_eq!(diff.percent, 0.0);
            assert_eq!(diff.percent_label(), "0.0%");
        }
    }

    #[test]
    fn test_percent_rounds_to_one_decimal() {
        let stats = fold(
            SlotLayout::ThreeWay,
            &[&["a", "b", "a"], &["a", "a", "a"], &["a", "a", "a"]],
        );
        assert_eq!(stats.slot_diff(2).unwrap().percent, 33.3);
    }

    #[test]
    fn test_empty_run() {
        let stats = fold(SlotLayout::ThreeWay, &[]);
        assert_eq!(stats.total_features, 0);
        assert_eq!(stats.missing_cells, 0);
        assert_eq!(stats.slot_diffs.len(), 2);
    }
}
