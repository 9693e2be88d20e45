//! Per-row agreement classification.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

/// How well the sources agree on one feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgreementClass {
    /// Every slot holds the same non-empty value.
    Same,
    /// Some slots agree, but not all.
    Partial,
    /// Every slot differs; empty cells count as distinct values.
    Different,
    /// Every slot is empty. Only produced when
    /// [`ClassifierConfig::all_missing_class`] is set.
    AllMissing,
}

impl AgreementClass {
    /// Get a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            AgreementClass::Same => "Same",
            AgreementClass::Partial => "Partial",
            AgreementClass::Different => "Different",
            AgreementClass::AllMissing => "All Missing",
        }
    }

    /// Tag given to the non-empty cells of a row in this class.
    pub fn cell_tag(&self) -> CellTag {
        match self {
            AgreementClass::Same => CellTag::Green,
            AgreementClass::Partial => CellTag::Yellow,
            AgreementClass::Different => CellTag::Red,
            AgreementClass::AllMissing => CellTag::Blue,
        }
    }
}

/// Display color of one cell.
///
/// Empty cells are always blue; other cells take the color of their row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellTag {
    Green,
    Yellow,
    Red,
    Blue,
}

impl CellTag {
    /// Color name.
    pub fn as_str(&self) -> &'static str {
        match self {
            CellTag::Green => "green",
            CellTag::Yellow => "yellow",
            CellTag::Red => "red",
            CellTag::Blue => "blue",
        }
    }
}

/// Classifier output for one row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    /// Agreement class of the row.
    pub class: AgreementClass,
    /// Recommended final value; "" means no recommendation.
    pub final_value: String,
    /// One tag per slot.
    pub cells: Vec<CellTag>,
}

impl Classification {
    /// Whether the final value was filled in automatically.
    pub fn auto_filled(&self) -> bool {
        match self.class {
            AgreementClass::Same => true,
            AgreementClass::Partial => !self.final_value.is_empty(),
            AgreementClass::Different | AgreementClass::AllMissing => false,
        }
    }
}

/// Classifier configuration.
#[derive(Debug, Clone, Default)]
pub struct ClassifierConfig {
    /// Give rows whose cells are all empty their own class instead of
    /// classifying them as [`AgreementClass::Different`].
    pub all_missing_class: bool,
}

/// A cell as seen by the distinctness check. Each empty cell carries its
/// position, so no two empty cells are ever equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Distinct<'a> {
    Value(&'a str),
    Empty(usize),
}

/// Classifies rows of per-slot values.
#[derive(Debug, Clone, Default)]
pub struct RowClassifier {
    config: ClassifierConfig,
}

impl RowClassifier {
    /// Create a classifier with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a classifier with custom configuration.
    pub fn with_config(config: ClassifierConfig) -> Self {
        Self { config }
    }

    /// Classify one row. `values` holds one entry per active slot, with ""
    /// for a slot that lacks the feature.
    pub fn classify<S: AsRef<str>>(&self, values: &[S]) -> Classification {
        let cells: Vec<&str> = values.iter().map(|v| v.as_ref()).collect();

        if self.config.all_missing_class && !cells.is_empty() && cells.iter().all(|c| c.is_empty())
        {
            return Classification {
                class: AgreementClass::AllMissing,
                final_value: String::new(),
                cells: vec![CellTag::Blue; cells.len()],
            };
        }

        let any_empty = cells.iter().any(|c| c.is_empty());
        let distinct: HashSet<Distinct<'_>> = cells
            .iter()
            .enumerate()
            .map(|(position, cell)| {
                if cell.is_empty() {
                    Distinct::Empty(position)
                } else {
                    Distinct::Value(*cell)
                }
            })
            .collect();

        let (class, final_value) = if distinct.len() == 1 && !any_empty {
            (AgreementClass::Same, cells[0])
        } else if distinct.len() == cells.len() {
            (AgreementClass::Different, "")
        } else {
            (AgreementClass::Partial, most_common(&cells))
        };

        let tags = cells
            .iter()
            .map(|cell| {
                if cell.is_empty() {
                    CellTag::Blue
                } else {
                    class.cell_tag()
                }
            })
            .collect();

        Classification {
            class,
            final_value: final_value.to_string(),
            cells: tags,
        }
    }
}

/// Classify a row with the default configuration.
pub fn classify_row<S: AsRef<str>>(values: &[S]) -> Classification {
    RowClassifier::new().classify(values)
}

/// Most frequent non-empty value; the lowest slot wins a tie. Returns "" when
/// every cell is empty.
fn most_common<'a>(cells: &[&'a str]) -> &'a str {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for cell in cells.iter().filter(|c| !c.is_empty()) {
        *counts.entry(*cell).or_insert(0) += 1;
    }

    let mut best = "";
    let mut best_count = 0;
    for cell in cells.iter().filter(|c| !c.is_empty()) {
        let count = counts.get(cell).copied().unwrap_or(0);
        if count > best_count {
            best = *cell;
            best_count = count;
        }
    }
    best
}
