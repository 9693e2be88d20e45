//! Feature alignment across sources.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::{ConcordError, Result};
use crate::input::FeatureMap;

use super::{MAX_SOURCES, REQUIRED_SOURCES};

/// How many slots a run compares.
///
/// Decided once per run from whether a fourth source was supplied at all, not
/// from whether its feature map has entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotLayout {
    ThreeWay,
    FourWay,
}

impl SlotLayout {
    /// Layout for a run with the given number of supplied sources.
    pub fn for_sources(count: usize) -> Result<Self> {
        match count {
            n if n < REQUIRED_SOURCES => Err(ConcordError::InsufficientSources {
                required: REQUIRED_SOURCES,
                provided: n,
                failures: Vec::new(),
            }),
            3 => Ok(SlotLayout::ThreeWay),
            4 => Ok(SlotLayout::FourWay),
            n => Err(ConcordError::TooManySources {
                max: MAX_SOURCES,
                provided: n,
            }),
        }
    }

    /// Number of active slots.
    pub fn slot_count(&self) -> usize {
        match self {
            SlotLayout::ThreeWay => 3,
            SlotLayout::FourWay => 4,
        }
    }
}

/// Sorted, deduplicated union of the feature names of every map.
///
/// Sorting is by byte order, not locale.
pub fn align_features<'a>(maps: impl IntoIterator<Item = &'a FeatureMap>) -> Vec<String> {
    let keys: BTreeSet<&str> = maps
        .into_iter()
        .flat_map(|map| map.keys().map(String::as_str))
        .collect();
    keys.into_iter().map(str::to_string).collect()
}
