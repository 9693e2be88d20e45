//! Source abstraction and metadata.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Feature name to value, as decoded from one source.
///
/// Keys are trimmed and non-empty. An empty value means the feature is present
/// but blank, which is different from the feature being absent.
pub type FeatureMap = IndexMap<String, String>;

/// Raw text of one source, before decoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceText {
    /// Display name, usually the file name.
    pub name: String,
    /// Full text content.
    pub text: String,
}

impl SourceText {
    /// Create a source from a display name and its text.
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }
}

/// Metadata about a decoded source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceMetadata {
    /// Slot index, 1-based.
    pub slot: usize,
    /// Display name.
    pub name: String,
    /// SHA-256 hash of the raw text.
    pub hash: String,
    /// Size of the raw text in bytes.
    pub size_bytes: u64,
    /// Number of distinct features decoded.
    pub feature_count: usize,
    /// Data lines dropped because they had no feature token.
    pub skipped_lines: usize,
    /// When the source was decoded.
    pub loaded_at: DateTime<Utc>,
}

impl SourceMetadata {
    /// Create metadata for a source that has been decoded.
    pub fn new(
        slot: usize,
        input: &SourceText,
        feature_count: usize,
        skipped_lines: usize,
    ) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(input.text.as_bytes());
        let hash = format!("sha256:{:x}", hasher.finalize());

        Self {
            slot,
            name: input.name.clone(),
            hash,
            size_bytes: input.text.len() as u64,
            feature_count,
            skipped_lines,
            loaded_at: Utc::now(),
        }
    }
}

/// A decoded source occupying one slot of a run.
#[derive(Debug, Clone)]
pub struct Source {
    /// Metadata describing the source.
    pub metadata: SourceMetadata,
    /// Decoded features.
    pub features: FeatureMap,
}

impl Source {
    /// Slot index, 1-based.
    pub fn slot(&self) -> usize {
        self.metadata.slot
    }

    /// Value for a feature, or "" when the source lacks it.
    pub fn value(&self, feature: &str) -> &str {
        self.features.get(feature).map(String::as_str).unwrap_or("")
    }
}
