//! Main Concord struct and public API.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::error::Result;
use crate::input::{Decoder, DecoderConfig, Source, SourceText};
use crate::projection::{export_file_name, ExportConfig};
use crate::reconcile::{ClassifierConfig, RowClassifier, RunState, SlotLayout};

/// Configuration for Concord runs.
#[derive(Debug, Clone, Default)]
pub struct ConcordConfig {
    /// Decoder configuration.
    pub decoder: DecoderConfig,
    /// Row classifier configuration.
    pub classifier: ClassifierConfig,
    /// Export configuration.
    pub export: ExportConfig,
}

/// The reconciliation engine.
///
/// Each call to [`reconcile`](Concord::reconcile) is one run and gets the next
/// generation number, so callers can tell which of two overlapping runs is
/// newer.
#[derive(Debug)]
pub struct Concord {
    config: ConcordConfig,
    decoder: Decoder,
    classifier: RowClassifier,
    generation: AtomicU64,
}

impl Concord {
    /// Create a Concord instance with default configuration.
    pub fn new() -> Self {
        Self::with_config(ConcordConfig::default())
    }

    /// Create a Concord instance with custom configuration.
    pub fn with_config(config: ConcordConfig) -> Self {
        let decoder = Decoder::with_config(config.decoder.clone());
        let classifier = RowClassifier::with_config(config.classifier.clone());

        Self {
            config,
            decoder,
            classifier,
            generation: AtomicU64::new(0),
        }
    }

    /// The engine's configuration.
    pub fn config(&self) -> &ConcordConfig {
        &self.config
    }

    /// Reconcile 3 or 4 sources in slot order.
    ///
    /// A fourth entry makes this a four-way run even when its text has no
    /// features.
    pub fn reconcile(&self, texts: &[SourceText]) -> Result<RunState> {
        SlotLayout::for_sources(texts.len())?;
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(generation, sources = texts.len(), "Starting run");

        let sources = self.decode_all(texts);
        RunState::build(generation, &sources, &self.classifier)
    }

    /// Decode every text into the slot matching its position.
    pub fn decode_all(&self, texts: &[SourceText]) -> Vec<Source> {
        texts
            .iter()
            .enumerate()
            .map(|(index, text)| self.decoder.decode_source(index + 1, text))
            .collect()
    }

    /// Generation of the most recently started run, 0 before any run.
    pub fn latest_generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Export file name for the given moment.
    pub fn export_file_name(&self, at: DateTime<Utc>) -> String {
        export_file_name(&self.config.export.file_prefix, at)
    }
}

impl Default for Concord {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConcordError;
    use crate::reconcile::AgreementClass;

    fn texts(n: usize) -> Vec<SourceText> {
        (1..=n)
            .map(|i| SourceText::new(format!("f{i}.csv"), format!("Feature,Data\nshared,1\nown{i},x")))
            .collect()
    }

    #[test]
    fn test_reconcile_assigns_generations() {
        let concord = Concord::new();
        assert_eq!(concord.latest_generation(), 0);

        let first = concord.reconcile(&texts(3)).unwrap();
        let second = concord.reconcile(&texts(4)).unwrap();

        assert_eq!(first.generation, 1);
        assert_eq!(second.generation, 2);
        assert_eq!(second.layout, SlotLayout::FourWay);
        assert_eq!(concord.latest_generation(), 2);
    }

    #[test]
    fn test_reconcile_rejects_bad_counts() {
        let concord = Concord::new();
        assert!(matches!(
            concord.reconcile(&texts(2)),
            Err(ConcordError::InsufficientSources { .. })
        ));
        assert!(matches!(
            concord.reconcile(&texts(5)),
            Err(ConcordError::TooManySources { .. })
        ));
        assert_eq!(concord.latest_generation(), 0);
    }

    #[test]
    fn test_all_missing_config() {
        let concord = Concord::with_config(ConcordConfig {
            classifier: ClassifierConfig {
                all_missing_class: true,
            },
            ..ConcordConfig::default()
        });
        let texts = vec![
            SourceText::new("a", "Feature,Data\nblank,"),
            SourceText::new("b", "Feature,Data\nblank,"),
            SourceText::new("c", "Feature,Data\nblank,"),
        ];
        let run = concord.reconcile(&texts).unwrap();

        assert_eq!(run.row("blank").unwrap().class, AgreementClass::AllMissing);
        assert_eq!(run.stats.all_missing, 1);
    }

    #[test]
    fn test_export_file_name_uses_prefix() {
        let concord = Concord::with_config(ConcordConfig {
            export: ExportConfig {
                file_prefix: "merged".to_string(),
            },
            ..ConcordConfig::default()
        });
        let name = concord.export_file_name(Utc::now());
        assert!(name.starts_with("merged_"));
        assert!(name.ends_with(".csv"));
    }
}
