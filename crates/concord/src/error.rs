//! Error types for the Concord library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Concord operations.
#[derive(Debug, Error)]
pub enum ConcordError {
    /// Fewer sources than a run needs. `failures` holds the read errors of
    /// the required slots that could not be loaded.
    #[error(
        "At least {required} sources are required, got {provided}{}",
        failure_summary(.failures)
    )]
    InsufficientSources {
        required: usize,
        provided: usize,
        failures: Vec<ConcordError>,
    },

    /// More sources than the engine supports.
    #[error("At most {max} sources are supported, got {provided}")]
    TooManySources { max: usize, provided: usize },

    /// Reading one source failed.
    #[error("Failed to read source {slot} from '{path}': {source}")]
    SourceRead {
        slot: usize,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The feature is not a row of the current run.
    #[error("Unknown feature: {0}")]
    UnknownFeature(String),

    /// No run has been loaded yet.
    #[error("No sources have been loaded")]
    NoRun,

    /// A newer run was installed before this one finished.
    #[error("Run {generation} was superseded by run {current}")]
    Superseded { generation: u64, current: u64 },

    /// Error reading or writing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

fn failure_summary(failures: &[ConcordError]) -> String {
    if failures.is_empty() {
        return String::new();
    }
    let messages: Vec<String> = failures.iter().map(|e| e.to_string()).collect();
    format!(" ({})", messages.join("; "))
}

/// Result type alias for Concord operations.
pub type Result<T> = std::result::Result<T, ConcordError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_sources_names_failures() {
        let err = ConcordError::InsufficientSources {
            required: 3,
            provided: 2,
            failures: vec![ConcordError::SourceRead {
                slot: 2,
                path: PathBuf::from("second.csv"),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            }],
        };
        let message = err.to_string();
        assert!(message.starts_with("At least 3 sources are required, got 2 ("));
        assert!(message.contains("source 2"));
        assert!(message.contains("second.csv"));
    }

    #[test]
    fn test_insufficient_sources_without_failures() {
        let err = ConcordError::InsufficientSources {
            required: 3,
            provided: 1,
            failures: Vec::new(),
        };
        assert_eq!(err.to_string(), "At least 3 sources are required, got 1");
    }
}
