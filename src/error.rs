use std::path::PathBuf;

use thiserror::Error;

use crate::core::{DocumentId, Ticks};

/// A rejected simulation input. Checked once, before any event is processed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidInput {
    #[error("{arrivals} arrival times but {durations} processing durations")]
    LengthMismatch { arrivals: usize, durations: usize },

    #[error("document {document} has negative processing duration {duration}")]
    NegativeDuration { document: DocumentId, duration: Ticks },

    #[error("document {document} would complete past the end of time")]
    CompletionOverflow { document: DocumentId },

    #[error("document at position {index} carries id {id}")]
    DocumentIdMismatch { index: usize, id: DocumentId },

    #[error("worker count out of range: {0}")]
    WorkersOutOfRange(i64),

    #[error("top-k out of range: {0}")]
    TopKOutOfRange(i64),
}

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] InvalidInput),

    #[error("Failed to read scenario {path}: {source}")]
    ScenarioIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse scenario: {0}")]
    ScenarioParse(#[from] serde_json::Error),
}
