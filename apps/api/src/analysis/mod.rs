// Resume analysis pipeline.
// Text extraction → skill/keyword extraction (via LanguageModel) → scoring → suggestions.
// Everything here is synchronous and CPU-bound; async callers go through spawn_blocking.

pub mod analyzer;
#[cfg(feature = "rust-bert")]
pub mod bert;
pub mod extractor;
pub mod handlers;
pub mod keywords;
pub mod lexicon;
pub mod nlp;
pub mod similarity;

use thiserror::Error;

/// Failure modes of a single analysis. All are fatal to the call; nothing is retried.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("Text extraction failed: {0}")]
    ExtractionFailure(String),

    #[error("Job description yields no {0}; match percentage is undefined")]
    EmptyReferenceSet(&'static str),

    #[error("Language model failure: {0}")]
    ModelFailure(String),
}
