//! Error taxonomy for the decoding pipeline.
//!
//! Three failure classes, all fatal: nothing is retried and no partial sweep
//! results are returned.
use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, DecodeError>;

/// Errors surfaced by the decoding helpers.
#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum DecodeError {
    /// Bad event mapping, malformed frequency/cycle arguments, invalid
    /// epoch duration and similar caller mistakes.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Mismatched dimensions between the feature tensor, the label array and
    /// the channel/frequency lists.
    #[error("shape mismatch: {0}")]
    Shape(String),

    /// Degenerate label set (fewer than two classes), too few samples per
    /// fold, or a failure inside the SVM / ROC scoring provider.
    #[error("classifier error: {0}")]
    Classifier(String),
}
