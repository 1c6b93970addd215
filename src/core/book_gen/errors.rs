//! Book Generation Error Types
//!
//! Only invalid input is a hard failure. Thin vocabularies are padded and an
//! exhausted paragraph budget yields best-effort text, so neither appears here.

use thiserror::Error;

// ============================================================================
// Validation Errors
// ============================================================================

/// Errors raised while validating [`BookOptions`](super::BookOptions) before
/// any assembly work starts.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Topic is shorter than the minimum number of characters.
    #[error("Topic must be at least {min} characters long (got {actual})")]
    TopicTooShort { min: usize, actual: usize },

    /// A numeric option was zero where a positive value is required.
    #[error("Option '{field}' must be a positive number")]
    NonPositive { field: &'static str },

    /// A seed was not 16 hex digits.
    #[error("Invalid seed '{value}', expected 16 hex digits")]
    InvalidSeed { value: String },
}

impl ValidationError {
    /// Create a TopicTooShort error.
    pub fn topic_too_short(min: usize, actual: usize) -> Self {
        Self::TopicTooShort { min, actual }
    }

    /// Create a NonPositive error.
    pub fn non_positive(field: &'static str) -> Self {
        Self::NonPositive { field }
    }

    /// Create an InvalidSeed error.
    pub fn invalid_seed(value: impl Into<String>) -> Self {
        Self::InvalidSeed {
            value: value.into(),
        }
    }

    /// Name of the offending option, for form-level error display.
    pub fn field(&self) -> &'static str {
        match self {
            Self::TopicTooShort { .. } => "topic",
            Self::NonPositive { field } => *field,
            Self::InvalidSeed { .. } => "seed",
        }
    }
}

// ============================================================================
// Generation Errors
// ============================================================================

/// Errors that can interrupt long-form text generation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    /// The caller cancelled generation at a paragraph boundary.
    #[error("Long-form generation cancelled after {paragraphs} paragraphs ({words} words)")]
    Cancelled { paragraphs: usize, words: usize },
}

impl GenerationError {
    /// Create a Cancelled error.
    pub fn cancelled(paragraphs: usize, words: usize) -> Self {
        Self::Cancelled { paragraphs, words }
    }
}
