//! Error types for the redaction library.
//!
//! Errors are local to the operation that produced them. None of them leave
//! the redaction store or a document handle partially mutated.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for redaction operations.
pub type RedactorResult<T> = Result<T, RedactorError>;

/// A drawn rectangle whose clamped pixel extent fell below the noise
/// threshold.
///
/// This is an expected outcome of a stray click, so callers normally
/// discard it instead of reporting it.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error("drawn rectangle {width_px:.1}x{height_px:.1} px is below the {threshold_px:.1} px threshold")]
pub struct DegenerateDraw {
    pub width_px: f64,
    pub height_px: f64,
    pub threshold_px: f64,
}

/// Error type for all redaction operations.
#[derive(Debug, Error)]
pub enum RedactorError {
    /// The search pattern failed to compile. No state was mutated.
    #[error("Invalid pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// A drawn rectangle was too small to be a deliberate mark.
    #[error(transparent)]
    DegenerateDraw(#[from] DegenerateDraw),

    /// Applying or saving redactions failed. The source document is untouched.
    #[error("{}", commit_message(.message, .page))]
    Commit {
        message: String,
        page: Option<usize>,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A page index outside the open document.
    #[error("Page index {page} out of range (document has {page_count} pages)")]
    PageOutOfRange { page: usize, page_count: usize },

    /// Invalid parameters supplied by the caller.
    #[error("Invalid input for '{parameter}': {reason}")]
    InvalidInput { parameter: String, reason: String },

    /// Error occurred while reading or writing files.
    #[error("IO error for path '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Document library failure outside of a commit (opening, text extraction).
    #[error("{backend} backend error: {message}")]
    Backend {
        backend: String,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Settings could not be parsed or failed validation.
    #[error("Configuration error: {reason}")]
    Config { reason: String },
}

fn commit_message(message: &str, page: &Option<usize>) -> String {
    match page {
        Some(p) => format!("Commit failed on page {}: {}", p + 1, message),
        None => format!("Commit failed: {}", message),
    }
}

impl RedactorError {
    /// Builds a commit error, optionally tied to a zero-based page index.
    pub fn commit(
        message: impl Into<String>,
        page: Option<usize>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Commit {
            message: message.into(),
            page,
            source: Some(Box::new(source)),
        }
    }

    /// Builds an invalid-pattern error carrying the engine's diagnostic.
    pub fn invalid_pattern(pattern: impl Into<String>, reason: impl ToString) -> Self {
        Self::InvalidPattern {
            pattern: pattern.into(),
            reason: reason.to_string(),
        }
    }

    /// Returns true for outcomes the operator should never be shown.
    pub fn is_silent(&self) -> bool {
        matches!(self, Self::DegenerateDraw(_))
    }
}

impl From<toml::de::Error> for RedactorError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config {
            reason: err.to_string(),
        }
    }
}
