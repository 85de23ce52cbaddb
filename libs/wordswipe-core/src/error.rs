//! Error types for wordswipe-core.

use thiserror::Error;

/// Result type alias using VocabError.
pub type Result<T> = std::result::Result<T, VocabError>;

/// Failures surfaced to the presentation layer.
///
/// None of these are retried; they are returned as values and leave any
/// in-memory review session untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VocabError {
    #[error("not authenticated")]
    NotAuthenticated,

    #[error("store read failed: {0}")]
    StoreRead(String),

    #[error("store write failed: {0}")]
    StoreWrite(String),

    #[error("validation failed: {0}")]
    Validation(String),
}

impl VocabError {
    /// Stable machine-readable name.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotAuthenticated => "not_authenticated",
            Self::StoreRead(_) => "store_read_failure",
            Self::StoreWrite(_) => "store_write_failure",
            Self::Validation(_) => "validation_failure",
        }
    }
}
