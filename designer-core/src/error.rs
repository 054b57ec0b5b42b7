//! Error types for editor operations.

use thiserror::Error;

use crate::ElementId;

/// Result type for editor operations.
pub type EditorResult<T> = Result<T, EditorError>;

/// Errors that can occur in editor operations.
///
/// Geometry that falls outside its valid range (zoom, negative sizes,
/// opacity) is clamped and never reported here.
#[derive(Debug, Error)]
pub enum EditorError {
    /// Element not found in the document.
    #[error("Element not found: {0}")]
    ElementNotFound(ElementId),

    /// A reorder request was not a permutation of the current element ids.
    #[error("Invalid reorder: {0}")]
    InvalidReorder(String),

    /// A persisted design could not be parsed.
    #[error("Failed to parse design: {0}")]
    Parse(String),

    /// A persisted design contains the same element id twice.
    #[error("Duplicate element id in design: {0}")]
    DuplicateId(ElementId),

    /// Design serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// An I/O error occurred while reading or writing a design file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
