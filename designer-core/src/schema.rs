//! Persisted design format.
//!
//! A design is stored as JSON: the canvas record plus the element list in
//! z-order. History and selection are session-local and never stored.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{Canvas, Document, EditorError, EditorResult, Element};

/// Current format version written by [`save`].
pub const FORMAT_VERSION: u32 = 1;

const fn default_version() -> u32 {
    FORMAT_VERSION
}

/// Canonical serialized design.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignDocument {
    /// Format version.
    #[serde(default = "default_version")]
    pub version: u32,
    /// Canvas configuration.
    pub canvas: Canvas,
    /// Elements in z-order, bottom first.
    #[serde(default)]
    pub elements: Vec<Element>,
}

impl From<&Document> for DesignDocument {
    fn from(document: &Document) -> Self {
        Self {
            version: FORMAT_VERSION,
            canvas: document.canvas.clone(),
            elements: document.elements().to_vec(),
        }
    }
}

impl DesignDocument {
    /// Validate and convert into a runtime document.
    ///
    /// Element geometry and opacity are clamped into range, as on edit.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::Parse`] for an invalid canvas or unsupported
    /// version and [`EditorError::DuplicateId`] when two elements share an id.
    pub fn into_document(mut self) -> EditorResult<Document> {
        if self.version > FORMAT_VERSION {
            return Err(EditorError::Parse(format!(
                "unsupported format version {}",
                self.version
            )));
        }
        if !self.canvas.is_valid() {
            return Err(EditorError::Parse(format!(
                "invalid canvas {}x{} ({})",
                self.canvas.width, self.canvas.height, self.canvas.aspect
            )));
        }
        let mut seen = HashSet::with_capacity(self.elements.len());
        for element in &self.elements {
            if !seen.insert(element.id) {
                return Err(EditorError::DuplicateId(element.id));
            }
        }
        for element in &mut self.elements {
            element.normalize();
        }
        Ok(Document::from_parts(self.canvas, self.elements))
    }
}

/// Parse a serialized design.
///
/// # Errors
///
/// Returns [`EditorError::Parse`] (or [`EditorError::DuplicateId`]) on
/// malformed input. Nothing is modified on failure.
pub fn load(serialized: &str) -> EditorResult<Document> {
    let design: DesignDocument =
        serde_json::from_str(serialized).map_err(|e| EditorError::Parse(e.to_string()))?;
    design.into_document()
}

/// Serialize a document.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn save(document: &Document) -> EditorResult<String> {
    Ok(serde_json::to_string_pretty(&DesignDocument::from(document))?)
}
