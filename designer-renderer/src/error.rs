//! Renderer error types.

use thiserror::Error;

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Errors that can occur during rendering and export.
///
/// Export failures never touch the document; callers report them and keep
/// editing.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The render container could not be located or has nothing mounted.
    #[error("Render container not found: {0}")]
    ContainerNotFound(String),

    /// Rasterizing or encoding the capture failed.
    #[error("Export failed: {0}")]
    Export(String),

    /// Resource loading failed.
    #[error("Failed to load resource: {0}")]
    Resource(String),
}
