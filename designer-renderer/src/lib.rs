//! # Designer Renderer
//!
//! Turns designer documents into their rendered form and exports that form
//! to print-ready files.
//!
//! ## Pipeline
//!
//! ```text
//! ┌──────────┐   render   ┌────────────┐   export   ┌─────────────────┐
//! │ Document │ ─────────▶ │ CanvasView │ ─────────▶ │ PNG/JPEG/SVG/PDF│
//! └──────────┘            └────────────┘            └─────────────────┘
//!                          (SVG markup)   resvg + tiny-skia + printpdf
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod image;
pub mod render;

#[cfg(feature = "export")]
pub mod export;

pub use error::{RenderError, RenderResult};
pub use render::{CanvasView, RenderContainer, RenderOptions, Surface};

#[cfg(feature = "export")]
pub use export::{CanvasExporter, ExportConfig, ExportFormat};
