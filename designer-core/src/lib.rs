//! # Designer Core
//!
//! Document model and editing engine for print designs: flyers, posters,
//! business cards and calendars laid out on a fixed-size canvas.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                   Editor                    │
//! ├─────────────────────────────────────────────┤
//! │  Document        │  Interaction             │
//! │  - Canvas        │  - Gestures              │
//! │  - Elements      │  - Keyboard shortcuts    │
//! │  - History       │  - Guides                │
//! ├─────────────────────────────────────────────┤
//! │  Viewport        │  Persistence             │
//! │  - Fit zoom      │  - JSON schema           │
//! │  - User zoom     │  - Autosave              │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```
//! use designer_core::{Editor, EditorConfig, ElementPatch};
//!
//! let mut editor = Editor::new(EditorConfig::default());
//! let id = editor.add_text(&ElementPatch::default());
//! editor
//!     .update_element(id, &ElementPatch::position(300.0, 100.0))
//!     .expect("element exists");
//!
//! assert!(editor.undo());
//! let x = editor.element(id).map(|e| e.transform.x);
//! assert_eq!(x, Some(100.0));
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod canvas;
pub mod config;
pub mod document;
pub mod editor;
pub mod element;
pub mod error;
pub mod event;
pub mod gesture;
pub mod guides;
pub mod history;
pub mod schema;
pub mod selection;
pub mod store;
pub mod viewport;

pub use canvas::{Canvas, CanvasPreset, CUSTOM_ASPECT};
pub use config::{EditorConfig, GuideMode, IdPolicy};
pub use document::Document;
pub use editor::{ChangeReason, DocumentObserver, Editor};
pub use element::{
    normalize_rotation, Element, ElementId, ElementKind, ElementPatch, ElementType, FontStyle,
    FontWeight, ImageContent, Point, ShapeContent, ShapeKind, TextAlign, TextContent, Transform,
};
pub use error::{EditorError, EditorResult};
pub use event::{InputEvent, Key, KeyModifiers, PointerTarget};
pub use gesture::{Gesture, GestureKind, Handle, ResizeHandle};
pub use guides::{compute_guides, Guides};
pub use history::{History, DEFAULT_HISTORY_LIMIT};
pub use schema::DesignDocument;
pub use selection::{LayerEntry, LayerMove, Selection};
pub use store::{AutoSave, SharedEditor};
pub use viewport::Viewport;

/// Designer core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
