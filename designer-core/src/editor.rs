//! The editing session.
//!
//! [`Editor`] owns the document, the undo history, the selection, the
//! viewport and the in-flight gesture. Every mutating operation records the
//! prior element list in the history, clears the redo stack and notifies the
//! registered [`DocumentObserver`]s once the change has settled.

use crate::gesture::{Gesture, GestureKind};
use crate::guides::{compute_guides, Guides};
use crate::history::{Frame, History};
use crate::selection::{self, LayerEntry, LayerMove, Selection};
use crate::{
    schema, Canvas, CanvasPreset, Document, EditorConfig, EditorError, EditorResult, Element,
    ElementId, ElementKind, ElementPatch, ElementType, IdPolicy, ImageContent, InputEvent, Key,
    KeyModifiers, Point, PointerTarget, ShapeKind, Transform, Viewport,
};

/// Default viewport width before the host reports its size.
const DEFAULT_VIEWPORT_WIDTH: f32 = 1280.0;

/// Default viewport height before the host reports its size.
const DEFAULT_VIEWPORT_HEIGHT: f32 = 720.0;

/// Why the document changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeReason {
    /// An element was added.
    Add,
    /// An element was updated.
    Update,
    /// An element was deleted.
    Delete,
    /// The element order changed.
    Reorder,
    /// A drag, resize or rotate gesture was committed.
    Gesture,
    /// History stepped back.
    Undo,
    /// History stepped forward.
    Redo,
    /// The canvas was resized.
    Canvas,
    /// A persisted design replaced the document.
    Load,
}

/// Receives the settled document after every change.
///
/// Observers see an immutable view; anything they keep must be copied.
/// Gesture previews are not reported, only the committed result.
pub trait DocumentObserver: Send + Sync {
    /// Called after the document changed.
    fn document_changed(&mut self, document: &Document, reason: ChangeReason);
}

impl<F> DocumentObserver for F
where
    F: FnMut(&Document, ChangeReason) + Send + Sync,
{
    fn document_changed(&mut self, document: &Document, reason: ChangeReason) {
        self(document, reason);
    }
}

/// A gesture together with the element list from before it started.
struct ActiveGesture {
    gesture: Gesture,
    before: Frame,
}

/// An editing session over one document.
pub struct Editor {
    config: EditorConfig,
    document: Document,
    history: History,
    selection: Selection,
    viewport: Viewport,
    gesture: Option<ActiveGesture>,
    observers: Vec<Box<dyn DocumentObserver>>,
}

impl std::fmt::Debug for Editor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Editor")
            .field("config", &self.config)
            .field("document", &self.document)
            .field("history", &self.history)
            .field("selection", &self.selection)
            .field("viewport", &self.viewport)
            .field("gesture", &self.gesture.as_ref().map(|g| &g.gesture))
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl Editor {
    /// Start a session on an empty default canvas.
    #[must_use]
    pub fn new(config: EditorConfig) -> Self {
        Self::with_document(Document::default(), config)
    }

    /// Start a session on an existing document.
    #[must_use]
    pub fn with_document(document: Document, config: EditorConfig) -> Self {
        let viewport = Viewport::new(
            DEFAULT_VIEWPORT_WIDTH,
            DEFAULT_VIEWPORT_HEIGHT,
            &document.canvas,
            &config,
        );
        Self {
            history: History::new(config.history_limit),
            config,
            document,
            selection: Selection::default(),
            viewport,
            gesture: None,
            observers: Vec::new(),
        }
    }

    /// Start a session on an empty canvas of a named preset.
    #[must_use]
    pub fn from_preset(preset: CanvasPreset, config: EditorConfig) -> Self {
        Self::with_document(Document::new(Canvas::from_preset(preset)), config)
    }

    /// Start a session from a persisted design.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::Parse`] if the design is malformed.
    pub fn from_design(serialized: &str, config: EditorConfig) -> EditorResult<Self> {
        Ok(Self::with_document(schema::load(serialized)?, config))
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    /// The current document.
    #[must_use]
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// The current elements, back-to-front.
    #[must_use]
    pub fn elements(&self) -> &[Element] {
        self.document.elements()
    }

    /// Get an element by ID.
    #[must_use]
    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.document.get(id)
    }

    /// Owned copy of the document for export or persistence.
    #[must_use]
    pub fn snapshot(&self) -> Document {
        self.document.clone()
    }

    /// The session configuration.
    #[must_use]
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// The undo/redo history.
    #[must_use]
    pub fn history(&self) -> &History {
        &self.history
    }

    /// The selected element id.
    #[must_use]
    pub fn selection(&self) -> Option<ElementId> {
        self.selection.get()
    }

    /// The zoom state.
    #[must_use]
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Whether a pointer gesture is in flight.
    #[must_use]
    pub fn is_gesture_active(&self) -> bool {
        self.gesture.is_some()
    }

    /// Register an observer for settled document changes.
    pub fn subscribe(&mut self, observer: impl DocumentObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    // -----------------------------------------------------------------------
    // Element operations
    // -----------------------------------------------------------------------

    /// Add an element of `element_type`, with `patch` merged over the type defaults.
    ///
    /// The element goes on top of the stack and becomes the selection.
    pub fn add_element(&mut self, element_type: ElementType, patch: &ElementPatch) -> ElementId {
        let mut element = Element::with_defaults(element_type);
        element.apply_patch(patch);
        self.insert_element(element)
    }

    /// Add a text element.
    pub fn add_text(&mut self, patch: &ElementPatch) -> ElementId {
        self.add_element(ElementType::Text, patch)
    }

    /// Add a shape element of the given primitive.
    pub fn add_shape(&mut self, shape: ShapeKind, patch: &ElementPatch) -> ElementId {
        let patch = ElementPatch {
            shape: Some(shape),
            ..patch.clone()
        };
        self.add_element(ElementType::Shape, &patch)
    }

    /// Add an image element referencing `src`.
    pub fn add_image(&mut self, src: impl Into<String>, patch: &ElementPatch) -> ElementId {
        let mut element = Element::new(ElementKind::Image(ImageContent { src: src.into() }));
        element.apply_patch(patch);
        self.insert_element(element)
    }

    fn insert_element(&mut self, element: Element) -> ElementId {
        self.settle_gesture();
        let id = element.id;
        let before = self.frame();
        self.document.push(element);
        self.selection.set(id);
        tracing::debug!(%id, "Element added");
        self.commit(before, ChangeReason::Add);
        id
    }

    /// Merge the supplied fields of `patch` into an element.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::ElementNotFound`] under [`IdPolicy::Strict`].
    pub fn update_element(&mut self, id: ElementId, patch: &ElementPatch) -> EditorResult<()> {
        self.settle_gesture();
        if !self.document.contains(id) {
            return self.missing(id);
        }
        let before = self.frame();
        if let Some(element) = self.document.get_mut(id) {
            element.apply_patch(patch);
        }
        self.commit(before, ChangeReason::Update);
        Ok(())
    }

    /// Remove an element, clearing the selection if it pointed at it.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::ElementNotFound`] under [`IdPolicy::Strict`].
    pub fn delete_element(&mut self, id: ElementId) -> EditorResult<()> {
        self.settle_gesture();
        if !self.document.contains(id) {
            return self.missing(id);
        }
        let before = self.frame();
        self.document.remove(id);
        if self.selection.is_selected(id) {
            self.selection.clear();
        }
        tracing::debug!(%id, "Element deleted");
        self.commit(before, ChangeReason::Delete);
        Ok(())
    }

    /// Copy an element under a fresh id directly above the original.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::ElementNotFound`] if the element does not exist.
    pub fn duplicate_element(&mut self, id: ElementId) -> EditorResult<ElementId> {
        self.settle_gesture();
        let (index, source) = match (self.document.index_of(id), self.document.get(id)) {
            (Some(index), Some(source)) => (index, source),
            _ => return Err(EditorError::ElementNotFound(id)),
        };
        let offset = self.config.duplicate_offset;
        let copy = source.duplicate(offset, offset);
        let copy_id = copy.id;
        let before = self.frame();
        self.document.insert(index + 1, copy);
        self.selection.set(copy_id);
        self.commit(before, ChangeReason::Add);
        Ok(copy_id)
    }

    /// Replace the element order with a permutation of the current ids.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::InvalidReorder`] if `order` adds, drops or
    /// repeats an id. The document is left untouched in that case.
    pub fn reorder_elements(&mut self, order: &[ElementId]) -> EditorResult<()> {
        self.settle_gesture();
        if !self.document.is_permutation(order) {
            return Err(EditorError::InvalidReorder(format!(
                "expected a permutation of {} element ids, got {}",
                self.document.len(),
                order.len()
            )));
        }
        let before = self.frame();
        self.document.apply_order(order);
        self.commit(before, ChangeReason::Reorder);
        Ok(())
    }

    /// Move a layers-panel row (top-most first) to another row.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::InvalidReorder`] if either index is out of range.
    pub fn move_layer(&mut self, from_visual: usize, to_visual: usize) -> EditorResult<()> {
        let len = self.document.len();
        if from_visual >= len || to_visual >= len {
            return Err(EditorError::InvalidReorder(format!(
                "layer index out of range: {from_visual} -> {to_visual} with {len} layers"
            )));
        }
        match selection::move_layer_order(&self.document, from_visual, to_visual) {
            Some(order) => self.reorder_elements(&order),
            None => Ok(()),
        }
    }

    /// Apply a z-order shortcut to an element.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::ElementNotFound`] under [`IdPolicy::Strict`].
    pub fn move_layer_by(&mut self, id: ElementId, layer_move: LayerMove) -> EditorResult<()> {
        if !self.document.contains(id) {
            return self.missing(id);
        }
        match selection::layer_move_order(&self.document, id, layer_move) {
            Some(order) => self.reorder_elements(&order),
            None => Ok(()),
        }
    }

    /// Rows of the layers panel, top-most first.
    #[must_use]
    pub fn layers(&self) -> Vec<LayerEntry> {
        selection::layers(&self.document, self.selection)
    }

    // -----------------------------------------------------------------------
    // History
    // -----------------------------------------------------------------------

    /// Step back one frame. Returns `false` if there was nothing to undo.
    pub fn undo(&mut self) -> bool {
        self.settle_gesture();
        if !self.history.can_undo() {
            return false;
        }
        let current = self.frame();
        let Some(previous) = self.history.undo(current) else {
            return false;
        };
        self.document.replace_elements(previous);
        self.selection.clear();
        tracing::debug!(undo = self.history.undo_count(), redo = self.history.redo_count(), "Undo");
        self.notify(ChangeReason::Undo);
        true
    }

    /// Step forward one frame. Returns `false` if there was nothing to redo.
    pub fn redo(&mut self) -> bool {
        self.settle_gesture();
        if !self.history.can_redo() {
            return false;
        }
        let current = self.frame();
        let Some(next) = self.history.redo(current) else {
            return false;
        };
        self.document.replace_elements(next);
        self.selection.clear();
        tracing::debug!(undo = self.history.undo_count(), redo = self.history.redo_count(), "Redo");
        self.notify(ChangeReason::Redo);
        true
    }

    /// Check if undo is available.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Check if redo is available.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // -----------------------------------------------------------------------
    // Selection and guides
    // -----------------------------------------------------------------------

    /// Select an element.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::ElementNotFound`] under [`IdPolicy::Strict`].
    pub fn select(&mut self, id: ElementId) -> EditorResult<()> {
        if !self.document.contains(id) {
            return self.missing(id);
        }
        self.selection.set(id);
        Ok(())
    }

    /// Clear the selection.
    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Alignment guides for the selected element.
    #[must_use]
    pub fn guides(&self) -> Guides {
        match self.selection.get() {
            Some(id) => compute_guides(
                self.document.elements(),
                id,
                self.config.snap_tolerance,
                self.config.guide_mode,
            ),
            None => Guides::default(),
        }
    }

    // -----------------------------------------------------------------------
    // Gestures
    // -----------------------------------------------------------------------

    /// Start a drag, resize or rotate gesture at a screen position.
    ///
    /// The element becomes the selection. Nothing is recorded until
    /// [`Editor::end_gesture`].
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::ElementNotFound`] under [`IdPolicy::Strict`].
    pub fn begin_gesture(
        &mut self,
        id: ElementId,
        kind: GestureKind,
        pointer: Point,
    ) -> EditorResult<()> {
        self.settle_gesture();
        let Some(element) = self.document.get(id) else {
            return self.missing(id);
        };
        let gesture = Gesture::begin(id, kind, pointer, element.transform);
        self.selection.set(id);
        self.gesture = Some(ActiveGesture {
            gesture,
            before: self.frame(),
        });
        tracing::debug!(%id, ?kind, "Gesture started");
        Ok(())
    }

    /// Move the pointer of the active gesture. Returns the preview geometry.
    ///
    /// Previews update the element in place without touching the history.
    pub fn update_gesture(&mut self, pointer: Point) -> Option<Transform> {
        let active = self.gesture.as_ref()?;
        let id = active.gesture.element();
        let preview = active.gesture.preview(pointer, &self.viewport);
        let element = self.document.get_mut(id)?;
        element.transform = preview;
        Some(preview)
    }

    /// Release the active gesture, committing one history frame if the
    /// geometry changed. Returns `true` if a change was committed.
    pub fn end_gesture(&mut self) -> bool {
        let Some(active) = self.gesture.take() else {
            return false;
        };
        let id = active.gesture.element();
        let changed = self
            .document
            .get(id)
            .is_some_and(|e| e.transform != active.gesture.origin());
        if changed {
            tracing::debug!(%id, kind = ?active.gesture.kind(), "Gesture committed");
            self.commit(active.before, ChangeReason::Gesture);
        }
        changed
    }

    /// Abort the active gesture, restoring the geometry it started from.
    ///
    /// Returns `true` if a gesture was cancelled. No history is written.
    pub fn cancel_gesture(&mut self) -> bool {
        let Some(active) = self.gesture.take() else {
            return false;
        };
        if let Some(element) = self.document.get_mut(active.gesture.element()) {
            element.transform = active.gesture.origin();
        }
        tracing::debug!(id = %active.gesture.element(), "Gesture cancelled");
        true
    }

    fn settle_gesture(&mut self) {
        if self.gesture.is_some() {
            self.end_gesture();
        }
    }

    /// Move the selected element by a document-space offset.
    ///
    /// No-op without a selection.
    ///
    /// # Errors
    ///
    /// Propagates [`Editor::update_element`] errors.
    pub fn nudge_selected(&mut self, dx: f32, dy: f32) -> EditorResult<()> {
        let Some(id) = self.selection.get() else {
            return Ok(());
        };
        let Some(element) = self.document.get(id) else {
            return self.missing(id);
        };
        let t = element.transform;
        self.update_element(id, &ElementPatch::position(t.x + dx, t.y + dy))
    }

    /// Rotate the selected element by `degrees`.
    ///
    /// # Errors
    ///
    /// Propagates [`Editor::update_element`] errors.
    pub fn rotate_selected(&mut self, degrees: f32) -> EditorResult<()> {
        let Some(id) = self.selection.get() else {
            return Ok(());
        };
        let Some(element) = self.document.get(id) else {
            return self.missing(id);
        };
        let rotation = element.transform.rotation + degrees;
        self.update_element(id, &ElementPatch::rotation(rotation))
    }

    // -----------------------------------------------------------------------
    // Canvas and viewport
    // -----------------------------------------------------------------------

    /// Resize the canvas. Not recorded in the history.
    ///
    /// Aspect labels that name no preset are stored as custom.
    pub fn resize_canvas(&mut self, canvas: Canvas) {
        self.settle_gesture();
        self.document.canvas = canvas.normalized();
        self.viewport.refit(&self.document.canvas);
        tracing::debug!(
            width = self.document.canvas.width,
            height = self.document.canvas.height,
            "Canvas resized"
        );
        self.notify(ChangeReason::Canvas);
    }

    /// Resize the canvas to a named preset.
    pub fn apply_preset(&mut self, preset: CanvasPreset) {
        self.resize_canvas(Canvas::from_preset(preset));
    }

    /// Report a new viewport size.
    pub fn set_viewport_size(&mut self, width: f32, height: f32) {
        self.viewport.resize(width, height, &self.document.canvas);
    }

    /// Zoom in one step.
    pub fn zoom_in(&mut self) {
        self.viewport.zoom_in();
    }

    /// Zoom out one step.
    pub fn zoom_out(&mut self) {
        self.viewport.zoom_out();
    }

    /// Set the user zoom (clamped).
    pub fn set_zoom(&mut self, zoom: f32) {
        self.viewport.set_user_zoom(zoom);
    }

    /// Reset the user zoom to 100%.
    pub fn reset_zoom(&mut self) {
        self.viewport.reset_zoom();
    }

    // -----------------------------------------------------------------------
    // Persistence
    // -----------------------------------------------------------------------

    /// Replace the document with a persisted design.
    ///
    /// All-or-nothing: on error the current document, history and selection
    /// are untouched. On success the history and selection are cleared.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::Parse`] or [`EditorError::DuplicateId`].
    pub fn load_design(&mut self, serialized: &str) -> EditorResult<()> {
        let document = schema::load(serialized)?;
        self.gesture = None;
        self.document = document;
        self.history.clear();
        self.selection.clear();
        self.viewport.refit(&self.document.canvas);
        tracing::info!(elements = self.document.len(), "Design loaded");
        self.notify(ChangeReason::Load);
        Ok(())
    }

    /// Serialize the current document.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn save_design(&self) -> EditorResult<String> {
        schema::save(&self.document)
    }

    // -----------------------------------------------------------------------
    // Input dispatch
    // -----------------------------------------------------------------------

    /// Process an input event.
    ///
    /// # Errors
    ///
    /// Returns an error if the event references an unknown element under
    /// [`IdPolicy::Strict`].
    pub fn handle_event(&mut self, event: &InputEvent) -> EditorResult<()> {
        match event {
            InputEvent::PointerDown { position, target } => {
                let target = target.unwrap_or_else(|| self.hit_test(*position));
                match target {
                    PointerTarget::Canvas => {
                        self.settle_gesture();
                        self.selection.clear();
                        Ok(())
                    }
                    PointerTarget::Element { id } => {
                        self.begin_gesture(id, GestureKind::Drag, *position)
                    }
                    PointerTarget::Handle { id, handle } => {
                        self.begin_gesture(id, handle.into(), *position)
                    }
                }
            }
            InputEvent::PointerMove { position } => {
                self.update_gesture(*position);
                Ok(())
            }
            InputEvent::PointerUp { position } => {
                self.update_gesture(*position);
                self.end_gesture();
                Ok(())
            }
            InputEvent::KeyDown { key, modifiers } => self.handle_key(*key, *modifiers),
            InputEvent::ViewportResize { width, height } => {
                self.set_viewport_size(*width, *height);
                Ok(())
            }
        }
    }

    fn hit_test(&self, screen: Point) -> PointerTarget {
        let point = self.viewport.screen_to_document(screen);
        self.document
            .element_at(point)
            .map_or(PointerTarget::Canvas, |id| PointerTarget::Element { id })
    }

    fn handle_key(&mut self, key: Key, modifiers: KeyModifiers) -> EditorResult<()> {
        let step = if modifiers.shift {
            self.config.nudge_step_large
        } else {
            self.config.nudge_step
        };
        match key {
            Key::ArrowUp => self.nudge_selected(0.0, -step),
            Key::ArrowDown => self.nudge_selected(0.0, step),
            Key::ArrowLeft => self.nudge_selected(-step, 0.0),
            Key::ArrowRight => self.nudge_selected(step, 0.0),
            Key::Delete | Key::Backspace => match self.selection.get() {
                Some(id) => self.delete_element(id),
                None => Ok(()),
            },
            Key::Escape => {
                if !self.cancel_gesture() {
                    self.selection.clear();
                }
                Ok(())
            }
            Key::Character(c) => self.handle_shortcut(c.to_ascii_lowercase(), modifiers),
        }
    }

    fn handle_shortcut(&mut self, c: char, modifiers: KeyModifiers) -> EditorResult<()> {
        match (c, modifiers.command()) {
            ('z', true) if modifiers.shift => {
                self.redo();
            }
            ('z', true) => {
                self.undo();
            }
            ('y', true) => {
                self.redo();
            }
            ('d', true) => {
                if let Some(id) = self.selection.get() {
                    self.duplicate_element(id)?;
                }
            }
            ('0', true) => self.reset_zoom(),
            ('r', false) => self.rotate_selected(self.config.rotate_step)?,
            ('+' | '=', _) => self.zoom_in(),
            ('-', _) => self.zoom_out(),
            _ => {}
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn frame(&self) -> Frame {
        self.document.elements().to_vec()
    }

    fn commit(&mut self, before: Frame, reason: ChangeReason) {
        self.history.record(before);
        self.notify(reason);
    }

    fn notify(&mut self, reason: ChangeReason) {
        for observer in &mut self.observers {
            observer.document_changed(&self.document, reason);
        }
    }

    fn missing(&self, id: ElementId) -> EditorResult<()> {
        match self.config.id_policy {
            IdPolicy::Strict => Err(EditorError::ElementNotFound(id)),
            IdPolicy::Lenient => {
                tracing::debug!(%id, "Ignoring operation on unknown element");
                Ok(())
            }
        }
    }
}
