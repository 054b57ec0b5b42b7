//! The document: canvas configuration plus the ordered element list.

use std::collections::HashSet;

use serde::Serialize;

use crate::{Canvas, Element, ElementId, Point};

/// A design document.
///
/// The element list is back-to-front: index 0 is drawn first and sits at the
/// bottom of the stack. Deserialization goes through [`crate::schema::load`],
/// which validates the canvas and id uniqueness.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Document {
    /// Page the elements are laid out on.
    pub canvas: Canvas,
    elements: Vec<Element>,
}

impl Document {
    /// Create an empty document on the given canvas.
    #[must_use]
    pub fn new(canvas: Canvas) -> Self {
        Self {
            canvas,
            elements: Vec::new(),
        }
    }

    /// Assemble a document from parts already known to be valid.
    pub(crate) fn from_parts(canvas: Canvas, elements: Vec<Element>) -> Self {
        Self { canvas, elements }
    }

    /// All elements, back-to-front.
    #[must_use]
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Get an element by ID.
    #[must_use]
    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == id)
    }

    /// Get a mutable reference to an element by ID.
    pub fn get_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.elements.iter_mut().find(|e| e.id == id)
    }

    /// Position of an element in the stacking order.
    #[must_use]
    pub fn index_of(&self, id: ElementId) -> Option<usize> {
        self.elements.iter().position(|e| e.id == id)
    }

    /// Check if an element exists.
    #[must_use]
    pub fn contains(&self, id: ElementId) -> bool {
        self.index_of(id).is_some()
    }

    /// Element ids in stacking order.
    #[must_use]
    pub fn ids(&self) -> Vec<ElementId> {
        self.elements.iter().map(|e| e.id).collect()
    }

    /// Get the number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Check if the document has no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Append an element on top of the stack.
    pub(crate) fn push(&mut self, element: Element) {
        self.elements.push(element);
    }

    /// Insert an element at a stacking position.
    pub(crate) fn insert(&mut self, index: usize, element: Element) {
        let index = index.min(self.elements.len());
        self.elements.insert(index, element);
    }

    /// Remove an element, returning it if it existed.
    pub(crate) fn remove(&mut self, id: ElementId) -> Option<Element> {
        let index = self.index_of(id)?;
        Some(self.elements.remove(index))
    }

    /// Swap in a whole element list (undo/redo, load).
    pub(crate) fn replace_elements(&mut self, elements: Vec<Element>) -> Vec<Element> {
        std::mem::replace(&mut self.elements, elements)
    }

    /// Rearrange elements to follow `order`.
    ///
    /// Returns `false` and leaves the list untouched unless `order` is a
    /// permutation of the current ids.
    pub(crate) fn apply_order(&mut self, order: &[ElementId]) -> bool {
        if !self.is_permutation(order) {
            return false;
        }
        let mut remaining = std::mem::take(&mut self.elements);
        let mut reordered = Vec::with_capacity(remaining.len());
        for id in order {
            if let Some(index) = remaining.iter().position(|e| e.id == *id) {
                reordered.push(remaining.swap_remove(index));
            }
        }
        self.elements = reordered;
        true
    }

    /// Check that `order` names every current element exactly once.
    #[must_use]
    pub fn is_permutation(&self, order: &[ElementId]) -> bool {
        if order.len() != self.elements.len() {
            return false;
        }
        let mut seen = HashSet::with_capacity(order.len());
        order
            .iter()
            .all(|id| seen.insert(*id) && self.contains(*id))
    }

    /// Find the topmost element whose bounds contain a document-space point.
    #[must_use]
    pub fn element_at(&self, point: Point) -> Option<ElementId> {
        self.elements
            .iter()
            .rev()
            .find(|e| e.contains_point(point))
            .map(|e| e.id)
    }
}
