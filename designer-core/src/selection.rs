//! Selection tracking and layer (z-order) helpers.
//!
//! Z-order is the position in [`Document::elements`]: index 0 is the bottom.
//! The layers panel lists elements top-most first, so panel ("visual")
//! indices are the reverse of list indices.

use serde::{Deserialize, Serialize};

use crate::{Document, ElementId};

/// The single active element, if any.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection(Option<ElementId>);

impl Selection {
    /// The selected id.
    #[must_use]
    pub fn get(self) -> Option<ElementId> {
        self.0
    }

    /// Select an element.
    pub fn set(&mut self, id: ElementId) {
        self.0 = Some(id);
    }

    /// Clear the selection.
    pub fn clear(&mut self) {
        self.0 = None;
    }

    /// Check if the given element is selected.
    #[must_use]
    pub fn is_selected(self, id: ElementId) -> bool {
        self.0 == Some(id)
    }
}

/// One row of the layers panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerEntry {
    /// Element shown in this row.
    pub id: ElementId,
    /// Display label.
    pub name: String,
    /// Row index, 0 is the top-most element.
    pub visual_index: usize,
    /// Whether this row is the current selection.
    pub selected: bool,
}

/// Rows of the layers panel, top-most element first.
#[must_use]
pub fn layers(document: &Document, selection: Selection) -> Vec<LayerEntry> {
    document
        .elements()
        .iter()
        .rev()
        .enumerate()
        .map(|(visual_index, element)| LayerEntry {
            id: element.id,
            name: element.display_name().to_string(),
            visual_index,
            selected: selection.is_selected(element.id),
        })
        .collect()
}

/// Convert a layers-panel row index into an element-list index.
#[must_use]
pub fn visual_to_list_index(len: usize, visual_index: usize) -> Option<usize> {
    (visual_index < len).then(|| len - 1 - visual_index)
}

/// Order produced by dragging panel row `from_visual` to `to_visual`.
#[must_use]
pub fn move_layer_order(
    document: &Document,
    from_visual: usize,
    to_visual: usize,
) -> Option<Vec<ElementId>> {
    let len = document.len();
    let from = visual_to_list_index(len, from_visual)?;
    let to = visual_to_list_index(len, to_visual)?;
    move_order(document, from, to)
}

/// Where a z-order shortcut moves an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerMove {
    /// One step towards the top.
    Forward,
    /// One step towards the bottom.
    Backward,
    /// To the top of the stack.
    ToFront,
    /// To the bottom of the stack.
    ToBack,
}

/// Order produced by applying a z-order shortcut to `id`.
///
/// Returns `None` if the element is unknown or already in place.
#[must_use]
pub fn layer_move_order(
    document: &Document,
    id: ElementId,
    layer_move: LayerMove,
) -> Option<Vec<ElementId>> {
    let from = document.index_of(id)?;
    let last = document.len() - 1;
    let to = match layer_move {
        LayerMove::Forward => (from + 1).min(last),
        LayerMove::Backward => from.saturating_sub(1),
        LayerMove::ToFront => last,
        LayerMove::ToBack => 0,
    };
    move_order(document, from, to)
}

fn move_order(document: &Document, from: usize, to: usize) -> Option<Vec<ElementId>> {
    if from == to {
        return None;
    }
    let mut ids = document.ids();
    let id = ids.remove(from);
    ids.insert(to, id);
    Some(ids)
}
