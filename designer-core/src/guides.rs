//! Alignment guides for the active element.
//!
//! Guides are visual only: computing them never moves anything.

use serde::{Deserialize, Serialize};

use crate::{Element, ElementId, GuideMode};

/// At most one vertical and one horizontal guide line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Guides {
    /// X coordinate of the vertical guide line.
    pub vertical: Option<f32>,
    /// Y coordinate of the horizontal guide line.
    pub horizontal: Option<f32>,
}

impl Guides {
    /// Check if no guide is shown.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertical.is_none() && self.horizontal.is_none()
    }
}

/// Best candidate seen so far on one axis.
#[derive(Default)]
struct Candidate {
    position: Option<f32>,
    distance: f32,
}

impl Candidate {
    fn offer(&mut self, mode: GuideMode, own: f32, other: f32, tolerance: f32) {
        let distance = (own - other).abs();
        if distance > tolerance {
            return;
        }
        let replace = match mode {
            GuideMode::LastMatch => true,
            GuideMode::Closest => self.position.is_none() || distance <= self.distance,
        };
        if replace {
            self.position = Some(other);
            self.distance = distance;
        }
    }
}

/// Compute the guides for `selected` against every other element.
///
/// Left edges and horizontal centers produce the vertical guide; top edges
/// and vertical centers produce the horizontal guide. Candidates are visited
/// in document order.
#[must_use]
pub fn compute_guides(
    elements: &[Element],
    selected: ElementId,
    tolerance: f32,
    mode: GuideMode,
) -> Guides {
    let Some(active) = elements.iter().find(|e| e.id == selected) else {
        return Guides::default();
    };
    let a = &active.transform;

    let mut vertical = Candidate::default();
    let mut horizontal = Candidate::default();

    for other in elements.iter().filter(|e| e.id != selected) {
        let o = &other.transform;
        vertical.offer(mode, a.x, o.x, tolerance);
        vertical.offer(mode, a.center_x(), o.center_x(), tolerance);
        horizontal.offer(mode, a.y, o.y, tolerance);
        horizontal.offer(mode, a.center_y(), o.center_y(), tolerance);
    }

    Guides {
        vertical: vertical.position,
        horizontal: horizontal.position,
    }
}
