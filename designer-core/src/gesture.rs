//! Pointer gestures: drag, resize and rotate.
//!
//! A gesture records the pointer position and element geometry at pointer
//! down. Every pointer move recomputes the preview from that origin, so the
//! result depends only on the total pointer delta and never drifts.

use serde::{Deserialize, Serialize};

use crate::{normalize_rotation, ElementId, Point, Transform, Viewport};

/// Corner handle used to resize an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResizeHandle {
    /// Top-left corner.
    NorthWest,
    /// Top-right corner.
    NorthEast,
    /// Bottom-left corner.
    SouthWest,
    /// Bottom-right corner.
    SouthEast,
}

impl ResizeHandle {
    fn moves_left_edge(self) -> bool {
        matches!(self, Self::NorthWest | Self::SouthWest)
    }

    fn moves_top_edge(self) -> bool {
        matches!(self, Self::NorthWest | Self::NorthEast)
    }
}

/// Handle grabbed at pointer down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "handle", content = "corner", rename_all = "snake_case")]
pub enum Handle {
    /// One of the four resize corners.
    Resize(ResizeHandle),
    /// The rotation handle above the bounding box.
    Rotate,
}

/// What a gesture does to its element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GestureKind {
    /// Move the element with the pointer.
    Drag,
    /// Resize from a corner, keeping the opposite edges fixed.
    Resize(ResizeHandle),
    /// Rotate around the element center.
    Rotate,
}

impl From<Handle> for GestureKind {
    fn from(handle: Handle) -> Self {
        match handle {
            Handle::Resize(corner) => Self::Resize(corner),
            Handle::Rotate => Self::Rotate,
        }
    }
}

/// An in-flight pointer gesture.
#[derive(Debug, Clone, PartialEq)]
pub struct Gesture {
    element: ElementId,
    kind: GestureKind,
    start_pointer: Point,
    origin: Transform,
}

impl Gesture {
    /// Start a gesture at `pointer` (screen space) on an element with geometry `origin`.
    #[must_use]
    pub fn begin(element: ElementId, kind: GestureKind, pointer: Point, origin: Transform) -> Self {
        Self {
            element,
            kind,
            start_pointer: pointer,
            origin,
        }
    }

    /// The element being manipulated.
    #[must_use]
    pub fn element(&self) -> ElementId {
        self.element
    }

    /// The gesture kind.
    #[must_use]
    pub fn kind(&self) -> GestureKind {
        self.kind
    }

    /// Geometry at pointer down.
    #[must_use]
    pub fn origin(&self) -> Transform {
        self.origin
    }

    /// Geometry for the pointer at `pointer` (screen space).
    ///
    /// Until the pointer leaves its starting position the origin is returned
    /// unchanged, so a click on a handle never alters the element.
    #[must_use]
    pub fn preview(&self, pointer: Point, viewport: &Viewport) -> Transform {
        if pointer == self.start_pointer {
            return self.origin;
        }
        let (dx, dy) = viewport.screen_delta_to_document(
            pointer.x - self.start_pointer.x,
            pointer.y - self.start_pointer.y,
        );
        match self.kind {
            GestureKind::Drag => drag_transform(&self.origin, dx, dy),
            GestureKind::Resize(handle) => resize_transform(&self.origin, handle, dx, dy),
            GestureKind::Rotate => {
                let center = viewport.document_to_screen(self.origin.center());
                Transform {
                    rotation: rotation_from_pointer(center, pointer),
                    ..self.origin
                }
            }
        }
    }
}

/// Translate by a document-space delta.
#[must_use]
pub fn drag_transform(origin: &Transform, dx: f32, dy: f32) -> Transform {
    Transform {
        x: origin.x + dx,
        y: origin.y + dy,
        ..*origin
    }
}

/// Resize from `handle` by a document-space delta.
///
/// Sizes are clamped at zero; for west/north handles the position follows so
/// that the east/south edges stay where they were.
#[must_use]
pub fn resize_transform(origin: &Transform, handle: ResizeHandle, dx: f32, dy: f32) -> Transform {
    let mut next = *origin;

    if handle.moves_left_edge() {
        next.width = (origin.width - dx).max(0.0);
        next.x = origin.x + origin.width - next.width;
    } else {
        next.width = (origin.width + dx).max(0.0);
    }

    if handle.moves_top_edge() {
        next.height = (origin.height - dy).max(0.0);
        next.y = origin.y + origin.height - next.height;
    } else {
        next.height = (origin.height + dy).max(0.0);
    }

    next
}

/// Angle in degrees of `pointer` around `center`, wrapped into `[0, 360)`.
#[must_use]
pub fn rotation_from_pointer(center: Point, pointer: Point) -> f32 {
    let radians = (pointer.y - center.y).atan2(pointer.x - center.x);
    normalize_rotation(radians.to_degrees())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Canvas, EditorConfig};

    fn origin() -> Transform {
        Transform {
            x: 100.0,
            y: 100.0,
            width: 200.0,
            height: 100.0,
            rotation: 0.0,
        }
    }

    fn unit_viewport() -> Viewport {
        let config = EditorConfig {
            fit_margin: 0.0,
            ..EditorConfig::default()
        };
        Viewport::new(4000.0, 4000.0, &Canvas::custom(1000, 1000), &config)
    }

    #[test]
    fn test_resize_south_east_grows() {
        let next = resize_transform(&origin(), ResizeHandle::SouthEast, 50.0, 20.0);
        assert!((next.width - 250.0).abs() < f32::EPSILON);
        assert!((next.height - 120.0).abs() < f32::EPSILON);
        assert!((next.x - 100.0).abs() < f32::EPSILON);
        assert!((next.y - 100.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_resize_north_west_keeps_opposite_edges() {
        let next = resize_transform(&origin(), ResizeHandle::NorthWest, 30.0, -10.0);
        assert!((next.width - 170.0).abs() < f32::EPSILON);
        assert!((next.height - 110.0).abs() < f32::EPSILON);
        assert!((next.x + next.width - 300.0).abs() < 1e-4);
        assert!((next.y + next.height - 200.0).abs() < 1e-4);
    }

    #[test]
    fn test_resize_clamps_negative_size() {
        let next = resize_transform(&origin(), ResizeHandle::NorthEast, -500.0, 500.0);
        assert!(next.width.abs() < f32::EPSILON);
        assert!(next.height.abs() < f32::EPSILON);
        assert!((next.x - 100.0).abs() < f32::EPSILON);
        assert!((next.y - 200.0).abs() < 1e-4);
    }

    #[test]
    fn test_rotation_from_pointer() {
        let center = Point::new(0.0, 0.0);
        assert!(rotation_from_pointer(center, Point::new(10.0, 0.0)).abs() < 1e-4);
        assert!((rotation_from_pointer(center, Point::new(0.0, 10.0)) - 90.0).abs() < 1e-4);
        assert!((rotation_from_pointer(center, Point::new(0.0, -10.0)) - 270.0).abs() < 1e-4);
    }

    #[test]
    fn test_drag_preview_scales_by_zoom() {
        let mut viewport = unit_viewport();
        viewport.set_user_zoom(2.0);
        let gesture = Gesture::begin(
            ElementId::new(),
            GestureKind::Drag,
            Point::new(10.0, 10.0),
            origin(),
        );
        let next = gesture.preview(Point::new(50.0, 30.0), &viewport);
        assert!((next.x - 120.0).abs() < 1e-4);
        assert!((next.y - 110.0).abs() < 1e-4);
    }

    #[test]
    fn test_rotate_preview_without_movement_keeps_origin() {
        let viewport = unit_viewport();
        let start = viewport.document_to_screen(Point::new(200.0, 80.0));
        let gesture = Gesture::begin(ElementId::new(), GestureKind::Rotate, start, origin());
        assert_eq!(gesture.preview(start, &viewport), origin());

        let below = viewport.document_to_screen(Point::new(200.0, 300.0));
        let rotated = gesture.preview(below, &viewport);
        assert!((rotated.rotation - 90.0).abs() < 1e-3);
    }
}
