//! Input events for editor interaction.
//!
//! Pointer coordinates are in screen space (after zoom). The editor converts
//! them to document space itself.

use serde::{Deserialize, Serialize};

use crate::{ElementId, Handle, Point};

/// What the pointer went down on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PointerTarget {
    /// Empty canvas area.
    Canvas,
    /// The body of an element.
    Element {
        /// Element hit.
        id: ElementId,
    },
    /// A resize or rotate handle of an element.
    Handle {
        /// Element owning the handle.
        id: ElementId,
        /// Which handle.
        handle: Handle,
    },
}

/// Keys the editor reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "key", content = "char", rename_all = "snake_case")]
pub enum Key {
    /// Up arrow.
    ArrowUp,
    /// Down arrow.
    ArrowDown,
    /// Left arrow.
    ArrowLeft,
    /// Right arrow.
    ArrowRight,
    /// Delete key.
    Delete,
    /// Backspace key.
    Backspace,
    /// Escape key.
    Escape,
    /// A printable character, compared case-insensitively.
    Character(char),
}

/// Keyboard modifiers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct KeyModifiers {
    /// Shift key pressed.
    pub shift: bool,
    /// Control key pressed.
    pub ctrl: bool,
    /// Alt/Option key pressed.
    pub alt: bool,
    /// Meta/Command key pressed.
    pub meta: bool,
}

impl KeyModifiers {
    /// Shift only.
    pub const SHIFT: Self = Self {
        shift: true,
        ctrl: false,
        alt: false,
        meta: false,
    };

    /// Control only.
    pub const CTRL: Self = Self {
        shift: false,
        ctrl: true,
        alt: false,
        meta: false,
    };

    /// Whether the platform command modifier (Ctrl or Cmd) is held.
    #[must_use]
    pub fn command(self) -> bool {
        self.ctrl || self.meta
    }
}

/// All input events the editor can receive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum InputEvent {
    /// Pointer pressed.
    PointerDown {
        /// Screen position.
        position: Point,
        /// Hit target reported by the host; `None` lets the editor hit-test.
        target: Option<PointerTarget>,
    },
    /// Pointer moved.
    PointerMove {
        /// Screen position.
        position: Point,
    },
    /// Pointer released.
    PointerUp {
        /// Screen position.
        position: Point,
    },
    /// Key pressed.
    KeyDown {
        /// Key.
        key: Key,
        /// Active modifier keys.
        modifiers: KeyModifiers,
    },
    /// The viewport changed size.
    ViewportResize {
        /// New width in screen pixels.
        width: f32,
        /// New height in screen pixels.
        height: f32,
    },
}

impl InputEvent {
    /// Pointer down at `(x, y)`, hit-tested by the editor.
    #[must_use]
    pub fn pointer_down(x: f32, y: f32) -> Self {
        Self::PointerDown {
            position: Point::new(x, y),
            target: None,
        }
    }

    /// Pointer down at `(x, y)` on a known target.
    #[must_use]
    pub fn pointer_down_on(x: f32, y: f32, target: PointerTarget) -> Self {
        Self::PointerDown {
            position: Point::new(x, y),
            target: Some(target),
        }
    }

    /// Pointer move to `(x, y)`.
    #[must_use]
    pub fn pointer_move(x: f32, y: f32) -> Self {
        Self::PointerMove {
            position: Point::new(x, y),
        }
    }

    /// Pointer up at `(x, y)`.
    #[must_use]
    pub fn pointer_up(x: f32, y: f32) -> Self {
        Self::PointerUp {
            position: Point::new(x, y),
        }
    }

    /// Key press without modifiers.
    #[must_use]
    pub fn key(key: Key) -> Self {
        Self::KeyDown {
            key,
            modifiers: KeyModifiers::default(),
        }
    }

    /// Key press with modifiers.
    #[must_use]
    pub fn key_with(key: Key, modifiers: KeyModifiers) -> Self {
        Self::KeyDown { key, modifiers }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ResizeHandle;

    #[test]
    fn test_event_json_shape() {
        let id = ElementId::new();
        let event = InputEvent::pointer_down_on(
            5.0,
            6.0,
            PointerTarget::Handle {
                id,
                handle: Handle::Resize(ResizeHandle::SouthEast),
            },
        );
        let json = serde_json::to_value(&event).expect("serialize");
        assert_eq!(json["type"], "pointer_down");
        assert_eq!(json["data"]["target"]["kind"], "handle");

        let back: InputEvent = serde_json::from_value(json).expect("deserialize");
        assert_eq!(back, event);
    }

    #[test]
    fn test_command_modifier() {
        assert!(KeyModifiers::CTRL.command());
        assert!(!KeyModifiers::SHIFT.command());
        let meta = KeyModifiers {
            meta: true,
            ..KeyModifiers::default()
        };
        assert!(meta.command());
    }
}
