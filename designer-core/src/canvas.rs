//! Canvas configuration: the printable page the elements are placed on.

use serde::{Deserialize, Serialize};

/// Aspect label used for sizes that do not match a preset.
pub const CUSTOM_ASPECT: &str = "custom";

/// Named canvas sizes, in pixels at 96 dpi.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CanvasPreset {
    /// ISO A3 portrait poster.
    A3,
    /// ISO A4 portrait.
    A4,
    /// ISO A5 portrait flyer.
    A5,
    /// 3.5 x 2 inch business card.
    BusinessCard,
    /// 6 x 4 inch postcard.
    Postcard,
    /// Square social/print tile.
    Square,
    /// Landscape wall calendar page.
    Calendar,
}

impl CanvasPreset {
    /// All presets in display order.
    pub const ALL: [Self; 7] = [
        Self::A4,
        Self::A3,
        Self::A5,
        Self::BusinessCard,
        Self::Postcard,
        Self::Square,
        Self::Calendar,
    ];

    /// The label stored in [`Canvas::aspect`].
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::A3 => "a3",
            Self::A4 => "a4",
            Self::A5 => "a5",
            Self::BusinessCard => "business-card",
            Self::Postcard => "postcard",
            Self::Square => "square",
            Self::Calendar => "calendar",
        }
    }

    /// Pixel dimensions `(width, height)`.
    #[must_use]
    pub fn dimensions(self) -> (u32, u32) {
        match self {
            Self::A3 => (1123, 1587),
            Self::A4 => (794, 1123),
            Self::A5 => (559, 794),
            Self::BusinessCard => (336, 192),
            Self::Postcard => (576, 384),
            Self::Square => (1080, 1080),
            Self::Calendar => (1123, 794),
        }
    }

    /// Look a preset up by its label.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|preset| preset.label() == label)
    }
}

/// Canvas dimensions and aspect label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Canvas {
    /// Width in pixels, at least 1.
    pub width: u32,
    /// Height in pixels, at least 1.
    pub height: u32,
    /// A preset label or [`CUSTOM_ASPECT`].
    pub aspect: String,
}

impl Default for Canvas {
    fn default() -> Self {
        Self::from_preset(CanvasPreset::A4)
    }
}

impl Canvas {
    /// Create a custom-sized canvas. Zero dimensions are clamped to 1.
    #[must_use]
    pub fn custom(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
            aspect: CUSTOM_ASPECT.to_string(),
        }
    }

    /// Create a canvas from a named preset.
    #[must_use]
    pub fn from_preset(preset: CanvasPreset) -> Self {
        let (width, height) = preset.dimensions();
        Self {
            width,
            height,
            aspect: preset.label().to_string(),
        }
    }

    /// The preset this canvas was created from, if any.
    #[must_use]
    pub fn preset(&self) -> Option<CanvasPreset> {
        CanvasPreset::from_label(&self.aspect)
    }

    /// Clamp dimensions to at least 1 and replace an unknown aspect label
    /// with [`CUSTOM_ASPECT`].
    #[must_use]
    pub fn normalized(self) -> Self {
        let aspect = if self.preset().is_some() {
            self.aspect
        } else {
            CUSTOM_ASPECT.to_string()
        };
        Self {
            width: self.width.max(1),
            height: self.height.max(1),
            aspect,
        }
    }

    /// Check the invariants of a canvas read from outside the editor.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.width > 0
            && self.height > 0
            && (self.aspect == CUSTOM_ASPECT || self.preset().is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_label_roundtrip() {
        for preset in CanvasPreset::ALL {
            assert_eq!(CanvasPreset::from_label(preset.label()), Some(preset));
        }
        assert_eq!(CanvasPreset::from_label("custom"), None);
    }

    #[test]
    fn test_custom_clamps_zero() {
        let canvas = Canvas::custom(0, 300);
        assert_eq!(canvas.width, 1);
        assert_eq!(canvas.height, 300);
        assert_eq!(canvas.aspect, CUSTOM_ASPECT);
        assert!(canvas.is_valid());
    }

    #[test]
    fn test_unknown_aspect_is_invalid() {
        let canvas = Canvas {
            width: 100,
            height: 100,
            aspect: "banner".to_string(),
        };
        assert!(!canvas.is_valid());
    }

    #[test]
    fn test_normalized_keeps_preset_and_drops_unknown_label() {
        let a5 = Canvas::from_preset(CanvasPreset::A5).normalized();
        assert_eq!(a5.aspect, "a5");

        let banner = Canvas {
            width: 0,
            height: 200,
            aspect: "banner".to_string(),
        }
        .normalized();
        assert_eq!(banner.width, 1);
        assert_eq!(banner.aspect, CUSTOM_ASPECT);
        assert!(banner.is_valid());
    }
}
