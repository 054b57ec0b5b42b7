//! Design elements - the building blocks of a document.
//!
//! An [`Element`] is one visual object on the canvas. Its content is a tagged
//! union over [`ElementKind`] (text, shape, image); geometry lives in a shared
//! [`Transform`]. Stacking order is not stored on the element: it is the
//! element's position in the document list.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default position for newly added elements (document units).
pub const DEFAULT_POSITION: f32 = 100.0;

/// Unique identifier for an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementId(Uuid);

impl ElementId {
    /// Create a new unique element ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ElementId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A point in either document or screen space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f32,
    /// Vertical coordinate.
    pub y: f32,
}

impl Point {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Position, size and rotation of an element in document space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Width, never negative.
    pub width: f32,
    /// Height, never negative.
    pub height: f32,
    /// Rotation in degrees, kept in `[0, 360)`.
    #[serde(default)]
    pub rotation: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            x: DEFAULT_POSITION,
            y: DEFAULT_POSITION,
            width: 100.0,
            height: 100.0,
            rotation: 0.0,
        }
    }
}

impl Transform {
    /// Horizontal center.
    #[must_use]
    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    /// Vertical center.
    #[must_use]
    pub fn center_y(&self) -> f32 {
        self.y + self.height / 2.0
    }

    /// Center point.
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.center_x(), self.center_y())
    }

    /// Check if a document-space point lies inside the bounds, taking the
    /// rotation about the center into account.
    #[must_use]
    pub fn contains_point(&self, point: Point) -> bool {
        let center = self.center();
        let (dx, dy) = (point.x - center.x, point.y - center.y);
        let (sin, cos) = self.rotation.to_radians().sin_cos();
        // Undo the clockwise (y-down) rotation to land in the element's frame.
        let local_x = dx * cos + dy * sin;
        let local_y = dy * cos - dx * sin;
        local_x.abs() <= self.width / 2.0 + 1e-4 && local_y.abs() <= self.height / 2.0 + 1e-4
    }
}

/// Wrap an angle in degrees into `[0, 360)`.
#[must_use]
pub fn normalize_rotation(degrees: f32) -> f32 {
    let wrapped = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Font weight of a text element.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    /// Regular weight.
    #[default]
    Normal,
    /// Bold weight.
    Bold,
}

/// Font style of a text element.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontStyle {
    /// Upright.
    #[default]
    Normal,
    /// Italic.
    Italic,
}

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    /// Align to the left edge.
    #[default]
    Left,
    /// Center between the edges.
    Center,
    /// Align to the right edge.
    Right,
}

/// Geometric primitive of a shape element.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    /// Axis-aligned rectangle, optionally with rounded corners.
    #[default]
    Rectangle,
    /// Ellipse inscribed in the bounds.
    Circle,
    /// Horizontal line through the vertical center.
    Line,
}

/// Text element content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextContent {
    /// The text to display.
    pub text: String,
    /// Font size in points.
    pub font_size: f32,
    /// Font family name.
    pub font_family: String,
    /// Text color.
    pub color: String,
    /// Font weight.
    #[serde(default)]
    pub font_weight: FontWeight,
    /// Font style.
    #[serde(default)]
    pub font_style: FontStyle,
    /// Alignment within the element bounds.
    #[serde(default)]
    pub text_align: TextAlign,
}

impl Default for TextContent {
    fn default() -> Self {
        Self {
            text: "Double-click to edit".to_string(),
            font_size: 20.0,
            font_family: "Arial".to_string(),
            color: "#000000".to_string(),
            font_weight: FontWeight::Normal,
            font_style: FontStyle::Normal,
            text_align: TextAlign::Left,
        }
    }
}

/// Shape element content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeContent {
    /// Primitive to draw.
    pub shape: ShapeKind,
    /// Fill color.
    pub background: String,
    /// Stroke color.
    #[serde(default)]
    pub border_color: String,
    /// Stroke width, never negative.
    #[serde(default)]
    pub border_width: f32,
    /// Corner radius for rectangles.
    #[serde(default)]
    pub border_radius: f32,
}

impl Default for ShapeContent {
    fn default() -> Self {
        Self {
            shape: ShapeKind::Rectangle,
            background: "#3b82f6".to_string(),
            border_color: "#000000".to_string(),
            border_width: 0.0,
            border_radius: 0.0,
        }
    }
}

/// Image element content. Holds a reference to the image, never its bytes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageContent {
    /// Image URI, file path or data URI.
    pub src: String,
}

/// Discriminant of [`ElementKind`], used when creating elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementType {
    /// Text element.
    Text,
    /// Shape element.
    Shape,
    /// Image element.
    Image,
}

impl ElementType {
    /// Display label used when an element has no explicit name.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Text => "Text",
            Self::Shape => "Shape",
            Self::Image => "Image",
        }
    }

    /// Default geometry for a freshly added element of this type.
    #[must_use]
    pub fn default_transform(self) -> Transform {
        let (width, height) = match self {
            Self::Text => (200.0, 40.0),
            Self::Shape => (150.0, 100.0),
            Self::Image => (200.0, 200.0),
        };
        Transform {
            width,
            height,
            ..Transform::default()
        }
    }
}

/// The content an element carries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ElementKind {
    /// A text block.
    Text(TextContent),
    /// A filled/stroked primitive.
    Shape(ShapeContent),
    /// A referenced raster or vector image.
    Image(ImageContent),
}

impl ElementKind {
    /// Default content for the given element type.
    #[must_use]
    pub fn default_for(element_type: ElementType) -> Self {
        match element_type {
            ElementType::Text => Self::Text(TextContent::default()),
            ElementType::Shape => Self::Shape(ShapeContent::default()),
            ElementType::Image => Self::Image(ImageContent::default()),
        }
    }

    /// The discriminant of this content.
    #[must_use]
    pub fn element_type(&self) -> ElementType {
        match self {
            Self::Text(_) => ElementType::Text,
            Self::Shape(_) => ElementType::Shape,
            Self::Image(_) => ElementType::Image,
        }
    }
}

const fn default_opacity() -> f32 {
    1.0
}

/// A design element with content and geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    /// Unique identifier, immutable for the element's lifetime.
    pub id: ElementId,
    /// Optional display label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Position, size and rotation.
    #[serde(flatten)]
    pub transform: Transform,
    /// Opacity in `[0, 1]`.
    #[serde(default = "default_opacity")]
    pub opacity: f32,
    /// Element content.
    #[serde(flatten)]
    pub kind: ElementKind,
}

impl Element {
    /// Create a new element with the given content and a fresh id.
    ///
    /// Geometry starts from the defaults of the content's type.
    #[must_use]
    pub fn new(kind: ElementKind) -> Self {
        Self {
            id: ElementId::new(),
            name: None,
            transform: kind.element_type().default_transform(),
            opacity: 1.0,
            kind,
        }
    }

    /// Create an element of the given type with all defaults applied.
    #[must_use]
    pub fn with_defaults(element_type: ElementType) -> Self {
        Self::new(ElementKind::default_for(element_type))
    }

    /// Set the transform.
    #[must_use]
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    /// Set the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// The element's type.
    #[must_use]
    pub fn element_type(&self) -> ElementType {
        self.kind.element_type()
    }

    /// The label shown in the layers panel.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .unwrap_or_else(|| self.element_type().label())
    }

    /// Check if a document-space point is within this element.
    #[must_use]
    pub fn contains_point(&self, point: Point) -> bool {
        self.transform.contains_point(point)
    }

    /// Copy this element under a fresh id, shifted by `(dx, dy)`.
    #[must_use]
    pub fn duplicate(&self, dx: f32, dy: f32) -> Self {
        let mut copy = self.clone();
        copy.id = ElementId::new();
        copy.transform.x += dx;
        copy.transform.y += dy;
        copy
    }

    /// Bring geometry and style into range.
    ///
    /// Sizes and border widths are clamped to zero, opacity to `[0, 1]` and
    /// rotation is wrapped into `[0, 360)`.
    pub fn normalize(&mut self) {
        let t = &mut self.transform;
        t.width = t.width.max(0.0);
        t.height = t.height.max(0.0);
        t.rotation = normalize_rotation(t.rotation);
        self.opacity = self.opacity.clamp(0.0, 1.0);
        if let ElementKind::Shape(shape) = &mut self.kind {
            shape.border_width = shape.border_width.max(0.0);
        }
    }

    /// Merge the supplied fields of `patch` into this element.
    ///
    /// Fields that are `None` are left untouched. Variant fields that do not
    /// belong to this element's kind are ignored. The result is passed
    /// through [`Element::normalize`].
    pub fn apply_patch(&mut self, patch: &ElementPatch) {
        let t = &mut self.transform;
        if let Some(x) = patch.x {
            t.x = x;
        }
        if let Some(y) = patch.y {
            t.y = y;
        }
        if let Some(width) = patch.width {
            t.width = width;
        }
        if let Some(height) = patch.height {
            t.height = height;
        }
        if let Some(rotation) = patch.rotation {
            t.rotation = rotation;
        }
        if let Some(opacity) = patch.opacity {
            self.opacity = opacity;
        }
        if let Some(name) = &patch.name {
            self.name = Some(name.clone());
        }

        match &mut self.kind {
            ElementKind::Text(text) => {
                if let Some(value) = &patch.text {
                    text.text.clone_from(value);
                }
                if let Some(value) = patch.font_size {
                    text.font_size = value;
                }
                if let Some(value) = &patch.font_family {
                    text.font_family.clone_from(value);
                }
                if let Some(value) = &patch.color {
                    text.color.clone_from(value);
                }
                if let Some(value) = patch.font_weight {
                    text.font_weight = value;
                }
                if let Some(value) = patch.font_style {
                    text.font_style = value;
                }
                if let Some(value) = patch.text_align {
                    text.text_align = value;
                }
            }
            ElementKind::Shape(shape) => {
                if let Some(value) = patch.shape {
                    shape.shape = value;
                }
                if let Some(value) = &patch.background {
                    shape.background.clone_from(value);
                }
                if let Some(value) = &patch.border_color {
                    shape.border_color.clone_from(value);
                }
                if let Some(value) = patch.border_width {
                    shape.border_width = value;
                }
                if let Some(value) = patch.border_radius {
                    shape.border_radius = value;
                }
            }
            ElementKind::Image(image) => {
                if let Some(value) = &patch.src {
                    image.src.clone_from(value);
                }
            }
        }

        self.normalize();
    }
}

/// A partial element update. Only `Some` fields are applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
#[allow(missing_docs)] // Field names mirror the element attributes they replace
pub struct ElementPatch {
    pub x: Option<f32>,
    pub y: Option<f32>,
    pub width: Option<f32>,
    pub height: Option<f32>,
    pub rotation: Option<f32>,
    pub opacity: Option<f32>,
    pub name: Option<String>,

    pub text: Option<String>,
    pub font_size: Option<f32>,
    pub font_family: Option<String>,
    pub color: Option<String>,
    pub font_weight: Option<FontWeight>,
    pub font_style: Option<FontStyle>,
    pub text_align: Option<TextAlign>,

    pub shape: Option<ShapeKind>,
    pub background: Option<String>,
    pub border_color: Option<String>,
    pub border_width: Option<f32>,
    pub border_radius: Option<f32>,

    pub src: Option<String>,
}

impl ElementPatch {
    /// Patch that moves an element to `(x, y)`.
    #[must_use]
    pub fn position(x: f32, y: f32) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..Self::default()
        }
    }

    /// Patch that sets only the rotation.
    #[must_use]
    pub fn rotation(degrees: f32) -> Self {
        Self {
            rotation: Some(degrees),
            ..Self::default()
        }
    }
}
