//! Rendered view of a document.
//!
//! A [`CanvasView`] is the visual form of the canvas region: every element
//! drawn as SVG markup in z-order, exactly as the editing surface shows it.
//! Exports capture a view through a [`RenderContainer`], never the abstract
//! element list, so what gets exported is what was on screen.

use std::fmt::Write;
use std::path::PathBuf;

use designer_core::{
    Document, Element, ElementKind, FontStyle, FontWeight, ShapeContent, ShapeKind, TextAlign,
    TextContent,
};

use crate::error::{RenderError, RenderResult};
use crate::image::resolve_href;

/// Line height as a multiple of the font size.
const LINE_HEIGHT: f32 = 1.2;

/// How documents are turned into views.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Inline local image files as base64 data URIs.
    pub embed_local_images: bool,
    /// Directory relative image paths resolve against.
    pub base_dir: Option<PathBuf>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            embed_local_images: true,
            base_dir: None,
        }
    }
}

/// The rendered canvas region.
#[derive(Debug, Clone, PartialEq)]
pub struct CanvasView {
    width: u32,
    height: u32,
    body: String,
    element_count: usize,
}

impl CanvasView {
    /// Render a document.
    #[must_use]
    pub fn render(document: &Document, options: &RenderOptions) -> Self {
        let mut body = String::with_capacity(256 * document.len().max(1));
        for element in document.elements() {
            render_element_svg(&mut body, element, options);
        }
        tracing::debug!(
            width = document.canvas.width,
            height = document.canvas.height,
            elements = document.len(),
            "Rendered canvas view"
        );
        Self {
            width: document.canvas.width,
            height: document.canvas.height,
            body,
            element_count: document.len(),
        }
    }

    /// Canvas width in document units.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Canvas height in document units.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of elements drawn.
    #[must_use]
    pub fn element_count(&self) -> usize {
        self.element_count
    }

    /// Element markup without the enclosing `<svg>`.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Standalone SVG document at `scale` pixels per document unit.
    ///
    /// The viewBox always spans the canvas; only the pixel size scales.
    #[must_use]
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    pub fn to_svg(&self, scale: f32, background: [u8; 4]) -> String {
        let out_w = ((self.width as f32 * scale).round() as u32).max(1);
        let out_h = ((self.height as f32 * scale).round() as u32).max(1);

        let mut svg = String::with_capacity(self.body.len() + 512);
        let _ = write!(
            svg,
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{out_w}\" height=\"{out_h}\" viewBox=\"0 0 {} {}\">",
            self.width, self.height,
        );
        let bg_alpha = f32::from(background[3]) / 255.0;
        let _ = write!(
            svg,
            "<rect width=\"100%\" height=\"100%\" fill=\"rgb({},{},{})\" fill-opacity=\"{bg_alpha}\"/>",
            background[0], background[1], background[2],
        );
        svg.push_str(&self.body);
        svg.push_str("</svg>");
        svg
    }
}

/// Something an export can capture the canvas from.
pub trait RenderContainer {
    /// Locate the rendered canvas region.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::ContainerNotFound`] when nothing is rendered.
    fn locate(&self) -> RenderResult<&CanvasView>;
}

impl RenderContainer for CanvasView {
    fn locate(&self) -> RenderResult<&CanvasView> {
        Ok(self)
    }
}

/// A named surface the host mounts documents on.
///
/// Mirrors the editing surface: unmounted surfaces have nothing to capture.
#[derive(Debug, Clone)]
pub struct Surface {
    name: String,
    options: RenderOptions,
    view: Option<CanvasView>,
}

impl Surface {
    /// Create an empty surface.
    #[must_use]
    pub fn new(name: impl Into<String>, options: RenderOptions) -> Self {
        Self {
            name: name.into(),
            options,
            view: None,
        }
    }

    /// Render `document` onto the surface, replacing what was there.
    pub fn mount(&mut self, document: &Document) {
        self.view = Some(CanvasView::render(document, &self.options));
    }

    /// Remove the rendered view.
    pub fn unmount(&mut self) {
        self.view = None;
    }

    /// Check whether a view is mounted.
    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.view.is_some()
    }

    /// Surface name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl RenderContainer for Surface {
    fn locate(&self) -> RenderResult<&CanvasView> {
        self.view
            .as_ref()
            .ok_or_else(|| RenderError::ContainerNotFound(self.name.clone()))
    }
}

/// Render a single element to SVG.
fn render_element_svg(svg: &mut String, element: &Element, options: &RenderOptions) {
    let tf = &element.transform;
    let _ = write!(svg, "<g opacity=\"{}\"", element.opacity);
    if tf.rotation.abs() > f32::EPSILON {
        let _ = write!(
            svg,
            " transform=\"rotate({} {} {})\"",
            tf.rotation,
            tf.center_x(),
            tf.center_y()
        );
    }
    svg.push('>');

    match &element.kind {
        ElementKind::Text(text) => render_text_svg(svg, element, text),
        ElementKind::Shape(shape) => render_shape_svg(svg, element, shape),
        ElementKind::Image(image) => {
            let href = resolve_href(
                &image.src,
                options.embed_local_images,
                options.base_dir.as_deref(),
            );
            let escaped = escape_xml(&href);
            let _ = write!(
                svg,
                "<image x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" preserveAspectRatio=\"none\" href=\"{escaped}\"/>",
                tf.x, tf.y, tf.width, tf.height,
            );
        }
    }

    svg.push_str("</g>");
}

fn render_text_svg(svg: &mut String, element: &Element, text: &TextContent) {
    let tf = &element.transform;
    let (anchor_x, anchor) = match text.text_align {
        TextAlign::Left => (tf.x, "start"),
        TextAlign::Center => (tf.center_x(), "middle"),
        TextAlign::Right => (tf.x + tf.width, "end"),
    };
    let weight = match text.font_weight {
        FontWeight::Normal => "normal",
        FontWeight::Bold => "bold",
    };
    let style = match text.font_style {
        FontStyle::Normal => "normal",
        FontStyle::Italic => "italic",
    };
    let baseline = tf.y + text.font_size;

    let _ = write!(
        svg,
        "<text x=\"{anchor_x}\" y=\"{baseline}\" font-size=\"{}\" font-family=\"{}\" font-weight=\"{weight}\" font-style=\"{style}\" text-anchor=\"{anchor}\" fill=\"{}\">",
        text.font_size,
        escape_xml(&text.font_family),
        escape_xml(&text.color),
    );
    for (i, line) in text.text.lines().enumerate() {
        let dy = if i == 0 {
            0.0
        } else {
            text.font_size * LINE_HEIGHT
        };
        let _ = write!(
            svg,
            "<tspan x=\"{anchor_x}\" dy=\"{dy}\">{}</tspan>",
            escape_xml(line)
        );
    }
    svg.push_str("</text>");
}

fn render_shape_svg(svg: &mut String, element: &Element, shape: &ShapeContent) {
    let tf = &element.transform;
    let fill = escape_xml(&shape.background);
    let stroke = escape_xml(&shape.border_color);
    let stroke_width = shape.border_width.max(0.0);

    match shape.shape {
        ShapeKind::Rectangle => {
            let _ = write!(
                svg,
                "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" rx=\"{}\" fill=\"{fill}\"",
                tf.x,
                tf.y,
                tf.width,
                tf.height,
                shape.border_radius.max(0.0),
            );
        }
        ShapeKind::Circle => {
            let _ = write!(
                svg,
                "<ellipse cx=\"{}\" cy=\"{}\" rx=\"{}\" ry=\"{}\" fill=\"{fill}\"",
                tf.center_x(),
                tf.center_y(),
                tf.width / 2.0,
                tf.height / 2.0,
            );
        }
        ShapeKind::Line => {
            // Lines are stroked in the fill color.
            let thickness = if stroke_width > 0.0 { stroke_width } else { 2.0 };
            let _ = write!(
                svg,
                "<line x1=\"{}\" y1=\"{cy}\" x2=\"{}\" y2=\"{cy}\" stroke=\"{fill}\" stroke-width=\"{}\"/>",
                tf.x,
                tf.x + tf.width,
                thickness,
                cy = tf.center_y(),
            );
            return;
        }
    }

    if stroke_width > 0.0 {
        let _ = write!(svg, " stroke=\"{stroke}\" stroke-width=\"{stroke_width}\"");
    }
    svg.push_str("/>");
}

/// Escape special XML characters.
pub(crate) fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use designer_core::{Canvas, Editor, EditorConfig, ElementPatch};

    fn view_of(editor: &Editor) -> CanvasView {
        CanvasView::render(editor.document(), &RenderOptions::default())
    }

    #[test]
    fn test_empty_document_svg() {
        let mut editor = Editor::default();
        editor.resize_canvas(Canvas::custom(800, 600));
        let svg = view_of(&editor).to_svg(1.0, [255, 255, 255, 255]);
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains("width=\"800\""));
        assert!(svg.contains("height=\"600\""));
    }

    #[test]
    fn test_scale_keeps_view_box() {
        let mut editor = Editor::default();
        editor.resize_canvas(Canvas::custom(100, 50));
        let svg = view_of(&editor).to_svg(2.0, [255, 255, 255, 255]);
        assert!(svg.contains("width=\"200\""));
        assert!(svg.contains("height=\"100\""));
        assert!(svg.contains("viewBox=\"0 0 100 50\""));
    }

    #[test]
    fn test_elements_render_in_z_order() {
        let mut editor = Editor::default();
        editor.add_shape(ShapeKind::Rectangle, &ElementPatch::default());
        editor.add_text(&ElementPatch {
            text: Some("On top".into()),
            ..ElementPatch::default()
        });
        let view = view_of(&editor);
        let body = view.body();
        let rect = body.find("<rect").expect("rect");
        let text = body.find("<text").expect("text");
        assert!(rect < text);
        assert_eq!(view.element_count(), 2);
    }

    #[test]
    fn test_text_attributes_and_escaping() {
        let mut editor = Editor::default();
        editor.add_text(&ElementPatch {
            text: Some("A < B & C\nsecond".into()),
            font_weight: Some(FontWeight::Bold),
            text_align: Some(TextAlign::Center),
            ..ElementPatch::default()
        });
        let body = view_of(&editor).body().to_string();
        assert!(body.contains("A &lt; B &amp; C"));
        assert!(body.contains("font-weight=\"bold\""));
        assert!(body.contains("text-anchor=\"middle\""));
        assert!(body.contains("font-family=\"Arial\""));
        assert_eq!(body.matches("<tspan").count(), 2);
    }

    #[test]
    fn test_shape_primitives() {
        let mut editor = Editor::default();
        editor.add_shape(
            ShapeKind::Rectangle,
            &ElementPatch {
                border_radius: Some(8.0),
                border_width: Some(2.0),
                ..ElementPatch::default()
            },
        );
        editor.add_shape(ShapeKind::Circle, &ElementPatch::default());
        editor.add_shape(ShapeKind::Line, &ElementPatch::default());
        let body = view_of(&editor).body().to_string();
        assert!(body.contains("rx=\"8\""));
        assert!(body.contains("stroke-width=\"2\""));
        assert!(body.contains("<ellipse"));
        assert!(body.contains("<line"));
        assert!(body.contains("#3b82f6"));
    }

    #[test]
    fn test_rotation_and_opacity() {
        let mut editor = Editor::default();
        editor.add_shape(
            ShapeKind::Rectangle,
            &ElementPatch {
                x: Some(0.0),
                y: Some(0.0),
                width: Some(100.0),
                height: Some(50.0),
                rotation: Some(45.0),
                opacity: Some(0.5),
                ..ElementPatch::default()
            },
        );
        let body = view_of(&editor).body().to_string();
        assert!(body.contains("rotate(45 50 25)"));
        assert!(body.contains("opacity=\"0.5\""));
    }

    #[test]
    fn test_unmounted_surface_is_not_found() {
        let editor = Editor::new(EditorConfig::default());
        let mut surface = Surface::new("canvas", RenderOptions::default());
        assert!(matches!(
            surface.locate(),
            Err(RenderError::ContainerNotFound(name)) if name == "canvas"
        ));

        surface.mount(editor.document());
        assert!(surface.is_mounted());
        assert!(surface.locate().is_ok());

        surface.unmount();
        assert!(surface.locate().is_err());
    }
}
