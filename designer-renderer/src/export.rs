//! Canvas export to image and document formats.
//!
//! Captures a [`RenderContainer`] as PNG, JPEG, SVG or PDF. Raster formats go
//! through the SVG capture and the resvg/tiny-skia pipeline. PDF wraps the
//! PNG capture in a single full-bleed page.

use std::str::FromStr;

use image::ImageEncoder;

use crate::error::{RenderError, RenderResult};
use crate::render::{CanvasView, RenderContainer};

/// Millimetres per inch.
const MM_PER_INCH: f32 = 25.4;

/// Export output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// PNG image.
    Png,
    /// JPEG image.
    Jpeg,
    /// SVG vector graphics (returns the SVG XML string as UTF-8 bytes).
    Svg,
    /// PDF document with an embedded raster image.
    Pdf,
}

impl ExportFormat {
    /// Conventional file extension.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::Svg => "svg",
            Self::Pdf => "pdf",
        }
    }

    /// MIME type of the output.
    #[must_use]
    pub fn mime(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Svg => "image/svg+xml",
            Self::Pdf => "application/pdf",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "png" => Ok(Self::Png),
            "jpg" | "jpeg" => Ok(Self::Jpeg),
            "svg" => Ok(Self::Svg),
            "pdf" => Ok(Self::Pdf),
            other => Err(RenderError::Export(format!("unknown export format: {other}"))),
        }
    }
}

/// Configuration for canvas export.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Pixel density multiplier for raster output (default: 2.0).
    pub scale: f32,
    /// JPEG quality 1-100 (default: 95).
    pub jpeg_quality: u8,
    /// Background color as RGBA bytes.
    pub background: [u8; 4],
    /// PDF page width in millimetres; height follows the canvas aspect.
    pub pdf_page_width_mm: f32,
    /// Resolution the PDF image is placed at before scaling to the page.
    pub dpi: f32,
    /// Load system fonts for text rasterization.
    pub load_system_fonts: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            scale: 2.0,
            jpeg_quality: 95,
            background: [255, 255, 255, 255],
            pdf_page_width_mm: 210.0,
            dpi: 96.0,
            load_system_fonts: true,
        }
    }
}

/// Exports a rendered canvas to various formats.
///
/// Exports are read-only: they take `&CanvasView` and never see the editor.
pub struct CanvasExporter {
    config: ExportConfig,
    options: usvg::Options<'static>,
}

impl std::fmt::Debug for CanvasExporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CanvasExporter")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl CanvasExporter {
    /// Create a new exporter with the given configuration.
    #[must_use]
    pub fn new(config: ExportConfig) -> Self {
        let mut options = usvg::Options::default();
        if config.load_system_fonts {
            options.fontdb_mut().load_system_fonts();
            tracing::debug!(faces = options.fontdb.len(), "Loaded system fonts");
        }
        Self { config, options }
    }

    /// Create an exporter with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(ExportConfig::default())
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Capture `container` in the specified format.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::ContainerNotFound`] if the container has
    /// nothing rendered, or [`RenderError::Export`] if encoding fails.
    pub fn export(
        &self,
        container: &dyn RenderContainer,
        format: ExportFormat,
    ) -> RenderResult<Vec<u8>> {
        let view = container.locate()?;
        let result = match format {
            ExportFormat::Png => self.render_to_png(view),
            ExportFormat::Jpeg => self.render_to_jpeg(view),
            ExportFormat::Svg => Ok(self.render_to_svg(view).into_bytes()),
            ExportFormat::Pdf => self.render_to_pdf(view),
        };
        match &result {
            Ok(bytes) => tracing::info!(?format, bytes = bytes.len(), "Export complete"),
            Err(e) => tracing::warn!(?format, "Export failed: {e}"),
        }
        result
    }

    /// Export the view to PNG bytes at the configured density.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering or encoding fails.
    pub fn render_to_png(&self, view: &CanvasView) -> RenderResult<Vec<u8>> {
        let pixmap = self.rasterize(view)?;
        pixmap
            .encode_png()
            .map_err(|e| RenderError::Export(format!("PNG encoding failed: {e}")))
    }

    /// Export the view to JPEG bytes, flattened onto the background.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering or encoding fails.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn render_to_jpeg(&self, view: &CanvasView) -> RenderResult<Vec<u8>> {
        let pixmap = self.rasterize(view)?;

        let (width, height) = (pixmap.width(), pixmap.height());
        let bg = &self.config.background;
        let mut rgb_data = Vec::with_capacity((width * height * 3) as usize);
        // tiny-skia stores premultiplied alpha.
        for pixel in pixmap.data().chunks_exact(4) {
            let inv = 1.0 - f32::from(pixel[3]) / 255.0;
            for (&color, &back) in pixel[..3].iter().zip(bg.iter()) {
                let value = f32::from(back).mul_add(inv, f32::from(color));
                rgb_data.push(value.round().clamp(0.0, 255.0) as u8);
            }
        }

        let mut buf = std::io::Cursor::new(Vec::new());
        let encoder =
            image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buf, self.config.jpeg_quality);
        encoder
            .write_image(&rgb_data, width, height, image::ExtendedColorType::Rgb8)
            .map_err(|e| RenderError::Export(format!("JPEG encoding failed: {e}")))?;

        Ok(buf.into_inner())
    }

    /// Export the view as a self-contained SVG document at canvas size.
    #[must_use]
    pub fn render_to_svg(&self, view: &CanvasView) -> String {
        view.to_svg(1.0, self.config.background)
    }

    /// Export the view to PDF bytes.
    ///
    /// The PNG capture fills one page that is `pdf_page_width_mm` wide with a
    /// height proportional to the canvas.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering or PDF generation fails.
    #[allow(clippy::cast_precision_loss)]
    pub fn render_to_pdf(&self, view: &CanvasView) -> RenderResult<Vec<u8>> {
        let pixmap = self.rasterize(view)?;
        let (px_w, px_h) = (pixmap.width(), pixmap.height());
        let png_data = pixmap
            .encode_png()
            .map_err(|e| RenderError::Export(format!("PNG encoding failed: {e}")))?;
        let (page_width_mm, page_height_mm) = self.pdf_page_size(view);

        let (doc, page1, layer1) = printpdf::PdfDocument::new(
            "Design Export",
            printpdf::Mm(page_width_mm),
            printpdf::Mm(page_height_mm),
            "Layer 1",
        );
        let current_layer = doc.get_page(page1).get_layer(layer1);

        // Decode through printpdf's bundled image crate for compatibility
        let dynamic_image = printpdf::image_crate::load_from_memory(&png_data)
            .map_err(|e| RenderError::Export(format!("Failed to decode PNG for PDF: {e}")))?;
        let pdf_image = printpdf::Image::from_dynamic_image(&dynamic_image);

        // Natural size at `dpi`, stretched to the page.
        let dpi = self.config.dpi;
        let natural_w_mm = px_w as f32 / dpi * MM_PER_INCH;
        let natural_h_mm = px_h as f32 / dpi * MM_PER_INCH;

        let transform = printpdf::ImageTransform {
            translate_x: Some(printpdf::Mm(0.0)),
            translate_y: Some(printpdf::Mm(0.0)),
            scale_x: Some(page_width_mm / natural_w_mm),
            scale_y: Some(page_height_mm / natural_h_mm),
            dpi: Some(dpi),
            ..Default::default()
        };
        pdf_image.add_to_layer(current_layer, transform);

        doc.save_to_bytes()
            .map_err(|e| RenderError::Export(format!("PDF save failed: {e}")))
    }

    /// Page size in millimetres for a PDF export of `view`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn pdf_page_size(&self, view: &CanvasView) -> (f32, f32) {
        let width = self.config.pdf_page_width_mm;
        let aspect = view.height().max(1) as f32 / view.width().max(1) as f32;
        (width, width * aspect)
    }

    /// Rasterize the view at the configured scale.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn rasterize(&self, view: &CanvasView) -> RenderResult<tiny_skia::Pixmap> {
        let svg_string = view.to_svg(self.config.scale, self.config.background);
        let tree = usvg::Tree::from_str(&svg_string, &self.options)
            .map_err(|e| RenderError::Export(format!("SVG parsing failed: {e}")))?;

        let px_w = tree.size().width().round() as u32;
        let px_h = tree.size().height().round() as u32;

        let mut pixmap = tiny_skia::Pixmap::new(px_w.max(1), px_h.max(1))
            .ok_or_else(|| RenderError::Export("Failed to create pixmap".to_string()))?;

        resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());

        Ok(pixmap)
    }
}
