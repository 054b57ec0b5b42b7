//! Image source resolution.
//!
//! Image elements reference their pixels by `src`. Remote URLs and data URIs
//! pass through untouched; local files are read and inlined as base64 data
//! URIs so that exported SVG is self-contained.

use std::path::Path;

use base64::Engine;

use crate::error::{RenderError, RenderResult};

/// Image formats recognised for embedding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    /// PNG with alpha support.
    Png,
    /// JPEG (no alpha).
    Jpeg,
    /// GIF.
    Gif,
    /// WebP (alpha support).
    WebP,
    /// Nested SVG document.
    Svg,
    /// Unknown/other format.
    Unknown,
}

impl ImageFormat {
    /// Detect format from file extension.
    #[must_use]
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "png" => Self::Png,
            "jpg" | "jpeg" => Self::Jpeg,
            "gif" => Self::Gif,
            "webp" => Self::WebP,
            "svg" => Self::Svg,
            _ => Self::Unknown,
        }
    }

    /// Detect format from magic bytes.
    #[must_use]
    pub fn from_magic_bytes(data: &[u8]) -> Self {
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
            Self::Png
        } else if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            Self::Jpeg
        } else if data.starts_with(b"GIF8") {
            Self::Gif
        } else if data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP" {
            Self::WebP
        } else {
            Self::Unknown
        }
    }

    /// MIME type used in data URIs.
    #[must_use]
    pub fn mime(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Gif => "image/gif",
            Self::WebP => "image/webp",
            Self::Svg => "image/svg+xml",
            Self::Unknown => "application/octet-stream",
        }
    }
}

/// Whether `src` already points somewhere a renderer can fetch on its own.
#[must_use]
pub fn is_inline_or_remote(src: &str) -> bool {
    src.starts_with("data:") || src.starts_with("http://") || src.starts_with("https://")
}

/// Encode raw image bytes as a data URI.
#[must_use]
pub fn to_data_uri(bytes: &[u8], format: ImageFormat) -> String {
    let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
    format!("data:{};base64,{encoded}", format.mime())
}

/// Read a local image and return it as a data URI.
///
/// Relative paths resolve against `base_dir` when given. The format comes
/// from the file's magic bytes, falling back to its extension.
///
/// # Errors
///
/// Returns [`RenderError::Resource`] if the file cannot be read.
pub fn embed_local_image(src: &str, base_dir: Option<&Path>) -> RenderResult<String> {
    let path = Path::new(src.strip_prefix("file://").unwrap_or(src));
    let path = match base_dir {
        Some(dir) if path.is_relative() => dir.join(path),
        _ => path.to_path_buf(),
    };
    let bytes = std::fs::read(&path)
        .map_err(|e| RenderError::Resource(format!("{}: {e}", path.display())))?;

    let format = match ImageFormat::from_magic_bytes(&bytes) {
        ImageFormat::Unknown => path
            .extension()
            .and_then(|ext| ext.to_str())
            .map_or(ImageFormat::Unknown, ImageFormat::from_extension),
        detected => detected,
    };
    Ok(to_data_uri(&bytes, format))
}

/// Resolve the `href` written for an image element.
///
/// Local files that cannot be read keep their original `src`; the failure is
/// logged and the image renders empty.
#[must_use]
pub fn resolve_href(src: &str, embed_local: bool, base_dir: Option<&Path>) -> String {
    if !embed_local || src.is_empty() || is_inline_or_remote(src) {
        return src.to_string();
    }
    match embed_local_image(src, base_dir) {
        Ok(uri) => uri,
        Err(e) => {
            tracing::warn!("Could not embed image: {e}");
            src.to_string()
        }
    }
}
