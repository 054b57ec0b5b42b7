//! # Designer CLI
//!
//! Command-line host for saved designs.
//!
//! ## Usage
//!
//! ```bash
//! designer info flyer.json
//! designer export flyer.json --format pdf --output flyer.pdf
//! ```
//!
//! ## Architecture
//!
//! - `CliArgs` - Command-line arguments parsed with clap
//! - [`describe`] - Summarise a design and its layers
//! - [`export`] - Mount a design on a render surface and capture it

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use designer_core::{store, Document, Editor, EditorConfig};
use designer_renderer::{CanvasExporter, ExportConfig, ExportFormat, RenderOptions, Surface};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default log filter when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info,designer_core=debug,designer_renderer=debug";

/// Command-line arguments for the designer.
#[derive(Debug, Clone, Parser)]
#[command(name = "designer")]
#[command(about = "Inspect and export print designs")]
#[command(version)]
pub struct CliArgs {
    /// Editor configuration file (JSON)
    #[arg(long, global = true, env = "DESIGNER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Command to run
    #[command(subcommand)]
    pub command: Command,
}

/// Designer subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Print the canvas and layers of a design
    Info {
        /// Design file
        file: PathBuf,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Export a design to an image or PDF
    Export {
        /// Design file
        file: PathBuf,

        /// Output format
        #[arg(long, short, value_enum, default_value_t = FormatArg::Png)]
        format: FormatArg,

        /// Output path (defaults to the design path with the format's extension)
        #[arg(long, short, env = "DESIGNER_OUTPUT")]
        output: Option<PathBuf>,

        /// Pixel density multiplier for raster output
        #[arg(long, default_value = "2.0")]
        scale: f32,

        /// JPEG quality (1-100)
        #[arg(long, default_value = "95", value_parser = clap::value_parser!(u8).range(1..=100))]
        quality: u8,

        /// PDF page width in millimetres
        #[arg(long, default_value = "210")]
        page_width_mm: f32,

        /// Skip loading system fonts
        #[arg(long)]
        no_system_fonts: bool,
    },
}

/// Export format selectable on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    /// PNG image
    Png,
    /// JPEG image
    #[value(alias = "jpg")]
    Jpeg,
    /// SVG document
    Svg,
    /// PDF document
    Pdf,
}

impl From<FormatArg> for ExportFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Png => Self::Png,
            FormatArg::Jpeg => Self::Jpeg,
            FormatArg::Svg => Self::Svg,
            FormatArg::Pdf => Self::Pdf,
        }
    }
}

/// Initialize logging.
///
/// Uses `RUST_LOG` when set, otherwise [`DEFAULT_LOG_FILTER`].
/// Set `RUST_LOG_FORMAT=json` for JSON output.
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_writer(std::io::stderr);

    if std::env::var("RUST_LOG_FORMAT").as_deref() == Ok("json") {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer.json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

/// Load the editor configuration, falling back to defaults.
///
/// # Errors
///
/// Returns an error if a configuration file is given but cannot be read.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<EditorConfig> {
    match path {
        Some(path) => EditorConfig::load(path)
            .with_context(|| format!("reading config {}", path.display())),
        None => Ok(EditorConfig::default()),
    }
}

/// Open a design file in an editor session.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a valid design.
pub fn open(file: &Path, config: EditorConfig) -> anyhow::Result<Editor> {
    let document =
        store::load_file(file).with_context(|| format!("loading design {}", file.display()))?;
    tracing::info!(path = %file.display(), elements = document.len(), "Opened design");
    Ok(Editor::with_document(document, config))
}

/// Human-readable or JSON summary of a design.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn describe(editor: &Editor, json: bool) -> anyhow::Result<String> {
    let document = editor.document();
    let layers = editor.layers();
    if json {
        let value = serde_json::json!({
            "canvas": &document.canvas,
            "elements": document.len(),
            "layers": layers,
        });
        return Ok(serde_json::to_string_pretty(&value)?);
    }

    let mut out = String::new();
    let canvas = &document.canvas;
    let _ = writeln!(
        out,
        "Canvas: {}x{} ({})",
        canvas.width, canvas.height, canvas.aspect
    );
    let _ = writeln!(out, "Elements: {}", document.len());
    for layer in &layers {
        if let Some(element) = document.get(layer.id) {
            let t = &element.transform;
            let _ = writeln!(
                out,
                "  {:>3}  {:<24} {:<6} at ({}, {}) size {}x{}",
                layer.visual_index,
                layer.name,
                element.element_type().label(),
                t.x,
                t.y,
                t.width,
                t.height,
            );
        }
    }
    Ok(out)
}

/// Output path for an export when none was given.
#[must_use]
pub fn default_output(file: &Path, format: ExportFormat) -> PathBuf {
    file.with_extension(format.extension())
}

/// Export a document to `output`.
///
/// Relative image paths resolve against `base_dir`.
///
/// # Errors
///
/// Returns an error if rendering, encoding or writing fails.
pub fn export(
    document: &Document,
    format: ExportFormat,
    config: ExportConfig,
    base_dir: Option<&Path>,
    output: &Path,
) -> anyhow::Result<usize> {
    let mut surface = Surface::new(
        "design-canvas",
        RenderOptions {
            embed_local_images: true,
            base_dir: base_dir.map(Path::to_path_buf),
        },
    );
    surface.mount(document);

    let exporter = CanvasExporter::new(config);
    let bytes = exporter
        .export(&surface, format)
        .with_context(|| format!("exporting {}", format.extension()))?;
    std::fs::write(output, &bytes).with_context(|| format!("writing {}", output.display()))?;
    Ok(bytes.len())
}

/// Run a parsed command, returning what to print on stdout.
///
/// # Errors
///
/// Returns an error if the command fails.
pub fn run(args: CliArgs) -> anyhow::Result<String> {
    let config = load_config(args.config.as_deref())?;
    match args.command {
        Command::Info { file, json } => {
            let editor = open(&file, config)?;
            describe(&editor, json)
        }
        Command::Export {
            file,
            format,
            output,
            scale,
            quality,
            page_width_mm,
            no_system_fonts,
        } => {
            let editor = open(&file, config)?;
            let format = ExportFormat::from(format);
            let output = output.unwrap_or_else(|| default_output(&file, format));
            let export_config = ExportConfig {
                scale,
                jpeg_quality: quality,
                pdf_page_width_mm: page_width_mm,
                load_system_fonts: !no_system_fonts,
                ..ExportConfig::default()
            };
            let written = export(
                editor.document(),
                format,
                export_config,
                file.parent(),
                &output,
            )?;
            Ok(format!("Wrote {} ({written} bytes)", output.display()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use designer_core::{ElementPatch, ShapeKind};

    fn write_design(dir: &Path) -> PathBuf {
        let mut editor = Editor::default();
        editor.add_shape(
            ShapeKind::Rectangle,
            &ElementPatch {
                name: Some("Backdrop".into()),
                ..ElementPatch::default()
            },
        );
        editor.add_text(&ElementPatch::default());
        let path = dir.join("flyer.json");
        store::save_file(&path, editor.document()).expect("save");
        path
    }

    #[test]
    fn test_parse_export_args() {
        let args = CliArgs::try_parse_from([
            "designer", "export", "flyer.json", "--format", "jpg", "--scale", "3",
        ])
        .expect("parse");
        match args.command {
            Command::Export {
                format,
                scale,
                quality,
                ..
            } => {
                assert_eq!(format, FormatArg::Jpeg);
                assert!((scale - 3.0).abs() < f32::EPSILON);
                assert_eq!(quality, 95);
            }
            Command::Info { .. } => panic!("expected export"),
        }
    }

    #[test]
    fn test_quality_out_of_range_rejected() {
        let result = CliArgs::try_parse_from([
            "designer", "export", "flyer.json", "--quality", "0",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_default_output_extension() {
        let out = default_output(Path::new("/tmp/flyer.json"), ExportFormat::Pdf);
        assert_eq!(out, PathBuf::from("/tmp/flyer.pdf"));
    }

    #[test]
    fn test_info_lists_layers_top_first() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write_design(dir.path());
        let editor = open(&path, EditorConfig::default()).expect("open");

        let text = describe(&editor, false).expect("describe");
        assert!(text.starts_with("Canvas: 794x1123 (a4)"));
        let text_row = text.find("Text").expect("text row");
        let backdrop_row = text.find("Backdrop").expect("backdrop row");
        assert!(text_row < backdrop_row);

        let json = describe(&editor, true).expect("json");
        let value: serde_json::Value = serde_json::from_str(&json).expect("valid json");
        assert_eq!(value["elements"], 2);
        assert_eq!(value["layers"][1]["name"], "Backdrop");
    }

    #[test]
    fn test_run_export_writes_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write_design(dir.path());
        let output = dir.path().join("out.svg");

        let message = run(CliArgs {
            config: None,
            command: Command::Export {
                file: path,
                format: FormatArg::Svg,
                output: Some(output.clone()),
                scale: 2.0,
                quality: 95,
                page_width_mm: 210.0,
                no_system_fonts: true,
            },
        })
        .expect("export");

        assert!(message.starts_with("Wrote"));
        let svg = std::fs::read_to_string(&output).expect("read svg");
        assert!(svg.starts_with("<svg"));
    }

    #[test]
    fn test_open_rejects_invalid_design() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").expect("write");
        assert!(open(&path, EditorConfig::default()).is_err());
    }
}
