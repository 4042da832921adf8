//! PDF input handling: document checks and rasterization of pages to images.

use crate::core::config::PdfRenderSettings;
use crate::core::constants::PDF_MAGIC;
use crate::core::errors::DocumentError;
use crate::core::traits::Rasterizer;
use image::RgbImage;
use pdfium_render::prelude::*;
use std::path::Path;
use tracing::debug;

/// Directories probed for a PDFium shared library before the system search path.
const PDFIUM_SEARCH_PATHS: &[&str] = &["./", "/usr/lib", "/usr/local/lib", "/opt/homebrew/lib"];

/// Rasterizer backed by the PDFium library.
///
/// PDFium is bound at runtime, so constructing a rasterizer fails when the shared
/// library cannot be found.
pub struct PdfRasterizer {
    pdfium: Pdfium,
    config: PdfRenderSettings,
}

impl PdfRasterizer {
    /// Binds PDFium and creates a rasterizer with the given render settings.
    pub fn new(config: PdfRenderSettings) -> Result<Self, DocumentError> {
        let bindings = PDFIUM_SEARCH_PATHS
            .iter()
            .find_map(|dir| {
                let library = Pdfium::pdfium_platform_library_name_at_path(*dir);
                match Pdfium::bind_to_library(&library) {
                    Ok(bindings) => {
                        debug!(library = ?library, "Bound PDFium");
                        Some(bindings)
                    }
                    Err(_) => None,
                }
            })
            .map_or_else(Pdfium::bind_to_system_library, Ok)
            .map_err(|e| {
                DocumentError::RasterizerUnavailable(format!("Could not find PDFium library: {e}"))
            })?;

        Ok(Self {
            pdfium: Pdfium::new(bindings),
            config,
        })
    }

    /// Create a new PDF rasterizer with default render settings
    pub fn new_default() -> Result<Self, DocumentError> {
        Self::new(PdfRenderSettings::default())
    }

    /// Render all pages of a PDF document to images
    fn render_document(&self, document: &PdfDocument) -> Result<Vec<RgbImage>, DocumentError> {
        let page_count = document.pages().len() as usize;

        if page_count == 0 {
            return Err(DocumentError::EmptyDocument);
        }

        let mut images = Vec::with_capacity(page_count);

        for (index, page) in document.pages().iter().enumerate() {
            let image = self.render_page(&page).map_err(|message| DocumentError::Render {
                page: index + 1,
                message,
            })?;
            debug!(
                page = index + 1,
                width = image.width(),
                height = image.height(),
                "Rendered page"
            );
            images.push(image);
        }

        Ok(images)
    }

    /// Render a single page to an RGB image
    fn render_page(&self, page: &PdfPage) -> Result<RgbImage, String> {
        let (width_px, height_px) =
            target_dimensions(page.width().value, page.height().value, &self.config);

        let render_config = PdfRenderConfig::new()
            .set_target_width(width_px as i32)
            .set_target_height(height_px as i32)
            .render_form_data(true)
            .render_annotations(true);

        let bitmap = page
            .render_with_config(&render_config)
            .map_err(|e| e.to_string())?;

        Ok(bitmap.as_image().to_rgb8())
    }
}

impl Rasterizer for PdfRasterizer {
    fn render(&self, document: &[u8]) -> Result<Vec<RgbImage>, DocumentError> {
        if !is_pdf_bytes(document) {
            return Err(DocumentError::Load(
                "input does not start with a %PDF header".to_string(),
            ));
        }

        let document = self
            .pdfium
            .load_pdf_from_byte_slice(document, None)
            .map_err(|e| DocumentError::Load(e.to_string()))?;

        self.render_document(&document)
    }
}

/// Pixel size of a page rendered at the configured DPI, capped to `max_dimension`.
///
/// PDF sizes are in points (72 per inch). Aspect ratio is kept when capping.
fn target_dimensions(
    width_points: f32,
    height_points: f32,
    config: &PdfRenderSettings,
) -> (u32, u32) {
    let scale = config.dpi / 72.0;
    let mut width_px = (width_points * scale).round() as u32;
    let mut height_px = (height_points * scale).round() as u32;

    if width_px > config.max_dimension || height_px > config.max_dimension {
        let ratio = if width_px > height_px {
            config.max_dimension as f32 / width_px as f32
        } else {
            config.max_dimension as f32 / height_px as f32
        };
        width_px = (width_px as f32 * ratio).round() as u32;
        height_px = (height_px as f32 * ratio).round() as u32;
    }

    (width_px.max(1), height_px.max(1))
}

/// Check if bytes represent a PDF file (magic bytes: %PDF)
pub fn is_pdf_bytes(bytes: &[u8]) -> bool {
    bytes.starts_with(PDF_MAGIC)
}

/// Check if a file path has a PDF extension
pub fn is_pdf_path(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false)
}

/// Checks that `path` names an existing `.pdf` file.
pub fn validate_pdf_path(path: &Path) -> Result<(), DocumentError> {
    if !is_pdf_path(path) {
        return Err(DocumentError::NotAPdf);
    }
    if !path.exists() {
        return Err(DocumentError::NotFound(path.to_path_buf()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_pdf_magic() {
        assert!(is_pdf_bytes(b"%PDF-1.7\n%\xe2\xe3\xcf\xd3"));
        assert!(!is_pdf_bytes(b"%PD"));
        assert!(!is_pdf_bytes(b"\x89PNG\r\n\x1a\n"));
    }

    #[test]
    fn test_pdf_extension_is_case_insensitive() {
        assert!(is_pdf_path(Path::new("scan.pdf")));
        assert!(is_pdf_path(Path::new("SCAN.PDF")));
        assert!(!is_pdf_path(Path::new("scan.png")));
        assert!(!is_pdf_path(Path::new("pdf")));
    }

    #[test]
    fn test_validate_rejects_wrong_extension() {
        let err = validate_pdf_path(Path::new("/tmp/prescription.docx")).unwrap_err();
        assert_eq!(err.to_string(), "Input file must be a '.pdf' file.");
    }

    #[test]
    fn test_validate_rejects_missing_file() {
        let path = PathBuf::from("/nonexistent/dir/prescription.pdf");
        let err = validate_pdf_path(&path).unwrap_err();
        assert!(matches!(err, DocumentError::NotFound(_)));
        assert_eq!(err.to_string(), "File /nonexistent/dir/prescription.pdf does not exist.");
    }

    #[test]
    fn test_validate_accepts_existing_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scan.pdf");
        std::fs::write(&path, b"%PDF-1.4").unwrap();
        assert!(validate_pdf_path(&path).is_ok());
    }

    #[test]
    fn test_target_dimensions_at_default_dpi() {
        // US Letter: 612 x 792 points
        let (w, h) = target_dimensions(612.0, 792.0, &PdfRenderSettings::default());
        assert_eq!((w, h), (1700, 2200));
    }

    #[test]
    fn test_target_dimensions_are_capped() {
        let settings = PdfRenderSettings {
            dpi: 300.0,
            max_dimension: 1000,
        };
        let (w, h) = target_dimensions(792.0, 612.0, &settings);
        assert_eq!(w, 1000);
        assert!(h < 1000 && h > 700, "height: {h}");
    }
}
