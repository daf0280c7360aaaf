//! Resume text extraction.
//!
//! Flow: classify file → (image) OCR | (pdf) text layer → OCR fallback per page.
//! Every path returns a `String`; failures are logged and collapse to empty text.
//! Callers treat short/empty text as an unreadable resume.
//!
//! OCR and rasterization shell out to blocking subprocesses, so call `extract`
//! from `tokio::task::spawn_blocking`.

pub mod chunker;
pub mod ocr;
pub mod skills;

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::extraction::ocr::{OcrEngine, OcrError};

/// Resume file kinds the extractor understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResumeFormat {
    /// Raster image, read with OCR.
    Image,
    /// Fixed-layout document (PDF), text layer first then OCR.
    Pdf,
    Unsupported,
}

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "tif", "tiff", "bmp"];

impl ResumeFormat {
    /// Classifies a file by its extension, case-insensitively.
    pub fn from_file_name(name: &str) -> Self {
        let extension = Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match extension.as_deref() {
            Some("pdf") => ResumeFormat::Pdf,
            Some(ext) if IMAGE_EXTENSIONS.contains(&ext) => ResumeFormat::Image,
            _ => ResumeFormat::Unsupported,
        }
    }
}

/// OCR tool configuration. Loaded from the environment in `Config`.
#[derive(Debug, Clone)]
pub struct OcrConfig {
    pub tesseract_cmd: String,
    pub pdftoppm_cmd: String,
    pub language: String,
    /// Rasterization resolution for scanned PDFs.
    pub dpi: u32,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            tesseract_cmd: "tesseract".to_string(),
            pdftoppm_cmd: "pdftoppm".to_string(),
            language: "eng".to_string(),
            dpi: 300,
        }
    }
}

/// Turns an uploaded resume file into raw text. Never fails: see module docs.
#[derive(Debug, Clone)]
pub struct TextExtractor {
    ocr: OcrEngine,
}

impl TextExtractor {
    pub fn new(config: OcrConfig) -> Self {
        Self {
            ocr: OcrEngine::new(config),
        }
    }

    pub fn extract(&self, path: &Path, format: ResumeFormat) -> String {
        match format {
            ResumeFormat::Image => self.extract_image(path),
            ResumeFormat::Pdf => self.extract_pdf(path),
            ResumeFormat::Unsupported => {
                warn!("Unsupported resume file type: {}", path.display());
                String::new()
            }
        }
    }

    fn extract_image(&self, path: &Path) -> String {
        match self.ocr.recognize(path) {
            Ok(text) => text,
            Err(e) => {
                warn!("OCR failed for image {}: {e}", path.display());
                String::new()
            }
        }
    }

    fn extract_pdf(&self, path: &Path) -> String {
        // pdf-extract panics on some malformed documents; treat that like any other failure.
        match std::panic::catch_unwind(|| pdf_extract::extract_text(path)) {
            Ok(Ok(text)) if !text.trim().is_empty() => return text,
            Ok(Ok(_)) => info!(
                "PDF {} has no text layer, falling back to OCR",
                path.display()
            ),
            Ok(Err(e)) => warn!("PDF text extraction failed for {}: {e}", path.display()),
            Err(_) => warn!("PDF text extraction panicked for {}", path.display()),
        }

        match self.ocr.recognize_pdf_pages(path) {
            Ok(text) => text,
            Err(OcrError::BackendNotAvailable(hint)) => {
                warn!("Cannot OCR scanned PDF {}: {hint}", path.display());
                String::new()
            }
            Err(e) => {
                warn!("OCR for PDF {} failed: {e}", path.display());
                String::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_pdf_extension() {
        assert_eq!(ResumeFormat::from_file_name("resume.pdf"), ResumeFormat::Pdf);
        assert_eq!(ResumeFormat::from_file_name("RESUME.PDF"), ResumeFormat::Pdf);
    }

    #[test]
    fn test_format_from_image_extensions() {
        for name in ["scan.jpg", "scan.JPEG", "scan.png", "scan.tiff"] {
            assert_eq!(ResumeFormat::from_file_name(name), ResumeFormat::Image, "{name}");
        }
    }

    #[test]
    fn test_format_unsupported() {
        for name in ["resume.docx", "resume", "notes.txt", ".pdf.bak"] {
            assert_eq!(
                ResumeFormat::from_file_name(name),
                ResumeFormat::Unsupported,
                "{name}"
            );
        }
    }

    #[test]
    fn test_unsupported_format_returns_empty_text() {
        let extractor = TextExtractor::new(OcrConfig::default());
        let text = extractor.extract(Path::new("/nonexistent/resume.docx"), ResumeFormat::Unsupported);
        assert!(text.is_empty());
    }

    #[test]
    fn test_missing_image_returns_empty_text() {
        let extractor = TextExtractor::new(OcrConfig {
            tesseract_cmd: "definitely-not-a-real-tesseract-binary".to_string(),
            ..OcrConfig::default()
        });
        let text = extractor.extract(Path::new("/nonexistent/resume.png"), ResumeFormat::Image);
        assert!(text.is_empty());
    }

    #[test]
    fn test_unreadable_pdf_without_rasterizer_returns_empty_text() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("broken.pdf");
        std::fs::write(&path, b"not really a pdf").unwrap();

        let extractor = TextExtractor::new(OcrConfig {
            pdftoppm_cmd: "definitely-not-a-real-pdftoppm-binary".to_string(),
            ..OcrConfig::default()
        });
        assert!(extractor.extract(&path, ResumeFormat::Pdf).is_empty());
    }
}
