//! Tesseract OCR and pdftoppm rasterization via their command-line tools.

use std::path::{Path, PathBuf};
use std::process::Command;

use thiserror::Error;
use tracing::debug;

use crate::extraction::OcrConfig;

#[derive(Debug, Error)]
pub enum OcrError {
    #[error("OCR backend not available: {0}")]
    BackendNotAvailable(String),

    #[error("OCR failed: {0}")]
    OcrFailed(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone)]
pub struct OcrEngine {
    config: OcrConfig,
}

impl OcrEngine {
    pub fn new(config: OcrConfig) -> Self {
        Self { config }
    }

    /// Runs Tesseract on one image file and returns the recognized text.
    pub fn recognize(&self, image_path: &Path) -> Result<String, OcrError> {
        let output = Command::new(&self.config.tesseract_cmd)
            .arg(image_path)
            .arg("stdout")
            .args(["-l", &self.config.language])
            .output();

        match output {
            Ok(output) if output.status.success() => {
                Ok(String::from_utf8_lossy(&output.stdout).to_string())
            }
            Ok(output) => {
                let stderr = String::from_utf8_lossy(&output.stderr);
                Err(OcrError::OcrFailed(format!("tesseract failed: {}", stderr.trim())))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(
                OcrError::BackendNotAvailable(format!(
                    "'{}' not found (install tesseract-ocr)",
                    self.config.tesseract_cmd
                )),
            ),
            Err(e) => Err(OcrError::Io(e)),
        }
    }

    /// Rasterizes every page of a PDF and OCRs each, joined in page order.
    pub fn recognize_pdf_pages(&self, pdf_path: &Path) -> Result<String, OcrError> {
        let workdir = tempfile::TempDir::new()?;
        let pages = self.rasterize(pdf_path, workdir.path())?;
        debug!("Rasterized {} pages from {}", pages.len(), pdf_path.display());

        let mut texts = Vec::with_capacity(pages.len());
        for page in &pages {
            texts.push(self.recognize(page)?);
        }
        Ok(texts.join("\n"))
    }

    fn rasterize(&self, pdf_path: &Path, output_dir: &Path) -> Result<Vec<PathBuf>, OcrError> {
        let dpi = self.config.dpi.to_string();
        let status = Command::new(&self.config.pdftoppm_cmd)
            .args(["-png", "-r", &dpi])
            .arg(pdf_path)
            .arg(output_dir.join("page"))
            .status();

        match status {
            Ok(s) if s.success() => {}
            Ok(_) => {
                return Err(OcrError::OcrFailed(
                    "pdftoppm failed to convert PDF pages".to_string(),
                ))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(OcrError::BackendNotAvailable(format!(
                    "'{}' not found (install poppler-utils)",
                    self.config.pdftoppm_cmd
                )))
            }
            Err(e) => return Err(OcrError::Io(e)),
        }

        let pages = collect_page_images(output_dir)?;
        if pages.is_empty() {
            return Err(OcrError::OcrFailed("no page images generated".to_string()));
        }
        Ok(pages)
    }
}

/// Lists `page-N.png` files in `dir`, ordered by page number.
///
/// pdftoppm zero-pads N to the width of the last page number, so the padding
/// varies between documents; sorting on the parsed number handles all widths.
pub fn collect_page_images(dir: &Path) -> Result<Vec<PathBuf>, OcrError> {
    let mut pages: Vec<(u32, PathBuf)> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter_map(|path| page_number(&path).map(|n| (n, path)))
        .collect();
    pages.sort_by_key(|(n, _)| *n);
    Ok(pages.into_iter().map(|(_, path)| path).collect())
}

fn page_number(path: &Path) -> Option<u32> {
    if path.extension()?.to_str()? != "png" {
        return None;
    }
    path.file_stem()?
        .to_str()?
        .strip_prefix("page-")?
        .parse()
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_collect_page_images_orders_by_number() {
        let temp = TempDir::new().unwrap();
        for name in ["page-10.png", "page-02.png", "page-01.png", "notes.txt"] {
            std::fs::write(temp.path().join(name), b"fake png").unwrap();
        }

        let pages = collect_page_images(temp.path()).unwrap();
        let names: Vec<_> = pages
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["page-01.png", "page-02.png", "page-10.png"]);
    }

    #[test]
    fn test_collect_page_images_empty_dir() {
        let temp = TempDir::new().unwrap();
        assert!(collect_page_images(temp.path()).unwrap().is_empty());
    }

    #[test]
    fn test_missing_tesseract_is_backend_not_available() {
        let engine = OcrEngine::new(OcrConfig {
            tesseract_cmd: "definitely-not-a-real-tesseract-binary".to_string(),
            ..OcrConfig::default()
        });
        let result = engine.recognize(Path::new("scan.png"));
        assert!(matches!(result, Err(OcrError::BackendNotAvailable(_))));
    }

    #[test]
    fn test_missing_pdftoppm_is_backend_not_available() {
        let engine = OcrEngine::new(OcrConfig {
            pdftoppm_cmd: "definitely-not-a-real-pdftoppm-binary".to_string(),
            ..OcrConfig::default()
        });
        let result = engine.recognize_pdf_pages(Path::new("scan.pdf"));
        assert!(matches!(result, Err(OcrError::BackendNotAvailable(_))));
    }
}
