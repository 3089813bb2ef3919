//! PdfOcrAdapter: recognizes scanned PDFs using pdftoppm + tesseract.
//!
//! Pipeline: PDF → pdftoppm (render pages to PNG) → tesseract (recognize each
//! page) → concatenate with `--- Page N (OCR) ---` markers.

use std::fs;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tempfile::TempDir;
use tokio::process::Command;
use tracing::{debug, warn};

use dossier_core::defaults::RASTERIZE_TIMEOUT_FACTOR;

use super::{push_page, ExtractionAdapter};
use crate::command::{run_cmd_status, run_cmd_with_timeout};
use crate::failure::ExtractionFailure;

pub struct PdfOcrAdapter {
    pdftoppm: PathBuf,
    tesseract: PathBuf,
    languages: String,
    dpi: u32,
    timeout_secs: u64,
}

impl PdfOcrAdapter {
    pub fn new(
        pdftoppm: PathBuf,
        tesseract: PathBuf,
        languages: impl Into<String>,
        dpi: u32,
        timeout_secs: u64,
    ) -> Self {
        Self {
            pdftoppm,
            tesseract,
            languages: languages.into(),
            dpi,
            timeout_secs,
        }
    }

    /// Rendering a whole document gets a multiple of the per-command timeout.
    fn rasterize_timeout_secs(&self) -> u64 {
        self.timeout_secs.saturating_mul(RASTERIZE_TIMEOUT_FACTOR)
    }

    /// Render every page to PNG, returning the images in page order.
    async fn rasterize(&self, path: &Path, dir: &TempDir) -> Result<Vec<PathBuf>, ExtractionFailure> {
        let prefix = dir.path().join("page");
        run_cmd_status(
            Command::new(&self.pdftoppm)
                .arg("-png")
                .arg("-r")
                .arg(self.dpi.to_string())
                .arg(path)
                .arg(&prefix),
            self.rasterize_timeout_secs(),
        )
        .await
        .map_err(|e| ExtractionFailure::OcrFailed(e.to_string()))?;

        let mut images: Vec<PathBuf> = fs::read_dir(dir.path())?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.extension().and_then(|e| e.to_str()) == Some("png"))
            .collect();
        // pdftoppm zero-pads page numbers, so name order is page order.
        images.sort();
        Ok(images)
    }
}

#[async_trait]
impl ExtractionAdapter for PdfOcrAdapter {
    async fn extract(&self, path: &Path) -> Result<String, ExtractionFailure> {
        let dir = TempDir::new()?;

        debug!(path = %path.display(), dpi = self.dpi, languages = %self.languages, "Rendering PDF pages for OCR");
        let images = self.rasterize(path, &dir).await?;
        if images.is_empty() {
            return Err(ExtractionFailure::OcrFailed("no pages rendered".to_string()));
        }

        let mut text = String::new();
        let mut recognized = 0usize;
        for (i, image) in images.iter().enumerate() {
            let page = i + 1;
            let result = run_cmd_with_timeout(
                Command::new(&self.tesseract)
                    .arg(image)
                    .arg("stdout")
                    .arg("-l")
                    .arg(&self.languages),
                self.timeout_secs,
            )
            .await;

            match result {
                Ok(page_text) => {
                    recognized += 1;
                    push_page(&mut text, &format!("--- Page {} (OCR) ---", page), &page_text);
                }
                Err(e) => warn!(path = %path.display(), page, error = %e, "OCR failed for page, skipping"),
            }
        }

        if recognized == 0 {
            return Err(ExtractionFailure::OcrFailed(format!(
                "none of {} pages could be recognized",
                images.len()
            )));
        }
        Ok(text)
    }

    fn name(&self) -> &str {
        "pdf_ocr"
    }
}
