//! Native PDF text, page by page, using `pdfinfo` and `pdftotext` (poppler-utils).

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, warn};

use super::{push_page, ExtractionAdapter};
use crate::command::run_cmd_with_timeout;
use crate::failure::ExtractionFailure;

/// Extracts each page separately so a page that fails to decode only loses
/// itself. Pages are prefixed with `--- Page N ---`.
pub struct PdfTextAdapter {
    pdftotext: PathBuf,
    pdfinfo: PathBuf,
    timeout_secs: u64,
}

/// Page count from `pdfinfo` output, if it reports one.
pub(crate) fn parse_page_count(pdfinfo_output: &str) -> Option<usize> {
    pdfinfo_output.lines().find_map(|line| {
        let (key, value) = line.split_once(':')?;
        if key.trim().eq_ignore_ascii_case("pages") {
            value.trim().parse().ok()
        } else {
            None
        }
    })
}

impl PdfTextAdapter {
    pub fn new(pdftotext: PathBuf, pdfinfo: PathBuf, timeout_secs: u64) -> Self {
        Self {
            pdftotext,
            pdfinfo,
            timeout_secs,
        }
    }

    async fn page_count(&self, path: &Path) -> Result<Option<usize>, ExtractionFailure> {
        let info = run_cmd_with_timeout(Command::new(&self.pdfinfo).arg(path), self.timeout_secs)
            .await
            .map_err(|e| ExtractionFailure::Pdf(e.to_string()))?;
        Ok(parse_page_count(&info))
    }

    async fn page_text(&self, path: &Path, page: usize) -> dossier_core::Result<String> {
        run_cmd_with_timeout(
            Command::new(&self.pdftotext)
                .arg("-f")
                .arg(page.to_string())
                .arg("-l")
                .arg(page.to_string())
                .arg(path)
                .arg("-"),
            self.timeout_secs,
        )
        .await
    }
}

#[async_trait]
impl ExtractionAdapter for PdfTextAdapter {
    async fn extract(&self, path: &Path) -> Result<String, ExtractionFailure> {
        let pages = match self.page_count(path).await? {
            Some(pages) => pages,
            None => {
                // No page count reported; read the document in one go.
                warn!(path = %path.display(), "pdfinfo reported no page count");
                return run_cmd_with_timeout(
                    Command::new(&self.pdftotext).arg(path).arg("-"),
                    self.timeout_secs,
                )
                .await
                .map_err(|e| ExtractionFailure::Pdf(e.to_string()));
            }
        };

        debug!(path = %path.display(), pages, "Extracting PDF text layer");

        let mut text = String::new();
        for page in 1..=pages {
            match self.page_text(path, page).await {
                Ok(page_text) => push_page(&mut text, &format!("--- Page {} ---", page), &page_text),
                Err(e) => warn!(path = %path.display(), page, error = %e, "Page extraction failed, skipping"),
            }
        }
        Ok(text)
    }

    fn name(&self) -> &str {
        "pdf_text"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_page_count() {
        let output = "Title:          Bail\nProducer:       LibreOffice\nPages:          12\nEncrypted:      no\n";
        assert_eq!(parse_page_count(output), Some(12));
    }

    #[test]
    fn test_parse_page_count_missing() {
        assert_eq!(parse_page_count("Title: x\n"), None);
        assert_eq!(parse_page_count("Pages: many\n"), None);
    }

    #[tokio::test]
    async fn test_corrupt_pdf_is_a_pdf_failure() {
        let (Ok(pdftotext), Ok(pdfinfo)) = (which::which("pdftotext"), which::which("pdfinfo"))
        else {
            eprintln!("Skipping test: poppler-utils not installed");
            return;
        };
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.pdf");
        std::fs::write(&path, b"not a pdf at all").unwrap();

        let adapter = PdfTextAdapter::new(pdftotext, pdfinfo, 30);
        let result = adapter.extract(&path).await;
        assert!(matches!(result, Err(ExtractionFailure::Pdf(_))), "{:?}", result);
    }
}
