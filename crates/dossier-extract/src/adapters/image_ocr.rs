//! Direct recognition of raster images with tesseract.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use super::ExtractionAdapter;
use crate::command::run_cmd_with_timeout;
use crate::failure::ExtractionFailure;

pub struct ImageOcrAdapter {
    tesseract: PathBuf,
    languages: String,
    timeout_secs: u64,
}

impl ImageOcrAdapter {
    pub fn new(tesseract: PathBuf, languages: impl Into<String>, timeout_secs: u64) -> Self {
        Self {
            tesseract,
            languages: languages.into(),
            timeout_secs,
        }
    }
}

#[async_trait]
impl ExtractionAdapter for ImageOcrAdapter {
    async fn extract(&self, path: &Path) -> Result<String, ExtractionFailure> {
        debug!(path = %path.display(), languages = %self.languages, "Recognizing image");

        let text = run_cmd_with_timeout(
            Command::new(&self.tesseract)
                .arg(path)
                .arg("stdout")
                .arg("-l")
                .arg(&self.languages),
            self.timeout_secs,
        )
        .await
        .map_err(|e| ExtractionFailure::OcrFailed(e.to_string()))?;

        if text.trim().is_empty() {
            return Err(ExtractionFailure::OcrNoText);
        }
        Ok(text)
    }

    fn name(&self) -> &str {
        "image_ocr"
    }
}
