//! Extension dispatch and the native-then-recognition fallback.

use std::path::Path;

use tracing::{debug, info, warn};

use dossier_core::defaults::{IMAGE_EXTENSIONS, PDF_MIN_NATIVE_CHARS};
use dossier_core::ExtractionMethod;

#[cfg(feature = "docx")]
use crate::adapters::DocxAdapter;
use crate::adapters::text_native::{decode_text, looks_textual};
use crate::adapters::{
    ExtractionAdapter, ImageOcrAdapter, OfficeConvertAdapter, PdfOcrAdapter, PdfTextAdapter,
    TextNativeAdapter,
};
use crate::capabilities::ExtractionCapabilities;
use crate::failure::ExtractionFailure;

/// Result of extracting one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    /// Trimmed, non-empty text, or the reason there is none.
    pub outcome: Result<String, ExtractionFailure>,
    pub method: ExtractionMethod,
}

impl Extraction {
    fn from_raw(raw: Result<String, ExtractionFailure>, method: ExtractionMethod) -> Self {
        match raw {
            Ok(text) => {
                let text = text.trim();
                if text.is_empty() {
                    Self::failed(ExtractionFailure::NoContent)
                } else {
                    Self {
                        outcome: Ok(text.to_string()),
                        method,
                    }
                }
            }
            Err(failure) => Self::failed(failure),
        }
    }

    fn failed(failure: ExtractionFailure) -> Self {
        Self {
            outcome: Err(failure),
            method: ExtractionMethod::Standard,
        }
    }

    pub fn is_content(&self) -> bool {
        self.outcome.is_ok()
    }

    /// Text to persist: the content, or the failure's bracketed sentinel.
    pub fn into_stored_text(self) -> String {
        match self.outcome {
            Ok(text) => text,
            Err(failure) => failure.to_string(),
        }
    }
}

/// Lowercase extension with a leading dot, or an empty string.
pub fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e.to_lowercase()))
        .unwrap_or_default()
}

/// Turns files into text. Built once from the probed capabilities.
pub struct ExtractionPipeline {
    capabilities: ExtractionCapabilities,
    pdf_text: Option<PdfTextAdapter>,
    pdf_ocr: Option<PdfOcrAdapter>,
    image_ocr: Option<ImageOcrAdapter>,
    office: Option<OfficeConvertAdapter>,
}

impl ExtractionPipeline {
    pub fn new(capabilities: ExtractionCapabilities) -> Self {
        let timeout = capabilities.command_timeout_secs;
        let pdf_text = match (&capabilities.pdftotext, &capabilities.pdfinfo) {
            (Some(text), Some(info)) => Some(PdfTextAdapter::new(text.clone(), info.clone(), timeout)),
            _ => None,
        };
        let pdf_ocr = match (&capabilities.pdftoppm, &capabilities.tesseract) {
            (Some(ppm), Some(tess)) => Some(PdfOcrAdapter::new(
                ppm.clone(),
                tess.clone(),
                capabilities.ocr_languages.clone(),
                capabilities.ocr_dpi,
                timeout,
            )),
            _ => None,
        };
        let image_ocr = capabilities.tesseract.as_ref().map(|tess| {
            ImageOcrAdapter::new(tess.clone(), capabilities.ocr_languages.clone(), timeout)
        });
        let office = capabilities
            .pandoc
            .as_ref()
            .map(|pandoc| OfficeConvertAdapter::new(pandoc.clone(), timeout));

        Self {
            capabilities,
            pdf_text,
            pdf_ocr,
            image_ocr,
            office,
        }
    }

    pub fn capabilities(&self) -> &ExtractionCapabilities {
        &self.capabilities
    }

    /// Extract text from `path`. Never fails; failures are carried in the
    /// returned [`Extraction`].
    pub async fn extract(&self, path: &Path) -> Extraction {
        let extension = extension_of(path);
        let (raw, method) = match extension.as_str() {
            ".pdf" => self.extract_pdf(path).await,
            ".txt" => (TextNativeAdapter.extract(path).await, ExtractionMethod::NativeText),
            ".docx" => self.extract_docx(path).await,
            ".odt" | ".rtf" | ".pptx" => match self.office {
                Some(ref office) => (office.extract(path).await, ExtractionMethod::NativeText),
                None => (self.extract_generic(path).await, ExtractionMethod::NativeText),
            },
            ext if IMAGE_EXTENSIONS.contains(&ext) => match self.image_ocr {
                Some(ref ocr) => (ocr.extract(path).await, ExtractionMethod::OpticalRecognition),
                None => (self.extract_generic(path).await, ExtractionMethod::NativeText),
            },
            _ => (self.extract_generic(path).await, ExtractionMethod::NativeText),
        };

        let extraction = Extraction::from_raw(raw, method);
        match extraction.outcome {
            Ok(ref text) => debug!(
                path = %path.display(),
                method = %extraction.method,
                chars = text.chars().count(),
                "Extracted text"
            ),
            Err(ref failure) => info!(path = %path.display(), reason = %failure, "No text extracted"),
        }
        extraction
    }

    /// Native text first; recognition when it is missing or too short.
    /// Recognition output, when non-empty, replaces the native text.
    async fn extract_pdf(&self, path: &Path) -> (Result<String, ExtractionFailure>, ExtractionMethod) {
        let native = match self.pdf_text {
            Some(ref adapter) => adapter.extract(path).await,
            None => Err(ExtractionFailure::ReaderUnavailable("PDF reader")),
        };

        let likely_scanned = match native {
            Ok(ref text) => text.trim().chars().count() < PDF_MIN_NATIVE_CHARS,
            Err(_) => true,
        };

        let Some(ref ocr) = self.pdf_ocr else {
            return (native, ExtractionMethod::NativeText);
        };
        if !likely_scanned {
            return (native, ExtractionMethod::NativeText);
        }

        debug!(path = %path.display(), "Native PDF text insufficient, trying OCR");
        match ocr.extract(path).await {
            Ok(text) if !text.trim().is_empty() => (Ok(text), ExtractionMethod::OpticalRecognition),
            Ok(_) => (native, ExtractionMethod::NativeText),
            Err(failure) => {
                warn!(path = %path.display(), reason = %failure, "PDF OCR failed");
                match native {
                    Ok(text) if !text.trim().is_empty() => (Ok(text), ExtractionMethod::NativeText),
                    _ => (Err(failure), ExtractionMethod::Standard),
                }
            }
        }
    }

    #[cfg(feature = "docx")]
    async fn extract_docx(&self, path: &Path) -> (Result<String, ExtractionFailure>, ExtractionMethod) {
        (DocxAdapter.extract(path).await, ExtractionMethod::NativeText)
    }

    #[cfg(not(feature = "docx"))]
    async fn extract_docx(&self, _path: &Path) -> (Result<String, ExtractionFailure>, ExtractionMethod) {
        (Err(ExtractionFailure::DocxUnsupported), ExtractionMethod::Standard)
    }

    /// Decode the file as text when it does not look binary.
    async fn extract_generic(&self, path: &Path) -> Result<String, ExtractionFailure> {
        let data = tokio::fs::read(path).await?;
        if !looks_textual(&data) {
            return Err(ExtractionFailure::NoContent);
        }
        Ok(decode_text(&data))
    }
}
