//! Extraction adapter implementations.

use std::path::Path;

use async_trait::async_trait;

use crate::failure::ExtractionFailure;

#[cfg(feature = "docx")]
pub mod docx;
pub mod image_ocr;
pub mod office_convert;
pub mod pdf_ocr;
pub mod pdf_text;
pub mod text_native;

#[cfg(feature = "docx")]
pub use docx::DocxAdapter;
pub use image_ocr::ImageOcrAdapter;
pub use office_convert::OfficeConvertAdapter;
pub use pdf_ocr::PdfOcrAdapter;
pub use pdf_text::PdfTextAdapter;
pub use text_native::TextNativeAdapter;

/// Produces raw text from one file. Output is not trimmed; the pipeline
/// normalizes it.
#[async_trait]
pub trait ExtractionAdapter: Send + Sync {
    async fn extract(&self, path: &Path) -> Result<String, ExtractionFailure>;

    /// Human-readable name of this adapter.
    fn name(&self) -> &str;
}

/// Append one page with its marker. Blank pages are skipped.
pub(crate) fn push_page(out: &mut String, marker: &str, text: &str) {
    let text = text.trim();
    if text.is_empty() {
        return;
    }
    out.push_str(marker);
    out.push('\n');
    out.push_str(text);
    out.push_str("\n\n");
}
