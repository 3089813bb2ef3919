//! Extraction failures.
//!
//! Each variant renders as the bracketed text stored in place of content, so
//! a stored value beginning with `[` is never mistaken for document text.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionFailure {
    /// A required external reader is not installed.
    #[error("[{0} unavailable]")]
    ReaderUnavailable(&'static str),

    #[error("[PDF error: {0}]")]
    Pdf(String),

    #[error("[Word document - docx support not compiled in]")]
    DocxUnsupported,

    #[error("[Word document error: {0}]")]
    Docx(String),

    #[error("[Conversion error: {0}]")]
    Conversion(String),

    #[error("[OCR failed: {0}]")]
    OcrFailed(String),

    /// Recognition ran but found no text.
    #[error("[OCR could not extract text]")]
    OcrNoText,

    #[error("[No text content detected]")]
    NoContent,

    #[error("[Extraction error: {0}]")]
    Io(String),
}

impl From<std::io::Error> for ExtractionFailure {
    fn from(e: std::io::Error) -> Self {
        ExtractionFailure::Io(e.to_string())
    }
}
