//! # dossier-extract
//!
//! Turns office documents, PDFs and scanned images into plain text.
//!
//! This crate provides:
//! - Start-up discovery of external tools (poppler, tesseract, pandoc)
//! - One adapter per file family behind [`ExtractionAdapter`]
//! - The [`ExtractionPipeline`], which dispatches by extension and falls
//!   back to page-by-page recognition for scanned PDFs
//!
//! Extraction never fails outright: an unreadable file yields an
//! [`ExtractionFailure`] whose display form is a bracketed sentinel that is
//! stored in place of the text.
//!
//! # Feature Flags
//!
//! - `docx` (default): built-in Word reader
//!
//! # Example
//!
//! ```rust,no_run
//! use dossier_extract::{ExtractionCapabilities, ExtractionConfig, ExtractionPipeline};
//!
//! #[tokio::main]
//! async fn main() {
//!     let caps = ExtractionCapabilities::probe(&ExtractionConfig::from_env()).await;
//!     let pipeline = ExtractionPipeline::new(caps);
//!     let extraction = pipeline.extract(std::path::Path::new("bail.pdf")).await;
//!     println!("{}", extraction.into_stored_text());
//! }
//! ```

pub mod adapters;
pub mod capabilities;
pub mod command;
pub mod failure;
pub mod pipeline;

pub use adapters::ExtractionAdapter;
pub use capabilities::{ExtractionCapabilities, ExtractionConfig};
pub use failure::ExtractionFailure;
pub use pipeline::{extension_of, Extraction, ExtractionPipeline};
