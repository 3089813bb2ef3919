//! OfficeConvertAdapter: converts OpenDocument, RTF and PowerPoint files to
//! plain text using pandoc.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use super::ExtractionAdapter;
use crate::command::run_cmd_with_timeout;
use crate::failure::ExtractionFailure;

/// Pandoc input format for a lowercase dotted extension.
pub fn pandoc_input_format(extension: &str) -> Option<&'static str> {
    match extension {
        ".odt" => Some("odt"),
        ".rtf" => Some("rtf"),
        ".pptx" => Some("pptx"),
        ".docx" => Some("docx"),
        _ => None,
    }
}

pub struct OfficeConvertAdapter {
    pandoc: PathBuf,
    timeout_secs: u64,
}

impl OfficeConvertAdapter {
    pub fn new(pandoc: PathBuf, timeout_secs: u64) -> Self {
        Self {
            pandoc,
            timeout_secs,
        }
    }
}

#[async_trait]
impl ExtractionAdapter for OfficeConvertAdapter {
    async fn extract(&self, path: &Path) -> Result<String, ExtractionFailure> {
        let extension = crate::pipeline::extension_of(path);
        let format = pandoc_input_format(&extension).ok_or_else(|| {
            ExtractionFailure::Conversion(format!("no pandoc reader for '{}'", extension))
        })?;

        debug!(path = %path.display(), format, "Converting with pandoc");

        // pandoc -f FORMAT -t plain --wrap=none INPUT
        run_cmd_with_timeout(
            Command::new(&self.pandoc)
                .arg("-f")
                .arg(format)
                .arg("-t")
                .arg("plain")
                .arg("--wrap=none")
                .arg(path),
            self.timeout_secs,
        )
        .await
        .map_err(|e| ExtractionFailure::Conversion(e.to_string()))
    }

    fn name(&self) -> &str {
        "office_convert"
    }
}
