//! Discovery of the external tools the pipeline can use.
//!
//! Probing happens once at start-up; the resulting [`ExtractionCapabilities`]
//! value is handed to the pipeline and never changes afterwards. A missing
//! tool only disables the paths that need it.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::process::Command;
use tracing::{debug, info, warn};

use dossier_core::defaults::{
    ENV_OCR_DPI, ENV_OCR_ENABLED, ENV_OCR_LANGUAGES, ENV_TESSERACT_CMD,
    EXTRACTION_CMD_TIMEOUT_SECS, OCR_DPI, OCR_LANGUAGES,
};
use dossier_core::{non_empty_env, parse_bool_env, parse_env};

const PROBE_TIMEOUT_SECS: u64 = 10;

/// Extraction settings, read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionConfig {
    /// Allow optical recognition when tesseract is found.
    pub ocr_enabled: bool,
    /// Explicit tesseract binary; skips the well-known locations.
    pub tesseract_cmd: Option<PathBuf>,
    pub ocr_languages: String,
    pub ocr_dpi: u32,
    pub command_timeout_secs: u64,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            ocr_enabled: true,
            tesseract_cmd: None,
            ocr_languages: OCR_LANGUAGES.to_string(),
            ocr_dpi: OCR_DPI,
            command_timeout_secs: EXTRACTION_CMD_TIMEOUT_SECS,
        }
    }
}

impl ExtractionConfig {
    /// Environment variables:
    /// - `OCR_ENABLED` (default: true)
    /// - `TESSERACT_CMD` (default: probe)
    /// - `OCR_LANGUAGES` (default: `fra+eng`)
    /// - `OCR_DPI` (default: 200)
    pub fn from_env() -> Self {
        Self {
            ocr_enabled: parse_bool_env(ENV_OCR_ENABLED, true),
            tesseract_cmd: non_empty_env(ENV_TESSERACT_CMD).map(PathBuf::from),
            ocr_languages: non_empty_env(ENV_OCR_LANGUAGES)
                .unwrap_or_else(|| OCR_LANGUAGES.to_string()),
            ocr_dpi: parse_env(ENV_OCR_DPI, OCR_DPI),
            command_timeout_secs: EXTRACTION_CMD_TIMEOUT_SECS,
        }
    }
}

/// Resolved tool locations. `None` means the tool is unavailable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionCapabilities {
    pub tesseract: Option<PathBuf>,
    pub pdftotext: Option<PathBuf>,
    pub pdfinfo: Option<PathBuf>,
    pub pdftoppm: Option<PathBuf>,
    pub pandoc: Option<PathBuf>,
    pub ocr_languages: String,
    pub ocr_dpi: u32,
    pub command_timeout_secs: u64,
}

impl ExtractionCapabilities {
    /// No external tools: only the built-in readers run.
    pub fn none() -> Self {
        let config = ExtractionConfig::default();
        Self {
            ocr_languages: config.ocr_languages,
            ocr_dpi: config.ocr_dpi,
            command_timeout_secs: config.command_timeout_secs,
            ..Default::default()
        }
    }

    /// Probe well-known install locations and the executable search path.
    pub async fn probe(config: &ExtractionConfig) -> Self {
        let tesseract = if !config.ocr_enabled {
            info!("OCR disabled by configuration");
            None
        } else if let Some(ref explicit) = config.tesseract_cmd {
            if responds(explicit, "--version").await {
                Some(explicit.clone())
            } else {
                warn!(path = %explicit.display(), "Configured tesseract binary does not respond");
                None
            }
        } else {
            locate("tesseract", &tesseract_locations(), "--version").await
        };

        let caps = Self {
            tesseract,
            pdftotext: locate("pdftotext", &unix_locations("pdftotext"), "-v").await,
            pdfinfo: locate("pdfinfo", &unix_locations("pdfinfo"), "-v").await,
            pdftoppm: locate("pdftoppm", &unix_locations("pdftoppm"), "-v").await,
            pandoc: locate("pandoc", &unix_locations("pandoc"), "--version").await,
            ocr_languages: config.ocr_languages.clone(),
            ocr_dpi: config.ocr_dpi,
            command_timeout_secs: config.command_timeout_secs,
        };

        info!(
            ocr = caps.ocr_available(),
            pdf_text = caps.pdf_text_available(),
            pdf_ocr = caps.pdf_ocr_available(),
            pandoc = caps.pandoc.is_some(),
            "Extraction capabilities probed"
        );
        caps
    }

    /// Image recognition is possible.
    pub fn ocr_available(&self) -> bool {
        self.tesseract.is_some()
    }

    /// Native PDF text extraction is possible.
    pub fn pdf_text_available(&self) -> bool {
        self.pdftotext.is_some() && self.pdfinfo.is_some()
    }

    /// Scanned PDF pages can be rasterized and recognized.
    pub fn pdf_ocr_available(&self) -> bool {
        self.tesseract.is_some() && self.pdftoppm.is_some()
    }

    /// One-line human-readable recognition status.
    pub fn ocr_status(&self) -> String {
        match self.tesseract {
            Some(ref path) => format!("Enabled ({})", path.display()),
            None => "Not configured".to_string(),
        }
    }
}

fn unix_locations(name: &str) -> Vec<PathBuf> {
    ["/usr/bin", "/usr/local/bin", "/opt/homebrew/bin"]
        .iter()
        .map(|dir| Path::new(dir).join(name))
        .collect()
}

fn tesseract_locations() -> Vec<PathBuf> {
    let mut paths = vec![
        PathBuf::from(r"C:\Program Files\Tesseract-OCR\tesseract.exe"),
        PathBuf::from(r"C:\Program Files (x86)\Tesseract-OCR\tesseract.exe"),
    ];
    if let Some(local) = non_empty_env("LOCALAPPDATA") {
        paths.push(Path::new(&local).join("Tesseract-OCR").join("tesseract.exe"));
    }
    paths.extend(unix_locations("tesseract"));
    paths
}

/// First candidate that exists and answers a version query, then the search
/// path.
async fn locate(name: &str, candidates: &[PathBuf], version_arg: &str) -> Option<PathBuf> {
    for candidate in candidates {
        if candidate.is_file() && responds(candidate, version_arg).await {
            debug!(tool = name, path = %candidate.display(), "Found tool at well-known location");
            return Some(candidate.clone());
        }
    }

    match which::which(name) {
        Ok(path) if responds(&path, version_arg).await => {
            debug!(tool = name, path = %path.display(), "Found tool on PATH");
            Some(path)
        }
        _ => {
            debug!(tool = name, "Tool not found");
            None
        }
    }
}

/// Whether the binary runs. Older poppler tools exit 99 on `-v`.
async fn responds(path: &Path, version_arg: &str) -> bool {
    let probe = Command::new(path).arg(version_arg).output();
    match tokio::time::timeout(Duration::from_secs(PROBE_TIMEOUT_SECS), probe).await {
        Ok(Ok(output)) => output.status.success() || output.status.code() == Some(99),
        _ => false,
    }
}
