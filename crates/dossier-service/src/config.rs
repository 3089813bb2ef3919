//! Service configuration, read from the environment.

use std::path::PathBuf;

use dossier_core::defaults::{DATA_DIR, ENV_DATA_DIR, ENV_INDEX_DIR, INDEX_DIR};
use dossier_core::non_empty_env;
use dossier_extract::ExtractionConfig;
use dossier_store::ElasticConfig;

/// Everything the service needs to start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Where ingested files are copied.
    pub data_dir: PathBuf,
    /// Where the JSON catalog lives.
    pub index_dir: PathBuf,
    /// `None` disables the search engine entirely.
    pub elasticsearch: Option<ElasticConfig>,
    pub extraction: ExtractionConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DATA_DIR),
            index_dir: PathBuf::from(INDEX_DIR),
            elasticsearch: None,
            extraction: ExtractionConfig::default(),
        }
    }
}

impl ServiceConfig {
    /// Environment variables:
    /// - `DOSSIER_DATA_DIR` (default: `donnees_cabinet`)
    /// - `DOSSIER_INDEX_DIR` (default: `index_fichiers`)
    /// - `ELASTICSEARCH_URL`, `ELASTICSEARCH_INDEX`, `ELASTICSEARCH_TIMEOUT_SECS`
    /// - `OCR_ENABLED`, `TESSERACT_CMD`, `OCR_LANGUAGES`, `OCR_DPI`
    pub fn from_env() -> Self {
        Self {
            data_dir: non_empty_env(ENV_DATA_DIR)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DATA_DIR)),
            index_dir: non_empty_env(ENV_INDEX_DIR)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(INDEX_DIR)),
            elasticsearch: ElasticConfig::from_env(),
            extraction: ExtractionConfig::from_env(),
        }
    }
}
