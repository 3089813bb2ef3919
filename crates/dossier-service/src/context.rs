//! Wiring of stores, extraction and services from a [`ServiceConfig`].

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use dossier_core::Result;
use dossier_extract::{ExtractionCapabilities, ExtractionPipeline};
use dossier_store::{DocumentStore, ElasticStore, JsonCatalog};

use crate::catalog::CatalogService;
use crate::config::ServiceConfig;
use crate::indexer::Indexer;
use crate::search::SearchService;
use crate::stats::{corpus_statistics, CorpusStatistics};

/// Summary of what is available in this process.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceStatus {
    pub engine: String,
    pub engine_connected: bool,
    pub ocr: String,
    pub pdf_text: bool,
    pub pdf_ocr: bool,
    pub office_conversion: bool,
    pub documents: usize,
    pub index_dir: String,
    pub data_dir: String,
}

/// Shared handles for one process.
pub struct Dossier {
    pub config: ServiceConfig,
    pub catalog: JsonCatalog,
    pub engine: Option<Arc<dyn DocumentStore>>,
    pub capabilities: ExtractionCapabilities,
}

impl Dossier {
    /// Probe extraction tools and connect to the engine. An engine that does
    /// not answer is treated as absent.
    pub async fn connect(config: ServiceConfig) -> Result<Self> {
        let capabilities = ExtractionCapabilities::probe(&config.extraction).await;

        let engine: Option<Arc<dyn DocumentStore>> = match config.elasticsearch {
            Some(ref es) => {
                let store = ElasticStore::new(es.clone())?;
                if store.ping().await {
                    info!(url = %es.url, index = %es.index, "Connected to Elasticsearch");
                    Some(Arc::new(store))
                } else {
                    warn!(url = %es.url, "Elasticsearch not available, using in-process search");
                    None
                }
            }
            None => {
                info!("No search engine configured, using in-process search");
                None
            }
        };

        Ok(Self::with_parts(config, engine, capabilities))
    }

    /// Assemble from already-built parts.
    pub fn with_parts(
        config: ServiceConfig,
        engine: Option<Arc<dyn DocumentStore>>,
        capabilities: ExtractionCapabilities,
    ) -> Self {
        Self {
            catalog: JsonCatalog::new(&config.index_dir),
            config,
            engine,
            capabilities,
        }
    }

    pub fn indexer(&self) -> Indexer {
        Indexer::new(
            self.catalog.clone(),
            ExtractionPipeline::new(self.capabilities.clone()),
            self.engine.clone(),
        )
    }

    pub fn catalog_service(&self) -> CatalogService {
        CatalogService::new(self.catalog.clone(), self.engine.clone())
    }

    pub fn search_service(&self) -> SearchService {
        SearchService::new(self.catalog.clone(), self.engine.clone())
    }

    pub fn statistics(&self) -> Result<CorpusStatistics> {
        let records = self.catalog.load_records()?;
        Ok(corpus_statistics(&records, self.catalog.load_statistics()?))
    }

    pub fn engine_label(&self) -> &str {
        match self.engine {
            Some(ref engine) => engine.name(),
            None => self.catalog.name(),
        }
    }

    pub fn status(&self) -> Result<ServiceStatus> {
        Ok(ServiceStatus {
            engine: self.engine_label().to_string(),
            engine_connected: self.engine.is_some(),
            ocr: self.capabilities.ocr_status(),
            pdf_text: self.capabilities.pdf_text_available(),
            pdf_ocr: self.capabilities.pdf_ocr_available(),
            office_conversion: self.capabilities.pandoc.is_some(),
            documents: self.catalog.load_records()?.len(),
            index_dir: self.config.index_dir.display().to_string(),
            data_dir: self.config.data_dir.display().to_string(),
        })
    }
}
