//! Search orchestration: engine first, in-process evaluation otherwise.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use dossier_core::{ExactFilters, Result, SearchHit};
use dossier_query::{compile_with_filters, has_advanced_operators, QueryMode};
use dossier_store::{DocumentStore, JsonCatalog};

/// One search as typed by a user.
#[derive(Debug, Clone, Default)]
pub struct SearchRequest {
    pub term: String,
    pub filters: ExactFilters,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchResponse {
    #[serde(rename = "terme")]
    pub term: String,
    #[serde(rename = "resultats")]
    pub hits: Vec<SearchHit>,
    pub total: usize,
    /// Which backend answered: `elasticsearch` or `basique`.
    #[serde(rename = "moteur_recherche")]
    pub engine: String,
}

/// How a raw string is understood, for debugging queries.
#[derive(Debug, Clone, Serialize)]
pub struct QueryExplanation {
    #[serde(rename = "terme")]
    pub term: String,
    pub mode: QueryMode,
    pub has_operators: bool,
    #[serde(rename = "query_elasticsearch")]
    pub query: Value,
}

pub struct SearchService {
    catalog: JsonCatalog,
    engine: Option<Arc<dyn DocumentStore>>,
}

impl SearchService {
    pub fn new(catalog: JsonCatalog, engine: Option<Arc<dyn DocumentStore>>) -> Self {
        Self { catalog, engine }
    }

    pub async fn search(&self, request: &SearchRequest) -> Result<SearchResponse> {
        let term = request.term.trim().to_string();
        let compiled = compile_with_filters(&term, request.filters.clone());

        if let Some(ref engine) = self.engine {
            match engine.search(&compiled).await {
                Ok(hits) => return Ok(response(term, hits, engine.name())),
                Err(e) => {
                    warn!(query = %term, engine = engine.name(), error = %e, "Search engine failed, using fallback");
                }
            }
        }

        let hits = self.catalog.search(&compiled).await?;
        info!(query = %term, result_count = hits.len(), engine = self.catalog.name(), "Search complete");
        Ok(response(term, hits, self.catalog.name()))
    }

    pub fn explain(&self, raw: &str) -> QueryExplanation {
        explain(raw)
    }
}

/// Compile `raw` without running it.
pub fn explain(raw: &str) -> QueryExplanation {
    let compiled = compile_with_filters(raw, ExactFilters::default());
    QueryExplanation {
        term: raw.to_string(),
        mode: compiled.mode,
        has_operators: has_advanced_operators(raw),
        query: compiled.to_json(),
    }
}

fn response(term: String, hits: Vec<SearchHit>, engine: &str) -> SearchResponse {
    SearchResponse {
        term,
        total: hits.len(),
        hits,
        engine: engine.to_string(),
    }
}
