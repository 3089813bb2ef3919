//! Elasticsearch-backed document store.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use dossier_core::defaults::{
    ELASTICSEARCH_INDEX, ELASTICSEARCH_TIMEOUT_SECS, ENV_ELASTICSEARCH_INDEX,
    ENV_ELASTICSEARCH_TIMEOUT_SECS, ENV_ELASTICSEARCH_URL, HIGHLIGHT_POST_TAG, HIGHLIGHT_PRE_TAG,
    SEARCH_RESULT_SIZE,
};
use dossier_core::{
    field, is_sentinel, non_empty_env, parse_env, DocumentRecord, Error, Result, SearchHit,
};
use dossier_query::CompiledQuery;

use crate::traits::DocumentStore;

/// Connection settings for the search engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElasticConfig {
    pub url: String,
    pub index: String,
    pub timeout_secs: u64,
}

impl ElasticConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            index: ELASTICSEARCH_INDEX.to_string(),
            timeout_secs: ELASTICSEARCH_TIMEOUT_SECS,
        }
    }

    /// `None` when `ELASTICSEARCH_URL` is unset: the engine is not used.
    pub fn from_env() -> Option<Self> {
        let url = non_empty_env(ENV_ELASTICSEARCH_URL)?;
        Some(Self {
            url,
            index: non_empty_env(ENV_ELASTICSEARCH_INDEX)
                .unwrap_or_else(|| ELASTICSEARCH_INDEX.to_string()),
            timeout_secs: parse_env(ENV_ELASTICSEARCH_TIMEOUT_SECS, ELASTICSEARCH_TIMEOUT_SECS),
        })
    }
}

/// REST client for one Elasticsearch index.
pub struct ElasticStore {
    client: Client,
    base_url: String,
    index: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    hits: HitList,
}

#[derive(Debug, Deserialize)]
struct HitList {
    hits: Vec<RawHit>,
}

#[derive(Debug, Deserialize)]
struct RawHit {
    #[serde(rename = "_source")]
    source: DocumentRecord,
    #[serde(rename = "_score", default)]
    score: Option<f64>,
    #[serde(default)]
    highlight: Option<BTreeMap<String, Vec<String>>>,
}

impl ElasticStore {
    pub fn new(config: ElasticConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        info!(url = %config.url, index = %config.index, "Initializing Elasticsearch store");

        Ok(Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            index: config.index,
        })
    }

    fn doc_url(&self, id: &str) -> String {
        format!("{}/{}/_doc/{}", self.base_url, self.index, id)
    }

    /// Whether the cluster answers at all.
    pub async fn ping(&self) -> bool {
        match self.client.get(&self.base_url).send().await {
            Ok(resp) if resp.status().is_success() => true,
            Ok(resp) => {
                warn!(status = %resp.status(), "Elasticsearch ping failed");
                false
            }
            Err(e) => {
                warn!(error = %e, "Elasticsearch unreachable");
                false
            }
        }
    }

    /// Full `_search` body: the compiled query plus highlighting.
    pub fn search_body(query: &CompiledQuery) -> Value {
        json!({
            "query": query.to_json(),
            "highlight": {
                "pre_tags": [HIGHLIGHT_PRE_TAG],
                "post_tags": [HIGHLIGHT_POST_TAG],
                "fields": {
                    (field::NAME): {"number_of_fragments": 2, "fragment_size": 100},
                    (field::CONTENT): {"number_of_fragments": 3, "fragment_size": 150},
                    (field::KEYWORDS): {"number_of_fragments": 1, "fragment_size": 50},
                    (field::SPECIALTY): {},
                    (field::PERSON): {},
                    (field::CATEGORY): {}
                }
            },
            "size": SEARCH_RESULT_SIZE
        })
    }
}

/// The document sent to the engine. Sentinel content is blanked so a failed
/// extraction never matches a text query; the catalog keeps the sentinel.
fn engine_document(record: &DocumentRecord) -> Cow<'_, DocumentRecord> {
    if is_sentinel(&record.content) {
        let mut doc = record.clone();
        doc.content.clear();
        Cow::Owned(doc)
    } else {
        Cow::Borrowed(record)
    }
}

async fn error_from(response: reqwest::Response, action: &str) -> Error {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    Error::Search(format!("{} returned {}: {}", action, status, body))
}

#[async_trait]
impl DocumentStore for ElasticStore {
    async fn put(&self, record: &DocumentRecord) -> Result<()> {
        let response = self
            .client
            .put(self.doc_url(&record.id))
            .json(&*engine_document(record))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_from(response, "Index").await);
        }
        debug!(document_id = %record.id, "Indexed document in Elasticsearch");
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let response = self.client.delete(self.doc_url(id)).send().await?;

        match response.status() {
            s if s.is_success() => {
                debug!(document_id = id, "Deleted document from Elasticsearch");
                Ok(())
            }
            StatusCode::NOT_FOUND => Ok(()),
            _ => Err(error_from(response, "Delete").await),
        }
    }

    async fn search(&self, query: &CompiledQuery) -> Result<Vec<SearchHit>> {
        let response = self
            .client
            .post(format!("{}/{}/_search", self.base_url, self.index))
            .json(&Self::search_body(query))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_from(response, "Search").await);
        }

        let parsed: SearchResponse = response
            .json()
            .await
            .map_err(|e| Error::Search(format!("Failed to parse response: {}", e)))?;

        let hits: Vec<SearchHit> = parsed
            .hits
            .hits
            .into_iter()
            .map(|h| SearchHit {
                record: h.source,
                score: h.score.unwrap_or(0.0),
                highlight: h.highlight,
            })
            .collect();

        info!(
            query = %query.raw,
            result_count = hits.len(),
            engine = "elasticsearch",
            "Search complete"
        );
        Ok(hits)
    }

    fn name(&self) -> &str {
        "elasticsearch"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dossier_query::compile;

    #[test]
    fn test_search_body_shape() {
        let body = ElasticStore::search_body(&compile("bail"));
        assert_eq!(body["size"], 100);
        assert_eq!(body["highlight"]["pre_tags"][0], "<mark>");
        assert_eq!(body["highlight"]["post_tags"][0], "</mark>");
        assert_eq!(
            body["highlight"]["fields"]["contenu_textuel"]["number_of_fragments"],
            3
        );
        assert_eq!(body["highlight"]["fields"]["nom"]["fragment_size"], 100);
        assert_eq!(body["highlight"]["fields"]["avocat"], json!({}));
        assert_eq!(body["query"]["multi_match"]["query"], "bail");
    }

    #[test]
    fn test_engine_document_blanks_sentinel() {
        let json = json!({
            "id": "ab12cd34", "nom": "scan.pdf", "chemin": "/a/scan.pdf", "dossier": "/a",
            "extension": ".pdf", "taille": 1, "date_modification": "2024-01-01T00:00:00",
            "date_indexation": "2024-01-01T00:00:00", "type_mime": "application/pdf",
            "categorie": "Divers", "statut": "indexé",
            "contenu_textuel": "[PDF reader unavailable]"
        });
        let mut record: DocumentRecord = serde_json::from_value(json).unwrap();
        assert_eq!(engine_document(&record).content, "");
        assert_eq!(record.content, "[PDF reader unavailable]");

        record.content = "Bail commercial".into();
        assert!(matches!(engine_document(&record), Cow::Borrowed(_)));
    }

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let store = ElasticStore::new(ElasticConfig::new("http://localhost:9200/")).unwrap();
        assert_eq!(
            store.doc_url("ab12cd34"),
            "http://localhost:9200/documents_cabinet/_doc/ab12cd34"
        );
    }
}
