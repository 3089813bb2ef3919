//! Storage abstraction shared by the JSON catalog and the search engine.

use async_trait::async_trait;

use dossier_core::{DocumentRecord, Result, SearchHit};
use dossier_query::CompiledQuery;

/// A place document records can be written to and searched in.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert or replace a record, keyed by its id.
    async fn put(&self, record: &DocumentRecord) -> Result<()>;

    /// Remove a record. Removing an unknown id is not an error.
    async fn delete(&self, id: &str) -> Result<()>;

    /// Run a compiled query, best match first.
    async fn search(&self, query: &CompiledQuery) -> Result<Vec<SearchHit>>;

    /// Label reported alongside search results.
    fn name(&self) -> &str;
}
