//! Record edits, deletions and name-list maintenance.
//!
//! The JSON catalog is authoritative. Every change is mirrored to the search
//! engine when one is configured; a mirror failure is logged and does not
//! fail the operation.

use std::path::Path;
use std::sync::Arc;

use chrono::Local;
use tracing::{info, warn};

use dossier_core::{DocumentRecord, RecordEdit, Result};
use dossier_store::{DocumentStore, JsonCatalog, NameList};

pub struct CatalogService {
    catalog: JsonCatalog,
    engine: Option<Arc<dyn DocumentStore>>,
}

impl CatalogService {
    pub fn new(catalog: JsonCatalog, engine: Option<Arc<dyn DocumentStore>>) -> Self {
        Self { catalog, engine }
    }

    pub fn documents(&self) -> Result<Vec<DocumentRecord>> {
        self.catalog.load_records()
    }

    pub fn document(&self, id: &str) -> Result<DocumentRecord> {
        self.catalog.find_record(id)
    }

    pub async fn edit(&self, id: &str, edit: &RecordEdit) -> Result<DocumentRecord> {
        let record = self
            .catalog
            .update_record(id, edit, Local::now().naive_local())?;
        self.mirror_put(&record).await;
        Ok(record)
    }

    /// Remove the record, its backing file and its engine entry. Only the
    /// catalog removal can fail the call.
    pub async fn delete(&self, id: &str) -> Result<DocumentRecord> {
        let record = self.catalog.remove_record(id)?;

        let path = Path::new(&record.path);
        if path.exists() {
            if let Err(e) = tokio::fs::remove_file(path).await {
                warn!(document_id = id, path = %record.path, error = %e, "Could not remove backing file");
            }
        }

        if let Some(ref engine) = self.engine {
            if let Err(e) = engine.delete(id).await {
                warn!(document_id = id, engine = engine.name(), error = %e, "Could not remove document from search engine");
            }
        }

        info!(document_id = id, "Document deleted");
        Ok(record)
    }

    pub fn names(&self, list: NameList) -> Result<Vec<String>> {
        self.catalog.names(list)
    }

    pub fn add_name(&self, list: NameList, value: &str) -> Result<Vec<String>> {
        self.catalog.add_name(list, value)
    }

    /// Rename and re-index every record that carried the old name.
    pub async fn rename_name(&self, list: NameList, old: &str, new: &str) -> Result<usize> {
        let changed = self.catalog.rename_name(list, old, new)?;
        for record in &changed {
            self.mirror_put(record).await;
        }
        Ok(changed.len())
    }

    pub fn remove_name(&self, list: NameList, value: &str) -> Result<Vec<String>> {
        self.catalog.remove_name(list, value)
    }

    async fn mirror_put(&self, record: &DocumentRecord) {
        if let Some(ref engine) = self.engine {
            if let Err(e) = engine.put(record).await {
                warn!(document_id = %record.id, engine = engine.name(), error = %e, "Search engine update failed");
            }
        }
    }
}
