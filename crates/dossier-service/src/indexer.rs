//! Directory scans and single-file ingestion.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Local, NaiveDateTime};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use dossier_core::defaults::{ALLOWED_EXTENSIONS, UNKNOWN_MIME};
use dossier_core::{
    extract_keywords, guess_category, new_record_id, DocumentRecord, Error, ExtractionMethod,
    FolderScan, RecordStatus, Result, ScanStatistics,
};
use dossier_extract::{extension_of, ExtractionPipeline};
use dossier_store::{DocumentStore, JsonCatalog};

/// Parameters of one ingestion.
#[derive(Debug, Clone)]
pub struct IngestRequest {
    /// Display name; defaults to the file name.
    pub title: Option<String>,
    pub specialty: String,
    pub person: String,
}

/// Builds records from files and writes them to the catalog and, when
/// present, the search engine.
pub struct Indexer {
    catalog: JsonCatalog,
    pipeline: ExtractionPipeline,
    engine: Option<Arc<dyn DocumentStore>>,
}

/// Whether the file's extension is one the indexer accepts.
pub fn is_allowed(path: &Path) -> bool {
    ALLOWED_EXTENSIONS.contains(&extension_of(path).as_str())
}

fn ensure_allowed(path: &Path) -> Result<()> {
    if is_allowed(path) {
        return Ok(());
    }
    Err(Error::InvalidInput(format!(
        "Unsupported file type '{}'. Allowed extensions: {}",
        extension_of(path),
        ALLOWED_EXTENSIONS.join(", ")
    )))
}

fn mime_type_of(path: &Path) -> String {
    mime_guess::from_path(path)
        .first_raw()
        .unwrap_or(UNKNOWN_MIME)
        .to_string()
}

fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

impl Indexer {
    pub fn new(
        catalog: JsonCatalog,
        pipeline: ExtractionPipeline,
        engine: Option<Arc<dyn DocumentStore>>,
    ) -> Self {
        Self {
            catalog,
            pipeline,
            engine,
        }
    }

    /// Index every allowed file under `folders`, replacing the catalog's
    /// records with the result. Missing folders are skipped; a file that
    /// cannot be indexed is logged and skipped.
    pub async fn scan(
        &self,
        folders: &[PathBuf],
        specialty: &str,
        person: &str,
    ) -> Result<ScanStatistics> {
        if folders.is_empty() {
            return Err(Error::InvalidInput("No folder to index".to_string()));
        }

        let mut stats = ScanStatistics {
            scanned_at: now(),
            folders: Vec::new(),
            total_files: 0,
            specialty: specialty.to_string(),
            person: person.to_string(),
            ocr_used: false,
            ocr_available: self.pipeline.capabilities().ocr_available(),
        };
        let mut records: Vec<DocumentRecord> = Vec::new();
        let mut taken: HashSet<String> = HashSet::new();

        for folder in folders {
            if !folder.is_dir() {
                warn!(path = %folder.display(), "Folder does not exist, skipping");
                continue;
            }

            let root = tokio::fs::canonicalize(folder)
                .await
                .unwrap_or_else(|_| folder.clone());
            let start = records.len();
            self.scan_folder(&root, specialty, person, &mut records, &mut taken)
                .await;
            let indexed = &records[start..];

            let ocr_used = indexed
                .iter()
                .any(|r| r.method == ExtractionMethod::OpticalRecognition);
            stats.ocr_used |= ocr_used;
            stats.total_files += indexed.len();
            stats.folders.push(FolderScan {
                path: folder.display().to_string(),
                files_indexed: indexed.len(),
                specialty: specialty.to_string(),
                person: person.to_string(),
                ocr_used,
            });
            info!(
                path = %folder.display(),
                files_indexed = indexed.len(),
                ocr_used,
                "Folder indexed"
            );
        }

        self.catalog.save_records(&records)?;
        self.catalog.save_statistics(&stats)?;

        info!(
            folders = stats.folders.len(),
            total_files = stats.total_files,
            "Scan complete"
        );
        Ok(stats)
    }

    async fn scan_folder(
        &self,
        folder: &Path,
        specialty: &str,
        person: &str,
        records: &mut Vec<DocumentRecord>,
        taken: &mut HashSet<String>,
    ) {
        for entry in WalkDir::new(folder).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(error = %e, "Skipping unreadable entry");
                    continue;
                }
            };
            if !entry.file_type().is_file() || !is_allowed(entry.path()) {
                continue;
            }

            match self.index_file(entry.path(), specialty, person, taken).await {
                Ok(record) => {
                    self.mirror(&record).await;
                    taken.insert(record.id.clone());
                    records.push(record);
                }
                Err(e) => {
                    warn!(path = %entry.path().display(), error = %e, "Failed to index file");
                }
            }
        }
    }

    async fn index_file(
        &self,
        path: &Path,
        specialty: &str,
        person: &str,
        taken: &HashSet<String>,
    ) -> Result<DocumentRecord> {
        let metadata = tokio::fs::metadata(path).await?;
        let modified_at = metadata
            .modified()
            .map(|t| DateTime::<Local>::from(t).naive_local())
            .unwrap_or_else(|_| now());

        let file_name = file_name_of(path)?;
        let directory = path
            .parent()
            .map(|p| p.display().to_string())
            .unwrap_or_default();

        let extraction = self.pipeline.extract(path).await;
        let method = extraction.method;
        let full_path = path.display().to_string();

        let record = DocumentRecord {
            id: new_record_id(|id| taken.contains(id)),
            keywords: extract_keywords(&full_path, &file_name),
            category: guess_category(&directory, &file_name).to_string(),
            mime_type: mime_type_of(path),
            extension: extension_of(path),
            name: file_name,
            path: full_path,
            directory,
            size_bytes: metadata.len(),
            modified_at,
            indexed_at: now(),
            specialty: specialty.to_string(),
            person: person.to_string(),
            status: RecordStatus::Indexed,
            content: extraction.into_stored_text(),
            method,
        };
        debug!(document_id = %record.id, path = %record.path, method = %method, "Indexed file");
        Ok(record)
    }

    /// Add one already-saved file to the catalog.
    pub async fn ingest(&self, path: &Path, request: &IngestRequest) -> Result<DocumentRecord> {
        ensure_allowed(path)?;

        let path = &tokio::fs::canonicalize(path).await?;
        let metadata = tokio::fs::metadata(path).await?;
        let file_name = file_name_of(path)?;
        let directory = path
            .parent()
            .map(|p| p.display().to_string())
            .unwrap_or_default();
        let full_path = path.display().to_string();

        let mut records = self.catalog.load_records()?;
        let taken: HashSet<&str> = records.iter().map(|r| r.id.as_str()).collect();
        let id = new_record_id(|id| taken.contains(id));

        let extraction = self.pipeline.extract(path).await;
        let method = extraction.method;
        let title = request
            .title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(&file_name)
            .to_string();
        let timestamp = now();

        let record = DocumentRecord {
            id,
            name: title,
            keywords: extract_keywords(&full_path, &file_name),
            category: guess_category(&directory, &file_name).to_string(),
            mime_type: mime_type_of(path),
            extension: extension_of(path),
            path: full_path,
            directory,
            size_bytes: metadata.len(),
            modified_at: timestamp,
            indexed_at: timestamp,
            specialty: request.specialty.clone(),
            person: request.person.clone(),
            status: RecordStatus::Uploaded,
            content: extraction.into_stored_text(),
            method,
        };

        records.push(record.clone());
        self.catalog.save_records(&records)?;
        self.mirror(&record).await;

        info!(document_id = %record.id, path = %record.path, method = %method, "Ingested file");
        Ok(record)
    }

    /// Copy `source` into `data_dir` under its own file name, then ingest
    /// the copy.
    pub async fn ingest_copy(
        &self,
        source: &Path,
        data_dir: &Path,
        request: &IngestRequest,
    ) -> Result<DocumentRecord> {
        ensure_allowed(source)?;
        let file_name = file_name_of(source)?;
        tokio::fs::create_dir_all(data_dir).await?;
        let target = data_dir.join(&file_name);
        if target != source {
            tokio::fs::copy(source, &target).await?;
        }
        self.ingest(&target, request).await
    }

    /// Best-effort write to the search engine.
    async fn mirror(&self, record: &DocumentRecord) {
        if let Some(ref engine) = self.engine {
            if let Err(e) = engine.put(record).await {
                warn!(document_id = %record.id, engine = engine.name(), error = %e, "Search engine indexing failed");
            }
        }
    }
}

fn file_name_of(path: &Path) -> Result<String> {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .ok_or_else(|| Error::InvalidInput(format!("No file name in '{}'", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_allowed() {
        assert!(is_allowed(Path::new("/a/Bail.PDF")));
        assert!(is_allowed(Path::new("/a/scan.tiff")));
        assert!(!is_allowed(Path::new("/a/notes.md")));
        assert!(!is_allowed(Path::new("/a/Makefile")));
    }

    #[test]
    fn test_mime_type_of() {
        assert_eq!(mime_type_of(Path::new("a.pdf")), "application/pdf");
        assert_eq!(mime_type_of(Path::new("a.txt")), "text/plain");
        assert_eq!(mime_type_of(Path::new("a.zzunknown")), "inconnu");
    }
}
