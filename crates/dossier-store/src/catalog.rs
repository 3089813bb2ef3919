//! JSON file catalog.
//!
//! Four files live in the catalog directory: the record index, the last scan
//! snapshot and the two name lists. Each file is read whole and written
//! whole; a write goes to a temporary file in the same directory which is
//! then renamed over the target, so a crash never leaves a half-written
//! file behind. Concurrent writers are not coordinated.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::NaiveDateTime;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tempfile::NamedTempFile;
use tracing::{debug, info};

use dossier_core::defaults::{
    DEFAULT_PERSONS, DEFAULT_SPECIALTIES, INDEX_FILE, PERSONS_FILE, SPECIALTIES_FILE, STATS_FILE,
};
use dossier_core::{DocumentRecord, Error, RecordEdit, Result, ScanStatistics, SearchHit};
use dossier_query::{evaluate, CompiledQuery};

use crate::traits::DocumentStore;

/// The two maintained name lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameList {
    Specialties,
    Persons,
}

impl NameList {
    fn file_name(self) -> &'static str {
        match self {
            Self::Specialties => SPECIALTIES_FILE,
            Self::Persons => PERSONS_FILE,
        }
    }

    fn defaults(self) -> Vec<String> {
        let names = match self {
            Self::Specialties => DEFAULT_SPECIALTIES,
            Self::Persons => DEFAULT_PERSONS,
        };
        names.iter().map(|s| s.to_string()).collect()
    }

    /// The record field this list populates.
    pub fn value_of(self, record: &DocumentRecord) -> &str {
        match self {
            Self::Specialties => &record.specialty,
            Self::Persons => &record.person,
        }
    }

    fn value_mut(self, record: &mut DocumentRecord) -> &mut String {
        match self {
            Self::Specialties => &mut record.specialty,
            Self::Persons => &mut record.person,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Specialties => "specialty",
            Self::Persons => "person",
        }
    }
}

/// Directory-backed catalog of records, name lists and scan statistics.
#[derive(Debug, Clone)]
pub struct JsonCatalog {
    dir: PathBuf,
}

impl JsonCatalog {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn file(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    // =========================================================================
    // RECORDS
    // =========================================================================

    /// All records in catalog order. A missing index is an empty catalog.
    pub fn load_records(&self) -> Result<Vec<DocumentRecord>> {
        Ok(read_json(&self.file(INDEX_FILE))?.unwrap_or_default())
    }

    pub fn save_records(&self, records: &[DocumentRecord]) -> Result<()> {
        write_json(&self.dir, &self.file(INDEX_FILE), records)?;
        debug!(count = records.len(), "Saved record index");
        Ok(())
    }

    pub fn find_record(&self, id: &str) -> Result<DocumentRecord> {
        self.load_records()?
            .into_iter()
            .find(|r| r.id == id)
            .ok_or_else(|| Error::DocumentNotFound(id.to_string()))
    }

    /// Insert, or replace the record with the same id in place.
    pub fn upsert_record(&self, record: &DocumentRecord) -> Result<()> {
        let mut records = self.load_records()?;
        match records.iter_mut().find(|r| r.id == record.id) {
            Some(existing) => *existing = record.clone(),
            None => records.push(record.clone()),
        }
        self.save_records(&records)
    }

    /// Apply a client edit. Blank fields are ignored; an edit with no
    /// non-blank field is rejected.
    pub fn update_record(
        &self,
        id: &str,
        edit: &RecordEdit,
        now: NaiveDateTime,
    ) -> Result<DocumentRecord> {
        let title = non_blank(edit.title.as_deref());
        let person = non_blank(edit.person.as_deref());
        let specialty = non_blank(edit.specialty.as_deref());
        if title.is_none() && person.is_none() && specialty.is_none() {
            return Err(Error::InvalidInput("No change provided".to_string()));
        }

        let mut records = self.load_records()?;
        let record = records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| Error::DocumentNotFound(id.to_string()))?;

        if let Some(title) = title {
            record.name = title.to_string();
        }
        if let Some(person) = person {
            record.person = person.to_string();
        }
        if let Some(specialty) = specialty {
            record.specialty = specialty.to_string();
        }
        record.modified_at = now;
        let updated = record.clone();

        self.save_records(&records)?;
        info!(document_id = id, "Updated document record");
        Ok(updated)
    }

    /// Remove a record and return it.
    pub fn remove_record(&self, id: &str) -> Result<DocumentRecord> {
        let mut records = self.load_records()?;
        let pos = records
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| Error::DocumentNotFound(id.to_string()))?;
        let removed = records.remove(pos);
        self.save_records(&records)?;
        info!(document_id = id, "Removed document record");
        Ok(removed)
    }

    // =========================================================================
    // STATISTICS
    // =========================================================================

    /// Snapshot of the last scan, if any scan ran.
    pub fn load_statistics(&self) -> Result<Option<ScanStatistics>> {
        read_json(&self.file(STATS_FILE))
    }

    pub fn save_statistics(&self, stats: &ScanStatistics) -> Result<()> {
        write_json(&self.dir, &self.file(STATS_FILE), stats)
    }

    // =========================================================================
    // NAME LISTS
    // =========================================================================

    /// The persisted list, or the built-in defaults when none was saved.
    pub fn names(&self, list: NameList) -> Result<Vec<String>> {
        Ok(read_json(&self.file(list.file_name()))?.unwrap_or_else(|| list.defaults()))
    }

    fn save_names(&self, list: NameList, names: &[String]) -> Result<()> {
        write_json(&self.dir, &self.file(list.file_name()), names)
    }

    /// Number of records whose field equals `value`.
    pub fn references(&self, list: NameList, value: &str) -> Result<usize> {
        Ok(self
            .load_records()?
            .iter()
            .filter(|r| list.value_of(r) == value)
            .count())
    }

    /// Append a name. Adding a name already present changes nothing.
    pub fn add_name(&self, list: NameList, value: &str) -> Result<Vec<String>> {
        let value = non_blank(Some(value))
            .ok_or_else(|| Error::InvalidInput(format!("Empty {} name", list.label())))?;

        let mut names = self.names(list)?;
        if !names.iter().any(|n| n == value) {
            names.push(value.to_string());
            self.save_names(list, &names)?;
            info!(list = list.label(), name = value, "Added name");
        }
        Ok(names)
    }

    /// Rename in place and rewrite every record that referenced the old
    /// name. Returns the rewritten records.
    pub fn rename_name(
        &self,
        list: NameList,
        old: &str,
        new: &str,
    ) -> Result<Vec<DocumentRecord>> {
        let new = non_blank(Some(new))
            .ok_or_else(|| Error::InvalidInput(format!("Empty {} name", list.label())))?;

        let mut names = self.names(list)?;
        let pos = names
            .iter()
            .position(|n| n == old)
            .ok_or_else(|| Error::NotFound(format!("{} '{}'", list.label(), old)))?;
        if new != old && names.iter().any(|n| n == new) {
            return Err(Error::InvalidInput(format!(
                "{} '{}' already exists",
                list.label(),
                new
            )));
        }
        names[pos] = new.to_string();

        let mut records = self.load_records()?;
        let mut changed = Vec::new();
        for record in records.iter_mut() {
            let value = list.value_mut(record);
            if value.as_str() == old {
                *value = new.to_string();
                changed.push(record.clone());
            }
        }

        self.save_records(&records)?;
        self.save_names(list, &names)?;
        info!(
            list = list.label(),
            old,
            new,
            documents = changed.len(),
            "Renamed name"
        );
        Ok(changed)
    }

    /// Remove a name nothing references any more.
    pub fn remove_name(&self, list: NameList, value: &str) -> Result<Vec<String>> {
        let mut names = self.names(list)?;
        let pos = names
            .iter()
            .position(|n| n == value)
            .ok_or_else(|| Error::NotFound(format!("{} '{}'", list.label(), value)))?;

        let count = self.references(list, value)?;
        if count > 0 {
            return Err(Error::InUse {
                value: value.to_string(),
                count,
            });
        }

        names.remove(pos);
        self.save_names(list, &names)?;
        info!(list = list.label(), name = value, "Removed name");
        Ok(names)
    }
}

#[async_trait]
impl DocumentStore for JsonCatalog {
    async fn put(&self, record: &DocumentRecord) -> Result<()> {
        self.upsert_record(record)
    }

    async fn delete(&self, id: &str) -> Result<()> {
        match self.remove_record(id) {
            Ok(_) | Err(Error::DocumentNotFound(_)) => Ok(()),
            Err(e) => Err(e),
        }
    }

    async fn search(&self, query: &CompiledQuery) -> Result<Vec<SearchHit>> {
        let records = self.load_records()?;
        Ok(evaluate(&records, &query.raw, &query.filters))
    }

    fn name(&self) -> &str {
        "basique"
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// `Ok(None)` when the file does not exist.
fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    let data = match fs::read(path) {
        Ok(data) => data,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    serde_json::from_slice(&data)
        .map(Some)
        .map_err(|e| Error::Serialization(format!("{}: {}", path.display(), e)))
}

fn write_json<T: Serialize + ?Sized>(dir: &Path, path: &Path, value: &T) -> Result<()> {
    fs::create_dir_all(dir)?;
    let mut tmp = NamedTempFile::new_in(dir)?;
    serde_json::to_writer_pretty(&mut tmp, value)?;
    tmp.write_all(b"\n")?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| Error::Io(e.error))?;
    Ok(())
}
