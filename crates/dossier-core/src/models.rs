//! Persisted data shapes.
//!
//! Serialized key names match the JSON files written by earlier versions of the
//! office's indexer and the field names of the search engine mapping, so the
//! Rust field names are renamed on the wire.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::defaults::{DEFAULT_PERSON, DEFAULT_SPECIALTY};

/// Index field names, shared by the query compiler, the engine mapping and
/// highlight keys.
pub mod field {
    pub const NAME: &str = "nom";
    pub const CONTENT: &str = "contenu_textuel";
    pub const KEYWORDS: &str = "mots_cles";
    pub const SPECIALTY: &str = "specialite";
    pub const PERSON: &str = "avocat";
    pub const CATEGORY: &str = "categorie";
}

/// How the stored text of a document was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ExtractionMethod {
    /// A native reader (pdftotext, docx, plain text) produced content.
    #[serde(rename = "texte")]
    NativeText,
    /// Optical recognition ran and produced content.
    #[serde(rename = "OCR")]
    OpticalRecognition,
    /// Nothing usable was extracted.
    #[default]
    #[serde(rename = "standard")]
    Standard,
}

impl ExtractionMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NativeText => "texte",
            Self::OpticalRecognition => "OCR",
            Self::Standard => "standard",
        }
    }
}

impl std::fmt::Display for ExtractionMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle tag of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordStatus {
    /// Created by a directory scan.
    #[serde(rename = "indexé")]
    Indexed,
    /// Created from an uploaded file.
    #[serde(rename = "uploadé")]
    Uploaded,
}

fn default_specialty() -> String {
    DEFAULT_SPECIALTY.to_string()
}

fn default_person() -> String {
    DEFAULT_PERSON.to_string()
}

/// One entry per indexed file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRecord {
    /// Short opaque id, unique across the catalog.
    pub id: String,
    /// Display name (initially the file name or upload title).
    #[serde(rename = "nom")]
    pub name: String,
    /// Absolute path of the backing file.
    #[serde(rename = "chemin")]
    pub path: String,
    /// Directory containing the backing file.
    #[serde(rename = "dossier")]
    pub directory: String,
    /// Lowercase extension with leading dot (`.pdf`).
    pub extension: String,
    #[serde(rename = "taille")]
    pub size_bytes: u64,
    #[serde(rename = "date_modification")]
    pub modified_at: NaiveDateTime,
    #[serde(rename = "date_indexation")]
    pub indexed_at: NaiveDateTime,
    #[serde(rename = "type_mime")]
    pub mime_type: String,
    #[serde(rename = "mots_cles", default)]
    pub keywords: BTreeSet<String>,
    #[serde(rename = "categorie")]
    pub category: String,
    #[serde(rename = "specialite", default = "default_specialty")]
    pub specialty: String,
    #[serde(rename = "avocat", default = "default_person")]
    pub person: String,
    #[serde(rename = "statut")]
    pub status: RecordStatus,
    /// Extracted text, or a sentinel beginning with `[`.
    #[serde(rename = "contenu_textuel", default)]
    pub content: String,
    #[serde(rename = "type_fichier", default)]
    pub method: ExtractionMethod,
}

impl DocumentRecord {
    /// Whether the stored content is genuine extracted text.
    pub fn has_text_content(&self) -> bool {
        !self.content.is_empty() && !crate::classify::is_sentinel(&self.content)
    }
}

/// Exact-match constraints applied conjunctively to every search.
///
/// Empty strings are treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExactFilters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specialty: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub person: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl ExactFilters {
    pub fn new(
        specialty: Option<String>,
        person: Option<String>,
        category: Option<String>,
    ) -> Self {
        Self {
            specialty: non_empty(specialty),
            person: non_empty(person),
            category: non_empty(category),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.specialty.is_none() && self.person.is_none() && self.category.is_none()
    }

    /// Filters as `(index field, value)` pairs, in a fixed order.
    pub fn terms(&self) -> Vec<(&'static str, &str)> {
        let mut terms = Vec::new();
        if let Some(ref v) = self.specialty {
            terms.push((field::SPECIALTY, v.as_str()));
        }
        if let Some(ref v) = self.person {
            terms.push((field::PERSON, v.as_str()));
        }
        if let Some(ref v) = self.category {
            terms.push((field::CATEGORY, v.as_str()));
        }
        terms
    }

    /// Whether a record satisfies every present filter.
    pub fn matches(&self, record: &DocumentRecord) -> bool {
        self.specialty.as_deref().map_or(true, |v| record.specialty == v)
            && self.person.as_deref().map_or(true, |v| record.person == v)
            && self.category.as_deref().map_or(true, |v| record.category == v)
    }
}

/// A ranked search result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    #[serde(flatten)]
    pub record: DocumentRecord,
    pub score: f64,
    /// Highlighted fragments keyed by index field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highlight: Option<BTreeMap<String, Vec<String>>>,
}

/// Fields a client may change on an existing record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordEdit {
    #[serde(default, rename = "titre")]
    pub title: Option<String>,
    #[serde(default, rename = "avocat")]
    pub person: Option<String>,
    #[serde(default, rename = "specialite")]
    pub specialty: Option<String>,
}

/// Per-folder entry of a scan snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FolderScan {
    #[serde(rename = "chemin")]
    pub path: String,
    #[serde(rename = "fichiers_indexes")]
    pub files_indexed: usize,
    #[serde(rename = "specialite")]
    pub specialty: String,
    #[serde(rename = "avocat")]
    pub person: String,
    #[serde(rename = "ocr_utilise")]
    pub ocr_used: bool,
}

/// Snapshot written at the end of every directory scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanStatistics {
    #[serde(rename = "date_indexation")]
    pub scanned_at: NaiveDateTime,
    #[serde(rename = "dossiers_indexes")]
    pub folders: Vec<FolderScan>,
    #[serde(rename = "total_fichiers")]
    pub total_files: usize,
    #[serde(rename = "specialite")]
    pub specialty: String,
    #[serde(rename = "avocat")]
    pub person: String,
    #[serde(rename = "ocr_utilise")]
    pub ocr_used: bool,
    #[serde(rename = "ocr_disponible")]
    pub ocr_available: bool,
}
