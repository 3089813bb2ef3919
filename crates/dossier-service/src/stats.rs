//! Corpus statistics over the catalog.

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;

use dossier_core::{DocumentRecord, ScanStatistics};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorpusStatistics {
    /// Snapshot of the last scan.
    #[serde(rename = "indexation")]
    pub last_scan: Option<ScanStatistics>,
    pub categories: BTreeMap<String, usize>,
    pub extensions: BTreeMap<String, usize>,
    #[serde(rename = "specialites")]
    pub specialties: BTreeMap<String, usize>,
    #[serde(rename = "avocats")]
    pub persons: BTreeMap<String, usize>,
    #[serde(rename = "types_fichier")]
    pub methods: BTreeMap<String, usize>,
    #[serde(rename = "taille_totale_octets")]
    pub total_size_bytes: u64,
    #[serde(rename = "tailles_total")]
    pub total_size: String,
    #[serde(rename = "fichiers_total")]
    pub file_count: usize,
    #[serde(rename = "dossiers_uniques")]
    pub distinct_folders: usize,
}

fn bump(map: &mut BTreeMap<String, usize>, key: &str) {
    *map.entry(key.to_string()).or_insert(0) += 1;
}

/// Size in mebibytes with one decimal, `"12.3 Mo"`.
pub fn format_size(bytes: u64) -> String {
    format!("{:.1} Mo", bytes as f64 / (1024.0 * 1024.0))
}

pub fn corpus_statistics(
    records: &[DocumentRecord],
    last_scan: Option<ScanStatistics>,
) -> CorpusStatistics {
    let mut categories = BTreeMap::new();
    let mut extensions = BTreeMap::new();
    let mut specialties = BTreeMap::new();
    let mut persons = BTreeMap::new();
    let mut methods = BTreeMap::new();
    let mut folders = HashSet::new();
    let mut total_size_bytes = 0u64;

    for record in records {
        bump(&mut categories, &record.category);
        bump(&mut extensions, &record.extension);
        bump(&mut specialties, &record.specialty);
        bump(&mut persons, &record.person);
        bump(&mut methods, record.method.as_str());
        folders.insert(record.directory.as_str());
        total_size_bytes += record.size_bytes;
    }

    CorpusStatistics {
        last_scan,
        categories,
        extensions,
        specialties,
        persons,
        methods,
        total_size_bytes,
        total_size: format_size(total_size_bytes),
        file_count: records.len(),
        distinct_folders: folders.len(),
    }
}
