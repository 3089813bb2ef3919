//! Derived classification: keywords, category, record ids and the sentinel
//! convention for stored text.

use std::collections::BTreeSet;

use uuid::Uuid;

use crate::defaults::RECORD_ID_LEN;

/// Words never kept as keywords.
const STOP_WORDS: &[&str] = &[
    "dossier", "fichier", "document", "pdf", "doc", "docx", "txt", "rtf", "odt", "png", "jpg",
    "jpeg",
];

/// Directory rules, checked in order before the file name rules.
const DIRECTORY_RULES: &[(&[&str], &str)] = &[
    (&["contrat", "agreement", "convention"], "Contrats"),
    (&["facture", "invoice", "paiement"], "Factures"),
    (&["courrier", "mail", "email", "lettre"], "Correspondance"),
    (&["jugement", "tribunal", "audience"], "Décisions"),
];

const FILE_NAME_RULES: &[(&[&str], &str)] = &[
    (&["contrat", "agreement"], "Contrats"),
    (&["facture", "invoice"], "Factures"),
];

const FALLBACK_CATEGORY: &str = "Divers";

/// Keywords derived from a file's path and name.
///
/// The text is lower-cased and split on every non-alphanumeric character;
/// words of three characters or more that are not stop words are kept.
pub fn extract_keywords(path: &str, file_name: &str) -> BTreeSet<String> {
    let text = format!("{} {}", path, file_name).to_lowercase();
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|word| word.chars().count() > 2)
        .filter(|word| !STOP_WORDS.contains(word))
        .map(str::to_string)
        .collect()
}

/// Category guessed from the containing directory, then the file name.
pub fn guess_category(directory: &str, file_name: &str) -> &'static str {
    let directory = directory.to_lowercase();
    let file_name = file_name.to_lowercase();

    DIRECTORY_RULES
        .iter()
        .find(|(needles, _)| needles.iter().any(|n| directory.contains(n)))
        .or_else(|| {
            FILE_NAME_RULES
                .iter()
                .find(|(needles, _)| needles.iter().any(|n| file_name.contains(n)))
        })
        .map(|(_, category)| *category)
        .unwrap_or(FALLBACK_CATEGORY)
}

/// Stored text beginning with `[` marks an extraction failure, not content.
pub fn is_sentinel(text: &str) -> bool {
    text.starts_with('[')
}

/// Draw a short record id that `taken` does not already contain.
pub fn new_record_id<F>(taken: F) -> String
where
    F: Fn(&str) -> bool,
{
    loop {
        let candidate: String = Uuid::new_v4()
            .simple()
            .to_string()
            .chars()
            .take(RECORD_ID_LEN)
            .collect();
        if !taken(&candidate) {
            return candidate;
        }
    }
}
