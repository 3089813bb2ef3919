//! Centralized default constants for dossier.
//!
//! Every crate reads shared defaults from here instead of defining its own
//! magic numbers. Environment variable names live next to the value they
//! override.

// =============================================================================
// EXTRACTION
// =============================================================================

/// Native PDF text shorter than this (in chars, after trimming) is treated as
/// a scanned document and triggers optical recognition.
pub const PDF_MIN_NATIVE_CHARS: usize = 100;

/// Rasterization resolution for PDF page recognition.
pub const OCR_DPI: u32 = 200;

/// Recognition languages, passed to tesseract as `-l`.
pub const OCR_LANGUAGES: &str = "fra+eng";

/// Per-command timeout for external extraction tools (seconds).
pub const EXTRACTION_CMD_TIMEOUT_SECS: u64 = 60;

/// Timeout multiplier applied to page rasterization.
pub const RASTERIZE_TIMEOUT_FACTOR: u64 = 3;

/// Number of leading bytes inspected when deciding whether a file is text.
pub const TEXT_SNIFF_BYTES: usize = 8 * 1024;

/// Environment variable to enable OCR processing.
pub const ENV_OCR_ENABLED: &str = "OCR_ENABLED";

/// Environment variable pointing at a tesseract binary.
pub const ENV_TESSERACT_CMD: &str = "TESSERACT_CMD";

/// Environment variable for the recognition language setting.
pub const ENV_OCR_LANGUAGES: &str = "OCR_LANGUAGES";

/// Environment variable for the rasterization resolution.
pub const ENV_OCR_DPI: &str = "OCR_DPI";

/// Extensions accepted by scans and uploads.
pub const ALLOWED_EXTENSIONS: &[&str] = &[
    ".pdf", ".doc", ".docx", ".txt", ".rtf", ".odt", ".xls", ".xlsx", ".ppt", ".pptx", ".png",
    ".jpg", ".jpeg", ".tiff", ".bmp",
];

/// Raster image extensions handed to optical recognition.
pub const IMAGE_EXTENSIONS: &[&str] = &[".png", ".jpg", ".jpeg", ".tiff", ".bmp"];

// =============================================================================
// RECORDS
// =============================================================================

/// Specialty assigned when none is given.
pub const DEFAULT_SPECIALTY: &str = "Non spécifiée";

/// Responsible person assigned when none is given.
pub const DEFAULT_PERSON: &str = "Non attribué";

/// MIME type stored when the extension is unknown.
pub const UNKNOWN_MIME: &str = "inconnu";

/// Length of the short opaque record id.
pub const RECORD_ID_LEN: usize = 8;

/// Specialty list used until one is persisted.
pub const DEFAULT_SPECIALTIES: &[&str] = &[
    "Droit civil",
    "Droit pénal",
    "Droit commercial",
    "Droit du travail",
    "Droit de la famille",
    "Droit immobilier",
    "Droit administratif",
    "Droit fiscal",
    "Droit des sociétés",
    "Droit de la propriété intellectuelle",
    "Droit international",
    "Droit européen",
    "Droit des assurances",
    "Droit rural",
    "Droit de la santé",
    "Droit de l'environnement",
];

/// Person list used until one is persisted.
pub const DEFAULT_PERSONS: &[&str] = &["Maître Dupont", "Maître Martin", "Maître Dubois"];

// =============================================================================
// STORAGE
// =============================================================================

/// Directory receiving uploaded files.
pub const DATA_DIR: &str = "donnees_cabinet";

/// Directory holding the JSON catalog.
pub const INDEX_DIR: &str = "index_fichiers";

/// Catalog file names inside [`INDEX_DIR`].
pub const INDEX_FILE: &str = "index.json";
pub const STATS_FILE: &str = "statistiques.json";
pub const SPECIALTIES_FILE: &str = "specialites.json";
pub const PERSONS_FILE: &str = "avocats.json";

pub const ENV_DATA_DIR: &str = "DOSSIER_DATA_DIR";
pub const ENV_INDEX_DIR: &str = "DOSSIER_INDEX_DIR";

// =============================================================================
// SEARCH ENGINE
// =============================================================================

/// Environment variable for the Elasticsearch base URL. Unset means no engine.
pub const ENV_ELASTICSEARCH_URL: &str = "ELASTICSEARCH_URL";

/// Environment variable for the Elasticsearch index name.
pub const ENV_ELASTICSEARCH_INDEX: &str = "ELASTICSEARCH_INDEX";

/// Environment variable for the per-request engine timeout.
pub const ENV_ELASTICSEARCH_TIMEOUT_SECS: &str = "ELASTICSEARCH_TIMEOUT_SECS";

/// Default Elasticsearch index name.
pub const ELASTICSEARCH_INDEX: &str = "documents_cabinet";

/// Default per-request engine timeout (seconds).
pub const ELASTICSEARCH_TIMEOUT_SECS: u64 = 10;

/// Maximum hits requested from the engine.
pub const SEARCH_RESULT_SIZE: usize = 100;

/// Highlight markers wrapped around matched fragments.
pub const HIGHLIGHT_PRE_TAG: &str = "<mark>";
pub const HIGHLIGHT_POST_TAG: &str = "</mark>";
