//! # dossier-service
//!
//! Operations built on the extraction pipeline, the query compiler and the
//! stores: directory scans, file ingestion, record and name-list
//! maintenance, search with engine fallback, and corpus statistics.
//!
//! The `dossier` binary in this crate exposes them on the command line.

pub mod catalog;
pub mod config;
pub mod context;
pub mod indexer;
pub mod search;
pub mod stats;

pub use catalog::CatalogService;
pub use config::ServiceConfig;
pub use context::{Dossier, ServiceStatus};
pub use indexer::{is_allowed, IngestRequest, Indexer};
pub use search::{explain, QueryExplanation, SearchRequest, SearchResponse, SearchService};
pub use stats::{corpus_statistics, format_size, CorpusStatistics};
