//! # dossier-store
//!
//! Persistence for dossier: the JSON file catalog that is always present and
//! the optional Elasticsearch index, both behind [`DocumentStore`].

pub mod catalog;
pub mod elastic;
pub mod traits;

pub use catalog::{JsonCatalog, NameList};
pub use elastic::{ElasticConfig, ElasticStore};
pub use traits::DocumentStore;
