//! # dossier-query
//!
//! Turns a search box string into a boolean query tree.
//!
//! This crate provides:
//! - A tokenizer and recursive-descent parser for the search syntax
//!   (`field:value`, `"phrases"`, `-exclusions`, `AND`/`OR`)
//! - A compiler producing either a flexible fuzzy clause or a structured
//!   boolean expression, serializable to Elasticsearch query DSL
//! - An in-process evaluator for when no engine is reachable
//!
//! ## Example
//!
//! ```
//! use dossier_query::{compile, QueryMode};
//!
//! let compiled = compile(r#"avocat:"Jean Dupont" contrat"#);
//! assert_eq!(compiled.mode, QueryMode::Structured);
//! let body = compiled.to_json();
//! assert!(body["bool"]["must"].is_array());
//! ```

pub mod compiler;
pub mod expr;
pub mod fallback;
pub mod fields;
pub mod lexer;
pub mod parser;

pub use compiler::{compile, compile_with_filters, has_advanced_operators, CompiledQuery, QueryMode};
pub use expr::{BoolQuery, Clause, MultiMatch};
pub use fallback::evaluate;
pub use fields::{canonical_field, WeightedField};
pub use parser::{parse, ParsedQuery};
