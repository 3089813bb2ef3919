//! # dossier-core
//!
//! Core types and rules shared by the dossier crates: the persisted record
//! shapes, derived classification, the error type, centralized defaults, and
//! environment parsing helpers.

pub mod classify;
pub mod defaults;
pub mod env;
pub mod error;
pub mod models;

// Re-export commonly used types at crate root
pub use classify::{extract_keywords, guess_category, is_sentinel, new_record_id};
pub use env::{non_empty_env, parse_bool_env, parse_env};
pub use error::{Error, Result};
pub use models::*;
