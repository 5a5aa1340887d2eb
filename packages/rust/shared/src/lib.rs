//! Shared types, error model, and configuration for EsgTracker.
//!
//! This crate is the foundation depended on by all other EsgTracker crates.
//! It provides:
//! - [`EsgTrackerError`] — the unified error type
//! - Domain types ([`MetricRecord`], [`TaxonomyEntry`], [`OntologyEntry`])
//! - Configuration ([`AppConfig`], [`TablePaths`], config loading)
//! - The shared keyword-containment filter ([`KeywordSearch`])

pub mod config;
pub mod error;
pub mod filter;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, DefaultsConfig, StorageConfig, TablePaths, config_dir, config_file_path,
    init_config, load_config, load_config_from,
};
pub use error::{EsgTrackerError, Result};
pub use filter::{KeywordSearch, retain_matching};
pub use types::{
    Category, DEFAULT_SECTOR, DEFAULT_UNIT, Framework, MetricRecord, OntologyEntry, TaxonomyEntry,
    phrase_list, validate_phrases,
};
