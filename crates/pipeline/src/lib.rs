//! `numbank-pipeline` — curation engine for the numerals dataset.
//!
//! Pure engine crate: receives pre-loaded snapshot rows and a taxonomy
//! catalog handle, returns the normalized dataset plus a diagnostics report.
//! No CLI or IO dependencies.

pub mod classify;
pub mod config;
pub mod duplicates;
pub mod engine;
pub mod error;
pub mod ingest;
pub mod model;
pub mod normalize;
pub mod overrides;
pub mod remap;
pub mod sort;
pub mod taxonomy;

pub use config::RunConfig;
pub use engine::run;
pub use error::PipelineError;
pub use model::{Dataset, Diagnostics, LanguageRecord, LexicalEntry, PipelineInput};
pub use taxonomy::{Catalog, CatalogEntry, MemoryCatalog};
