//! `numbank-io` — the file layer around the curation engine: snapshot and
//! override loading, the taxonomy catalog, the CSV dataset sink, and the
//! per-family raw index.

pub mod catalog;
pub mod error;
pub mod index;
pub mod read;
pub mod snapshot;
pub mod writer;

pub use error::IoError;
