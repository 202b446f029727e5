//! Classifies uploaded e-learning packages into activity templates.
//!
//! The classification itself lives in [`coursepack_core`]; this crate adds the
//! pieces that touch the outside world: settings, SQLite persistence and async
//! ingestion from disk or HTTP.

pub mod config;
pub mod db;
pub mod ingest;

pub use coursepack_core::{descriptor, mapper, models, processor, rules, store};
pub use coursepack_core::{BatchReport, ClassifyError, PackageProcessor};
