//! Classification core for uploaded e-learning packages.
//!
//! Decides which package family an upload belongs to, parses its manifest when it
//! has one, and recommends a rendering template with a default configuration.
//! Everything here is synchronous and works on already-materialized input.

pub mod descriptor;
pub mod error;
pub mod mapper;
pub mod models;
pub mod processor;
pub mod rules;
pub mod store;

pub use error::ClassifyError;
pub use processor::{BatchFailure, BatchReport, PackageProcessor};
