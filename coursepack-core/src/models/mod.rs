//! Data shapes shared by every classification stage.
//!
//! # Core Concepts
//!
//! ## Inputs
//!
//! - [`FileEntry`]: One observed file inside an uploaded package, with optional sampled text.
//! - [`InteractionModel`]: Slides and interactions exported by an authoring tool.
//! - [`PackageInput`]: Everything already materialized for one package, ready to classify.
//!
//! ## Derived
//!
//! - [`Descriptor`]: Canonical tree parsed from a manifest-like document (metadata,
//!   organizations, resources). Invalid documents still produce a `Descriptor` with
//!   `valid == false`.
//! - [`DetectionResult`]: The winning package family for a file listing.
//! - [`TemplateRecommendation`]: A [`TemplateId`] with a 0-100 confidence.
//! - [`ProcessedPackage`]: The cached end result, keyed by source path.

mod descriptor;
mod detection;
mod family;
mod file_entry;
mod interaction;
mod package;
mod template;

pub use descriptor::*;
pub use detection::*;
pub use family::*;
pub use file_entry::*;
pub use interaction::*;
pub use package::*;
pub use template::*;
