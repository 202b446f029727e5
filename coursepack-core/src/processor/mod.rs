//! The classification pipeline: detect family, resolve a descriptor, map it to a
//! template, attach the template's configuration, cache the result.

mod synthetic;

pub use synthetic::synthetic_descriptor;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::descriptor;
use crate::error::ClassifyError;
use crate::mapper::{TemplateMapper, DESCRIPTOR_DEFAULT};
use crate::models::*;
use crate::rules::RuleEngine;
use crate::store::{MemoryStore, PackageStore};

/// Outcome of [`PackageProcessor::process_batch`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchReport {
    pub processed: Vec<ProcessedPackage>,
    pub failures: Vec<BatchFailure>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchFailure {
    pub source_path: String,
    pub error: String,
}

/// Classifies packages and caches the results in a [`PackageStore`].
///
/// `process` is idempotent per source path: once a path is stored, later calls
/// return the stored record without running the pipeline again.
///
/// Nothing here deduplicates concurrent first-time calls for the same path; both
/// run the pipeline and the later `put` wins. Async callers go through the
/// ingestor, which serializes them per path.
pub struct PackageProcessor<S: PackageStore = MemoryStore> {
    engine: RuleEngine,
    mapper: TemplateMapper,
    store: S,
}

impl Default for PackageProcessor<MemoryStore> {
    fn default() -> Self {
        Self::with_store(RuleEngine::default(), MemoryStore::new())
    }
}

impl PackageProcessor<MemoryStore> {
    pub fn new(engine: RuleEngine) -> Self {
        Self::with_store(engine, MemoryStore::new())
    }
}

impl<S: PackageStore> PackageProcessor<S> {
    pub fn with_store(engine: RuleEngine, store: S) -> Self {
        Self {
            engine,
            mapper: TemplateMapper,
            store,
        }
    }

    pub fn engine(&self) -> &RuleEngine {
        &self.engine
    }

    /// Mutable access for start-up rule merges.
    pub fn engine_mut(&mut self) -> &mut RuleEngine {
        &mut self.engine
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn cached(&self, source_path: &str) -> Result<Option<ProcessedPackage>, ClassifyError> {
        Ok(self.store.get_by_path(source_path)?)
    }

    pub fn process(&self, input: PackageInput) -> Result<ProcessedPackage, ClassifyError> {
        if let Some(cached) = self.store.get_by_path(&input.source_path)? {
            tracing::debug!(source = %input.source_path, id = %cached.id, "Package cache hit");
            return Ok(cached);
        }

        let package = self.classify(&input);
        self.store.put(&package)?;

        tracing::info!(
            source = %package.source_path,
            id = %package.id,
            family = package.family.as_ref().map(|f| f.as_str()).unwrap_or("unknown"),
            template = %package.template_type,
            confidence = package.recommendation.confidence,
            status = package.status.as_str(),
            "Processed package"
        );
        Ok(package)
    }

    /// Process every input; a failing item is recorded and the batch moves on.
    pub fn process_batch(&self, inputs: impl IntoIterator<Item = PackageInput>) -> BatchReport {
        let mut report = BatchReport::default();
        for input in inputs {
            let source_path = input.source_path.clone();
            match self.process(input) {
                Ok(package) => report.processed.push(package),
                Err(e) => {
                    tracing::error!(source = %source_path, "Failed to process package: {}", e);
                    report.failures.push(BatchFailure {
                        source_path,
                        error: e.to_string(),
                    });
                }
            }
        }
        report
    }

    pub fn get_package(&self, id: Uuid) -> Result<ProcessedPackage, ClassifyError> {
        self.store
            .get_by_id(id)?
            .ok_or(ClassifyError::NotFound(id))
    }

    pub fn clear_cache(&self) -> Result<usize, ClassifyError> {
        Ok(self.store.clear()?)
    }

    /// Run the pipeline without touching the store.
    pub fn classify(&self, input: &PackageInput) -> ProcessedPackage {
        let detection = if input.files.is_empty() {
            None
        } else {
            self.engine.detect(&input.files)
        };
        let family = detection
            .as_ref()
            .map(|d| d.family.clone())
            .or_else(|| PackageFamily::from_path(&input.source_path));

        let (descriptor, status) = self.resolve_descriptor(input, family.as_ref());

        let descriptor_is_weak = descriptor.is_synthetic() || !descriptor.has_signal();
        let recommendation = match (&input.interactions, descriptor_is_weak) {
            (Some(model), true) => self.mapper.map_interactions_to_template(model),
            (model, _) => self
                .mapper
                .descriptor_signal(&descriptor)
                .or_else(|| {
                    model
                        .as_ref()
                        .map(|m| self.mapper.map_interactions_to_template(m))
                })
                .unwrap_or(DESCRIPTOR_DEFAULT),
        };

        let configuration = descriptor::configuration_for(&descriptor, recommendation.template);
        let name = input
            .name
            .clone()
            .or_else(|| descriptor.title().map(str::to_string))
            .unwrap_or_else(|| synthetic::humanize(synthetic::file_stem(&input.source_path)));

        ProcessedPackage {
            id: Uuid::new_v4(),
            name,
            source_path: input.source_path.clone(),
            family,
            detection,
            template_type: recommendation.template,
            recommendation,
            descriptor,
            configuration,
            status,
            processed_at: Utc::now(),
        }
    }

    /// Parse the real descriptor when there is one; otherwise synthesize. Expecting a
    /// descriptor and not getting a usable one marks the package degraded.
    fn resolve_descriptor(
        &self,
        input: &PackageInput,
        family: Option<&PackageFamily>,
    ) -> (Descriptor, PackageStatus) {
        let text = input.descriptor.clone().or_else(|| {
            let file_name = family?.descriptor_file()?;
            let entry = input
                .files
                .iter()
                .find(|f| f.name.eq_ignore_ascii_case(file_name))?;
            Some(match &entry.content {
                Some(content) => DescriptorText::Raw(content.clone()),
                None => DescriptorText::Unavailable(format!(
                    "{} was listed without content",
                    entry.path
                )),
            })
        });

        match text {
            Some(DescriptorText::Raw(raw)) => {
                let parsed = descriptor::parse(&raw);
                if parsed.valid {
                    return (parsed, PackageStatus::Ready);
                }
                tracing::warn!(
                    source = %input.source_path,
                    error = parsed.error.as_deref().unwrap_or_default(),
                    "Descriptor is malformed, using synthetic descriptor"
                );
            }
            Some(DescriptorText::Unavailable(reason)) => {
                tracing::warn!(
                    source = %input.source_path,
                    %reason,
                    "Descriptor unavailable, using synthetic descriptor"
                );
            }
            None if family.is_some_and(|f| f.uses_manifest_descriptor()) => {
                tracing::warn!(
                    source = %input.source_path,
                    "Manifest-based package has no descriptor, using synthetic descriptor"
                );
            }
            None => {
                return (
                    synthetic_descriptor(&input.source_path, &input.files, family),
                    PackageStatus::Ready,
                );
            }
        }

        (
            synthetic_descriptor(&input.source_path, &input.files, family),
            PackageStatus::Degraded,
        )
    }
}
