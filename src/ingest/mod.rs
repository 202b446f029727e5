//! Async front of the pipeline: materialize a package from disk or HTTP, then
//! hand it to the shared [`PackageProcessor`].

mod lister;
mod source;

pub use lister::{DirectoryLister, FileLister};
pub use source::{is_remote, AnySource, DescriptorSource, FsDescriptorSource, HttpDescriptorSource};

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

use thiserror::Error;
use tokio::sync::OnceCell;

use coursepack_core::models::{
    DescriptorText, FileEntry, InteractionModel, PackageFamily, PackageInput, ProcessedPackage,
};
use coursepack_core::store::{MemoryStore, PackageStore};
use coursepack_core::{BatchFailure, BatchReport, ClassifyError, PackageProcessor};

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected status {status} fetching {url}")]
    Status {
        status: reqwest::StatusCode,
        url: String,
    },

    #[error(transparent)]
    Classify(#[from] ClassifyError),
}

impl IngestError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            source,
        }
    }
}

type Pending = Mutex<HashMap<String, Arc<OnceCell<ProcessedPackage>>>>;

/// Runs packages through the processor, at most once per path at a time.
///
/// Concurrent `ingest` calls for the same uncached path share a single
/// pipeline run. Lister and source failures never surface as errors; the
/// package is classified from whatever could be gathered and marked degraded.
/// Only store failures are returned.
pub struct Ingestor<L, D, S: PackageStore = MemoryStore> {
    processor: Arc<PackageProcessor<S>>,
    lister: L,
    source: D,
    pending: Pending,
}

impl<L: FileLister, D: DescriptorSource, S: PackageStore> Ingestor<L, D, S> {
    pub fn new(processor: Arc<PackageProcessor<S>>, lister: L, source: D) -> Self {
        Self {
            processor,
            lister,
            source,
            pending: Mutex::new(HashMap::new()),
        }
    }

    pub fn processor(&self) -> &PackageProcessor<S> {
        &self.processor
    }

    pub async fn ingest(&self, location: &str) -> Result<ProcessedPackage, IngestError> {
        self.ingest_with(location, None).await
    }

    /// Like [`ingest`](Self::ingest), with an interaction model attached to the
    /// input. The model is ignored when the path is already cached.
    pub async fn ingest_with(
        &self,
        location: &str,
        interactions: Option<InteractionModel>,
    ) -> Result<ProcessedPackage, IngestError> {
        if let Some(cached) = self.processor.cached(location)? {
            return Ok(cached);
        }

        let cell = {
            let mut pending = self.pending.lock().expect("pending lock poisoned");
            pending.entry(location.to_string()).or_default().clone()
        };

        let result = cell
            .get_or_try_init(|| async move {
                let input = self.materialize(location, interactions).await;
                self.processor.process(input)
            })
            .await
            .cloned();

        {
            let mut pending = self.pending.lock().expect("pending lock poisoned");
            if pending
                .get(location)
                .is_some_and(|current| Arc::ptr_eq(current, &cell))
            {
                pending.remove(location);
            }
        }

        Ok(result?)
    }

    /// Ingest each location in turn; store failures are recorded per item.
    pub async fn ingest_batch<I>(&self, locations: I) -> BatchReport
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut report = BatchReport::default();
        for location in locations {
            let location = location.as_ref();
            match self.ingest(location).await {
                Ok(package) => report.processed.push(package),
                Err(e) => {
                    tracing::error!(source = %location, "Failed to ingest package: {}", e);
                    report.failures.push(BatchFailure {
                        source_path: location.to_string(),
                        error: e.to_string(),
                    });
                }
            }
        }
        report
    }

    /// Gather files and descriptor text for `location`. Collaborator failures
    /// become an unavailable descriptor, which the processor degrades on.
    async fn materialize(
        &self,
        location: &str,
        interactions: Option<InteractionModel>,
    ) -> PackageInput {
        let mut input = PackageInput::new(location);
        input.interactions = interactions;

        if is_remote(location) || is_descriptor_path(location) {
            input.descriptor = Some(self.fetch(location).await);
            return input;
        }

        let root = Path::new(location);
        match self.lister.list(root).await {
            Ok(files) => {
                if let Some(entry) = descriptor_entry(&files) {
                    let full = root.join(&entry.path);
                    input.descriptor = Some(self.fetch(&full.to_string_lossy()).await);
                }
                input.files = files;
            }
            Err(e) => {
                tracing::warn!(source = %location, "Failed to list package: {}", e);
                input.descriptor = Some(DescriptorText::Unavailable(e.to_string()));
            }
        }
        input
    }

    async fn fetch(&self, location: &str) -> DescriptorText {
        match self.source.fetch(location).await {
            Ok(text) => DescriptorText::Raw(text),
            Err(e) => {
                tracing::warn!(%location, "Failed to fetch descriptor: {}", e);
                DescriptorText::Unavailable(e.to_string())
            }
        }
    }
}

/// A path that names a manifest descriptor file directly.
fn is_descriptor_path(location: &str) -> bool {
    PackageFamily::from_path(location).is_some_and(|f| f.uses_manifest_descriptor())
        && !Path::new(location).is_dir()
}

/// The shallowest listed manifest descriptor. Sampled content may be cut
/// short, so the caller re-reads it in full.
fn descriptor_entry(files: &[FileEntry]) -> Option<&FileEntry> {
    let name = PackageFamily::Scorm.descriptor_file()?;
    files
        .iter()
        .filter(|f| f.name.eq_ignore_ascii_case(name))
        .min_by_key(|f| f.path.matches('/').count())
}
