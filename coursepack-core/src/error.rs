use thiserror::Error;
use uuid::Uuid;

/// Errors surfaced by [`crate::processor::PackageProcessor`].
///
/// Classification itself never fails; only lookups and the backing store do.
#[derive(Debug, Error)]
pub enum ClassifyError {
    #[error("Package not found: {0}")]
    NotFound(Uuid),

    #[error("Package store failed: {0}")]
    Store(#[from] anyhow::Error),
}
