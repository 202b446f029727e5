use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{
    Configuration, Descriptor, DetectionResult, FileEntry, InteractionModel, PackageFamily,
    TemplateId, TemplateRecommendation,
};

/// A classified package.
///
/// Processed packages are cached by `source_path`; processing the same path again
/// returns the stored record until the cache is cleared.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessedPackage {
    pub id: Uuid,
    pub name: String,
    pub source_path: String,
    pub family: Option<PackageFamily>,
    pub detection: Option<DetectionResult>,
    pub template_type: TemplateId,
    pub recommendation: TemplateRecommendation,
    pub descriptor: Descriptor,
    pub configuration: Configuration,
    pub status: PackageStatus,
    pub processed_at: DateTime<Utc>,
}

impl ProcessedPackage {
    /// The recommended template when its confidence reaches `min_confidence`,
    /// otherwise [`TemplateId::Contentreveal`].
    pub fn recommended_template(&self, min_confidence: u8) -> TemplateId {
        if self.recommendation.confidence >= min_confidence {
            self.recommendation.template
        } else {
            TemplateId::Contentreveal
        }
    }
}

/// How a package was classified.
///
/// - `Ready`: classified from the package's own signals
/// - `Degraded`: a descriptor was expected but missing or malformed, so a synthetic
///   one was used instead
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PackageStatus {
    Ready,
    Degraded,
}

impl PackageStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ready => "ready",
            Self::Degraded => "degraded",
        }
    }
}

/// Descriptor text as obtained by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DescriptorText {
    Raw(String),
    /// Fetching failed; the message says why.
    Unavailable(String),
}

/// Everything already materialized for one package.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PackageInput {
    pub source_path: String,
    /// Display name. Derived from the descriptor or path when absent.
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub files: Vec<FileEntry>,
    #[serde(default)]
    pub descriptor: Option<DescriptorText>,
    #[serde(default)]
    pub interactions: Option<InteractionModel>,
}

impl PackageInput {
    pub fn new(source_path: impl Into<String>) -> Self {
        Self {
            source_path: source_path.into(),
            ..Default::default()
        }
    }

    pub fn with_files(mut self, files: Vec<FileEntry>) -> Self {
        self.files = files;
        self
    }

    pub fn with_descriptor(mut self, text: impl Into<String>) -> Self {
        self.descriptor = Some(DescriptorText::Raw(text.into()));
        self
    }

    pub fn with_interactions(mut self, model: InteractionModel) -> Self {
        self.interactions = Some(model);
        self
    }
}
