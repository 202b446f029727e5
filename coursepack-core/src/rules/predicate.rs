use serde::{Deserialize, Serialize};

use crate::models::{FileEntry, PackageFamily};

/// A pure test over a whole file listing. All comparisons are case-insensitive and
/// none depend on the order of the listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum RulePredicate {
    /// Some file has exactly this name.
    FileNamed(String),
    /// Some file name ends with `.<ext>`.
    Extension(String),
    PathContains(String),
    PathEndsWith(String),
    /// Some file's sampled content contains at least one keyword.
    ContentContainsAny(Vec<String>),
    /// Some single file's sampled content contains every keyword.
    ContentContainsAll(Vec<String>),
    AnyOf(Vec<RulePredicate>),
}

impl RulePredicate {
    pub fn matches(&self, files: &[FileEntry]) -> bool {
        match self {
            Self::FileNamed(name) => files.iter().any(|f| f.name.eq_ignore_ascii_case(name)),
            Self::Extension(ext) => {
                let suffix = format!(".{}", ext.trim_start_matches('.').to_ascii_lowercase());
                files
                    .iter()
                    .any(|f| f.name.to_ascii_lowercase().ends_with(&suffix))
            }
            Self::PathContains(needle) => {
                let needle = needle.to_ascii_lowercase();
                files
                    .iter()
                    .any(|f| f.path.to_ascii_lowercase().contains(&needle))
            }
            Self::PathEndsWith(suffix) => {
                let suffix = suffix.to_ascii_lowercase();
                files
                    .iter()
                    .any(|f| f.path.to_ascii_lowercase().ends_with(&suffix))
            }
            Self::ContentContainsAny(keywords) => {
                let keywords = lowercase_all(keywords);
                sampled(files).any(|text| keywords.iter().any(|k| text.contains(k.as_str())))
            }
            Self::ContentContainsAll(keywords) => {
                let keywords = lowercase_all(keywords);
                !keywords.is_empty()
                    && sampled(files).any(|text| keywords.iter().all(|k| text.contains(k.as_str())))
            }
            Self::AnyOf(predicates) => predicates.iter().any(|p| p.matches(files)),
        }
    }
}

fn lowercase_all(keywords: &[String]) -> Vec<String> {
    keywords.iter().map(|k| k.to_lowercase()).collect()
}

fn sampled(files: &[FileEntry]) -> impl Iterator<Item = String> + '_ {
    files
        .iter()
        .filter_map(|f| f.content.as_deref())
        .map(str::to_lowercase)
}

/// A named, weighted predicate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectionRule {
    pub name: String,
    pub predicate: RulePredicate,
    /// 0-100.
    pub confidence: u8,
}

impl DetectionRule {
    pub fn new(name: impl Into<String>, predicate: RulePredicate, confidence: u8) -> Self {
        Self {
            name: name.into(),
            predicate,
            confidence: confidence.min(100),
        }
    }
}

/// The ordered rule list of one family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FamilyRules {
    pub family: PackageFamily,
    pub rules: Vec<DetectionRule>,
}
