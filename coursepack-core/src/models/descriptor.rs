use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Canonical parsed form of a manifest-like package descriptor.
///
/// Parsing never fails outright: a document that cannot be read yields a
/// descriptor with `valid == false` and an `error` message, so callers branch on
/// `valid` instead of handling a parse error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Descriptor {
    pub id: String,
    pub version: String,
    /// `None` only for invalid descriptors.
    pub metadata: Option<BTreeMap<String, String>>,
    pub default_organization: Option<String>,
    pub organizations: Vec<OrganizationNode>,
    pub resources: Vec<Resource>,
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Descriptor {
    /// Descriptor standing in for a document that could not be read.
    pub fn invalid(error: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            version: String::new(),
            metadata: None,
            default_organization: None,
            organizations: Vec::new(),
            resources: Vec::new(),
            valid: false,
            error: Some(error.into()),
        }
    }

    pub fn metadata_value(&self, key: &str) -> Option<&str> {
        self.metadata.as_ref()?.get(key).map(String::as_str)
    }

    /// Display title: the metadata title, else the first organization title.
    pub fn title(&self) -> Option<&str> {
        self.metadata_value("title")
            .or_else(|| self.organizations.first().map(|o| o.title.as_str()))
            .filter(|t| !t.is_empty())
    }

    /// Whether the descriptor carries anything a template could be mapped from.
    pub fn has_signal(&self) -> bool {
        !self.resources.is_empty() || !self.organizations.is_empty()
    }

    pub fn is_synthetic(&self) -> bool {
        self.metadata_value("synthetic") == Some("true")
    }

    pub fn scorm_edition(&self) -> ScormEdition {
        match self.metadata_value("schemaversion") {
            Some(v) if v.trim() == "1.2" => ScormEdition::Scorm12,
            Some(v) if v.contains("2004") || v.starts_with("CAM") => ScormEdition::Scorm2004,
            _ => ScormEdition::Unknown,
        }
    }

    /// Every item in every organization, depth-first.
    pub fn items(&self) -> Vec<&OrganizationItem> {
        let mut out = Vec::new();
        let mut stack: Vec<&OrganizationItem> = self
            .organizations
            .iter()
            .rev()
            .flat_map(|o| o.items.iter().rev())
            .collect();
        while let Some(item) = stack.pop() {
            out.push(item);
            stack.extend(item.children.iter().rev());
        }
        out
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScormEdition {
    Scorm12,
    Scorm2004,
    Unknown,
}

/// One `organization` element: a titled tree of items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrganizationNode {
    pub id: String,
    pub title: String,
    /// The `structure` attribute, `hierarchical` when absent.
    pub structure_kind: String,
    pub items: Vec<OrganizationItem>,
}

/// A node of the organization tree.
///
/// Depth is capped by the parser; anything nested deeper than the cap is dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrganizationItem {
    pub id: String,
    /// Identifier of the [`Resource`] this item launches, if any.
    pub resource_ref: Option<String>,
    pub title: String,
    pub visible: bool,
    pub prerequisites: Option<String>,
    /// SCORM 1.2 `adlcp:masteryscore`.
    pub mastery_score: Option<u8>,
    pub objectives: Vec<Objective>,
    pub children: Vec<OrganizationItem>,
}

impl OrganizationItem {
    /// Number of levels in this subtree, counting the item itself.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(self, 1usize)];
        while let Some((item, depth)) = stack.pop() {
            deepest = deepest.max(depth);
            stack.extend(item.children.iter().map(|c| (c, depth + 1)));
        }
        deepest
    }
}

/// A sequencing objective attached to an item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Objective {
    pub id: String,
    pub primary: bool,
    pub satisfied_by_measure: bool,
    pub min_normalized_measure: Option<f64>,
}

/// One `resource` element. Dependencies are identifiers only; resolving them is up
/// to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub href: Option<String>,
    /// `sco` or `asset` when declared.
    pub scorm_type: Option<String>,
    pub files: Vec<String>,
    pub dependencies: Vec<String>,
}

impl Resource {
    pub fn web_content(id: impl Into<String>, href: impl Into<String>) -> Self {
        let href = href.into();
        Self {
            id: id.into(),
            kind: "webcontent".to_string(),
            files: vec![href.clone()],
            href: Some(href),
            scorm_type: None,
            dependencies: Vec::new(),
        }
    }
}
