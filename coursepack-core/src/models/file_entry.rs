use serde::{Deserialize, Serialize};

/// One observed file inside a package.
///
/// Created by whatever lists the package contents. `content` holds a sample of
/// the file text (not necessarily all of it) and is only used for keyword matching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    pub name: String,
    /// Path relative to the package root, `/`-separated.
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl FileEntry {
    /// Entry without sampled content. The name is the last path segment.
    pub fn new(path: impl Into<String>) -> Self {
        let path = path.into();
        let name = path.rsplit('/').next().unwrap_or(&path).to_string();
        Self {
            name,
            path,
            content: None,
        }
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Lowercased extension of the file name, without the dot.
    pub fn extension(&self) -> Option<String> {
        let (stem, ext) = self.name.rsplit_once('.')?;
        if stem.is_empty() {
            return None;
        }
        Some(ext.to_ascii_lowercase())
    }

    pub fn is_html(&self) -> bool {
        matches!(self.extension().as_deref(), Some("html" | "htm"))
    }
}
