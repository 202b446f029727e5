use std::future::Future;
use std::path::Path;

use tokio::io::AsyncReadExt;

use coursepack_core::models::FileEntry;

use super::IngestError;
use crate::config::Settings;

/// Produces the file listing of a package.
pub trait FileLister: Send + Sync {
    fn list(&self, root: &Path) -> impl Future<Output = Result<Vec<FileEntry>, IngestError>> + Send;
}

/// Lists an already-extracted package directory (or a single file).
///
/// Paths are relative to the root and `/`-separated. Text files get the first
/// `sample_bytes` of their content attached. An archive yields an empty
/// listing; extract it first to get a real classification.
#[derive(Debug, Clone)]
pub struct DirectoryLister {
    sample_bytes: usize,
    text_extensions: Vec<String>,
}

const ARCHIVE_EXTENSIONS: &[&str] = &["zip", "h5p", "story", "cptx", "pptx", "odp", "key"];

impl DirectoryLister {
    pub fn new(sample_bytes: usize, text_extensions: Vec<String>) -> Self {
        Self {
            sample_bytes,
            text_extensions,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.sample_bytes, settings.text_extensions.clone())
    }

    fn is_text(&self, entry: &FileEntry) -> bool {
        entry.extension().is_some_and(|ext| {
            self.text_extensions
                .iter()
                .any(|e| e.trim_start_matches('.').eq_ignore_ascii_case(&ext))
        })
    }

    async fn entry(&self, path: &Path, relative: String) -> Result<FileEntry, IngestError> {
        let mut entry = FileEntry::new(relative);
        if self.sample_bytes > 0 && self.is_text(&entry) {
            entry.content = Some(self.sample(path).await?);
        }
        Ok(entry)
    }

    async fn sample(&self, path: &Path) -> Result<String, IngestError> {
        let file = tokio::fs::File::open(path)
            .await
            .map_err(|e| IngestError::io(path, e))?;
        let mut buf = Vec::with_capacity(self.sample_bytes.min(64 * 1024));
        file.take(self.sample_bytes as u64)
            .read_to_end(&mut buf)
            .await
            .map_err(|e| IngestError::io(path, e))?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

impl FileLister for DirectoryLister {
    async fn list(&self, root: &Path) -> Result<Vec<FileEntry>, IngestError> {
        let meta = tokio::fs::metadata(root)
            .await
            .map_err(|e| IngestError::io(root, e))?;

        if !meta.is_dir() {
            let name = root
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let probe = FileEntry::new(name.clone());
            if probe
                .extension()
                .is_some_and(|ext| ARCHIVE_EXTENSIONS.contains(&ext.as_str()))
            {
                tracing::warn!(
                    path = %root.display(),
                    "Archives are not extracted, classifying by name only"
                );
                return Ok(Vec::new());
            }
            return Ok(vec![self.entry(root, name).await?]);
        }

        let mut entries = Vec::new();
        let mut stack = vec![root.to_path_buf()];
        while let Some(dir) = stack.pop() {
            let mut read_dir = tokio::fs::read_dir(&dir)
                .await
                .map_err(|e| IngestError::io(&dir, e))?;
            while let Some(child) = read_dir
                .next_entry()
                .await
                .map_err(|e| IngestError::io(&dir, e))?
            {
                let path = child.path();
                let file_type = child
                    .file_type()
                    .await
                    .map_err(|e| IngestError::io(&path, e))?;
                if file_type.is_dir() {
                    stack.push(path);
                } else if file_type.is_file() {
                    let relative = relative_path(root, &path);
                    entries.push(self.entry(&path, relative).await?);
                }
            }
        }

        entries.sort_by(|a, b| a.path.cmp(&b.path));
        tracing::debug!(root = %root.display(), files = entries.len(), "Listed package");
        Ok(entries)
    }
}

fn relative_path(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
