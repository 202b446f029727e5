//! Descriptor stand-in built from names alone.

use std::collections::BTreeMap;

use crate::models::{
    Descriptor, FileEntry, OrganizationItem, OrganizationNode, PackageFamily, Resource,
};

/// Last path segment, ignoring a trailing separator.
pub(crate) fn file_name(path: &str) -> &str {
    path.trim_end_matches(&['/', '\\'][..])
        .rsplit(&['/', '\\'][..])
        .next()
        .unwrap_or(path)
}

/// Last path segment without its extension.
pub(crate) fn file_stem(path: &str) -> &str {
    let name = file_name(path);
    match name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => name,
    }
}

/// `final_exam-v2` → `Final Exam V2`.
pub(crate) fn humanize(stem: &str) -> String {
    let words: Vec<String> = stem
        .split(|c: char| c == '_' || c == '-' || c.is_whitespace())
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect();
    if words.is_empty() {
        "Untitled package".to_string()
    } else {
        words.join(" ")
    }
}

/// Build a descriptor from the source path and whatever files were listed.
///
/// Every listed file becomes a `webcontent` resource and every HTML entry point an
/// item, so the same keyword mapping applies as for a real manifest. With nothing
/// listed, the upload's own file name stands in; its parent directories are not
/// package content.
pub fn synthetic_descriptor(
    source_path: &str,
    files: &[FileEntry],
    family: Option<&PackageFamily>,
) -> Descriptor {
    let stem = file_stem(source_path);
    let title = humanize(stem);

    let mut metadata = BTreeMap::new();
    metadata.insert("title".to_string(), title.clone());
    metadata.insert("source".to_string(), source_path.to_string());
    metadata.insert("synthetic".to_string(), "true".to_string());
    if let Some(family) = family {
        metadata.insert("family".to_string(), family.to_string());
    }

    let resources: Vec<Resource> = if files.is_empty() {
        vec![Resource::web_content("res-0", file_name(source_path))]
    } else {
        files
            .iter()
            .enumerate()
            .map(|(i, f)| Resource::web_content(format!("res-{}", i), f.path.clone()))
            .collect()
    };

    let items = resources
        .iter()
        .filter(|r| {
            r.href
                .as_deref()
                .is_some_and(|h| FileEntry::new(h).is_html())
        })
        .enumerate()
        .map(|(i, r)| OrganizationItem {
            id: format!("item-{}", i + 1),
            resource_ref: Some(r.id.clone()),
            title: humanize(file_stem(r.href.as_deref().unwrap_or_default())),
            visible: true,
            prerequisites: None,
            mastery_score: None,
            objectives: Vec::new(),
            children: Vec::new(),
        })
        .collect();

    Descriptor {
        id: format!("synthetic-{}", stem),
        version: "1.0".to_string(),
        metadata: Some(metadata),
        default_organization: Some("org-1".to_string()),
        organizations: vec![OrganizationNode {
            id: "org-1".to_string(),
            title,
            structure_kind: "hierarchical".to_string(),
            items,
        }],
        resources,
        valid: true,
        error: None,
    }
}
