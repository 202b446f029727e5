//! Manifest parsing into a [`Descriptor`].

use std::collections::BTreeMap;

use roxmltree::{Document, Node};

use crate::models::{Descriptor, Objective, OrganizationItem, OrganizationNode, Resource};

/// Items nested deeper than this below their organization are dropped.
pub const MAX_ITEM_DEPTH: usize = 64;

/// Parse manifest markup. Never fails: unreadable input yields an invalid descriptor.
pub fn parse(raw: &str) -> Descriptor {
    let doc = match Document::parse(raw) {
        Ok(doc) => doc,
        Err(e) => {
            tracing::debug!("Descriptor markup rejected: {}", e);
            return Descriptor::invalid(format!("Failed to parse descriptor: {}", e));
        }
    };

    let root = doc.root_element();
    if !is(root, "manifest") {
        return Descriptor::invalid(format!(
            "Descriptor has no manifest root element (found <{}>)",
            root.tag_name().name()
        ));
    }

    let (default_organization, organizations) = extract_organizations(root);

    Descriptor {
        id: root.attribute("identifier").unwrap_or_default().to_string(),
        version: root.attribute("version").unwrap_or_default().to_string(),
        metadata: Some(extract_metadata(root)),
        default_organization,
        organizations,
        resources: extract_resources(root),
        valid: true,
        error: None,
    }
}

fn is(node: Node, name: &str) -> bool {
    node.is_element() && node.tag_name().name().eq_ignore_ascii_case(name)
}

fn children<'a, 'input>(
    node: Node<'a, 'input>,
    name: &'a str,
) -> impl DoubleEndedIterator<Item = Node<'a, 'input>> + 'a {
    node.children().filter(move |c| is(*c, name))
}

fn child<'a, 'input>(node: Node<'a, 'input>, name: &'a str) -> Option<Node<'a, 'input>> {
    children(node, name).next()
}

/// Attribute lookup by local name, ignoring namespace and case (`adlcp:scormType`
/// and `adlcp:scormtype` both appear in the wild).
fn attr<'a>(node: Node<'a, '_>, name: &str) -> Option<&'a str> {
    node.attributes()
        .find(|a| a.name().eq_ignore_ascii_case(name))
        .map(|a| a.value())
}

/// All text below `node`, trimmed. `None` when empty.
fn text_content(node: Node) -> Option<String> {
    let text: String = node
        .descendants()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .collect();
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

fn child_text(node: Node, name: &str) -> Option<String> {
    child(node, name).and_then(text_content)
}

fn extract_metadata(root: Node) -> BTreeMap<String, String> {
    let mut metadata = BTreeMap::new();

    for key in ["title", "description"] {
        if let Some(text) = child_text(root, key) {
            metadata.insert(key.to_string(), text);
        }
    }

    let Some(section) = child(root, "metadata") else {
        return metadata;
    };

    for key in ["schema", "schemaversion"] {
        if let Some(text) = child_text(section, key) {
            metadata.insert(key.to_string(), text);
        }
    }
    for key in ["title", "description"] {
        if metadata.contains_key(key) {
            continue;
        }
        if let Some(text) = section
            .descendants()
            .find(|n| is(*n, key))
            .and_then(text_content)
        {
            metadata.insert(key.to_string(), text);
        }
    }

    // Leaves from foreign namespaces (LOM, adlcp, ...) keyed by local name.
    let manifest_ns = root.tag_name().namespace();
    for node in section.descendants().filter(|n| n.is_element()) {
        let ns = node.tag_name().namespace();
        if ns.is_none() || ns == manifest_ns || node.children().any(|c| c.is_element()) {
            continue;
        }
        if let Some(text) = text_content(node) {
            metadata
                .entry(node.tag_name().name().to_string())
                .or_insert(text);
        }
    }

    metadata
}

fn extract_organizations(root: Node) -> (Option<String>, Vec<OrganizationNode>) {
    let mut default = None;
    let mut organizations = Vec::new();

    for section in children(root, "organizations") {
        if default.is_none() {
            default = section.attribute("default").map(str::to_string);
        }
        for org in children(section, "organization") {
            let id = org.attribute("identifier").unwrap_or_default().to_string();
            let items = extract_items(org, &id);
            organizations.push(OrganizationNode {
                title: child_text(org, "title").unwrap_or_default(),
                structure_kind: org
                    .attribute("structure")
                    .unwrap_or("hierarchical")
                    .to_string(),
                id,
                items,
            });
        }
    }

    (default, organizations)
}

struct Slot {
    item: OrganizationItem,
    parent: Option<usize>,
}

/// Walk the item tree with an explicit stack, then fold the flat pre-order arena
/// back into a tree. Children always sit at higher arena indices than their parent.
fn extract_items(org: Node, org_id: &str) -> Vec<OrganizationItem> {
    let mut arena: Vec<Option<Slot>> = Vec::new();
    let mut stack: Vec<(Node, Option<usize>, usize)> =
        children(org, "item").rev().map(|n| (n, None, 1)).collect();
    let mut truncated = false;

    while let Some((node, parent, depth)) = stack.pop() {
        if depth > MAX_ITEM_DEPTH {
            truncated = true;
            continue;
        }
        let index = arena.len();
        arena.push(Some(Slot {
            item: read_item(node),
            parent,
        }));
        stack.extend(children(node, "item").rev().map(|c| (c, Some(index), depth + 1)));
    }

    if truncated {
        tracing::warn!(
            organization = %org_id,
            max_depth = MAX_ITEM_DEPTH,
            "Organization nesting exceeds depth limit, deeper items dropped"
        );
    }

    let mut roots = Vec::new();
    for index in (0..arena.len()).rev() {
        let Some(Slot { mut item, parent }) = arena[index].take() else {
            continue;
        };
        // Siblings were attached last-first.
        item.children.reverse();
        match parent.and_then(|p| arena[p].as_mut()) {
            Some(parent) => parent.item.children.push(item),
            None => roots.push(item),
        }
    }
    roots.reverse();
    roots
}

fn read_item(node: Node) -> OrganizationItem {
    let objectives = children(node, "sequencing")
        .flat_map(|seq| seq.descendants())
        .filter(|n| is(*n, "primaryObjective") || is(*n, "objective"))
        .map(read_objective)
        .collect();

    OrganizationItem {
        id: node.attribute("identifier").unwrap_or_default().to_string(),
        resource_ref: node.attribute("identifierref").map(str::to_string),
        title: child_text(node, "title").unwrap_or_default(),
        visible: !attr(node, "isvisible").is_some_and(|v| v.trim().eq_ignore_ascii_case("false")),
        prerequisites: child_text(node, "prerequisites"),
        mastery_score: child_text(node, "masteryscore").and_then(|s| parse_score(&s)),
        objectives,
        children: Vec::new(),
    }
}

fn read_objective(node: Node) -> Objective {
    Objective {
        id: attr(node, "objectiveID").unwrap_or_default().to_string(),
        primary: is(node, "primaryObjective"),
        satisfied_by_measure: attr(node, "satisfiedByMeasure")
            .is_some_and(|v| v.trim().eq_ignore_ascii_case("true")),
        min_normalized_measure: child_text(node, "minNormalizedMeasure")
            .and_then(|s| s.parse::<f64>().ok()),
    }
}

fn parse_score(raw: &str) -> Option<u8> {
    let score = raw.trim().parse::<f64>().ok()?;
    (0.0..=100.0)
        .contains(&score)
        .then(|| score.round() as u8)
}

fn extract_resources(root: Node) -> Vec<Resource> {
    children(root, "resources")
        .flat_map(|section| children(section, "resource"))
        .map(|node| Resource {
            id: node.attribute("identifier").unwrap_or_default().to_string(),
            kind: node.attribute("type").unwrap_or_default().to_string(),
            href: node.attribute("href").map(str::to_string),
            scorm_type: attr(node, "scormType").map(str::to_string),
            files: children(node, "file")
                .filter_map(|f| f.attribute("href"))
                .map(str::to_string)
                .collect(),
            dependencies: children(node, "dependency")
                .filter_map(|d| d.attribute("identifierref"))
                .map(str::to_string)
                .collect(),
        })
        .collect()
}
