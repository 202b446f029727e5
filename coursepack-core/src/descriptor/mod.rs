//! Descriptor parsing and descriptor-level views.

mod parser;
pub mod tree_render;

pub use parser::{parse, MAX_ITEM_DEPTH};

use crate::mapper::TemplateMapper;
use crate::models::{Configuration, Descriptor, TemplateId};

/// Template the default mapper picks for this descriptor.
pub fn detect_template_type(descriptor: &Descriptor) -> TemplateId {
    TemplateMapper::default()
        .map_descriptor_to_template(descriptor)
        .template
}

/// Renderer configuration for the template detected from `descriptor`.
pub fn extract_configuration(descriptor: &Descriptor) -> Configuration {
    configuration_for(descriptor, detect_template_type(descriptor))
}

/// Defaults for `template`, with the mastery score taken from the descriptor when it
/// declares one.
pub fn configuration_for(descriptor: &Descriptor, template: TemplateId) -> Configuration {
    let mut config = template.default_configuration();
    if template == TemplateId::Survey {
        return config;
    }
    if let Some(score) = declared_mastery_score(descriptor) {
        config.mastery_score = Some(score);
    }
    config
}

/// SCORM 1.2 `masteryscore` on the first item that has one, else the first
/// measure-satisfied objective's minimum measure scaled to 0-100.
fn declared_mastery_score(descriptor: &Descriptor) -> Option<u8> {
    let items = descriptor.items();
    if let Some(score) = items.iter().find_map(|i| i.mastery_score) {
        return Some(score);
    }
    items
        .iter()
        .flat_map(|i| i.objectives.iter())
        .filter(|o| o.satisfied_by_measure)
        .find_map(|o| o.min_normalized_measure)
        .filter(|m| (0.0..=1.0).contains(m))
        .map(|m| (m * 100.0).round() as u8)
}
