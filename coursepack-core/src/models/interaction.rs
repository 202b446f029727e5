use serde::{Deserialize, Serialize};

/// Slides and interactions exported from an authoring-tool project.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InteractionModel {
    #[serde(default)]
    pub interactions: Vec<Interaction>,
    #[serde(default)]
    pub slides: Vec<Slide>,
}

impl InteractionModel {
    /// Top-level interactions followed by every slide's interactions.
    pub fn all_interactions(&self) -> impl Iterator<Item = &Interaction> {
        self.interactions
            .iter()
            .chain(self.slides.iter().flat_map(|s| s.interactions.iter()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interaction {
    #[serde(default)]
    pub id: String,
    /// Free-form type name as the authoring tool reports it, e.g. `multiple_choice`.
    pub kind: String,
}

impl Interaction {
    pub fn new(id: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slide {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub text: String,
    /// Embedded media references (video/audio files).
    #[serde(default)]
    pub media: Vec<String>,
    #[serde(default)]
    pub interactions: Vec<Interaction>,
}

impl Slide {
    pub fn has_question(&self) -> bool {
        let text = self.text.to_lowercase();
        text.contains('?') || text.contains("question")
    }

    pub fn has_media(&self) -> bool {
        if !self.media.is_empty() {
            return true;
        }
        let text = self.text.to_lowercase();
        text.contains("video") || text.contains("audio")
    }

    pub fn has_interaction(&self) -> bool {
        !self.interactions.is_empty()
    }
}
