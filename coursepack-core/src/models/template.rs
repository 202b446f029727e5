use std::fmt;

use serde::{Deserialize, Serialize};

/// Rendering template a package is presented with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateId {
    Mcq,
    Flipcards,
    Dragdrop,
    Crossword,
    Survey,
    Timeline,
    Contentreveal,
    Labeldiagram,
    Pickmany,
    Interactivevideo,
    Gamearena,
    /// Generic player for packages no specific template fits.
    Scormviewer,
}

impl TemplateId {
    pub const ALL: [TemplateId; 12] = [
        Self::Mcq,
        Self::Flipcards,
        Self::Dragdrop,
        Self::Crossword,
        Self::Survey,
        Self::Timeline,
        Self::Contentreveal,
        Self::Labeldiagram,
        Self::Pickmany,
        Self::Interactivevideo,
        Self::Gamearena,
        Self::Scormviewer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mcq => "mcq",
            Self::Flipcards => "flipcards",
            Self::Dragdrop => "dragdrop",
            Self::Crossword => "crossword",
            Self::Survey => "survey",
            Self::Timeline => "timeline",
            Self::Contentreveal => "contentreveal",
            Self::Labeldiagram => "labeldiagram",
            Self::Pickmany => "pickmany",
            Self::Interactivevideo => "interactivevideo",
            Self::Gamearena => "gamearena",
            Self::Scormviewer => "scormviewer",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == s)
    }

    /// Default configuration the renderer starts from for this template.
    pub fn default_configuration(&self) -> Configuration {
        let (completion_threshold, mastery_score, allow_retakes, show_feedback) = match self {
            Self::Mcq => (100, Some(70), true, true),
            Self::Flipcards => (100, None, true, false),
            Self::Dragdrop => (100, Some(70), true, true),
            Self::Crossword => (100, Some(80), true, true),
            Self::Survey => (100, None, false, false),
            Self::Timeline => (80, None, true, false),
            Self::Contentreveal => (80, None, true, false),
            Self::Labeldiagram => (100, Some(70), true, true),
            Self::Pickmany => (100, Some(70), true, true),
            Self::Interactivevideo => (90, Some(70), true, true),
            Self::Gamearena => (100, Some(60), true, true),
            Self::Scormviewer => (100, Some(80), true, true),
        };
        Configuration {
            version: Configuration::VERSION.to_string(),
            completion_threshold,
            mastery_score,
            allow_retakes,
            show_feedback,
        }
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A template together with how strongly the observed signals support it (0-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateRecommendation {
    pub template: TemplateId,
    pub confidence: u8,
}

impl TemplateRecommendation {
    pub fn new(template: TemplateId, confidence: u8) -> Self {
        Self {
            template,
            confidence: confidence.min(100),
        }
    }
}

/// Per-package settings handed to the renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    pub version: String,
    pub completion_threshold: u8,
    /// `None` for templates that are not scored.
    pub mastery_score: Option<u8>,
    pub allow_retakes: bool,
    pub show_feedback: bool,
}

impl Configuration {
    pub const VERSION: &'static str = "1.0";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_round_trip() {
        for template in TemplateId::ALL {
            assert_eq!(TemplateId::from_str(template.as_str()), Some(template));
        }
        assert_eq!(TemplateId::from_str("essay"), None);
    }

    #[test]
    fn serde_uses_lowercase_ids() {
        let json = serde_json::to_string(&TemplateId::Interactivevideo).unwrap();
        assert_eq!(json, "\"interactivevideo\"");
    }

    #[test]
    fn survey_is_unscored() {
        let config = TemplateId::Survey.default_configuration();
        assert_eq!(config.mastery_score, None);
        assert!(!config.show_feedback);
        assert!(!config.allow_retakes);
    }

    #[test]
    fn mcq_defaults() {
        let config = TemplateId::Mcq.default_configuration();
        assert_eq!(config.completion_threshold, 100);
        assert_eq!(config.mastery_score, Some(70));
        assert!(config.allow_retakes && config.show_feedback);
    }
}
