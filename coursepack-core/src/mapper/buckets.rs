use crate::models::TemplateId;

/// Interaction categories, in tie-break order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionBucket {
    Quiz,
    Flashcard,
    DragDrop,
    Survey,
    Timeline,
    ContentReveal,
    LabelDiagram,
    PickMany,
}

impl InteractionBucket {
    pub const ORDER: [InteractionBucket; 8] = [
        Self::Quiz,
        Self::Flashcard,
        Self::DragDrop,
        Self::Survey,
        Self::Timeline,
        Self::ContentReveal,
        Self::LabelDiagram,
        Self::PickMany,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    fn keywords(self) -> &'static [&'static str] {
        match self {
            Self::Quiz => &[
                "quiz",
                "question",
                "choice",
                "mcq",
                "true_false",
                "truefalse",
                "fill_in",
            ],
            Self::Flashcard => &["flashcard", "flip", "card"],
            Self::DragDrop => &["drag", "drop", "matching", "sorting"],
            Self::Survey => &["survey", "poll", "likert"],
            Self::Timeline => &["timeline", "sequence", "chronolog"],
            Self::ContentReveal => &["reveal", "hotspot", "accordion", "tabs"],
            Self::LabelDiagram => &["label", "diagram"],
            Self::PickMany => &[
                "pick",
                "multi_select",
                "multiselect",
                "multiple_response",
                "checkbox",
            ],
        }
    }

    pub fn template(self) -> TemplateId {
        match self {
            Self::Quiz => TemplateId::Mcq,
            Self::Flashcard => TemplateId::Flipcards,
            Self::DragDrop => TemplateId::Dragdrop,
            Self::Survey => TemplateId::Survey,
            Self::Timeline => TemplateId::Timeline,
            Self::ContentReveal => TemplateId::Contentreveal,
            Self::LabelDiagram => TemplateId::Labeldiagram,
            Self::PickMany => TemplateId::Pickmany,
        }
    }

    /// First bucket in [`Self::ORDER`] with a keyword contained in `kind`.
    pub fn classify(kind: &str) -> Option<Self> {
        let kind = kind.to_lowercase();
        Self::ORDER
            .into_iter()
            .find(|bucket| bucket.keywords().iter().any(|k| kind.contains(k)))
    }
}
