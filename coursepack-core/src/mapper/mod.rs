//! Template selection from descriptors and authoring-tool interaction models.
//!
//! Both procedures are fixed-priority: the first rule that fires wins, and count
//! ties between interaction buckets go to the bucket declared first.

mod buckets;

pub use buckets::InteractionBucket;

use crate::models::{Descriptor, InteractionModel, TemplateId, TemplateRecommendation};

/// Recommendation when a descriptor offers no keyword signal.
pub const DESCRIPTOR_DEFAULT: TemplateRecommendation = TemplateRecommendation {
    template: TemplateId::Contentreveal,
    confidence: 60,
};

/// Recommendation when neither interactions nor slides offer a signal.
pub const INTERACTION_DEFAULT: TemplateRecommendation = TemplateRecommendation {
    template: TemplateId::Contentreveal,
    confidence: 65,
};

struct KeywordRule {
    keywords: &'static [&'static str],
    template: TemplateId,
    confidence: u8,
}

const HREF_RULES: &[KeywordRule] = &[
    KeywordRule {
        keywords: &["quiz", "assessment", "exam", "test"],
        template: TemplateId::Mcq,
        confidence: 90,
    },
    KeywordRule {
        keywords: &["video", "movie", ".mp4", ".webm", ".mov", ".m4v", ".avi", ".ogv"],
        template: TemplateId::Interactivevideo,
        confidence: 85,
    },
    KeywordRule {
        keywords: &["slide", "presentation", ".ppt", ".key", ".odp"],
        template: TemplateId::Contentreveal,
        confidence: 80,
    },
    KeywordRule {
        keywords: &["flashcard", "card"],
        template: TemplateId::Flipcards,
        confidence: 85,
    },
];

const TITLE_RULES: &[KeywordRule] = &[
    KeywordRule {
        keywords: &["quiz", "assessment", "exam", "test"],
        template: TemplateId::Mcq,
        confidence: 85,
    },
    KeywordRule {
        keywords: &["video", "movie"],
        template: TemplateId::Interactivevideo,
        confidence: 80,
    },
    KeywordRule {
        keywords: &["flashcard", "cards"],
        template: TemplateId::Flipcards,
        confidence: 80,
    },
    KeywordRule {
        keywords: &["slide", "presentation"],
        template: TemplateId::Contentreveal,
        confidence: 75,
    },
    KeywordRule {
        keywords: &["survey", "poll", "questionnaire"],
        template: TemplateId::Survey,
        confidence: 75,
    },
    KeywordRule {
        keywords: &["timeline", "chronology"],
        template: TemplateId::Timeline,
        confidence: 75,
    },
    KeywordRule {
        keywords: &["crossword"],
        template: TemplateId::Crossword,
        confidence: 75,
    },
    KeywordRule {
        keywords: &["drag", "drop", "sorting", "matching"],
        template: TemplateId::Dragdrop,
        confidence: 70,
    },
    KeywordRule {
        keywords: &["label", "diagram"],
        template: TemplateId::Labeldiagram,
        confidence: 70,
    },
    KeywordRule {
        keywords: &["game", "activity"],
        template: TemplateId::Gamearena,
        confidence: 75,
    },
];

fn first_match(rules: &[KeywordRule], texts: &[String]) -> Option<TemplateRecommendation> {
    rules
        .iter()
        .find(|rule| {
            texts
                .iter()
                .any(|text| rule.keywords.iter().any(|k| text.contains(k)))
        })
        .map(|rule| TemplateRecommendation::new(rule.template, rule.confidence))
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateMapper;

impl TemplateMapper {
    /// The keyword-driven part of descriptor mapping: resource hrefs first, then
    /// organization and item titles. `None` when nothing matched.
    pub fn descriptor_signal(&self, descriptor: &Descriptor) -> Option<TemplateRecommendation> {
        let hrefs: Vec<String> = descriptor
            .resources
            .iter()
            .filter_map(|r| r.href.as_deref())
            .map(str::to_lowercase)
            .collect();
        if let Some(found) = first_match(HREF_RULES, &hrefs) {
            tracing::debug!(template = %found.template, "Matched resource href keywords");
            return Some(found);
        }

        let titles: Vec<String> = descriptor
            .organizations
            .iter()
            .map(|o| o.title.to_lowercase())
            .chain(descriptor.items().into_iter().map(|i| i.title.to_lowercase()))
            .collect();
        let found = first_match(TITLE_RULES, &titles)?;
        tracing::debug!(template = %found.template, "Matched organization title keywords");
        Some(found)
    }

    pub fn map_descriptor_to_template(&self, descriptor: &Descriptor) -> TemplateRecommendation {
        self.descriptor_signal(descriptor)
            .unwrap_or(DESCRIPTOR_DEFAULT)
    }

    /// Count interactions per bucket and take the largest; fall back to slide
    /// content when no interaction could be classified.
    pub fn map_interactions_to_template(&self, model: &InteractionModel) -> TemplateRecommendation {
        let mut counts = [0usize; InteractionBucket::ORDER.len()];
        for interaction in model.all_interactions() {
            if let Some(bucket) = InteractionBucket::classify(&interaction.kind) {
                counts[bucket.index()] += 1;
            }
        }

        let total: usize = counts.iter().sum();
        let mut best: Option<(InteractionBucket, usize)> = None;
        for bucket in InteractionBucket::ORDER {
            let count = counts[bucket.index()];
            // Strictly greater: ties stay with the earlier bucket.
            if count > best.map_or(0, |(_, c)| c) {
                best = Some((bucket, count));
            }
        }

        match best {
            Some((bucket, count)) => {
                let confidence = (50 + 50 * count / total).min(95) as u8;
                tracing::debug!(?bucket, count, total, "Interaction bucket selected");
                TemplateRecommendation::new(bucket.template(), confidence)
            }
            None => self.map_slides(model),
        }
    }

    fn map_slides(&self, model: &InteractionModel) -> TemplateRecommendation {
        let slides = &model.slides;
        let majority = |n: usize| n * 2 > slides.len();

        let questions = slides.iter().filter(|s| s.has_question()).count();
        let media = slides.iter().filter(|s| s.has_media()).count();
        let interactive = slides.iter().filter(|s| s.has_interaction()).count();
        tracing::debug!(slides = slides.len(), questions, media, interactive, "Slide analysis");

        if slides.is_empty() {
            INTERACTION_DEFAULT
        } else if majority(questions) {
            TemplateRecommendation::new(TemplateId::Mcq, 75)
        } else if majority(media) {
            TemplateRecommendation::new(TemplateId::Interactivevideo, 70)
        } else if majority(interactive) {
            TemplateRecommendation::new(TemplateId::Gamearena, 70)
        } else {
            INTERACTION_DEFAULT
        }
    }
}
