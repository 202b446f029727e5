use coursepack_core::mapper::{TemplateMapper, DESCRIPTOR_DEFAULT, INTERACTION_DEFAULT};
use coursepack_core::models::*;
use speculate2::speculate;

fn descriptor(hrefs: &[&str], titles: &[&str]) -> Descriptor {
    Descriptor {
        id: "d".to_string(),
        version: "1".to_string(),
        metadata: Some(Default::default()),
        default_organization: None,
        organizations: titles
            .iter()
            .enumerate()
            .map(|(i, t)| OrganizationNode {
                id: format!("org-{}", i),
                title: t.to_string(),
                structure_kind: "hierarchical".to_string(),
                items: vec![],
            })
            .collect(),
        resources: hrefs
            .iter()
            .enumerate()
            .map(|(i, h)| Resource::web_content(format!("r{}", i), *h))
            .collect(),
        valid: true,
        error: None,
    }
}

fn interactions(kinds: &[&str]) -> InteractionModel {
    InteractionModel {
        interactions: kinds
            .iter()
            .enumerate()
            .map(|(i, k)| Interaction::new(i.to_string(), *k))
            .collect(),
        slides: vec![],
    }
}

fn slide(text: &str) -> Slide {
    Slide {
        title: String::new(),
        text: text.to_string(),
        media: vec![],
        interactions: vec![],
    }
}

speculate! {
    before {
        let mapper = TemplateMapper;
    }

    describe "map_descriptor_to_template" {
        it "maps an assessment href to mcq at 90" {
            let rec = mapper.map_descriptor_to_template(&descriptor(&["assessment/final_exam.html"], &[]));
            assert_eq!(rec, TemplateRecommendation::new(TemplateId::Mcq, 90));
        }

        it "lets hrefs outrank organization titles" {
            let rec = mapper.map_descriptor_to_template(&descriptor(
                &["quiz/index.html"],
                &["Flashcards for Biology", "Memory Game"],
            ));
            assert_eq!(rec, TemplateRecommendation::new(TemplateId::Mcq, 90));
        }

        it "recognizes video extensions" {
            let rec = mapper.map_descriptor_to_template(&descriptor(&["media/intro.MP4"], &[]));
            assert_eq!(rec, TemplateRecommendation::new(TemplateId::Interactivevideo, 85));
        }

        it "recognizes slide decks" {
            let rec = mapper.map_descriptor_to_template(&descriptor(&["decks/week1.pptx"], &[]));
            assert_eq!(rec, TemplateRecommendation::new(TemplateId::Contentreveal, 80));
        }

        it "recognizes flashcard hrefs" {
            let rec = mapper.map_descriptor_to_template(&descriptor(&["cards/deck.html"], &[]));
            assert_eq!(rec, TemplateRecommendation::new(TemplateId::Flipcards, 85));
        }

        it "checks href categories in priority order across resources" {
            let rec = mapper.map_descriptor_to_template(&descriptor(
                &["media/lecture_video.html", "practice/test.html"],
                &[],
            ));
            assert_eq!(rec.template, TemplateId::Mcq);
        }

        it "falls back to organization titles" {
            let rec = mapper.map_descriptor_to_template(&descriptor(&["index.html"], &["Unit Quiz"]));
            assert_eq!(rec, TemplateRecommendation::new(TemplateId::Mcq, 85));

            let rec = mapper.map_descriptor_to_template(&descriptor(&[], &["Vocabulary Cards"]));
            assert_eq!(rec, TemplateRecommendation::new(TemplateId::Flipcards, 80));

            let rec = mapper.map_descriptor_to_template(&descriptor(&[], &["Warm-up Activity"]));
            assert_eq!(rec, TemplateRecommendation::new(TemplateId::Gamearena, 75));

            let rec = mapper.map_descriptor_to_template(&descriptor(&[], &["History Timeline"]));
            assert_eq!(rec, TemplateRecommendation::new(TemplateId::Timeline, 75));
        }

        it "scans item titles too" {
            let mut d = descriptor(&["index.html"], &["Course"]);
            d.organizations[0].items.push(OrganizationItem {
                id: "i".to_string(),
                resource_ref: None,
                title: "Customer Survey".to_string(),
                visible: true,
                prerequisites: None,
                mastery_score: None,
                objectives: vec![],
                children: vec![],
            });
            let rec = mapper.map_descriptor_to_template(&d);
            assert_eq!(rec, TemplateRecommendation::new(TemplateId::Survey, 75));
        }

        it "defaults to contentreveal at 60" {
            let rec = mapper.map_descriptor_to_template(&descriptor(&["index.html"], &["Welcome"]));
            assert_eq!(rec, DESCRIPTOR_DEFAULT);
            assert_eq!(rec, TemplateRecommendation::new(TemplateId::Contentreveal, 60));
        }

        it "maps invalid descriptors to the default" {
            let rec = mapper.map_descriptor_to_template(&Descriptor::invalid("broken"));
            assert_eq!(rec, DESCRIPTOR_DEFAULT);
            assert!(mapper.descriptor_signal(&Descriptor::invalid("broken")).is_none());
        }
    }

    describe "map_interactions_to_template" {
        it "gives quiz the tie against flashcards" {
            let model = interactions(&[
                "multiple_choice", "true_false", "fill_in_blank",
                "flashcard", "flip_card", "card_deck",
            ]);
            let rec = mapper.map_interactions_to_template(&model);
            assert_eq!(rec.template, TemplateId::Mcq);
            assert_eq!(rec.confidence, 75);
        }

        it "takes the largest bucket" {
            let model = interactions(&["quiz", "drag_and_drop", "drag_sort", "matching"]);
            let rec = mapper.map_interactions_to_template(&model);
            assert_eq!(rec, TemplateRecommendation::new(TemplateId::Dragdrop, 87));
        }

        it "breaks later ties by declared order too" {
            let model = interactions(&["label_image", "multi_select", "timeline", "likert"]);
            assert_eq!(mapper.map_interactions_to_template(&model).template, TemplateId::Survey);
        }

        it "counts interactions declared on slides" {
            let mut s = slide("Match the terms");
            s.interactions = vec![Interaction::new("a", "hotspot"), Interaction::new("b", "accordion")];
            let model = InteractionModel { interactions: vec![], slides: vec![s] };
            assert_eq!(mapper.map_interactions_to_template(&model).template, TemplateId::Contentreveal);
        }

        describe "slide fallback" {
            it "recommends mcq when most slides ask questions" {
                let model = InteractionModel {
                    interactions: vec![],
                    slides: vec![slide("What is a noun?"), slide("Question 2: verbs"), slide("Recap")],
                };
                assert_eq!(mapper.map_interactions_to_template(&model), TemplateRecommendation::new(TemplateId::Mcq, 75));
            }

            it "recommends interactive video when most slides carry media" {
                let mut with_media = slide("Watch this");
                with_media.media = vec!["intro.mp4".to_string()];
                let model = InteractionModel {
                    interactions: vec![],
                    slides: vec![with_media, slide("An audio walkthrough"), slide("Notes")],
                };
                assert_eq!(
                    mapper.map_interactions_to_template(&model),
                    TemplateRecommendation::new(TemplateId::Interactivevideo, 70)
                );
            }

            it "defaults to contentreveal at 65" {
                let model = InteractionModel {
                    interactions: vec![],
                    slides: vec![slide("Intro"), slide("Body"), slide("Is this it?")],
                };
                assert_eq!(mapper.map_interactions_to_template(&model), INTERACTION_DEFAULT);
                assert_eq!(INTERACTION_DEFAULT, TemplateRecommendation::new(TemplateId::Contentreveal, 65));
            }
        }
    }
}
