use super::{DetectionRule, FamilyRules, RulePredicate};
use crate::models::PackageFamily;

fn named(name: &str) -> RulePredicate {
    RulePredicate::FileNamed(name.to_string())
}

fn ext(ext: &str) -> RulePredicate {
    RulePredicate::Extension(ext.to_string())
}

fn any_content(keywords: &[&str]) -> RulePredicate {
    RulePredicate::ContentContainsAny(keywords.iter().map(|k| k.to_string()).collect())
}

fn family(family: PackageFamily, rules: Vec<DetectionRule>) -> FamilyRules {
    FamilyRules { family, rules }
}

/// The built-in rule table. Order matters: on equal confidence the earlier family wins.
pub fn default_rules() -> Vec<FamilyRules> {
    vec![
        family(
            PackageFamily::Scorm,
            vec![
                DetectionRule::new("manifest at root", named("imsmanifest.xml"), 100),
                DetectionRule::new(
                    "scorm schema markers",
                    any_content(&["adlcp", "schemaversion"]),
                    90,
                ),
                DetectionRule::new(
                    "scorm runtime api",
                    any_content(&["LMSInitialize", "LMSFinish", "API_1484_11"]),
                    80,
                ),
            ],
        ),
        family(
            PackageFamily::Cmi5,
            vec![
                DetectionRule::new("cmi5 course structure file", named("cmi5.xml"), 100),
                DetectionRule::new(
                    "course structure markup",
                    RulePredicate::ContentContainsAll(vec!["courseStructure".into(), "<au".into()]),
                    85,
                ),
            ],
        ),
        family(
            PackageFamily::Xapi,
            vec![
                DetectionRule::new("tincan launch file", named("tincan.xml"), 100),
                DetectionRule::new("xapi markers", any_content(&["tincan", "xapi"]), 70),
            ],
        ),
        family(
            PackageFamily::Aicc,
            vec![
                DetectionRule::new("assignable unit file", ext("au"), 90),
                DetectionRule::new("course description file", ext("crs"), 90),
                DetectionRule::new(
                    "descriptor or structure file",
                    RulePredicate::AnyOf(vec![ext("des"), ext("cst")]),
                    80,
                ),
            ],
        ),
        family(
            PackageFamily::H5p,
            vec![
                DetectionRule::new("h5p metadata", named("h5p.json"), 100),
                DetectionRule::new(
                    "h5p content file",
                    RulePredicate::PathEndsWith("content/content.json".into()),
                    80,
                ),
            ],
        ),
        family(
            PackageFamily::Storyline,
            vec![
                DetectionRule::new("storyline launch page", named("story.html"), 95),
                DetectionRule::new(
                    "storyline content folder",
                    RulePredicate::PathContains("story_content".into()),
                    90,
                ),
            ],
        ),
        family(
            PackageFamily::Captivate,
            vec![
                DetectionRule::new("captivate player script", named("CPM.js"), 95),
                DetectionRule::new("captivate markers", any_content(&["captivate"]), 75),
            ],
        ),
        family(
            PackageFamily::Ispring,
            vec![
                DetectionRule::new(
                    "ispring folder",
                    RulePredicate::PathContains("ispring".into()),
                    85,
                ),
                DetectionRule::new("ispring markers", any_content(&["ispring"]), 80),
            ],
        ),
        family(
            PackageFamily::Presentation,
            vec![
                DetectionRule::new(
                    "office slide deck",
                    RulePredicate::AnyOf(vec![ext("pptx"), ext("ppt")]),
                    85,
                ),
                DetectionRule::new(
                    "other slide deck",
                    RulePredicate::AnyOf(vec![ext("key"), ext("odp")]),
                    75,
                ),
            ],
        ),
        family(
            PackageFamily::Web,
            vec![
                DetectionRule::new("index page", named("index.html"), 50),
                DetectionRule::new(
                    "html pages",
                    RulePredicate::AnyOf(vec![ext("html"), ext("htm")]),
                    40,
                ),
            ],
        ),
    ]
}
