use serde::{Deserialize, Serialize};

use super::PackageFamily;

/// Outcome of running the rule table against a file listing.
///
/// `confidence` is the average over the matched rules only, so a family with one
/// strong rule matched scores the same as a family with every rule matched at that
/// strength.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionResult {
    pub family: PackageFamily,
    pub confidence: f64,
    pub matched_rule_count: usize,
    pub total_rule_count: usize,
}
