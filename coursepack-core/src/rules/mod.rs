//! Weighted detection rules grouped by package family.

mod defaults;
mod predicate;

use std::cmp::Ordering;

pub use defaults::default_rules;
pub use predicate::*;

use crate::models::{DetectionResult, FileEntry, PackageFamily};

/// Evaluates an ordered family → rules table against file listings.
///
/// The table is plain owned data. Concurrent `detect` calls through `&self` are
/// safe; [`RuleEngine::merge`] needs `&mut self`, so sharing an engine that is
/// still being extended is up to the owner to synchronize.
#[derive(Debug, Clone)]
pub struct RuleEngine {
    table: Vec<FamilyRules>,
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::new(default_rules())
    }
}

impl RuleEngine {
    pub fn new(table: Vec<FamilyRules>) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &[FamilyRules] {
        &self.table
    }

    pub fn families(&self) -> impl Iterator<Item = &PackageFamily> {
        self.table.iter().map(|f| &f.family)
    }

    /// Add or replace family entries. A replaced family keeps its position in the
    /// table (and so its tie-break rank); new families go to the end.
    pub fn merge(&mut self, updates: impl IntoIterator<Item = FamilyRules>) {
        for update in updates {
            match self.table.iter_mut().find(|f| f.family == update.family) {
                Some(existing) => {
                    tracing::debug!(
                        family = %update.family,
                        rules = update.rules.len(),
                        "Replacing family rules"
                    );
                    existing.rules = update.rules;
                }
                None => {
                    tracing::debug!(
                        family = %update.family,
                        rules = update.rules.len(),
                        "Adding family rules"
                    );
                    self.table.push(update);
                }
            }
        }
    }

    /// Every family with at least one matching rule, best first.
    ///
    /// A family's confidence is the mean over its matched rules only. Equal scores
    /// keep table order.
    pub fn rank(&self, files: &[FileEntry]) -> Vec<DetectionResult> {
        let mut results: Vec<DetectionResult> = self
            .table
            .iter()
            .filter_map(|entry| {
                let matched: Vec<&DetectionRule> = entry
                    .rules
                    .iter()
                    .filter(|r| r.predicate.matches(files))
                    .collect();
                if matched.is_empty() {
                    return None;
                }
                let sum: f64 = matched.iter().map(|r| f64::from(r.confidence)).sum();
                tracing::debug!(
                    family = %entry.family,
                    matched = ?matched.iter().map(|r| r.name.as_str()).collect::<Vec<_>>(),
                    "Family rules matched"
                );
                Some(DetectionResult {
                    family: entry.family.clone(),
                    confidence: sum / matched.len() as f64,
                    matched_rule_count: matched.len(),
                    total_rule_count: entry.rules.len(),
                })
            })
            .collect();

        // sort_by is stable, which is what makes the tie-break deterministic.
        results.sort_by(|a, b| {
            b.confidence
                .partial_cmp(&a.confidence)
                .unwrap_or(Ordering::Equal)
        });
        results
    }

    /// The best family, or `None` when no rule matched at all.
    pub fn detect(&self, files: &[FileEntry]) -> Option<DetectionResult> {
        self.rank(files).into_iter().next()
    }
}
