//! Scenario matching
//!
//! Keyword-overlap match against the canned catalog. Each scenario gets a
//! score equal to the number of its keywords appearing in the utterance;
//! the highest score wins, ties break to catalog order. A single keyword
//! hit is enough to match.

use sales_assist_config::{ScenarioDefinition, ScenariosConfig};
use std::sync::Arc;

/// A catalog hit with its overlap score
#[derive(Debug, Clone)]
pub struct ScenarioMatch {
    pub scenario: ScenarioDefinition,
    /// Number of scenario keywords found in the utterance
    pub score: usize,
    /// The keywords that hit, in catalog order
    pub matched_keywords: Vec<String>,
}

/// Keyword-overlap matcher over the scenario catalog
pub struct ScenarioMatcher {
    catalog: Arc<ScenariosConfig>,
}

impl ScenarioMatcher {
    pub fn new(catalog: Arc<ScenariosConfig>) -> Self {
        Self { catalog }
    }

    /// Match an utterance against the catalog
    ///
    /// Returns `None` when no scenario has a single keyword hit; the
    /// caller falls through to intent-level handling.
    pub fn best_match(&self, text: &str) -> Option<ScenarioMatch> {
        let lower = text.to_lowercase();
        let mut best: Option<ScenarioMatch> = None;

        for scenario in &self.catalog.scenarios {
            let matched_keywords: Vec<String> = scenario
                .keywords
                .iter()
                .filter(|k| lower.contains(k.as_str()))
                .cloned()
                .collect();
            let score = matched_keywords.len();
            if score == 0 {
                continue;
            }
            // Strict > keeps the earlier catalog entry on ties.
            if best.as_ref().map_or(true, |b| score > b.score) {
                best = Some(ScenarioMatch {
                    scenario: scenario.clone(),
                    score,
                    matched_keywords,
                });
            }
        }

        if let Some(ref hit) = best {
            tracing::debug!(
                scenario = %hit.scenario.id,
                score = hit.score,
                "Scenario matched"
            );
        }
        best
    }
}

impl Default for ScenarioMatcher {
    fn default() -> Self {
        Self::new(Arc::new(ScenariosConfig::default()))
    }
}
