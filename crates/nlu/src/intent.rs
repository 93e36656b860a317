//! Intent classification
//!
//! First-match over ordered pattern buckets. Walks the configured buckets
//! in order and returns the first intent whose bucket has any matching
//! substring; single-keyword fallbacks run only when no bucket matched.

use sales_assist_config::IntentPatternsConfig;
use sales_assist_core::Intent;

/// Ordered-bucket intent classifier
pub struct IntentClassifier {
    config: IntentPatternsConfig,
}

impl IntentClassifier {
    pub fn new(config: IntentPatternsConfig) -> Self {
        Self { config }
    }

    /// Classify an utterance
    ///
    /// Always produces an intent; an utterance matching nothing at all
    /// gets the configured default.
    pub fn classify(&self, text: &str) -> Intent {
        let lower = text.to_lowercase();

        for bucket in &self.config.buckets {
            if bucket.patterns.iter().any(|p| lower.contains(p.as_str())) {
                tracing::debug!(intent = %bucket.intent, "Intent matched by bucket");
                return bucket.intent;
            }
        }

        for rule in &self.config.fallbacks {
            if lower.contains(rule.keyword.as_str()) {
                tracing::debug!(intent = %rule.intent, keyword = %rule.keyword, "Intent matched by fallback keyword");
                return rule.intent;
            }
        }

        tracing::debug!(intent = %self.config.default_intent, "No intent pattern matched, using default");
        self.config.default_intent
    }
}

impl Default for IntentClassifier {
    fn default() -> Self {
        Self::new(IntentPatternsConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> IntentClassifier {
        IntentClassifier::default()
    }

    #[test]
    fn test_self_service_outranks_policy() {
        // Mentions both a self-service tool and a policy question; the
        // self-service bucket is listed first and wins.
        let intent =
            classifier().classify("Where do I find the rate card for the standard policy?");
        assert_eq!(intent, Intent::SelfService);
    }

    #[test]
    fn test_case_creation() {
        let intent = classifier().classify("I need approval for a 25% discount");
        assert_eq!(intent, Intent::CaseCreation);
    }

    #[test]
    fn test_policy_lookup() {
        let intent = classifier().classify("What's the max discount for enterprise deals?");
        assert_eq!(intent, Intent::PolicyLookup);
    }

    #[test]
    fn test_guidance_request() {
        let intent = classifier().classify("How should I position against their incumbent?");
        assert_eq!(intent, Intent::GuidanceRequest);
    }

    #[test]
    fn test_precedent_search() {
        let intent = classifier().classify("Has anyone closed a similar deal in EMEA?");
        assert_eq!(intent, Intent::PrecedentSearch);
    }

    #[test]
    fn test_escalation() {
        let intent = classifier().classify("I need to talk to a human, this is blocking the deal");
        assert_eq!(intent, Intent::EscalationNeeded);
    }

    #[test]
    fn test_fallback_keyword() {
        // No bucket pattern, but the bare word "policy" appears.
        let intent = classifier().classify("ugh, policy stuff again");
        assert_eq!(intent, Intent::PolicyLookup);
    }

    #[test]
    fn test_default_when_nothing_matches() {
        let intent = classifier().classify("hello there");
        assert_eq!(intent, Intent::PolicyLookup);
    }

    #[test]
    fn test_same_input_same_output() {
        let classifier = classifier();
        let text = "need approval for this renewal";
        assert_eq!(classifier.classify(text), classifier.classify(text));
    }
}
