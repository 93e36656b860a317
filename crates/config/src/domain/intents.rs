//! Intent pattern buckets
//!
//! The classifier walks the buckets in listed order and returns the first
//! bucket with any matching pattern, so bucket order is the priority order.

use crate::ConfigError;
use sales_assist_core::Intent;
use serde::{Deserialize, Serialize};

/// Ordered intent pattern configuration, loadable from intents.yaml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntentPatternsConfig {
    /// Buckets in priority order
    pub buckets: Vec<IntentBucket>,
    /// Single-keyword heuristics tried when no bucket matches
    #[serde(default)]
    pub fallbacks: Vec<FallbackRule>,
    /// Intent returned when nothing matches at all
    #[serde(default)]
    pub default_intent: Intent,
}

/// One pattern bucket mapping to an intent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntentBucket {
    pub intent: Intent,
    /// Lower-case substrings matched against the lower-cased utterance
    pub patterns: Vec<String>,
}

/// Single-keyword fallback heuristic
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FallbackRule {
    pub keyword: String,
    pub intent: Intent,
}

impl IntentPatternsConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.buckets.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "intents.buckets".to_string(),
                message: "at least one bucket is required".to_string(),
            });
        }
        for bucket in &self.buckets {
            if bucket.patterns.is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: format!("intents.buckets.{}", bucket.intent),
                    message: "bucket has no patterns".to_string(),
                });
            }
        }
        Ok(())
    }
}

impl Default for IntentPatternsConfig {
    fn default() -> Self {
        let bucket = |intent: Intent, patterns: &[&str]| IntentBucket {
            intent,
            patterns: patterns.iter().map(|p| p.to_string()).collect(),
        };

        Self {
            // Priority order: self-service, case-creation, policy-lookup,
            // guidance, precedent-search, escalation.
            buckets: vec![
                bucket(
                    Intent::SelfService,
                    &[
                        "solution builder",
                        "where do i find",
                        "where can i find",
                        "rate card",
                        "price list",
                        "configure the quote",
                        "configure a quote",
                        "build the quote",
                        "cpq",
                    ],
                ),
                bucket(
                    Intent::CaseCreation,
                    &[
                        "create a case",
                        "open a case",
                        "raise a case",
                        "need a case",
                        "need approval",
                        "request approval",
                        "submit a request",
                        "exception request",
                        "need an exception",
                    ],
                ),
                bucket(
                    Intent::PolicyLookup,
                    &[
                        "what is the policy",
                        "what's the policy",
                        "policy on",
                        "maximum discount",
                        "max discount",
                        "discount limit",
                        "am i allowed",
                        "what discount can",
                        "minimum commitment",
                        "payment terms policy",
                        "within policy",
                    ],
                ),
                bucket(
                    Intent::GuidanceRequest,
                    &[
                        "how should i",
                        "what is the best way",
                        "what's the best way",
                        "best approach",
                        "guidance on",
                        "any advice",
                        "recommend",
                        "how do i handle",
                    ],
                ),
                bucket(
                    Intent::PrecedentSearch,
                    &[
                        "similar case",
                        "similar deal",
                        "has anyone",
                        "previous deal",
                        "past cases",
                        "precedent",
                        "example of",
                        "show me examples",
                    ],
                ),
                bucket(
                    Intent::EscalationNeeded,
                    &[
                        "talk to a human",
                        "speak to someone",
                        "need someone now",
                        "this is blocking",
                        "escalate immediately",
                        "urgent help",
                    ],
                ),
            ],
            fallbacks: vec![
                FallbackRule {
                    keyword: "policy".to_string(),
                    intent: Intent::PolicyLookup,
                },
                FallbackRule {
                    keyword: "case".to_string(),
                    intent: Intent::CaseCreation,
                },
                FallbackRule {
                    keyword: "example".to_string(),
                    intent: Intent::PrecedentSearch,
                },
                FallbackRule {
                    keyword: "how".to_string(),
                    intent: Intent::GuidanceRequest,
                },
            ],
            default_intent: Intent::PolicyLookup,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bucket_order_is_priority_order() {
        let config = IntentPatternsConfig::default();
        let order: Vec<Intent> = config.buckets.iter().map(|b| b.intent).collect();
        assert_eq!(
            order,
            vec![
                Intent::SelfService,
                Intent::CaseCreation,
                Intent::PolicyLookup,
                Intent::GuidanceRequest,
                Intent::PrecedentSearch,
                Intent::EscalationNeeded,
            ]
        );
    }

    #[test]
    fn test_yaml_round_trip() {
        let yaml = r#"
buckets:
  - intent: policy_lookup
    patterns: ["max discount"]
fallbacks:
  - keyword: policy
    intent: policy_lookup
default_intent: policy_lookup
"#;
        let config: IntentPatternsConfig = serde_yaml::from_str(yaml).unwrap();
        config.validate().unwrap();
        assert_eq!(config.buckets.len(), 1);
        assert_eq!(config.buckets[0].intent, Intent::PolicyLookup);
    }

    #[test]
    fn test_empty_bucket_rejected() {
        let mut config = IntentPatternsConfig::default();
        config.buckets[0].patterns.clear();
        assert!(config.validate().is_err());
    }
}
