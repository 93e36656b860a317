//! Routing weights: complexity scoring and urgency signals
//!
//! The bucket thresholds and multipliers the router applies. Kept as data
//! so tests can swap them; the defaults are the observed production
//! numbers.

use crate::ConfigError;
use sales_assist_core::{CaseCategory, Priority};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One additive scoring bucket: values strictly above `over` score `points`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreBucket {
    pub over: f64,
    pub points: f64,
}

/// All router tunables, loadable from routing.yaml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingWeights {
    /// Deal-value buckets, descending by `over`; first match wins
    pub value_buckets: Vec<ScoreBucket>,
    /// Discount-percent buckets, descending by `over`; first match wins
    pub discount_buckets: Vec<ScoreBucket>,
    /// Base complexity weight per case category
    pub category_weights: HashMap<CaseCategory, f64>,
    /// Priority multipliers applied to the summed score
    pub priority_multipliers: HashMap<Priority, f64>,
    /// Added once when a competitor is mentioned
    pub competitor_bonus: f64,
    /// Added once for multi-year terms
    pub multi_year_bonus: f64,
    /// Auto-approval bounds: score and discount must both be at or below
    pub auto_approve_max_score: f64,
    pub auto_approve_max_discount: f64,
    /// Urgency signal weights
    pub urgency: UrgencyWeights,
}

/// Weights for the independent urgency computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UrgencyWeights {
    pub priority_critical: u32,
    pub priority_high: u32,
    /// Deals above this value add `large_deal_points`
    pub large_deal_threshold: f64,
    pub large_deal_points: u32,
    pub competitor_points: u32,
    pub timeframe_points: u32,
    pub renewal_risk_points: u32,
    /// Phrases that mark an explicit short timeframe
    pub timeframe_keywords: Vec<String>,
    /// Phrases that mark renewal risk
    pub renewal_risk_keywords: Vec<String>,
    /// Score thresholds: critical, high, medium (descending)
    pub critical_threshold: u32,
    pub high_threshold: u32,
    pub medium_threshold: u32,
}

impl RoutingWeights {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.priority_multipliers.len() < 4 {
            return Err(ConfigError::InvalidValue {
                field: "routing.priority_multipliers".to_string(),
                message: "all four priorities need a multiplier".to_string(),
            });
        }
        if self.urgency.critical_threshold <= self.urgency.high_threshold
            || self.urgency.high_threshold <= self.urgency.medium_threshold
        {
            return Err(ConfigError::InvalidValue {
                field: "routing.urgency".to_string(),
                message: "urgency thresholds must be strictly descending".to_string(),
            });
        }
        Ok(())
    }

    pub fn category_weight(&self, category: CaseCategory) -> f64 {
        self.category_weights.get(&category).copied().unwrap_or(1.0)
    }

    pub fn priority_multiplier(&self, priority: Priority) -> f64 {
        self.priority_multipliers
            .get(&priority)
            .copied()
            .unwrap_or(1.0)
    }

    /// Points for the first bucket the value exceeds
    pub fn bucket_points(buckets: &[ScoreBucket], value: f64) -> f64 {
        buckets
            .iter()
            .find(|b| value > b.over)
            .map(|b| b.points)
            .unwrap_or(0.0)
    }
}

impl Default for RoutingWeights {
    fn default() -> Self {
        Self {
            value_buckets: vec![
                ScoreBucket { over: 500_000.0, points: 3.0 },
                ScoreBucket { over: 100_000.0, points: 2.0 },
                ScoreBucket { over: 25_000.0, points: 1.0 },
            ],
            discount_buckets: vec![
                ScoreBucket { over: 30.0, points: 3.0 },
                ScoreBucket { over: 20.0, points: 2.0 },
                ScoreBucket { over: 10.0, points: 1.0 },
            ],
            category_weights: HashMap::from([
                (CaseCategory::Pricing, 2.0),
                (CaseCategory::Legal, 3.0),
                (CaseCategory::Technical, 2.5),
                (CaseCategory::Competitive, 2.5),
                (CaseCategory::Billing, 1.5),
                (CaseCategory::General, 1.0),
            ]),
            priority_multipliers: HashMap::from([
                (Priority::Low, 1.0),
                (Priority::Medium, 1.2),
                (Priority::High, 1.5),
                (Priority::Critical, 2.0),
            ]),
            competitor_bonus: 2.0,
            multi_year_bonus: 1.0,
            auto_approve_max_score: 2.0,
            auto_approve_max_discount: 10.0,
            urgency: UrgencyWeights {
                priority_critical: 4,
                priority_high: 2,
                large_deal_threshold: 250_000.0,
                large_deal_points: 2,
                competitor_points: 2,
                timeframe_points: 2,
                renewal_risk_points: 1,
                timeframe_keywords: [
                    "today",
                    "tomorrow",
                    "asap",
                    "immediately",
                    "end of week",
                    "eow",
                    "this week",
                    "end of quarter",
                    "eoq",
                    "end of month",
                    "eom",
                ]
                .iter()
                .map(|s| s.to_string())
                .collect(),
                renewal_risk_keywords: ["churn", "cancel", "at risk", "non-renewal", "walk away"]
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
                critical_threshold: 7,
                high_threshold: 5,
                medium_threshold: 3,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        RoutingWeights::default().validate().unwrap();
    }

    #[test]
    fn test_bucket_points_first_match_wins() {
        let weights = RoutingWeights::default();
        assert_eq!(
            RoutingWeights::bucket_points(&weights.value_buckets, 600_000.0),
            3.0
        );
        assert_eq!(
            RoutingWeights::bucket_points(&weights.value_buckets, 150_000.0),
            2.0
        );
        assert_eq!(
            RoutingWeights::bucket_points(&weights.value_buckets, 30_000.0),
            1.0
        );
        assert_eq!(
            RoutingWeights::bucket_points(&weights.value_buckets, 20_000.0),
            0.0
        );
        // Bucket bounds are strict
        assert_eq!(
            RoutingWeights::bucket_points(&weights.value_buckets, 25_000.0),
            0.0
        );
    }

    #[test]
    fn test_inverted_urgency_thresholds_rejected() {
        let mut weights = RoutingWeights::default();
        weights.urgency.medium_threshold = 9;
        assert!(weights.validate().is_err());
    }
}
