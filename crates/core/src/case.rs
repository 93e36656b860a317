//! Case drafts and submission receipts
//!
//! A [`CaseDraft`] is the mutable record assembled while composing an
//! escalation. It is created on the first escalation trigger, filled in
//! field by field, and frozen into a [`SubmittedCase`] on submission.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Case categories recognized by the router and checker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[derive(Default)]
pub enum CaseCategory {
    #[default]
    Pricing,
    Legal,
    Technical,
    Competitive,
    Billing,
    General,
}

impl CaseCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            CaseCategory::Pricing => "pricing",
            CaseCategory::Legal => "legal",
            CaseCategory::Technical => "technical",
            CaseCategory::Competitive => "competitive",
            CaseCategory::Billing => "billing",
            CaseCategory::General => "general",
        }
    }

}

impl std::fmt::Display for CaseCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Requested priority for a case
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[derive(Default)]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
            Priority::Critical => "critical",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The in-progress escalation record
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CaseDraft {
    pub title: String,
    pub category: CaseCategory,
    pub priority: Priority,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub business_justification: String,
    /// Deal value in currency units; 0 when unknown
    #[serde(default)]
    pub deal_value: f64,
    /// Requested discount percentage; 0 when none
    #[serde(default)]
    pub discount_requested: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeframe: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub competitor_info: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deal_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub segment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    /// Requested payment terms in days (e.g. net-60)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_terms_days: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pilot_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seats: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub term_months: Option<u32>,
    /// Category-specific fields the scenario template asked for
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub extra_fields: HashMap<String, String>,
}

impl CaseDraft {
    pub fn new(title: impl Into<String>, category: CaseCategory) -> Self {
        Self {
            title: title.into(),
            category,
            ..Default::default()
        }
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_deal_value(mut self, value: f64) -> Self {
        self.deal_value = value;
        self
    }

    pub fn with_discount(mut self, percent: f64) -> Self {
        self.discount_requested = percent;
        self
    }

    pub fn with_competitor(mut self, competitor: impl Into<String>) -> Self {
        self.competitor_info = Some(competitor.into());
        self
    }

    /// Whether a competitor is mentioned anywhere on the draft
    pub fn has_competitor(&self) -> bool {
        self.competitor_info
            .as_deref()
            .map(|c| !c.trim().is_empty())
            .unwrap_or(false)
    }

    /// Best-effort multi-year detection from term, timeframe, and description
    pub fn is_multi_year(&self) -> bool {
        if self.term_months.map(|m| m > 12).unwrap_or(false) {
            return true;
        }
        let haystack = format!(
            "{} {} {}",
            self.timeframe.as_deref().unwrap_or(""),
            self.description,
            self.title
        )
        .to_lowercase();
        const MARKERS: &[&str] = &[
            "multi-year",
            "multi year",
            "multiyear",
            "2 year",
            "3 year",
            "5 year",
            "two year",
            "three year",
            "24 months",
            "36 months",
            "60 months",
        ];
        MARKERS.iter().any(|m| haystack.contains(m))
    }

    /// Short human description used for "that deal" reference resolution
    pub fn summary(&self) -> String {
        let mut parts = vec![format!("{} case", self.category)];
        if self.deal_value > 0.0 {
            parts.push(format!("worth ${:.0}", self.deal_value));
        }
        if self.discount_requested > 0.0 {
            parts.push(format!("at {}% discount", self.discount_requested));
        }
        parts.join(" ")
    }
}

/// Status of a submitted case
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CaseStatus {
    Submitted,
}

/// Receipt returned by the (synthetic) submission boundary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmittedCase {
    pub case_id: String,
    pub status: CaseStatus,
    pub submitted_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multi_year_detection() {
        let mut draft = CaseDraft::new("Renewal", CaseCategory::Pricing);
        assert!(!draft.is_multi_year());

        draft.term_months = Some(36);
        assert!(draft.is_multi_year());

        let mut draft = CaseDraft::new("Expansion", CaseCategory::Pricing);
        draft.timeframe = Some("3 year commitment".to_string());
        assert!(draft.is_multi_year());
    }

    #[test]
    fn test_competitor_presence() {
        let draft = CaseDraft::new("t", CaseCategory::Competitive).with_competitor("Acme");
        assert!(draft.has_competitor());

        let mut draft = CaseDraft::new("t", CaseCategory::Competitive);
        draft.competitor_info = Some("   ".to_string());
        assert!(!draft.has_competitor());
    }

    #[test]
    fn test_summary_mentions_value_and_discount() {
        let draft = CaseDraft::new("Discount", CaseCategory::Pricing)
            .with_deal_value(120_000.0)
            .with_discount(18.0);
        let summary = draft.summary();
        assert!(summary.contains("pricing case"));
        assert!(summary.contains("$120000"));
        assert!(summary.contains("18%"));
    }
}
