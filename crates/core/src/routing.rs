//! Routing decision types

use serde::{Deserialize, Serialize};

/// Complexity tier derived from the router's score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplexityTier {
    Simple,
    Moderate,
    Complex,
    VeryComplex,
}

impl ComplexityTier {
    /// Tier thresholds: simple <3, moderate <5, complex <8, very_complex >=8
    pub fn from_score(score: f64) -> Self {
        if score < 3.0 {
            ComplexityTier::Simple
        } else if score < 5.0 {
            ComplexityTier::Moderate
        } else if score < 8.0 {
            ComplexityTier::Complex
        } else {
            ComplexityTier::VeryComplex
        }
    }
}

impl std::fmt::Display for ComplexityTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ComplexityTier::Simple => write!(f, "simple"),
            ComplexityTier::Moderate => write!(f, "moderate"),
            ComplexityTier::Complex => write!(f, "complex"),
            ComplexityTier::VeryComplex => write!(f, "very_complex"),
        }
    }
}

/// Urgency computed independently of complexity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UrgencyLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl std::fmt::Display for UrgencyLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UrgencyLevel::Low => write!(f, "low"),
            UrgencyLevel::Medium => write!(f, "medium"),
            UrgencyLevel::High => write!(f, "high"),
            UrgencyLevel::Critical => write!(f, "critical"),
        }
    }
}

/// Computed approver/team/timeline for a case
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingDecision {
    pub primary_approver: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary_approver: Option<String>,
    pub team: String,
    #[serde(default)]
    pub supporting_teams: Vec<String>,
    /// Approval authority level, 1 (manager) through 6 (CEO)
    pub approval_level: u8,
    pub expected_timeline: String,
    pub urgency: UrgencyLevel,
    /// Ordered approver titles the case climbs through
    pub escalation_path: Vec<String>,
    pub complexity: ComplexityTier,
    pub complexity_score: f64,
    pub auto_approvable: bool,
}

impl RoutingDecision {
    /// Routing for a case below the auto-approval thresholds
    pub fn auto_approved(complexity_score: f64, urgency: UrgencyLevel) -> Self {
        Self {
            primary_approver: "Auto-approved".to_string(),
            secondary_approver: None,
            team: "Deal Desk".to_string(),
            supporting_teams: Vec::new(),
            approval_level: 1,
            expected_timeline: "Immediate".to_string(),
            urgency,
            escalation_path: Vec::new(),
            complexity: ComplexityTier::from_score(complexity_score),
            complexity_score,
            auto_approvable: true,
        }
    }
}
