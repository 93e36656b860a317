//! Compliance result types
//!
//! The checker aggregates findings from nine independent rule checks. The
//! numeric score is the minimum across check scores; findings union
//! additively. See the checker for the aggregation rule itself.

use serde::{Deserialize, Serialize};

/// Severity of a finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Low => write!(f, "low"),
            Severity::Medium => write!(f, "medium"),
            Severity::High => write!(f, "high"),
        }
    }
}

/// Overall compliance verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplianceLevel {
    Compliant,
    Conditional,
    NonCompliant,
}

impl std::fmt::Display for ComplianceLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ComplianceLevel::Compliant => write!(f, "compliant"),
            ComplianceLevel::Conditional => write!(f, "conditional"),
            ComplianceLevel::NonCompliant => write!(f, "non_compliant"),
        }
    }
}

/// Risk tier derived for the router
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

/// A single violation, warning, or recommendation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    /// Name of the check that produced this finding
    pub check: String,
    pub message: String,
    pub severity: Severity,
}

impl Finding {
    pub fn new(check: impl Into<String>, message: impl Into<String>, severity: Severity) -> Self {
        Self {
            check: check.into(),
            message: message.into(),
            severity,
        }
    }
}

/// Aggregated result of the compliance battery
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplianceResult {
    pub overall: ComplianceLevel,
    /// 0-100; the minimum across all check scores
    pub score: u8,
    pub violations: Vec<Finding>,
    pub warnings: Vec<Finding>,
    pub recommendations: Vec<Finding>,
}

impl ComplianceResult {
    /// Derive the verdict from collected findings
    pub fn from_findings(
        score: u8,
        violations: Vec<Finding>,
        warnings: Vec<Finding>,
        recommendations: Vec<Finding>,
    ) -> Self {
        let overall = if violations.iter().any(|v| v.severity == Severity::High) {
            ComplianceLevel::NonCompliant
        } else if !violations.is_empty() || !warnings.is_empty() {
            ComplianceLevel::Conditional
        } else {
            ComplianceLevel::Compliant
        };
        Self {
            overall,
            score: score.min(100),
            violations,
            warnings,
            recommendations,
        }
    }

    /// Risk tier consumed by the router
    pub fn risk_level(&self) -> RiskLevel {
        match self.overall {
            ComplianceLevel::NonCompliant => RiskLevel::High,
            ComplianceLevel::Conditional => {
                if self.score < 70 {
                    RiskLevel::High
                } else {
                    RiskLevel::Medium
                }
            },
            ComplianceLevel::Compliant => RiskLevel::Low,
        }
    }

    pub fn is_compliant(&self) -> bool {
        self.overall == ComplianceLevel::Compliant
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_high_violation_is_non_compliant() {
        let result = ComplianceResult::from_findings(
            40,
            vec![Finding::new("discount", "over max", Severity::High)],
            vec![],
            vec![],
        );
        assert_eq!(result.overall, ComplianceLevel::NonCompliant);
        assert_eq!(result.risk_level(), RiskLevel::High);
    }

    #[test]
    fn test_warning_only_is_conditional() {
        let result = ComplianceResult::from_findings(
            85,
            vec![],
            vec![Finding::new("payment_terms", "net-45", Severity::Low)],
            vec![],
        );
        assert_eq!(result.overall, ComplianceLevel::Conditional);
        assert_eq!(result.risk_level(), RiskLevel::Medium);
    }

    #[test]
    fn test_clean_result_is_compliant() {
        let result = ComplianceResult::from_findings(100, vec![], vec![], vec![]);
        assert_eq!(result.overall, ComplianceLevel::Compliant);
        assert_eq!(result.risk_level(), RiskLevel::Low);
        assert!(result.is_compliant());
    }

    #[test]
    fn test_score_capped_at_100() {
        let result = ComplianceResult::from_findings(120, vec![], vec![], vec![]);
        assert_eq!(result.score, 100);
    }
}
