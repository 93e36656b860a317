//! Policy tables: discount limits, minimum commitments, approval matrix,
//! pilot durations
//!
//! Invariant per discount entry: `auto_approved_limit <= typical_discount
//! <= max_discount`; the effective maximum is `max_discount +
//! regional_adjustment`. `validate()` enforces this for every entry.

use crate::ConfigError;
use serde::{Deserialize, Serialize};

/// All policy tables, loadable from policy.yaml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyConfig {
    pub discount_policies: Vec<DiscountPolicyEntry>,
    pub minimum_requirements: Vec<MinimumRequirementEntry>,
    pub approval_matrix: ApprovalMatrix,
    pub pilot_policies: Vec<PilotPolicyEntry>,
}

/// Discount limits keyed by (deal_type, segment, region)
///
/// `region: "any"` is the wildcard row; region-specific rows override it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscountPolicyEntry {
    pub deal_type: String,
    pub segment: String,
    #[serde(default = "any_region")]
    pub region: String,
    pub max_discount: f64,
    pub typical_discount: f64,
    pub auto_approved_limit: f64,
    #[serde(default)]
    pub regional_adjustment: f64,
}

fn any_region() -> String {
    "any".to_string()
}

impl DiscountPolicyEntry {
    pub fn effective_max(&self) -> f64 {
        self.max_discount + self.regional_adjustment
    }
}

/// Minimum commitments keyed by (deal_type, segment)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MinimumRequirementEntry {
    pub deal_type: String,
    pub segment: String,
    pub min_seats: u32,
    pub min_term_months: u32,
    pub min_value: f64,
}

/// Approval brackets over two independent axes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApprovalMatrix {
    /// Brackets by discount percentage, ascending by `up_to`
    pub discount_brackets: Vec<ApprovalBracket>,
    /// Brackets by deal value, ascending by `up_to`
    pub deal_size_brackets: Vec<ApprovalBracket>,
}

/// One bracket: values up to (and including) `up_to` route to `approver`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApprovalBracket {
    /// Upper bound; `None` means unbounded (the last bracket)
    #[serde(default)]
    pub up_to: Option<f64>,
    pub approver: String,
    /// Authority level 1-6
    pub level: u8,
    pub timeline: String,
}

/// Pilot program rules keyed by pilot type
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PilotPolicyEntry {
    pub pilot_type: String,
    pub max_duration_days: u32,
    pub extension_days: u32,
    /// Discount applied when the pilot converts
    #[serde(default)]
    pub conversion_discount: f64,
}

impl PolicyConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for entry in &self.discount_policies {
            let ordered = entry.auto_approved_limit <= entry.typical_discount
                && entry.typical_discount <= entry.max_discount;
            if !ordered {
                return Err(ConfigError::InvalidValue {
                    field: format!(
                        "policy.discount_policies[{}/{}/{}]",
                        entry.deal_type, entry.segment, entry.region
                    ),
                    message: "expected auto_approved_limit <= typical_discount <= max_discount"
                        .to_string(),
                });
            }
        }
        validate_brackets("discount_brackets", &self.approval_matrix.discount_brackets)?;
        validate_brackets("deal_size_brackets", &self.approval_matrix.deal_size_brackets)?;
        Ok(())
    }
}

fn validate_brackets(field: &str, brackets: &[ApprovalBracket]) -> Result<(), ConfigError> {
    if brackets.is_empty() {
        return Err(ConfigError::InvalidValue {
            field: format!("policy.approval_matrix.{}", field),
            message: "at least one bracket is required".to_string(),
        });
    }
    let mut prev = f64::NEG_INFINITY;
    for bracket in brackets {
        match bracket.up_to {
            Some(bound) => {
                if bound <= prev {
                    return Err(ConfigError::InvalidValue {
                        field: format!("policy.approval_matrix.{}", field),
                        message: "brackets must be ascending".to_string(),
                    });
                }
                prev = bound;
            },
            // Unbounded bracket must be last
            None => prev = f64::INFINITY,
        }
    }
    Ok(())
}

impl Default for PolicyConfig {
    fn default() -> Self {
        let discount = |deal_type: &str,
                        segment: &str,
                        region: &str,
                        max: f64,
                        typical: f64,
                        auto: f64,
                        adjustment: f64| DiscountPolicyEntry {
            deal_type: deal_type.to_string(),
            segment: segment.to_string(),
            region: region.to_string(),
            max_discount: max,
            typical_discount: typical,
            auto_approved_limit: auto,
            regional_adjustment: adjustment,
        };

        let minimum = |deal_type: &str, segment: &str, seats: u32, term: u32, value: f64| {
            MinimumRequirementEntry {
                deal_type: deal_type.to_string(),
                segment: segment.to_string(),
                min_seats: seats,
                min_term_months: term,
                min_value: value,
            }
        };

        let bracket = |up_to: Option<f64>, approver: &str, level: u8, timeline: &str| {
            ApprovalBracket {
                up_to,
                approver: approver.to_string(),
                level,
                timeline: timeline.to_string(),
            }
        };

        Self {
            discount_policies: vec![
                discount("new_business", "enterprise", "any", 30.0, 20.0, 10.0, 0.0),
                discount("new_business", "enterprise", "emea", 30.0, 20.0, 10.0, 5.0),
                discount("new_business", "enterprise", "latam", 30.0, 20.0, 10.0, 5.0),
                discount("new_business", "mid_market", "any", 25.0, 15.0, 8.0, 0.0),
                discount("new_business", "smb", "any", 20.0, 10.0, 5.0, 0.0),
                discount("renewal", "enterprise", "any", 15.0, 8.0, 5.0, 0.0),
                discount("renewal", "mid_market", "any", 12.0, 6.0, 4.0, 0.0),
                discount("renewal", "smb", "any", 10.0, 5.0, 3.0, 0.0),
                discount("expansion", "enterprise", "any", 25.0, 15.0, 8.0, 0.0),
                discount("expansion", "mid_market", "any", 20.0, 12.0, 6.0, 0.0),
                discount("expansion", "smb", "any", 15.0, 8.0, 4.0, 0.0),
            ],
            minimum_requirements: vec![
                minimum("new_business", "enterprise", 100, 12, 50_000.0),
                minimum("new_business", "mid_market", 25, 12, 10_000.0),
                minimum("new_business", "smb", 5, 6, 1_500.0),
                minimum("expansion", "enterprise", 25, 12, 15_000.0),
                minimum("expansion", "mid_market", 10, 6, 5_000.0),
                minimum("expansion", "smb", 3, 6, 500.0),
            ],
            approval_matrix: ApprovalMatrix {
                discount_brackets: vec![
                    bracket(Some(10.0), "Sales Manager", 2, "1-2 business days"),
                    bracket(Some(20.0), "Sales Director", 3, "2-3 business days"),
                    bracket(Some(30.0), "VP of Sales", 4, "3-5 business days"),
                    bracket(None, "CRO", 5, "1-2 weeks"),
                ],
                deal_size_brackets: vec![
                    bracket(Some(100_000.0), "Sales Manager", 2, "1-2 business days"),
                    bracket(Some(500_000.0), "Sales Director", 3, "2-3 business days"),
                    bracket(Some(1_000_000.0), "Finance Director", 4, "3-5 business days"),
                    bracket(None, "CFO", 5, "1-2 weeks"),
                ],
            },
            pilot_policies: vec![
                PilotPolicyEntry {
                    pilot_type: "standard".to_string(),
                    max_duration_days: 30,
                    extension_days: 30,
                    conversion_discount: 5.0,
                },
                PilotPolicyEntry {
                    pilot_type: "enterprise".to_string(),
                    max_duration_days: 60,
                    extension_days: 30,
                    conversion_discount: 8.0,
                },
                PilotPolicyEntry {
                    pilot_type: "poc".to_string(),
                    max_duration_days: 14,
                    extension_days: 7,
                    conversion_discount: 0.0,
                },
            ],
        }
    }
}
