//! Policy knowledge store
//!
//! Pure table reads over [`PolicyConfig`]. A miss is a tagged
//! [`Lookup::Missing`] carrying a human-readable message, never an error:
//! the responder surfaces the message as-is.

use sales_assist_config::{
    DiscountPolicyEntry, MinimumRequirementEntry, PilotPolicyEntry, PolicyConfig,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Result of a table lookup
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Lookup<T> {
    Found(T),
    Missing { message: String },
}

impl<T> Lookup<T> {
    pub fn missing(message: impl Into<String>) -> Self {
        Lookup::Missing {
            message: message.into(),
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Lookup::Found(_))
    }

    pub fn found(&self) -> Option<&T> {
        match self {
            Lookup::Found(value) => Some(value),
            Lookup::Missing { .. } => None,
        }
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Lookup::Found(value) => Some(value),
            Lookup::Missing { .. } => None,
        }
    }
}

/// One resolved approval-matrix axis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AxisApproval {
    pub approver: String,
    pub level: u8,
    pub timeline: String,
}

/// Approval requirement resolved over both matrix axes
///
/// The discount and deal-size brackets resolve independently; when the
/// approvers differ the case needs both signatures.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApprovalRequirement {
    pub by_discount: AxisApproval,
    pub by_deal_size: AxisApproval,
    pub dual_sign_off: bool,
}

impl ApprovalRequirement {
    /// The higher-authority axis; ties go to the discount axis
    pub fn highest(&self) -> &AxisApproval {
        if self.by_deal_size.level > self.by_discount.level {
            &self.by_deal_size
        } else {
            &self.by_discount
        }
    }
}

/// Verdict of an is-within-policy query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyVerdict {
    pub within_policy: bool,
    /// `max_discount + regional_adjustment`
    pub effective_max: f64,
    pub typical_discount: f64,
    pub auto_approved_limit: f64,
}

/// Read-only view over the policy tables
#[derive(Clone)]
pub struct PolicyStore {
    config: Arc<PolicyConfig>,
}

impl PolicyStore {
    pub fn new(config: Arc<PolicyConfig>) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PolicyConfig {
        &self.config
    }

    /// Discount limits for (deal_type, segment, region)
    ///
    /// A region-specific row wins over the `"any"` wildcard row.
    pub fn discount_policy(
        &self,
        deal_type: &str,
        segment: &str,
        region: &str,
    ) -> Lookup<DiscountPolicyEntry> {
        let deal_type = deal_type.to_lowercase();
        let segment = segment.to_lowercase();
        let region = region.to_lowercase();

        let mut entry = self
            .config
            .discount_policies
            .iter()
            .find(|e| e.deal_type == deal_type && e.segment == segment && e.region == region);
        if entry.is_none() {
            entry = self
                .config
                .discount_policies
                .iter()
                .find(|e| e.deal_type == deal_type && e.segment == segment && e.region == "any");
        }

        match entry {
            Some(entry) => Lookup::Found(entry.clone()),
            None => Lookup::missing(format!(
                "No discount policy found for {} / {} deals",
                deal_type, segment
            )),
        }
    }

    /// Minimum commitments for (deal_type, segment)
    pub fn minimum_requirements(
        &self,
        deal_type: &str,
        segment: &str,
    ) -> Lookup<MinimumRequirementEntry> {
        let deal_type = deal_type.to_lowercase();
        let segment = segment.to_lowercase();
        match self
            .config
            .minimum_requirements
            .iter()
            .find(|e| e.deal_type == deal_type && e.segment == segment)
        {
            Some(entry) => Lookup::Found(entry.clone()),
            None => Lookup::missing(format!(
                "No minimum requirements defined for {} / {} deals",
                deal_type, segment
            )),
        }
    }

    /// Approval requirement for a discount/value pair, both axes resolved
    pub fn approval_requirement(
        &self,
        discount_percent: f64,
        deal_value: f64,
    ) -> Lookup<ApprovalRequirement> {
        let by_discount = resolve_axis(
            &self.config.approval_matrix.discount_brackets,
            discount_percent,
        );
        let by_deal_size =
            resolve_axis(&self.config.approval_matrix.deal_size_brackets, deal_value);

        match (by_discount, by_deal_size) {
            (Some(by_discount), Some(by_deal_size)) => {
                let dual_sign_off = by_discount.approver != by_deal_size.approver;
                Lookup::Found(ApprovalRequirement {
                    by_discount,
                    by_deal_size,
                    dual_sign_off,
                })
            },
            _ => Lookup::missing(format!(
                "No approval bracket covers {}% discount at ${:.0}",
                discount_percent, deal_value
            )),
        }
    }

    /// Pilot rules by pilot type
    pub fn pilot_policy(&self, pilot_type: &str) -> Lookup<PilotPolicyEntry> {
        let pilot_type = pilot_type.to_lowercase();
        match self
            .config
            .pilot_policies
            .iter()
            .find(|e| e.pilot_type == pilot_type)
        {
            Some(entry) => Lookup::Found(entry.clone()),
            None => Lookup::missing(format!("No pilot policy for type '{}'", pilot_type)),
        }
    }

    /// Whether a requested discount fits the (deal_type, segment, region)
    /// policy, with the relevant limits attached
    pub fn is_within_policy(
        &self,
        discount_percent: f64,
        deal_type: &str,
        segment: &str,
        region: &str,
    ) -> Lookup<PolicyVerdict> {
        match self.discount_policy(deal_type, segment, region) {
            Lookup::Found(entry) => {
                let effective_max = entry.effective_max();
                Lookup::Found(PolicyVerdict {
                    within_policy: discount_percent <= effective_max,
                    effective_max,
                    typical_discount: entry.typical_discount,
                    auto_approved_limit: entry.auto_approved_limit,
                })
            },
            Lookup::Missing { message } => Lookup::Missing { message },
        }
    }
}

impl Default for PolicyStore {
    fn default() -> Self {
        Self::new(Arc::new(PolicyConfig::default()))
    }
}

/// First bracket whose bound covers the value; the unbounded bracket
/// catches everything else
fn resolve_axis(
    brackets: &[sales_assist_config::ApprovalBracket],
    value: f64,
) -> Option<AxisApproval> {
    brackets
        .iter()
        .find(|b| b.up_to.map_or(true, |bound| value <= bound))
        .map(|b| AxisApproval {
            approver: b.approver.clone(),
            level: b.level,
            timeline: b.timeline.clone(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> PolicyStore {
        PolicyStore::default()
    }

    #[test]
    fn test_region_specific_row_wins() {
        let entry = store()
            .discount_policy("new_business", "enterprise", "emea")
            .into_option()
            .unwrap();
        assert_eq!(entry.regional_adjustment, 5.0);
        assert_eq!(entry.effective_max(), 35.0);
    }

    #[test]
    fn test_wildcard_region_fallback() {
        let entry = store()
            .discount_policy("new_business", "enterprise", "apac")
            .into_option()
            .unwrap();
        assert_eq!(entry.region, "any");
        assert_eq!(entry.regional_adjustment, 0.0);
    }

    #[test]
    fn test_miss_is_tagged_not_error() {
        let lookup = store().discount_policy("sponsorship", "enterprise", "any");
        match lookup {
            Lookup::Missing { message } => assert!(message.contains("sponsorship")),
            Lookup::Found(_) => panic!("expected a miss"),
        }
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        assert!(store()
            .discount_policy("New_Business", "ENTERPRISE", "EMEA")
            .is_found());
    }

    #[test]
    fn test_approval_highest_prefers_higher_authority() {
        // 25% discount is VP of Sales (level 4); $50k is Sales Manager
        // (level 2). The pair differs, so dual sign-off, VP wins.
        let requirement = store()
            .approval_requirement(25.0, 50_000.0)
            .into_option()
            .unwrap();
        assert!(requirement.dual_sign_off);
        assert_eq!(requirement.highest().approver, "VP of Sales");
        assert_eq!(requirement.highest().level, 4);
    }

    #[test]
    fn test_approval_same_approver_no_dual_sign_off() {
        // 5% at $50k both land on Sales Manager.
        let requirement = store()
            .approval_requirement(5.0, 50_000.0)
            .into_option()
            .unwrap();
        assert!(!requirement.dual_sign_off);
        assert_eq!(requirement.highest().approver, "Sales Manager");
    }

    #[test]
    fn test_unbounded_bracket_catches_extremes() {
        let requirement = store()
            .approval_requirement(45.0, 2_000_000.0)
            .into_option()
            .unwrap();
        assert_eq!(requirement.by_discount.approver, "CRO");
        assert_eq!(requirement.by_deal_size.approver, "CFO");
        assert_eq!(requirement.highest().level, 5);
    }

    #[test]
    fn test_within_policy_boundary_is_inclusive() {
        // EMEA effective max is 35; exactly 35 is still within policy.
        let verdict = store()
            .is_within_policy(35.0, "new_business", "enterprise", "emea")
            .into_option()
            .unwrap();
        assert!(verdict.within_policy);

        let verdict = store()
            .is_within_policy(35.1, "new_business", "enterprise", "emea")
            .into_option()
            .unwrap();
        assert!(!verdict.within_policy);
    }

    #[test]
    fn test_pilot_policy_lookup() {
        let policy = store().pilot_policy("enterprise").into_option().unwrap();
        assert_eq!(policy.max_duration_days, 60);
        assert!(!store().pilot_policy("forever").is_found());
    }
}
