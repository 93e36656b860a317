//! Compliance checker
//!
//! Nine independent checks over a case draft. Checks are order-insensitive
//! and side-effect-free; a check that cannot determine applicability
//! returns a neutral outcome rather than an error. A check that fails
//! outright is converted into a warning and the rest still run.
//!
//! The overall score is the minimum across check scores: the checker is
//! exactly as strict as its single worst rule.

use crate::store::{Lookup, PolicyStore};
use sales_assist_core::{CaseCategory, CaseDraft, ComplianceResult, Finding, Severity};
use thiserror::Error;

/// Failure of a single check; converted to a warning by the aggregator
#[derive(Error, Debug)]
pub enum CheckError {
    #[error("field {0} could not be interpreted: {1}")]
    BadField(&'static str, String),
}

/// What one check contributes to the aggregate
#[derive(Debug, Default)]
struct CheckOutcome {
    /// 0-100; 100 when the check has nothing to say
    score: Option<u8>,
    violations: Vec<Finding>,
    warnings: Vec<Finding>,
    recommendations: Vec<Finding>,
}

impl CheckOutcome {
    fn neutral() -> Self {
        Self::default()
    }

    fn scored(score: u8) -> Self {
        Self {
            score: Some(score),
            ..Self::default()
        }
    }

    fn violation(mut self, check: &str, message: impl Into<String>, severity: Severity) -> Self {
        self.violations.push(Finding::new(check, message, severity));
        self
    }

    fn warning(mut self, check: &str, message: impl Into<String>) -> Self {
        self.warnings
            .push(Finding::new(check, message, Severity::Low));
        self
    }

    fn recommendation(mut self, check: &str, message: impl Into<String>) -> Self {
        self.recommendations
            .push(Finding::new(check, message, Severity::Low));
        self
    }
}

/// The nine-check battery
#[derive(Clone)]
pub struct ComplianceChecker {
    store: PolicyStore,
}

impl ComplianceChecker {
    pub fn new(store: PolicyStore) -> Self {
        Self { store }
    }

    /// Run every check and aggregate
    pub fn check(&self, draft: &CaseDraft) -> ComplianceResult {
        let checks: [(&str, fn(&Self, &CaseDraft) -> Result<CheckOutcome, CheckError>); 9] = [
            ("discount", Self::check_discount),
            ("minimum_requirements", Self::check_minimum_requirements),
            ("approval_workflow", Self::check_approval_workflow),
            ("deal_structure", Self::check_deal_structure),
            ("competitive_policy", Self::check_competitive_policy),
            ("pilot_program", Self::check_pilot_program),
            ("payment_terms", Self::check_payment_terms),
            ("technical", Self::check_technical),
            ("legal", Self::check_legal),
        ];

        let mut score: u8 = 100;
        let mut violations = Vec::new();
        let mut warnings = Vec::new();
        let mut recommendations = Vec::new();

        for (name, check) in checks {
            match check(self, draft) {
                Ok(outcome) => {
                    if let Some(check_score) = outcome.score {
                        score = score.min(check_score);
                    }
                    violations.extend(outcome.violations);
                    warnings.extend(outcome.warnings);
                    recommendations.extend(outcome.recommendations);
                },
                Err(err) => {
                    tracing::warn!(check = name, error = %err, "Compliance check failed");
                    warnings.push(Finding::new(
                        name,
                        format!("Unable to complete check: {}", err),
                        Severity::Low,
                    ));
                },
            }
        }

        let result = ComplianceResult::from_findings(score, violations, warnings, recommendations);
        tracing::debug!(
            overall = %result.overall,
            score = result.score,
            violations = result.violations.len(),
            "Compliance battery complete"
        );
        result
    }

    /// Key the policy tables from the draft, defaulting the unknowns
    fn policy_key(draft: &CaseDraft) -> (&str, &str, &str) {
        (
            draft.deal_type.as_deref().unwrap_or("new_business"),
            draft.segment.as_deref().unwrap_or("enterprise"),
            draft.region.as_deref().unwrap_or("any"),
        )
    }

    fn check_discount(&self, draft: &CaseDraft) -> Result<CheckOutcome, CheckError> {
        if draft.discount_requested <= 0.0 {
            return Ok(CheckOutcome::neutral());
        }
        let (deal_type, segment, region) = Self::policy_key(draft);
        let entry = match self.store.discount_policy(deal_type, segment, region) {
            Lookup::Found(entry) => entry,
            Lookup::Missing { message } => {
                return Ok(CheckOutcome::scored(80).warning("discount", message));
            },
        };

        let discount = draft.discount_requested;
        let outcome = if discount <= entry.auto_approved_limit {
            CheckOutcome::neutral()
        } else if discount <= entry.typical_discount {
            CheckOutcome::scored(90).recommendation(
                "discount",
                format!(
                    "{}% is above the {}% auto-approved limit; expect manager sign-off",
                    discount, entry.auto_approved_limit
                ),
            )
        } else if discount <= entry.effective_max() {
            CheckOutcome::scored(70).violation(
                "discount",
                format!(
                    "{}% exceeds the typical {}% discount for {} / {} deals",
                    discount, entry.typical_discount, deal_type, segment
                ),
                Severity::Medium,
            )
        } else {
            CheckOutcome::scored(40).violation(
                "discount",
                format!(
                    "{}% exceeds the {}% maximum for {} / {} deals",
                    discount,
                    entry.effective_max(),
                    deal_type,
                    segment
                ),
                Severity::High,
            )
        };
        Ok(outcome)
    }

    fn check_minimum_requirements(&self, draft: &CaseDraft) -> Result<CheckOutcome, CheckError> {
        // Only applicable when the draft names the deal explicitly; no
        // defaults here, they would flag deals we know nothing about.
        let (Some(deal_type), Some(segment)) = (draft.deal_type.as_deref(), draft.segment.as_deref())
        else {
            return Ok(CheckOutcome::neutral());
        };
        let entry = match self.store.minimum_requirements(deal_type, segment) {
            Lookup::Found(entry) => entry,
            Lookup::Missing { .. } => return Ok(CheckOutcome::neutral()),
        };

        let mut outcome = CheckOutcome::neutral();
        let mut below = false;
        if let Some(seats) = draft.seats {
            if seats < entry.min_seats {
                below = true;
                outcome = outcome.violation(
                    "minimum_requirements",
                    format!("{} seats is below the {} minimum", seats, entry.min_seats),
                    Severity::Medium,
                );
            }
        }
        if let Some(term) = draft.term_months {
            if term < entry.min_term_months {
                below = true;
                outcome = outcome.violation(
                    "minimum_requirements",
                    format!(
                        "{}-month term is below the {}-month minimum",
                        term, entry.min_term_months
                    ),
                    Severity::Medium,
                );
            }
        }
        if draft.deal_value > 0.0 && draft.deal_value < entry.min_value {
            below = true;
            outcome = outcome.violation(
                "minimum_requirements",
                format!(
                    "${:.0} is below the ${:.0} minimum deal value",
                    draft.deal_value, entry.min_value
                ),
                Severity::Medium,
            );
        }
        if below {
            outcome.score = Some(60);
        }
        Ok(outcome)
    }

    fn check_approval_workflow(&self, draft: &CaseDraft) -> Result<CheckOutcome, CheckError> {
        if draft.discount_requested <= 0.0 && draft.deal_value <= 0.0 {
            return Ok(CheckOutcome::neutral());
        }
        let requirement = match self
            .store
            .approval_requirement(draft.discount_requested, draft.deal_value)
        {
            Lookup::Found(requirement) => requirement,
            Lookup::Missing { message } => {
                return Ok(CheckOutcome::scored(80).warning("approval_workflow", message));
            },
        };

        // Score tracks the required authority level only, so a growing
        // discount can never raise it.
        let level = requirement.highest().level;
        let mut outcome = match level {
            0..=2 => CheckOutcome::neutral(),
            3 => CheckOutcome::scored(95),
            4 => CheckOutcome::scored(90),
            _ => CheckOutcome::scored(85).warning(
                "approval_workflow",
                format!(
                    "Requires executive approval ({})",
                    requirement.highest().approver
                ),
            ),
        };
        if requirement.dual_sign_off {
            outcome = outcome.recommendation(
                "approval_workflow",
                format!(
                    "Dual sign-off: {} (discount) and {} (deal size)",
                    requirement.by_discount.approver, requirement.by_deal_size.approver
                ),
            );
        }
        Ok(outcome)
    }

    fn check_deal_structure(&self, draft: &CaseDraft) -> Result<CheckOutcome, CheckError> {
        let mut outcome = CheckOutcome::neutral();
        if draft.discount_requested > 0.0 && draft.deal_value <= 0.0 {
            outcome.score = Some(85);
            outcome = outcome.warning(
                "deal_structure",
                "Discount requested without a deal value; add the deal size",
            );
        } else if draft.deal_value > 0.0
            && draft.deal_value < 5_000.0
            && draft.discount_requested > 15.0
        {
            outcome.score = Some(80);
            outcome = outcome.warning(
                "deal_structure",
                "Heavy discount on a very small deal; confirm the commercial rationale",
            );
        }
        if draft.is_multi_year() && draft.term_months.is_none() {
            outcome = outcome.recommendation(
                "deal_structure",
                "Multi-year deal mentioned; capture the exact term length",
            );
        }
        Ok(outcome)
    }

    fn check_competitive_policy(&self, draft: &CaseDraft) -> Result<CheckOutcome, CheckError> {
        let competitive = draft.category == CaseCategory::Competitive || draft.has_competitor();
        if !competitive {
            return Ok(CheckOutcome::neutral());
        }
        let mut outcome = CheckOutcome::neutral();
        if draft.category == CaseCategory::Competitive && !draft.has_competitor() {
            outcome.score = Some(85);
            outcome = outcome.warning(
                "competitive_policy",
                "Competitive case without the competitor named",
            );
        } else if draft.business_justification.trim().is_empty() {
            outcome.score = Some(80);
            outcome = outcome.warning(
                "competitive_policy",
                "Competitive deals need the competitor's offer documented in the justification",
            );
        }
        Ok(outcome)
    }

    fn check_pilot_program(&self, draft: &CaseDraft) -> Result<CheckOutcome, CheckError> {
        let pilot_type = match (&draft.pilot_type, draft.deal_type.as_deref()) {
            (Some(pilot_type), _) => pilot_type.clone(),
            (None, Some("pilot")) => "standard".to_string(),
            _ => return Ok(CheckOutcome::neutral()),
        };
        let policy = match self.store.pilot_policy(&pilot_type) {
            Lookup::Found(policy) => policy,
            Lookup::Missing { message } => {
                return Ok(CheckOutcome::scored(80).warning("pilot_program", message));
            },
        };

        let Some(raw) = draft.extra_fields.get("pilot_duration_days") else {
            return Ok(CheckOutcome::neutral().recommendation(
                "pilot_program",
                format!(
                    "Specify the pilot duration (standard maximum {} days)",
                    policy.max_duration_days
                ),
            ));
        };
        let requested: u32 = raw
            .trim()
            .parse()
            .map_err(|_| CheckError::BadField("pilot_duration_days", raw.clone()))?;

        let outcome = if requested <= policy.max_duration_days {
            CheckOutcome::neutral()
        } else if requested <= policy.max_duration_days + policy.extension_days {
            CheckOutcome::scored(80).warning(
                "pilot_program",
                format!(
                    "{} days uses the extension window; attach the conversion plan",
                    requested
                ),
            )
        } else {
            CheckOutcome::scored(60).violation(
                "pilot_program",
                format!(
                    "{} days exceeds the {}-day maximum plus the {}-day extension",
                    requested, policy.max_duration_days, policy.extension_days
                ),
                Severity::Medium,
            )
        };
        Ok(outcome)
    }

    fn check_payment_terms(&self, draft: &CaseDraft) -> Result<CheckOutcome, CheckError> {
        let Some(days) = draft.payment_terms_days else {
            return Ok(CheckOutcome::neutral());
        };
        let outcome = if days <= 30 {
            CheckOutcome::neutral()
        } else if days <= 45 {
            CheckOutcome::scored(85)
                .warning("payment_terms", format!("Net-{} needs a note on the case", days))
        } else if days <= 60 {
            CheckOutcome::scored(70).violation(
                "payment_terms",
                format!("Net-{} requires finance approval", days),
                Severity::Medium,
            )
        } else {
            CheckOutcome::scored(40).violation(
                "payment_terms",
                format!("Net-{} is outside the approvable range", days),
                Severity::High,
            )
        };
        Ok(outcome)
    }

    fn check_technical(&self, draft: &CaseDraft) -> Result<CheckOutcome, CheckError> {
        if draft.category != CaseCategory::Technical {
            return Ok(CheckOutcome::neutral());
        }
        let mut outcome = if draft.description.trim().is_empty() {
            CheckOutcome::scored(80).warning(
                "technical",
                "Technical case without the requirement described",
            )
        } else {
            CheckOutcome::neutral()
        };
        if draft.deal_value > 250_000.0 {
            outcome = outcome.recommendation(
                "technical",
                "Large technical deal; request a solution architect review",
            );
        }
        Ok(outcome)
    }

    fn check_legal(&self, draft: &CaseDraft) -> Result<CheckOutcome, CheckError> {
        const LEGAL_MARKERS: &[&str] = &[
            "custom terms",
            "liability",
            "indemn",
            "msa",
            "dpa",
            "contract change",
            "redline",
        ];
        if draft.category == CaseCategory::Legal {
            return Ok(CheckOutcome::scored(75).violation(
                "legal",
                "Non-standard terms require legal review before sign-off",
                Severity::Medium,
            ));
        }
        let haystack = format!("{} {}", draft.title, draft.description).to_lowercase();
        if LEGAL_MARKERS.iter().any(|m| haystack.contains(m)) {
            return Ok(CheckOutcome::neutral().recommendation(
                "legal",
                "Contract language mentioned; consider a legal review",
            ));
        }
        Ok(CheckOutcome::neutral())
    }
}

impl Default for ComplianceChecker {
    fn default() -> Self {
        Self::new(PolicyStore::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sales_assist_core::ComplianceLevel;

    fn checker() -> ComplianceChecker {
        ComplianceChecker::default()
    }

    fn draft(discount: f64, value: f64) -> CaseDraft {
        CaseDraft::new("Discount request", CaseCategory::Pricing)
            .with_discount(discount)
            .with_deal_value(value)
    }

    #[test]
    fn test_small_clean_case_is_compliant() {
        let result = checker().check(&draft(5.0, 20_000.0));
        assert_eq!(result.overall, ComplianceLevel::Compliant);
        assert_eq!(result.score, 100);
        assert!(result.violations.is_empty());
    }

    #[test]
    fn test_discount_above_typical_is_conditional() {
        let result = checker().check(&draft(25.0, 50_000.0));
        assert_eq!(result.overall, ComplianceLevel::Conditional);
        assert!(result
            .violations
            .iter()
            .any(|v| v.check == "discount" && v.severity == Severity::Medium));
    }

    #[test]
    fn test_discount_above_max_is_non_compliant() {
        let result = checker().check(&draft(35.0, 600_000.0));
        assert_eq!(result.overall, ComplianceLevel::NonCompliant);
        assert!(result
            .violations
            .iter()
            .any(|v| v.check == "discount" && v.severity == Severity::High));
    }

    #[test]
    fn test_idempotent_on_unchanged_draft() {
        let case = draft(22.0, 180_000.0);
        let first = checker().check(&case);
        let second = checker().check(&case);
        assert_eq!(first.score, second.score);
        assert_eq!(first.violations, second.violations);
        assert_eq!(first.warnings, second.warnings);
    }

    #[test]
    fn test_score_monotone_in_discount() {
        let checker = checker();
        let mut last_score = u8::MAX;
        for discount in [5.0, 12.0, 18.0, 25.0, 32.0, 45.0] {
            let result = checker.check(&draft(discount, 100_000.0));
            assert!(
                result.score <= last_score,
                "score rose from {} to {} at {}%",
                last_score,
                result.score,
                discount
            );
            last_score = result.score;
        }
    }

    #[test]
    fn test_failed_check_degrades_to_warning() {
        let mut case = draft(0.0, 0.0);
        case.pilot_type = Some("standard".to_string());
        case.extra_fields
            .insert("pilot_duration_days".to_string(), "six weeks".to_string());

        let result = checker().check(&case);
        assert!(result
            .warnings
            .iter()
            .any(|w| w.message.contains("Unable to complete check")));
        // The rest of the battery still ran and the case is otherwise fine.
        assert_eq!(result.overall, ComplianceLevel::Conditional);
    }

    #[test]
    fn test_pilot_duration_bands() {
        let checker = checker();
        let mut case = draft(0.0, 0.0);
        case.pilot_type = Some("standard".to_string());

        case.extra_fields
            .insert("pilot_duration_days".to_string(), "45".to_string());
        let result = checker.check(&case);
        assert!(result.warnings.iter().any(|w| w.check == "pilot_program"));

        case.extra_fields
            .insert("pilot_duration_days".to_string(), "90".to_string());
        let result = checker.check(&case);
        assert!(result.violations.iter().any(|v| v.check == "pilot_program"));
    }

    #[test]
    fn test_payment_terms_bands() {
        let checker = checker();
        let mut case = draft(0.0, 0.0);

        case.payment_terms_days = Some(30);
        assert!(checker.check(&case).is_compliant());

        case.payment_terms_days = Some(45);
        let result = checker.check(&case);
        assert_eq!(result.overall, ComplianceLevel::Conditional);

        case.payment_terms_days = Some(90);
        let result = checker.check(&case);
        assert_eq!(result.overall, ComplianceLevel::NonCompliant);
    }

    #[test]
    fn test_minimums_only_apply_to_named_deals() {
        // Value below the enterprise minimum, but deal type/segment are
        // unknown, so the check stays neutral.
        let result = checker().check(&draft(0.0, 2_000.0));
        assert!(result
            .violations
            .iter()
            .all(|v| v.check != "minimum_requirements"));

        let mut case = draft(0.0, 2_000.0);
        case.deal_type = Some("new_business".to_string());
        case.segment = Some("enterprise".to_string());
        let result = checker().check(&case);
        assert!(result
            .violations
            .iter()
            .any(|v| v.check == "minimum_requirements"));
    }

    #[test]
    fn test_inapplicable_checks_are_neutral() {
        let case = CaseDraft::new("General question", CaseCategory::General);
        let result = checker().check(&case);
        assert_eq!(result.overall, ComplianceLevel::Compliant);
        assert_eq!(result.score, 100);
    }

    #[test]
    fn test_legal_category_always_flagged() {
        let case = CaseDraft::new("Custom MSA", CaseCategory::Legal);
        let result = checker().check(&case);
        assert_eq!(result.overall, ComplianceLevel::Conditional);
        assert!(result.violations.iter().any(|v| v.check == "legal"));
    }
}
