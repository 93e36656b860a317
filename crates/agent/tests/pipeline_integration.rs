//! End-to-end pipeline scenarios over the embedded demo tables

use sales_assist_agent::AssistPipeline;
use sales_assist_core::{
    CaseCategory, CaseDraft, ComplianceLevel, ComplexityTier, Priority, ResponseType,
    UrgencyLevel,
};

#[tokio::test]
async fn hep_pricing_question_matches_and_needs_review() {
    let pipeline = AssistPipeline::default();
    let response = pipeline
        .handle_message("e2e-1", "Can you help me with my HEP pricing in Solution Builder?")
        .await;

    assert!(response.success);
    assert_eq!(response.response_type, ResponseType::Scenario);
    assert!(response.confidence > 0.9);

    // The scenario requires a case; a pricing draft was seeded.
    let session = pipeline.sessions().get("e2e-1").unwrap();
    let draft = session.context.read().current_deal.clone().unwrap();
    assert_eq!(draft.category, CaseCategory::Pricing);
    assert_eq!(draft.deal_value, 0.0);
    assert_eq!(draft.discount_requested, 0.0);

    // Even an empty pricing case is not auto-approvable: the category
    // weight alone exceeds the bound.
    let evaluation = pipeline.evaluate_case(&draft);
    assert!(!evaluation.routing.auto_approvable);
    assert_eq!(evaluation.routing.primary_approver, "Sales Manager");
}

#[tokio::test]
async fn small_low_priority_discount_is_auto_approved() {
    let pipeline = AssistPipeline::default();
    let draft = CaseDraft::new("Small discount", CaseCategory::Pricing)
        .with_priority(Priority::Low)
        .with_deal_value(20_000.0)
        .with_discount(5.0);

    let evaluation = pipeline.evaluate_case(&draft);
    assert!(evaluation.compliance.is_compliant());
    assert!(evaluation.routing.auto_approvable);
    assert_eq!(evaluation.routing.primary_approver, "Auto-approved");
    assert_eq!(evaluation.routing.expected_timeline, "Immediate");
}

#[tokio::test]
async fn critical_over_limit_competitive_case_escalates() {
    let pipeline = AssistPipeline::default();
    let draft = CaseDraft::new("Competitive discount", CaseCategory::Pricing)
        .with_priority(Priority::Critical)
        .with_deal_value(600_000.0)
        .with_discount(35.0)
        .with_competitor("Acme");

    let evaluation = pipeline.evaluate_case(&draft);
    assert_eq!(evaluation.compliance.overall, ComplianceLevel::NonCompliant);
    assert_eq!(evaluation.routing.urgency, UrgencyLevel::Critical);
    assert_eq!(evaluation.routing.complexity, ComplexityTier::VeryComplex);
    assert!(evaluation.routing.secondary_approver.is_some());
}

#[tokio::test]
async fn conversation_accumulates_context_into_the_draft() {
    let pipeline = AssistPipeline::default();
    pipeline
        .handle_message("e2e-4", "Enterprise renewal in EMEA worth $400k")
        .await;
    pipeline
        .handle_message("e2e-4", "They are threatening to churn unless we do 12%")
        .await;

    let session = pipeline.sessions().get("e2e-4").unwrap();
    let draft = session.context.read().current_deal.clone().unwrap();
    assert_eq!(draft.deal_value, 400_000.0);
    assert_eq!(draft.discount_requested, 12.0);
    assert_eq!(draft.segment.as_deref(), Some("enterprise"));
    assert_eq!(draft.region.as_deref(), Some("emea"));
}

#[tokio::test]
async fn submitted_case_gets_synthetic_receipt() {
    let pipeline = AssistPipeline::default();
    let draft = CaseDraft::new("Discount approval", CaseCategory::Pricing)
        .with_deal_value(80_000.0)
        .with_discount(15.0);

    let receipt = pipeline.submit_case(&draft).await.unwrap();
    assert!(receipt.case_id.starts_with("CASE-"));
}

#[tokio::test]
async fn unmatched_message_still_gets_a_valid_answer() {
    let pipeline = AssistPipeline::default();
    let response = pipeline.handle_message("e2e-6", "good morning").await;
    // Default intent path: a knowledge answer, never an error.
    assert!(response.success);
    assert_eq!(response.response_type, ResponseType::Knowledge);
}
