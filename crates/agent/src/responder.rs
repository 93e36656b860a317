//! Intent-keyed responder
//!
//! Runs when no catalog scenario matched. Answers from the policy tables
//! where the intent calls for it; a lookup miss becomes a tagged
//! unsuccessful response carrying the miss message, never an error.

use sales_assist_config::constants::INTENT_FALLBACK_CONFIDENCE;
use sales_assist_core::{
    ActionType, EntityKind, Intent, ResponseType, SuggestedAction, TurnResponse,
};
use sales_assist_policy::{Lookup, PolicyStore};

use crate::context::ConversationContext;

/// Generic responder consulting the policy store
#[derive(Clone)]
pub struct IntentResponder {
    store: PolicyStore,
}

impl IntentResponder {
    pub fn new(store: PolicyStore) -> Self {
        Self { store }
    }

    pub fn respond(&self, intent: Intent, context: &ConversationContext) -> TurnResponse {
        match intent {
            Intent::SelfService => self.self_service(),
            Intent::PolicyLookup => self.policy_lookup(context),
            Intent::GuidanceRequest => self.guidance(),
            Intent::CaseCreation => self.case_creation(),
            Intent::PrecedentSearch => self.precedent_search(),
            Intent::EscalationNeeded => self.escalation(),
        }
    }

    fn self_service(&self) -> TurnResponse {
        TurnResponse::new(
            "You can do this yourself in Solution Builder: pick the SKU family, \
             set the committed volume, and the rate card applies automatically.",
            ResponseType::Knowledge,
            INTENT_FALLBACK_CONFIDENCE,
        )
        .with_actions(vec![SuggestedAction::new(
            ActionType::OpenDynamics,
            "Open Solution Builder",
        )])
        .with_follow_ups(vec![
            "Where is the current rate card?".to_string(),
            "How do I apply a volume tier?".to_string(),
        ])
    }

    /// Answer a policy question from the contextual entities
    fn policy_lookup(&self, context: &ConversationContext) -> TurnResponse {
        let deal_type = context
            .entity(EntityKind::DealType)
            .and_then(|v| v.as_text())
            .unwrap_or("new_business")
            .to_string();
        let segment = context
            .entity(EntityKind::Segment)
            .and_then(|v| v.as_text())
            .unwrap_or("enterprise")
            .to_string();
        let region = context
            .entity(EntityKind::Region)
            .and_then(|v| v.as_text())
            .unwrap_or("any")
            .to_string();

        match self.store.discount_policy(&deal_type, &segment, &region) {
            Lookup::Found(entry) => {
                let mut text = format!(
                    "For {} / {} deals the typical discount is {}%, auto-approved up to \
                     {}%, with a hard maximum of {}%.",
                    deal_type.replace('_', " "),
                    segment.replace('_', " "),
                    entry.typical_discount,
                    entry.auto_approved_limit,
                    entry.effective_max(),
                );
                if entry.regional_adjustment > 0.0 {
                    text.push_str(&format!(
                        " That includes a {}% regional adjustment for {}.",
                        entry.regional_adjustment,
                        region.to_uppercase()
                    ));
                }
                TurnResponse::new(text, ResponseType::Knowledge, INTENT_FALLBACK_CONFIDENCE)
                    .with_actions(vec![SuggestedAction::new(
                        ActionType::CheckApproval,
                        "Check who approves a specific discount",
                    )])
                    .with_follow_ups(vec![
                        "Who approves a 25% discount?".to_string(),
                        "What are the minimum commitments?".to_string(),
                    ])
            },
            Lookup::Missing { message } => TurnResponse {
                success: false,
                response: message,
                response_type: ResponseType::Knowledge,
                confidence: 0.0,
                actions: vec![SuggestedAction::new(
                    ActionType::GetGuidance,
                    "Browse the policy guide",
                )],
                follow_up_suggestions: vec![
                    "What discount applies to enterprise new business?".to_string()
                ],
            },
        }
    }

    fn guidance(&self) -> TurnResponse {
        TurnResponse::new(
            "Start from the policy limits for the deal type and segment, anchor on \
             the typical discount, and keep anything above it tied to a concrete \
             commitment (term, volume, or reference).",
            ResponseType::Knowledge,
            INTENT_FALLBACK_CONFIDENCE,
        )
        .with_actions(vec![SuggestedAction::new(
            ActionType::GetGuidance,
            "More negotiation guidance",
        )])
        .with_follow_ups(vec![
            "What is the typical enterprise discount?".to_string(),
            "Show me similar past deals".to_string(),
        ])
    }

    fn case_creation(&self) -> TurnResponse {
        TurnResponse::new(
            "I can open an approval case for this. I'll pre-fill it from what you've \
             told me; you will need the deal value and the requested discount.",
            ResponseType::CaseGuidance,
            INTENT_FALLBACK_CONFIDENCE,
        )
        .with_actions(vec![SuggestedAction::new(
            ActionType::CreateCase,
            "Create the case",
        )])
        .with_follow_ups(vec![
            "Who will approve it?".to_string(),
            "How long does approval take?".to_string(),
        ])
    }

    fn precedent_search(&self) -> TurnResponse {
        TurnResponse::new(
            "Closed cases live in the deal archive, filterable by segment, region, \
             and discount band. Tell me the deal shape and I'll point you at the \
             closest precedents.",
            ResponseType::Knowledge,
            INTENT_FALLBACK_CONFIDENCE,
        )
        .with_follow_ups(vec![
            "Show enterprise deals above 20% discount".to_string(),
            "Any competitive wins in EMEA?".to_string(),
        ])
    }

    fn escalation(&self) -> TurnResponse {
        TurnResponse::new(
            "Understood. The fastest path is an escalation case; it goes straight to \
             the approver on duty and shows up in their queue immediately.",
            ResponseType::CaseGuidance,
            INTENT_FALLBACK_CONFIDENCE,
        )
        .with_actions(vec![SuggestedAction::new(
            ActionType::CreateCase,
            "Open escalation case",
        )])
    }
}

impl Default for IntentResponder {
    fn default() -> Self {
        Self::new(PolicyStore::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sales_assist_core::{EntityValue, ExtractedEntities, ExtractedEntity};

    fn context_with(kind: EntityKind, value: &str) -> ConversationContext {
        let mut context = ConversationContext::default();
        context.merge_entities(&ExtractedEntities::new(vec![ExtractedEntity {
            kind,
            value: EntityValue::Text(value.to_string()),
            position: 0,
            source_text: value.to_string(),
        }]));
        context
    }

    #[test]
    fn test_policy_lookup_uses_contextual_entities() {
        let responder = IntentResponder::default();
        let mut context = context_with(EntityKind::Segment, "smb");
        context.merge_entities(&ExtractedEntities::new(vec![ExtractedEntity {
            kind: EntityKind::DealType,
            value: EntityValue::Text("renewal".to_string()),
            position: 0,
            source_text: "renewal".to_string(),
        }]));

        let response = responder.respond(Intent::PolicyLookup, &context);
        assert!(response.success);
        // renewal/smb: typical 5, auto 3, max 10
        assert!(response.response.contains("5%"));
        assert!(response.response.contains("10%"));
    }

    #[test]
    fn test_policy_miss_is_tagged_unsuccessful() {
        let responder = IntentResponder::default();
        // "pilot" has no discount policy row
        let context = context_with(EntityKind::DealType, "pilot");
        let response = responder.respond(Intent::PolicyLookup, &context);
        assert!(!response.success);
        assert!(response.response.contains("No discount policy"));
        assert!(!response.actions.is_empty());
    }

    #[test]
    fn test_case_creation_offers_create_action() {
        let responder = IntentResponder::default();
        let response = responder.respond(Intent::CaseCreation, &ConversationContext::default());
        assert_eq!(response.response_type, ResponseType::CaseGuidance);
        assert!(response
            .actions
            .iter()
            .any(|a| a.action_type == ActionType::CreateCase));
    }

    #[test]
    fn test_every_intent_produces_a_response() {
        let responder = IntentResponder::default();
        let context = ConversationContext::default();
        for intent in [
            Intent::SelfService,
            Intent::GuidanceRequest,
            Intent::PolicyLookup,
            Intent::CaseCreation,
            Intent::PrecedentSearch,
            Intent::EscalationNeeded,
        ] {
            let response = responder.respond(intent, &context);
            assert!(!response.response.is_empty());
        }
    }
}
