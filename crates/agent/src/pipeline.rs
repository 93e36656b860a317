//! Pipeline entry point
//!
//! Raw message in, [`TurnResponse`] out: extract entities, classify the
//! intent, try the scenario catalog first, otherwise answer from the
//! policy tables. Any internal failure degrades to an apology response;
//! nothing propagates to the caller as a raw error.
//!
//! All services are constructed explicitly and injected here; there are
//! no globals, so tests can substitute policy tables freely.

use sales_assist_config::constants::{INTENT_FALLBACK_CONFIDENCE, SCENARIO_FULL_CONFIDENCE};
use sales_assist_config::{DomainConfig, Settings};
use sales_assist_core::{
    ActionType, CaseDraft, ComplianceResult, EntityKind, ResponseType, RoutingDecision,
    SubmittedCase, SuggestedAction, TurnResponse,
};
use sales_assist_nlu::{EntityExtractor, IntentClassifier, ScenarioMatch, ScenarioMatcher};
use sales_assist_policy::{CaseRouter, ComplianceChecker, PolicyStore};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::context::{ConversationContext, SessionManager};
use crate::responder::IntentResponder;
use crate::submission::CaseSubmitter;
use crate::AgentError;

/// Compliance verdict plus routing for one case draft
#[derive(Debug, Clone)]
pub struct CaseEvaluation {
    pub compliance: ComplianceResult,
    pub routing: RoutingDecision,
}

/// The assembled message-handling pipeline
pub struct AssistPipeline {
    extractor: EntityExtractor,
    classifier: IntentClassifier,
    matcher: ScenarioMatcher,
    responder: IntentResponder,
    checker: ComplianceChecker,
    router: CaseRouter,
    submitter: CaseSubmitter,
    sessions: Arc<SessionManager>,
    external_timeout: Duration,
}

impl AssistPipeline {
    pub fn new(settings: &Settings, domain: DomainConfig) -> Self {
        let store = PolicyStore::new(Arc::new(domain.policy));
        Self {
            extractor: EntityExtractor::new(domain.extraction),
            classifier: IntentClassifier::new(domain.intents),
            matcher: ScenarioMatcher::new(Arc::new(domain.scenarios)),
            responder: IntentResponder::new(store.clone()),
            checker: ComplianceChecker::new(store.clone()),
            router: CaseRouter::new(domain.routing, store),
            submitter: CaseSubmitter::new(settings.submission.clone()),
            sessions: Arc::new(SessionManager::new(&settings.session)),
            external_timeout: Duration::from_millis(settings.submission.external_timeout_ms),
        }
    }

    pub fn sessions(&self) -> &Arc<SessionManager> {
        &self.sessions
    }

    /// Handle one conversational turn
    ///
    /// Never returns an error: internal failures become an apology
    /// response with recovery actions.
    pub async fn handle_message(&self, session_id: &str, text: &str) -> TurnResponse {
        match self.try_handle(session_id, text) {
            Ok(response) => response,
            Err(err) => {
                tracing::error!(session_id = %session_id, error = %err, "Turn failed");
                TurnResponse::apology()
            },
        }
    }

    fn try_handle(&self, session_id: &str, text: &str) -> Result<TurnResponse, AgentError> {
        let session = self.sessions.get_or_create(session_id)?;
        let resolved = session.context.read().resolve_reference(text);

        let entities = self.extractor.extract(&resolved);
        let intent = self.classifier.classify(&resolved);
        tracing::debug!(session_id = %session_id, intent = %intent, "Turn understood");

        {
            let mut context = session.context.write();
            context.merge_entities(&entities);
        }

        // The catalog takes priority over intent-level answers.
        let response = match self.matcher.best_match(&resolved) {
            Some(hit) => self.scenario_response(&hit, &session.context.read()),
            None => self.responder.respond(intent, &session.context.read()),
        };

        {
            let mut context = session.context.write();
            context.add_turn(text, response.response.clone());
            context.follow_up_expected = !response.follow_up_suggestions.is_empty();
            for action in &response.actions {
                context.push_pending_action(action.clone());
            }
            if let Some(draft) = extract_seeded_draft(&response) {
                context.current_deal = Some(draft);
            }
        }
        Ok(response)
    }

    fn scenario_response(&self, hit: &ScenarioMatch, context: &ConversationContext) -> TurnResponse {
        let confidence = scenario_confidence(hit.score, hit.scenario.keywords.len());
        let draft = hit
            .scenario
            .case_template
            .as_ref()
            .filter(|_| hit.scenario.requires_case)
            .map(|template| seed_case_draft(&hit.scenario.id, template, context));

        let actions = hit
            .scenario
            .actions
            .iter()
            .map(|a| {
                let action = SuggestedAction::new(a.action, a.label.clone());
                match (&draft, a.action) {
                    (Some(draft), ActionType::CreateCase) => action.with_data(
                        serde_json::to_value(draft).unwrap_or(serde_json::Value::Null),
                    ),
                    _ => action,
                }
            })
            .collect();

        TurnResponse::new(
            hit.scenario.response.clone(),
            ResponseType::Scenario,
            confidence,
        )
        .with_actions(actions)
        .with_follow_ups(hit.scenario.follow_ups.clone())
    }

    /// Run the full compliance battery and route the case
    pub fn evaluate_case(&self, draft: &CaseDraft) -> CaseEvaluation {
        let compliance = self.checker.check(draft);
        let routing = self.router.route(draft, &compliance);
        CaseEvaluation {
            compliance,
            routing,
        }
    }

    /// Submit a finalized draft through the synthetic boundary
    pub async fn submit_case(&self, draft: &CaseDraft) -> Result<SubmittedCase, AgentError> {
        self.submitter.submit(draft).await
    }

    /// Deadline boundary for external calls
    ///
    /// A call that misses the deadline degrades to a static
    /// knowledge-base-only response instead of retrying.
    pub async fn with_fallback<F>(&self, call: F) -> TurnResponse
    where
        F: Future<Output = TurnResponse>,
    {
        match tokio::time::timeout(self.external_timeout, call).await {
            Ok(response) => response,
            Err(_) => {
                tracing::warn!("External call timed out, degrading to knowledge base");
                knowledge_fallback()
            },
        }
    }
}

impl Default for AssistPipeline {
    fn default() -> Self {
        Self::new(&Settings::default(), DomainConfig::default())
    }
}

/// Overlap-scaled confidence, floored at the intent-answer level
fn scenario_confidence(matched: usize, total: usize) -> f32 {
    if total == 0 {
        return INTENT_FALLBACK_CONFIDENCE;
    }
    let fraction = matched as f32 / total as f32;
    (SCENARIO_FULL_CONFIDENCE * fraction).max(INTENT_FALLBACK_CONFIDENCE)
}

/// Seed a draft from the scenario template plus what the conversation
/// already established
fn seed_case_draft(
    scenario_id: &str,
    template: &sales_assist_config::CaseTemplate,
    context: &ConversationContext,
) -> CaseDraft {
    let title = scenario_id.replace('-', " ");
    let mut draft = CaseDraft::new(title, template.category).with_priority(template.priority);
    draft.description = template.reason.clone();

    if let Some(value) = context
        .entity(EntityKind::Currency)
        .and_then(|v| v.as_number())
    {
        draft.deal_value = value;
    }
    if let Some(discount) = context
        .entity(EntityKind::Percentage)
        .and_then(|v| v.as_number())
    {
        draft.discount_requested = discount;
    }
    draft.timeframe = context
        .entity(EntityKind::Timeframe)
        .and_then(|v| v.as_text())
        .map(str::to_string);
    draft.deal_type = context
        .entity(EntityKind::DealType)
        .and_then(|v| v.as_text())
        .map(str::to_string);
    draft.segment = context
        .entity(EntityKind::Segment)
        .and_then(|v| v.as_text())
        .map(str::to_string);
    draft.region = context
        .entity(EntityKind::Region)
        .and_then(|v| v.as_text())
        .map(str::to_string);
    for field in &template.required_fields {
        draft
            .extra_fields
            .entry(field.clone())
            .or_insert_with(String::new);
    }
    draft
}

/// Pull the seeded draft back out of a scenario response's action data
fn extract_seeded_draft(response: &TurnResponse) -> Option<CaseDraft> {
    response
        .actions
        .iter()
        .find(|a| a.action_type == ActionType::CreateCase && !a.data.is_null())
        .and_then(|a| serde_json::from_value(a.data.clone()).ok())
}

fn knowledge_fallback() -> TurnResponse {
    TurnResponse::new(
        "I could not reach the assistant service in time, so here is what the \
         knowledge base says: check the discount policy for your deal type and \
         segment, and open an approval case for anything above the typical limit.",
        ResponseType::Fallback,
        0.3,
    )
    .with_actions(vec![
        SuggestedAction::new(ActionType::GetGuidance, "Browse the policy guide"),
        SuggestedAction::new(ActionType::RetryMessage, "Try again"),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use sales_assist_config::SessionSettings;

    fn pipeline() -> AssistPipeline {
        AssistPipeline::default()
    }

    #[tokio::test]
    async fn test_scenario_takes_priority_over_intent() {
        let response = pipeline()
            .handle_message("s1", "What's the policy on enterprise discount approval?")
            .await;
        // Both the policy-lookup intent and the enterprise-discount
        // scenario apply; the scenario wins.
        assert_eq!(response.response_type, ResponseType::Scenario);
        assert!(response.success);
        assert!(!response.follow_up_suggestions.is_empty());
    }

    #[tokio::test]
    async fn test_intent_answer_when_no_scenario() {
        // No catalog keyword appears; the policy-lookup intent answers.
        let response = pipeline()
            .handle_message("s1", "Am I allowed to go beyond the standard limits for mid-market?")
            .await;
        assert_eq!(response.response_type, ResponseType::Knowledge);
        assert_eq!(response.confidence, INTENT_FALLBACK_CONFIDENCE);
    }

    #[tokio::test]
    async fn test_case_seeded_from_context() {
        let pipeline = pipeline();
        pipeline
            .handle_message("s1", "Enterprise deal worth $120k, they want 25%")
            .await;
        let response = pipeline
            .handle_message("s1", "Help me with HEP pricing in Solution Builder")
            .await;
        assert_eq!(response.response_type, ResponseType::Scenario);

        let session = pipeline.sessions().get("s1").unwrap();
        let context = session.context.read();
        let draft = context.current_deal.as_ref().unwrap();
        assert_eq!(draft.deal_value, 120_000.0);
        assert_eq!(draft.discount_requested, 25.0);
        assert_eq!(draft.segment.as_deref(), Some("enterprise"));
    }

    #[tokio::test]
    async fn test_session_failure_becomes_apology() {
        let mut settings = Settings::default();
        settings.session = SessionSettings {
            timeout_secs: 1800,
            sweep_interval_secs: 60,
            max_sessions: 0,
        };
        let pipeline = AssistPipeline::new(&settings, DomainConfig::default());
        let response = pipeline.handle_message("s1", "hello").await;
        assert!(!response.success);
        assert_eq!(response.response_type, ResponseType::Error);
        assert!(!response.actions.is_empty());
    }

    #[tokio::test]
    async fn test_with_fallback_degrades_on_timeout() {
        let mut settings = Settings::default();
        settings.submission.external_timeout_ms = 10;
        let pipeline = AssistPipeline::new(&settings, DomainConfig::default());

        let slow = async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            TurnResponse::new("late", ResponseType::Knowledge, 0.9)
        };
        let response = pipeline.with_fallback(slow).await;
        assert_eq!(response.response_type, ResponseType::Fallback);
    }

    #[tokio::test]
    async fn test_with_fallback_passes_through_in_time() {
        let pipeline = pipeline();
        let fast = async { TurnResponse::new("ok", ResponseType::Knowledge, 0.9) };
        let response = pipeline.with_fallback(fast).await;
        assert_eq!(response.response, "ok");
    }

    #[test]
    fn test_scenario_confidence_scales_with_overlap() {
        assert_eq!(scenario_confidence(3, 3), SCENARIO_FULL_CONFIDENCE);
        let partial = scenario_confidence(1, 3);
        assert!(partial < SCENARIO_FULL_CONFIDENCE);
        assert!(partial >= INTENT_FALLBACK_CONFIDENCE);
    }

    #[tokio::test]
    async fn test_reference_resolution_uses_current_deal() {
        let pipeline = pipeline();
        pipeline
            .handle_message("s1", "Losing to a competitor on a $300k deal, need 20%")
            .await;
        // competitor-pressure seeds a draft; "that deal" now resolves.
        let session = pipeline.sessions().get("s1").unwrap();
        assert!(session.context.read().current_deal.is_some());

        let resolved = session
            .context
            .read()
            .resolve_reference("What approvals does that deal need?");
        assert!(resolved.contains("case"));
    }
}
