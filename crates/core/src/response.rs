//! Per-turn response envelope returned to the rendering layer

use serde::{Deserialize, Serialize};

/// Where the response text came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseType {
    /// Matched a canned scenario from the catalog
    Scenario,
    /// Generic intent-based answer from the policy tables
    Knowledge,
    /// Case creation / routing guidance
    CaseGuidance,
    /// Degraded knowledge-base-only answer after a timeout
    Fallback,
    /// Apology after an internal failure
    Error,
}

/// Action types the rendering layer knows how to present
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    CreateCase,
    RetryMessage,
    GetGuidance,
    CheckApproval,
    OpenDynamics,
}

/// A button/action offered alongside the response text
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestedAction {
    #[serde(rename = "type")]
    pub action_type: ActionType,
    pub label: String,
    /// Opaque payload the renderer passes back (case template, query, ...)
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub data: serde_json::Value,
}

impl SuggestedAction {
    pub fn new(action_type: ActionType, label: impl Into<String>) -> Self {
        Self {
            action_type,
            label: label.into(),
            data: serde_json::Value::Null,
        }
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = data;
        self
    }
}

/// The full per-turn output of the pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnResponse {
    pub success: bool,
    pub response: String,
    pub response_type: ResponseType,
    /// 0.0 - 1.0
    pub confidence: f32,
    #[serde(default)]
    pub actions: Vec<SuggestedAction>,
    #[serde(default)]
    pub follow_up_suggestions: Vec<String>,
}

impl TurnResponse {
    pub fn new(response: impl Into<String>, response_type: ResponseType, confidence: f32) -> Self {
        Self {
            success: true,
            response: response.into(),
            response_type,
            confidence: confidence.clamp(0.0, 1.0),
            actions: Vec::new(),
            follow_up_suggestions: Vec::new(),
        }
    }

    pub fn with_actions(mut self, actions: Vec<SuggestedAction>) -> Self {
        self.actions = actions;
        self
    }

    pub fn with_follow_ups(mut self, suggestions: Vec<String>) -> Self {
        self.follow_up_suggestions = suggestions;
        self
    }

    /// User-facing apology for an unexpected internal failure
    pub fn apology() -> Self {
        Self {
            success: false,
            response: "Sorry, something went wrong while processing that message. \
                       Please try again, or use one of the options below."
                .to_string(),
            response_type: ResponseType::Error,
            confidence: 0.0,
            actions: vec![
                SuggestedAction::new(ActionType::RetryMessage, "Try again"),
                SuggestedAction::new(ActionType::GetGuidance, "Browse guidance"),
                SuggestedAction::new(ActionType::CreateCase, "Create a case manually"),
            ],
            follow_up_suggestions: vec![
                "What discount can I offer an enterprise customer?".to_string(),
                "Show me similar past cases".to_string(),
                "How do I route a legal review?".to_string(),
            ],
        }
    }
}
