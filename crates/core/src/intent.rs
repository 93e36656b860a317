//! Intent enumeration
//!
//! Classification is a pure function of the utterance text; the intent is
//! derived per turn and never stored independently.

use serde::{Deserialize, Serialize};

/// Closed set of intents the classifier can produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[derive(Default)]
pub enum Intent {
    /// User can be served directly from knowledge (pricing tools, docs)
    SelfService,
    /// User wants help from docs/guidelines without escalation
    GuidanceRequest,
    /// User is asking what policy allows
    #[default]
    PolicyLookup,
    /// User needs an escalation case created
    CaseCreation,
    /// User wants historical cases/examples
    PrecedentSearch,
    /// User explicitly needs a human or exception path
    EscalationNeeded,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::SelfService => "self_service",
            Intent::GuidanceRequest => "guidance_request",
            Intent::PolicyLookup => "policy_lookup",
            Intent::CaseCreation => "case_creation",
            Intent::PrecedentSearch => "precedent_search",
            Intent::EscalationNeeded => "escalation_needed",
        }
    }

}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_names_match_as_str() {
        // Config files name intents by their serde snake_case form; it
        // must line up with as_str.
        for intent in [
            Intent::SelfService,
            Intent::GuidanceRequest,
            Intent::PolicyLookup,
            Intent::CaseCreation,
            Intent::PrecedentSearch,
            Intent::EscalationNeeded,
        ] {
            let json = serde_json::to_value(intent).unwrap();
            assert_eq!(json, serde_json::Value::String(intent.as_str().to_string()));
        }
    }

    #[test]
    fn test_default_is_policy_lookup() {
        assert_eq!(Intent::default(), Intent::PolicyLookup);
    }
}
