//! Canned scenario catalog
//!
//! Scenarios stand in for the real AI service: keyword-overlap matching
//! against a static catalog. Catalog order matters; ties break to the
//! earlier entry.

use crate::ConfigError;
use sales_assist_core::{ActionType, CaseCategory, Priority};
use serde::{Deserialize, Serialize};

/// Scenario catalog, loadable from scenarios.yaml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenariosConfig {
    pub scenarios: Vec<ScenarioDefinition>,
}

/// A single canned question/answer scenario
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioDefinition {
    pub id: String,
    pub category: CaseCategory,
    /// Lower-case keywords matched as substrings of the utterance
    pub keywords: Vec<String>,
    /// Canned response template
    pub response: String,
    /// Actions offered alongside the response
    #[serde(default)]
    pub actions: Vec<ScenarioAction>,
    /// Follow-up suggestions shown under the response
    #[serde(default)]
    pub follow_ups: Vec<String>,
    /// Whether this scenario requires opening an escalation case
    #[serde(default)]
    pub requires_case: bool,
    /// Template for the case seeded when `requires_case` is set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub case_template: Option<CaseTemplate>,
}

/// Action offered by a scenario
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioAction {
    pub action: ActionType,
    pub label: String,
}

/// Case seed attached to an escalating scenario
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseTemplate {
    pub category: CaseCategory,
    #[serde(default)]
    pub priority: Priority,
    /// Why this scenario escalates
    pub reason: String,
    /// Field names the user still has to supply
    #[serde(default)]
    pub required_fields: Vec<String>,
}

impl ScenariosConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for scenario in &self.scenarios {
            if scenario.keywords.is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: format!("scenarios.{}", scenario.id),
                    message: "scenario has no keywords".to_string(),
                });
            }
            if scenario.requires_case && scenario.case_template.is_none() {
                return Err(ConfigError::InvalidValue {
                    field: format!("scenarios.{}", scenario.id),
                    message: "requires_case set without a case template".to_string(),
                });
            }
        }
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&ScenarioDefinition> {
        self.scenarios.iter().find(|s| s.id == id)
    }
}

impl Default for ScenariosConfig {
    fn default() -> Self {
        let keywords = |words: &[&str]| words.iter().map(|w| w.to_string()).collect();
        let strings = |items: &[&str]| items.iter().map(|s| s.to_string()).collect::<Vec<_>>();

        Self {
            scenarios: vec![
                ScenarioDefinition {
                    id: "hep-pricing".to_string(),
                    category: CaseCategory::Pricing,
                    keywords: keywords(&["hep", "pricing", "solution builder"]),
                    response: "HEP pricing in Solution Builder is driven by the committed \
                               volume tier. Pick the HEP SKU family first, then apply the \
                               tier; manual price overrides need a pricing case."
                        .to_string(),
                    actions: vec![
                        ScenarioAction {
                            action: ActionType::CreateCase,
                            label: "Create pricing case".to_string(),
                        },
                        ScenarioAction {
                            action: ActionType::OpenDynamics,
                            label: "Open Solution Builder".to_string(),
                        },
                    ],
                    follow_ups: strings(&[
                        "What discount tier applies to my volume?",
                        "Show me a similar HEP deal",
                    ]),
                    requires_case: true,
                    case_template: Some(CaseTemplate {
                        category: CaseCategory::Pricing,
                        priority: Priority::Medium,
                        reason: "HEP price overrides require deal desk review".to_string(),
                        required_fields: strings(&["deal_value", "discount_requested"]),
                    }),
                },
                ScenarioDefinition {
                    id: "enterprise-discount".to_string(),
                    category: CaseCategory::Pricing,
                    keywords: keywords(&["enterprise", "discount", "approval"]),
                    response: "Enterprise discounts up to the auto-approved limit go through \
                               without sign-off. Anything above needs an approval case with \
                               business justification."
                        .to_string(),
                    actions: vec![ScenarioAction {
                        action: ActionType::CheckApproval,
                        label: "Check approval requirement".to_string(),
                    }],
                    follow_ups: strings(&[
                        "What is the maximum enterprise discount?",
                        "Who approves a 25% discount?",
                    ]),
                    requires_case: false,
                    case_template: None,
                },
                ScenarioDefinition {
                    id: "competitor-pressure".to_string(),
                    category: CaseCategory::Competitive,
                    keywords: keywords(&["competitor", "competing", "losing to", "switch"]),
                    response: "For active competitive deals, capture who you are up against \
                               and their offer. Competitive discounts beyond standard limits \
                               route through the competitive desk."
                        .to_string(),
                    actions: vec![ScenarioAction {
                        action: ActionType::CreateCase,
                        label: "Open competitive case".to_string(),
                    }],
                    follow_ups: strings(&[
                        "What can I offer against a lower competitor bid?",
                        "Show competitive win stories",
                    ]),
                    requires_case: true,
                    case_template: Some(CaseTemplate {
                        category: CaseCategory::Competitive,
                        priority: Priority::High,
                        reason: "Competitive pricing needs competitive desk review".to_string(),
                        required_fields: strings(&["competitor_info", "deal_value"]),
                    }),
                },
                ScenarioDefinition {
                    id: "pilot-extension".to_string(),
                    category: CaseCategory::General,
                    keywords: keywords(&["pilot", "extension", "extend", "trial"]),
                    response: "Standard pilots run 30 days with one 30-day extension. \
                               Anything longer, or a second extension, needs a case with \
                               the conversion plan attached."
                        .to_string(),
                    actions: vec![ScenarioAction {
                        action: ActionType::GetGuidance,
                        label: "Pilot policy details".to_string(),
                    }],
                    follow_ups: strings(&[
                        "What pilot types are available?",
                        "What discount applies after pilot conversion?",
                    ]),
                    requires_case: false,
                    case_template: None,
                },
                ScenarioDefinition {
                    id: "payment-terms".to_string(),
                    category: CaseCategory::Billing,
                    keywords: keywords(&["payment terms", "net 60", "net 90", "invoice"]),
                    response: "Standard terms are net-30. Net-45 is fine with a warning on \
                               the case; net-60 and beyond needs finance approval."
                        .to_string(),
                    actions: vec![ScenarioAction {
                        action: ActionType::CreateCase,
                        label: "Request non-standard terms".to_string(),
                    }],
                    follow_ups: strings(&["Who approves net-60 terms?"]),
                    requires_case: true,
                    case_template: Some(CaseTemplate {
                        category: CaseCategory::Billing,
                        priority: Priority::Medium,
                        reason: "Non-standard payment terms need finance sign-off".to_string(),
                        required_fields: strings(&["payment_terms_days", "deal_value"]),
                    }),
                },
                ScenarioDefinition {
                    id: "renewal-risk".to_string(),
                    category: CaseCategory::Pricing,
                    keywords: keywords(&["renewal", "churn", "cancel", "at risk"]),
                    response: "Flag at-risk renewals early. Retention discounts follow the \
                               renewal policy table; anything above the typical renewal \
                               discount needs a case with the churn reason."
                        .to_string(),
                    actions: vec![ScenarioAction {
                        action: ActionType::CreateCase,
                        label: "Open retention case".to_string(),
                    }],
                    follow_ups: strings(&[
                        "What is the maximum renewal discount?",
                        "Show me past retention offers",
                    ]),
                    requires_case: true,
                    case_template: Some(CaseTemplate {
                        category: CaseCategory::Pricing,
                        priority: Priority::High,
                        reason: "Retention discount above typical renewal limit".to_string(),
                        required_fields: strings(&["deal_value", "discount_requested"]),
                    }),
                },
                ScenarioDefinition {
                    id: "sku-selection".to_string(),
                    category: CaseCategory::General,
                    keywords: keywords(&["sku", "which product", "bundle", "edition"]),
                    response: "SKU selection follows the segment: enterprise deals bundle \
                               the platform edition, mid-market and SMB use the team \
                               edition unless named-account rules apply."
                        .to_string(),
                    actions: vec![ScenarioAction {
                        action: ActionType::OpenDynamics,
                        label: "Open product catalog".to_string(),
                    }],
                    follow_ups: strings(&["Which bundle fits a 200-seat deal?"]),
                    requires_case: false,
                    case_template: None,
                },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog_validates() {
        let config = ScenariosConfig::default();
        config.validate().unwrap();
        assert!(config.get("hep-pricing").is_some());
    }

    #[test]
    fn test_case_templates_present_where_required() {
        let config = ScenariosConfig::default();
        for scenario in &config.scenarios {
            if scenario.requires_case {
                assert!(
                    scenario.case_template.is_some(),
                    "{} requires a case template",
                    scenario.id
                );
            }
        }
    }

    #[test]
    fn test_requires_case_without_template_rejected() {
        let mut config = ScenariosConfig::default();
        let scenario = config
            .scenarios
            .iter_mut()
            .find(|s| s.id == "hep-pricing")
            .unwrap();
        scenario.case_template = None;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_yaml_round_trip() {
        let config = ScenariosConfig::default();
        let yaml = serde_yaml::to_string(&config).unwrap();
        let parsed: ScenariosConfig = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed.scenarios.len(), config.scenarios.len());
    }
}
