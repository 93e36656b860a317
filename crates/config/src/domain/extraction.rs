//! Extraction keyword tables
//!
//! Categorical entity kinds (segment, deal type, region, urgency) are
//! driven by keyword tables so the extractor stays domain-agnostic. The
//! numeric patterns (percentage, currency, timeframe) are regexes compiled
//! by the extractor itself.

use crate::ConfigError;
use serde::{Deserialize, Serialize};

/// Keyword tables, loadable from extraction.yaml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionPatternsConfig {
    pub segments: Vec<KeywordGroup>,
    pub deal_types: Vec<KeywordGroup>,
    pub regions: Vec<KeywordGroup>,
    pub urgency_keywords: Vec<String>,
    /// Phrases recognized as a timeframe in addition to the duration regex
    pub timeframe_keywords: Vec<String>,
}

/// A canonical value and the keywords that map to it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordGroup {
    /// Canonical value reported by the extractor
    pub value: String,
    /// Lower-case keywords matched as substrings
    pub keywords: Vec<String>,
}

impl ExtractionPatternsConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, groups) in [
            ("segments", &self.segments),
            ("deal_types", &self.deal_types),
            ("regions", &self.regions),
        ] {
            for group in groups {
                if group.keywords.is_empty() {
                    return Err(ConfigError::InvalidValue {
                        field: format!("extraction.{}.{}", field, group.value),
                        message: "group has no keywords".to_string(),
                    });
                }
            }
        }
        Ok(())
    }
}

impl Default for ExtractionPatternsConfig {
    fn default() -> Self {
        let group = |value: &str, keywords: &[&str]| KeywordGroup {
            value: value.to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        };
        let strings = |items: &[&str]| items.iter().map(|s| s.to_string()).collect::<Vec<_>>();

        Self {
            segments: vec![
                group("enterprise", &["enterprise", "large account", "strategic account"]),
                group("mid_market", &["mid-market", "mid market", "midmarket"]),
                group("smb", &["smb", "small business", "startup"]),
            ],
            deal_types: vec![
                group("new_business", &["new business", "new logo", "net new"]),
                group("renewal", &["renewal", "renew", "renewing"]),
                group("expansion", &["expansion", "upsell", "add-on", "add on"]),
                group("pilot", &["pilot", "proof of concept", "poc", "trial"]),
            ],
            regions: vec![
                group("namer", &["namer", "north america", "us ", "usa", "canada"]),
                group("emea", &["emea", "europe", "uk ", "germany", "france"]),
                group("apac", &["apac", "asia", "japan", "australia", "india"]),
                group("latam", &["latam", "latin america", "brazil", "mexico"]),
            ],
            urgency_keywords: strings(&[
                "urgent",
                "asap",
                "critical",
                "immediately",
                "right away",
                "time sensitive",
                "blocking",
            ]),
            timeframe_keywords: strings(&[
                "end of quarter",
                "eoq",
                "end of month",
                "eom",
                "end of week",
                "eow",
                "this week",
                "this quarter",
                "next quarter",
                "today",
                "tomorrow",
            ]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        ExtractionPatternsConfig::default().validate().unwrap();
    }

    #[test]
    fn test_empty_group_rejected() {
        let mut config = ExtractionPatternsConfig::default();
        config.segments[0].keywords.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_yaml_round_trip() {
        let yaml = r#"
segments:
  - value: enterprise
    keywords: ["enterprise"]
deal_types:
  - value: renewal
    keywords: ["renewal"]
regions:
  - value: emea
    keywords: ["emea"]
urgency_keywords: ["urgent"]
timeframe_keywords: ["eoq"]
"#;
        let config: ExtractionPatternsConfig = serde_yaml::from_str(yaml).unwrap();
        config.validate().unwrap();
        assert_eq!(config.segments[0].value, "enterprise");
    }
}
