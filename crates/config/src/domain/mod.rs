//! Domain rule tables
//!
//! Every table here is plain serde data with an embedded default (the
//! shipped demo tables) and an optional YAML override, so tests can swap
//! fixtures without touching code.

mod extraction;
mod intents;
mod policy;
mod routing;
mod scenarios;

pub use extraction::{ExtractionPatternsConfig, KeywordGroup};
pub use intents::{FallbackRule, IntentBucket, IntentPatternsConfig};
pub use policy::{
    ApprovalBracket, ApprovalMatrix, DiscountPolicyEntry, MinimumRequirementEntry,
    PilotPolicyEntry, PolicyConfig,
};
pub use routing::{RoutingWeights, ScoreBucket};
pub use scenarios::{CaseTemplate, ScenarioAction, ScenarioDefinition, ScenariosConfig};

use crate::ConfigError;
use std::path::Path;

/// All domain tables, loaded together
#[derive(Debug, Clone, Default)]
pub struct DomainConfig {
    pub extraction: ExtractionPatternsConfig,
    pub intents: IntentPatternsConfig,
    pub scenarios: ScenariosConfig,
    pub policy: PolicyConfig,
    pub routing: RoutingWeights,
}

impl DomainConfig {
    /// Load tables from a directory; missing files fall back to defaults
    pub fn load_from_dir<P: AsRef<Path>>(dir: P) -> Result<Self, ConfigError> {
        let dir = dir.as_ref();
        let config = Self {
            extraction: load_or_default(&dir.join("extraction.yaml"))?,
            intents: load_or_default(&dir.join("intents.yaml"))?,
            scenarios: load_or_default(&dir.join("scenarios.yaml"))?,
            policy: load_or_default(&dir.join("policy.yaml"))?,
            routing: load_or_default(&dir.join("routing.yaml"))?,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.extraction.validate()?;
        self.intents.validate()?;
        self.scenarios.validate()?;
        self.policy.validate()?;
        self.routing.validate()?;
        Ok(())
    }
}

fn load_or_default<T>(path: &Path) -> Result<T, ConfigError>
where
    T: serde::de::DeserializeOwned + Default,
{
    if !path.exists() {
        tracing::debug!(path = %path.display(), "Domain table not found, using defaults");
        return Ok(T::default());
    }
    let content = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::FileNotFound(format!("{}: {}", path.display(), e)))?;
    serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        DomainConfig::default().validate().unwrap();
    }

    #[test]
    fn test_missing_dir_falls_back_to_defaults() {
        let config = DomainConfig::load_from_dir("/nonexistent/dir").unwrap();
        assert!(!config.scenarios.scenarios.is_empty());
    }
}
