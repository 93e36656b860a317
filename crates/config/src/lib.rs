//! Configuration for the sales-assist pipeline
//!
//! Supports loading configuration from:
//! - YAML files
//! - Environment variables (SALES_ASSIST_ prefix)
//! - Embedded defaults (the shipped demo tables)
//!
//! # Domain configuration
//!
//! All rule tables live in `domain/` and are plain serde structures, so
//! tests can swap fixtures instead of relying on hard-coded data:
//! - intents.yaml   - ordered intent pattern buckets
//! - scenarios.yaml - canned scenario catalog
//! - policy.yaml    - discount limits, minimums, approval matrix, pilots
//! - routing.yaml   - complexity/urgency weights

pub mod constants;
pub mod domain;
pub mod settings;

pub use domain::{
    ApprovalBracket, ApprovalMatrix, CaseTemplate, DiscountPolicyEntry, DomainConfig,
    ExtractionPatternsConfig, FallbackRule, IntentBucket, IntentPatternsConfig, KeywordGroup,
    MinimumRequirementEntry, PilotPolicyEntry, PolicyConfig, RoutingWeights, ScenarioAction,
    ScenarioDefinition, ScenariosConfig,
};
pub use settings::{load_settings, Settings, SessionSettings, SubmissionSettings};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Environment error: {0}")]
    Environment(String),
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}
