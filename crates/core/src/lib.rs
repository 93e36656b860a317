//! Core types for the sales-assist pipeline
//!
//! This crate provides the shared vocabulary used across all other crates:
//! - Extracted entities and merge semantics
//! - Intent enumeration
//! - Case drafts and submission receipts
//! - Compliance results
//! - Routing decisions
//! - Per-turn response envelope

pub mod case;
pub mod compliance;
pub mod entities;
pub mod intent;
pub mod response;
pub mod routing;

pub use case::{CaseCategory, CaseDraft, CaseStatus, Priority, SubmittedCase};
pub use compliance::{
    ComplianceLevel, ComplianceResult, Finding, RiskLevel, Severity,
};
pub use entities::{EntityKind, EntityValue, ExtractedEntities, ExtractedEntity};
pub use intent::Intent;
pub use response::{ActionType, ResponseType, SuggestedAction, TurnResponse};
pub use routing::{ComplexityTier, RoutingDecision, UrgencyLevel};
