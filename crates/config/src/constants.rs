//! Centralized constants
//!
//! Tunables that are not worth a settings entry live here so the numbers
//! are not scattered through the crates.

use std::time::Duration;

/// Maximum turns kept per session before the oldest is dropped
pub const MAX_HISTORY_TURNS: usize = 20;

/// Maximum pending actions tracked per session
pub const MAX_PENDING_ACTIONS: usize = 10;

/// Session inactivity window before eviction
pub const SESSION_TIMEOUT: Duration = Duration::from_secs(30 * 60);

/// Interval of the lazy eviction sweep
pub const SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Maximum concurrently tracked sessions
pub const MAX_SESSIONS: usize = 500;

/// Simulated submission latency bounds (milliseconds)
pub const SUBMIT_LATENCY_MIN_MS: u64 = 300;
pub const SUBMIT_LATENCY_MAX_MS: u64 = 1200;

/// Deadline for the simulated external call before falling back to the
/// knowledge-base-only response
pub const EXTERNAL_CALL_TIMEOUT: Duration = Duration::from_secs(5);

/// Confidence reported for a scenario match with full keyword overlap
pub const SCENARIO_FULL_CONFIDENCE: f32 = 0.95;

/// Confidence reported for intent-only (no scenario) answers
pub const INTENT_FALLBACK_CONFIDENCE: f32 = 0.6;
