//! Case submission boundary
//!
//! Purely synthetic: a randomized delay standing in for the ticketing
//! backend, then a generated id and timestamp. No real I/O.

use chrono::Utc;
use rand::Rng;
use sales_assist_config::SubmissionSettings;
use sales_assist_core::{CaseDraft, CaseStatus, SubmittedCase};
use std::time::Duration;

use crate::AgentError;

#[derive(Clone)]
pub struct CaseSubmitter {
    settings: SubmissionSettings,
}

impl CaseSubmitter {
    pub fn new(settings: SubmissionSettings) -> Self {
        Self { settings }
    }

    /// Submit a finalized draft; resolves after the simulated latency
    pub async fn submit(&self, draft: &CaseDraft) -> Result<SubmittedCase, AgentError> {
        if draft.title.trim().is_empty() {
            return Err(AgentError::Submission(
                "Case title must not be empty".to_string(),
            ));
        }

        let delay_ms = {
            let mut rng = rand::thread_rng();
            rng.gen_range(self.settings.latency_min_ms..=self.settings.latency_max_ms)
        };
        tokio::time::sleep(Duration::from_millis(delay_ms)).await;

        let case_id = format!(
            "CASE-{}",
            uuid::Uuid::new_v4()
                .simple()
                .to_string()
                .get(..8)
                .unwrap_or("00000000")
                .to_uppercase()
        );
        let submitted = SubmittedCase {
            case_id,
            status: CaseStatus::Submitted,
            submitted_at: Utc::now(),
        };
        tracing::info!(
            case_id = %submitted.case_id,
            category = %draft.category,
            priority = %draft.priority,
            "Case submitted"
        );
        Ok(submitted)
    }
}

impl Default for CaseSubmitter {
    fn default() -> Self {
        Self::new(SubmissionSettings::default())
    }
}
