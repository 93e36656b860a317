//! Conversation context store
//!
//! Per-session in-memory state the other components read and update.
//! Sessions live in a locked map keyed by session id; an expired session
//! is removed by the periodic sweep task or by the on-capacity cleanup,
//! never per-request.

use parking_lot::RwLock;
use sales_assist_config::constants::{MAX_HISTORY_TURNS, MAX_PENDING_ACTIONS};
use sales_assist_config::SessionSettings;
use sales_assist_core::{
    CaseDraft, EntityKind, EntityValue, ExtractedEntities, SuggestedAction,
};
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::watch;

use crate::AgentError;

/// One completed exchange kept in the bounded history
#[derive(Debug, Clone)]
pub struct TurnRecord {
    pub user_text: String,
    pub response_text: String,
}

/// Mutable per-session state
#[derive(Debug, Default)]
pub struct ConversationContext {
    /// Last [`MAX_HISTORY_TURNS`] exchanges, oldest first
    history: VecDeque<TurnRecord>,
    /// Latest value seen per entity kind across the whole conversation
    pub contextual_entities: HashMap<EntityKind, EntityValue>,
    /// Case draft currently being assembled, if any
    pub current_deal: Option<CaseDraft>,
    /// Actions offered but not yet taken, bounded
    pending_actions: Vec<SuggestedAction>,
    pub follow_up_expected: bool,
}

impl ConversationContext {
    pub fn add_turn(&mut self, user_text: impl Into<String>, response_text: impl Into<String>) {
        if self.history.len() >= MAX_HISTORY_TURNS {
            self.history.pop_front();
        }
        self.history.push_back(TurnRecord {
            user_text: user_text.into(),
            response_text: response_text.into(),
        });
    }

    pub fn history(&self) -> impl Iterator<Item = &TurnRecord> {
        self.history.iter()
    }

    pub fn turn_count(&self) -> usize {
        self.history.len()
    }

    /// Fold a turn's entities in; the newest value per kind wins
    pub fn merge_entities(&mut self, entities: &ExtractedEntities) {
        for (kind, value) in entities.latest_per_kind() {
            self.contextual_entities.insert(kind, value);
        }
    }

    pub fn entity(&self, kind: EntityKind) -> Option<&EntityValue> {
        self.contextual_entities.get(&kind)
    }

    pub fn push_pending_action(&mut self, action: SuggestedAction) {
        if self.pending_actions.len() >= MAX_PENDING_ACTIONS {
            self.pending_actions.remove(0);
        }
        self.pending_actions.push(action);
    }

    pub fn pending_actions(&self) -> &[SuggestedAction] {
        &self.pending_actions
    }

    pub fn clear_pending_actions(&mut self) {
        self.pending_actions.clear();
    }

    /// Best-effort textual substitution for deal references
    ///
    /// "that deal" becomes the current deal's description; on no match
    /// the text comes back unchanged. This must never fail the pipeline.
    pub fn resolve_reference(&self, text: &str) -> String {
        const REFERENCES: &[&str] = &["that deal", "this deal", "the deal", "that case"];
        let Some(deal) = &self.current_deal else {
            return text.to_string();
        };
        for reference in REFERENCES {
            // The phrases are ASCII, so a byte-window match starts and
            // ends on char boundaries even in non-ASCII text.
            let hit = text
                .as_bytes()
                .windows(reference.len())
                .position(|window| window.eq_ignore_ascii_case(reference.as_bytes()));
            if let Some(start) = hit {
                let mut resolved = String::with_capacity(text.len() + 32);
                resolved.push_str(&text[..start]);
                resolved.push_str(&deal.summary());
                resolved.push_str(&text[start + reference.len()..]);
                return resolved;
            }
        }
        text.to_string()
    }
}

/// Session state
pub struct Session {
    pub id: String,
    pub context: RwLock<ConversationContext>,
    pub created_at: Instant,
    last_activity: RwLock<Instant>,
}

impl Session {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            context: RwLock::new(ConversationContext::default()),
            created_at: Instant::now(),
            last_activity: RwLock::new(Instant::now()),
        }
    }

    /// Update last activity
    pub fn touch(&self) {
        *self.last_activity.write() = Instant::now();
    }

    /// Check if session is expired
    pub fn is_expired(&self, timeout: Duration) -> bool {
        self.last_activity.read().elapsed() > timeout
    }
}

/// Session manager
pub struct SessionManager {
    sessions: RwLock<HashMap<String, Arc<Session>>>,
    max_sessions: usize,
    session_timeout: Duration,
    sweep_interval: Duration,
}

impl SessionManager {
    pub fn new(settings: &SessionSettings) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            max_sessions: settings.max_sessions,
            session_timeout: Duration::from_secs(settings.timeout_secs),
            sweep_interval: Duration::from_secs(settings.sweep_interval_secs),
        }
    }

    /// Fetch a live session or create one under the given id
    pub fn get_or_create(&self, session_id: &str) -> Result<Arc<Session>, AgentError> {
        if let Some(session) = self.get(session_id) {
            session.touch();
            return Ok(session);
        }

        let mut sessions = self.sessions.write();
        // Re-check under the write lock
        if let Some(session) = sessions.get(session_id) {
            session.touch();
            return Ok(session.clone());
        }

        if sessions.len() >= self.max_sessions {
            self.cleanup_expired_internal(&mut sessions);
            if sessions.len() >= self.max_sessions {
                return Err(AgentError::Session("Max sessions reached".to_string()));
            }
        }

        let session = Arc::new(Session::new(session_id));
        sessions.insert(session_id.to_string(), session.clone());
        tracing::info!(session_id = %session_id, "Created session");
        Ok(session)
    }

    /// Get a session by ID without creating it
    pub fn get(&self, id: &str) -> Option<Arc<Session>> {
        let sessions = self.sessions.read();
        let session = sessions.get(id).cloned();
        // Expired sessions are invisible even before the sweep removes them.
        session.filter(|s| !s.is_expired(self.session_timeout))
    }

    /// Remove a session
    pub fn remove(&self, id: &str) {
        if self.sessions.write().remove(id).is_some() {
            tracing::info!(session_id = %id, "Removed session");
        }
    }

    /// Active session count
    pub fn count(&self) -> usize {
        self.sessions.read().len()
    }

    /// Cleanup expired sessions
    pub fn cleanup_expired(&self) {
        let mut sessions = self.sessions.write();
        self.cleanup_expired_internal(&mut sessions);
    }

    fn cleanup_expired_internal(&self, sessions: &mut HashMap<String, Arc<Session>>) {
        let timeout = self.session_timeout;
        let expired: Vec<String> = sessions
            .iter()
            .filter(|(_, s)| s.is_expired(timeout))
            .map(|(id, _)| id.clone())
            .collect();
        for id in expired {
            sessions.remove(&id);
            tracing::info!(session_id = %id, "Expired session");
        }
    }

    /// Start a background task that periodically removes expired sessions.
    ///
    /// Returns a shutdown sender used to stop the task.
    pub fn start_cleanup_task(self: &Arc<Self>) -> watch::Sender<bool> {
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let manager = Arc::clone(self);
        let interval = manager.sweep_interval;

        tokio::spawn(async move {
            let mut interval_timer = tokio::time::interval(interval);
            interval_timer.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = interval_timer.tick() => {
                        let before = manager.count();
                        manager.cleanup_expired();
                        let after = manager.count();
                        if before != after {
                            tracing::info!(
                                "Session sweep: removed {} expired sessions ({} remaining)",
                                before - after,
                                after
                            );
                        }
                    }
                    _ = shutdown_rx.changed() => {
                        if *shutdown_rx.borrow() {
                            tracing::info!("Session sweep task shutting down");
                            break;
                        }
                    }
                }
            }
        });

        shutdown_tx
    }
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new(&SessionSettings::default())
    }
}
