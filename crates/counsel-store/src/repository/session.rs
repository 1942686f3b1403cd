//! In-memory implementation of [`SessionStore`].

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use counsel_core::error::CounselResult;
use counsel_core::models::session::{AttorneySession, SessionId, SessionStatus, SessionTouch};
use counsel_core::repository::{PurgeReport, SessionStore};
use tracing::debug;

use crate::error::StoreError;

/// Process-wide session map. Clones share the same records.
///
/// A single mutex guards the map, so every operation on an id sees and
/// produces a consistent expiry decision. No lock is held across an
/// `.await`.
#[derive(Debug, Clone, Default)]
pub struct InMemorySessionStore {
    sessions: Arc<Mutex<HashMap<SessionId, AttorneySession>>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<SessionId, AttorneySession>>, StoreError> {
        self.sessions
            .lock()
            .map_err(|_| StoreError::Poisoned("session store"))
    }

    /// Number of records currently held, in any state.
    pub fn len(&self) -> usize {
        self.lock().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SessionStore for InMemorySessionStore {
    async fn insert(&self, session: AttorneySession) -> CounselResult<()> {
        let mut sessions = self.lock()?;
        if sessions.contains_key(&session.id) {
            return Err(StoreError::Duplicate {
                entity: "attorney_session".into(),
            }
            .into());
        }
        sessions.insert(session.id.clone(), session);
        Ok(())
    }

    async fn get(&self, id: &SessionId) -> CounselResult<Option<AttorneySession>> {
        Ok(self.lock()?.get(id).cloned())
    }

    async fn touch(&self, id: &SessionId, now: DateTime<Utc>) -> CounselResult<SessionTouch> {
        let mut sessions = self.lock()?;
        let Some(session) = sessions.get_mut(id) else {
            return Ok(SessionTouch::NotFound);
        };

        let outcome = match session.status {
            SessionStatus::Terminated => SessionTouch::Terminated,
            SessionStatus::Expired => SessionTouch::AlreadyExpired,
            SessionStatus::Verified if session.is_past_expiry(now) => {
                session.status = SessionStatus::Expired;
                SessionTouch::Expired(session.clone())
            }
            SessionStatus::Verified => {
                // Activity never moves backwards under concurrent touches.
                if now > session.last_activity_at {
                    session.last_activity_at = now;
                }
                SessionTouch::Active(session.clone())
            }
        };
        Ok(outcome)
    }

    async fn terminate(&self, id: &SessionId) -> CounselResult<bool> {
        let mut sessions = self.lock()?;
        match sessions.get_mut(id) {
            Some(session) if session.status != SessionStatus::Terminated => {
                session.status = SessionStatus::Terminated;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn remove(&self, id: &SessionId) -> CounselResult<bool> {
        Ok(self.lock()?.remove(id).is_some())
    }

    async fn reopen_expired(&self, id: &SessionId) -> CounselResult<bool> {
        let mut sessions = self.lock()?;
        match sessions.get_mut(id) {
            Some(session) if session.status == SessionStatus::Expired => {
                session.status = SessionStatus::Verified;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> CounselResult<PurgeReport> {
        let mut sessions = self.lock()?;
        let mut report = PurgeReport::default();

        sessions.retain(|_, session| {
            if !session.is_past_expiry(now) {
                return true;
            }
            if session.status == SessionStatus::Verified {
                report.newly_expired.push(session.clone());
            }
            report.removed += 1;
            false
        });

        debug!(
            removed = report.removed,
            newly_expired = report.newly_expired.len(),
            "Purged expired attorney sessions"
        );
        Ok(report)
    }
}
