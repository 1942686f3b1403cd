//! Storage trait definitions.
//!
//! Session and audit operations are async so that in-process and
//! external backends share one interface. The template registry is
//! read-only configuration and stays synchronous.

use chrono::{DateTime, Utc};

use crate::error::CounselResult;
use crate::models::{
    audit::{AttorneyAuditEntry, CreateAuditEntry},
    session::{AttorneySession, SessionId, SessionTouch},
    template::DocumentTemplate,
};

// ---------------------------------------------------------------------------
// Sessions
// ---------------------------------------------------------------------------

/// Sessions dropped by a sweep.
#[derive(Debug, Clone, Default)]
pub struct PurgeReport {
    /// Verified sessions that expired without anyone touching them, as
    /// they were before removal.
    pub newly_expired: Vec<AttorneySession>,
    /// Total records removed, including already expired or terminated ones.
    pub removed: usize,
}

/// Exclusive owner of [`AttorneySession`] records.
///
/// Every operation is atomic with respect to a single session id: the
/// expiry decision and any state change happen in one step.
pub trait SessionStore: Send + Sync {
    /// Fails with `AlreadyExists` if the id is taken.
    fn insert(&self, session: AttorneySession) -> impl Future<Output = CounselResult<()>> + Send;
    fn get(
        &self,
        id: &SessionId,
    ) -> impl Future<Output = CounselResult<Option<AttorneySession>>> + Send;
    /// Re-check expiry against `now`; refresh `last_activity_at` when live,
    /// mark the record expired when not.
    fn touch(
        &self,
        id: &SessionId,
        now: DateTime<Utc>,
    ) -> impl Future<Output = CounselResult<SessionTouch>> + Send;
    /// Mark a session terminated. Returns `false` when the id is unknown
    /// or already terminated.
    fn terminate(&self, id: &SessionId) -> impl Future<Output = CounselResult<bool>> + Send;
    /// Drop a record outright. Returns `false` when the id is unknown.
    fn remove(&self, id: &SessionId) -> impl Future<Output = CounselResult<bool>> + Send;
    /// Put an expired record back to verified so the next touch or sweep
    /// observes the expiry again. Returns `false` unless the record is
    /// currently expired.
    fn reopen_expired(&self, id: &SessionId) -> impl Future<Output = CounselResult<bool>> + Send;
    /// Remove every record whose expiry is before `now`.
    fn purge_expired(
        &self,
        now: DateTime<Utc>,
    ) -> impl Future<Output = CounselResult<PurgeReport>> + Send;
}

// ---------------------------------------------------------------------------
// Audit (append-only)
// ---------------------------------------------------------------------------

pub trait AuditLogSink: Send + Sync {
    /// Append a new audit entry. No update or delete operations exist.
    fn append(
        &self,
        input: CreateAuditEntry,
    ) -> impl Future<Output = CounselResult<AttorneyAuditEntry>> + Send;
}

// ---------------------------------------------------------------------------
// Templates (immutable after load)
// ---------------------------------------------------------------------------

pub trait TemplateRegistry: Send + Sync {
    fn template(&self, template_id: &str) -> Option<&DocumentTemplate>;
    fn template_ids(&self) -> Vec<&str>;
}
