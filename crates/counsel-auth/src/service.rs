//! Attorney session lifecycle service.

use chrono::{DateTime, Utc};
use counsel_core::clock::Clock;
use counsel_core::error::CounselResult;
use counsel_core::models::attestation::AttorneyAttestation;
use counsel_core::models::audit::{AuditAction, CreateAuditEntry};
use counsel_core::models::session::{
    AttorneySession, CreatedSession, SessionId, SessionStatus, SessionTouch, SessionValidation,
};
use counsel_core::repository::{AuditLogSink, SessionStore};
use serde_json::json;
use tracing::{error, info, warn};

use crate::attestation::validate_attestation;
use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::token;

/// Attempts at generating an unused identifier before giving up.
const MAX_ID_ATTEMPTS: usize = 3;

/// Attorney verification session service.
///
/// Generic over the store, audit sink and clock so the lifecycle can be
/// exercised deterministically without real time passing. Every lifecycle
/// transition is audited before the call returns, including the
/// transition to expired that surfaces as an error.
pub struct AttorneySessionService<S: SessionStore, A: AuditLogSink, C: Clock> {
    store: S,
    audit: A,
    clock: C,
    config: AuthConfig,
}

impl<S: SessionStore, A: AuditLogSink, C: Clock> AttorneySessionService<S, A, C> {
    /// Build the service, rejecting an invalid TTL configuration.
    pub fn new(store: S, audit: A, clock: C, config: AuthConfig) -> CounselResult<Self> {
        config.validate()?;
        Ok(Self {
            store,
            audit,
            clock,
            config,
        })
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Grant a verification session for a complete attestation.
    pub async fn create_session(
        &self,
        attestation: &AttorneyAttestation,
    ) -> CounselResult<CreatedSession> {
        validate_attestation(attestation)?;

        let now = self.clock.now();
        let expires_at = now + self.config.session_ttl();

        let mut attempt = 0;
        let session = loop {
            attempt += 1;
            let session = AttorneySession {
                id: token::generate_session_id(),
                status: SessionStatus::Verified,
                created_at: now,
                expires_at,
                last_activity_at: now,
            };
            match self.store.insert(session.clone()).await {
                Ok(()) => break session,
                Err(counsel_core::CounselError::AlreadyExists { .. })
                    if attempt < MAX_ID_ATTEMPTS =>
                {
                    warn!("Session identifier collision, regenerating");
                }
                Err(e) => return Err(e),
            }
        };

        let audited = self
            .record(
                AuditAction::SessionCreated,
                &session.id,
                Some(json!({
                    "expires_at": expires_at,
                    "ttl_secs": self.config.session_ttl_secs,
                })),
            )
            .await;
        if let Err(e) = audited {
            // An unaudited session must not be usable.
            self.store.remove(&session.id).await?;
            return Err(e);
        }

        info!(session = %session.id.prefix(), %expires_at, "Attorney session created");

        Ok(CreatedSession {
            session_id: session.id,
            expires_at,
        })
    }

    /// Check a presented session identifier against the clock and refresh
    /// its activity.
    pub async fn validate_session(&self, id: &SessionId) -> CounselResult<SessionValidation> {
        let now = self.clock.now();

        match self.store.touch(id, now).await? {
            SessionTouch::Active(session) => {
                let remaining = session.expires_at - now;
                self.record(
                    AuditAction::SessionValidated,
                    id,
                    Some(json!({ "time_remaining_secs": remaining.num_seconds() })),
                )
                .await?;
                Ok(SessionValidation {
                    verified: true,
                    expires_at: session.expires_at,
                    time_remaining_secs: remaining.num_seconds(),
                })
            }
            SessionTouch::Expired(session) => {
                let audited = self
                    .record(
                        AuditAction::SessionExpired,
                        id,
                        Some(json!({
                            "expired_at": session.expires_at,
                            "detected_by": "validate",
                        })),
                    )
                    .await;
                match audited {
                    Ok(()) => info!(session = %id.prefix(), "Attorney session expired"),
                    Err(e) => {
                        // Leave the expiry for the next touch or sweep to record.
                        error!(
                            session = %id.prefix(),
                            error = %e,
                            "Expiry not audited, reopening"
                        );
                        self.store.reopen_expired(id).await?;
                    }
                }
                Err(AuthError::SessionExpired.into())
            }
            SessionTouch::AlreadyExpired => Err(AuthError::SessionExpired.into()),
            SessionTouch::Terminated => Err(AuthError::SessionTerminated.into()),
            SessionTouch::NotFound => Err(AuthError::SessionNotFound.into()),
        }
    }

    /// End a session. Idempotent: only the first call for a known id is
    /// audited.
    pub async fn terminate_session(&self, id: &SessionId) -> CounselResult<()> {
        if self.store.terminate(id).await? {
            self.record(AuditAction::SessionTerminated, id, None).await?;
            info!(session = %id.prefix(), "Attorney session terminated");
        }
        Ok(())
    }

    /// Drop records past their expiry. Sessions that expired without ever
    /// being touched again get their `session_expired` entry here.
    ///
    /// A session whose entry cannot be written is put back so the next
    /// sweep retries it; the first such failure is returned.
    pub async fn sweep_expired(&self) -> CounselResult<usize> {
        let report = self.store.purge_expired(self.clock.now()).await?;
        let mut removed = report.removed;
        let mut failure = None;

        for session in report.newly_expired {
            let audited = self
                .record(
                    AuditAction::SessionExpired,
                    &session.id,
                    Some(json!({
                        "expired_at": session.expires_at,
                        "detected_by": "sweep",
                    })),
                )
                .await;
            if let Err(e) = audited {
                error!(
                    session = %session.id.prefix(),
                    error = %e,
                    "Expiry not audited, keeping record"
                );
                self.store.insert(session).await?;
                removed -= 1;
                failure.get_or_insert(e);
            }
        }

        if removed > 0 {
            info!(removed, "Swept attorney sessions");
        }
        match failure {
            Some(e) => Err(e),
            None => Ok(removed),
        }
    }

    /// Append an audit entry for `id`, referencing it by prefix only.
    pub async fn record(
        &self,
        action: AuditAction,
        id: &SessionId,
        metadata: Option<serde_json::Value>,
    ) -> CounselResult<()> {
        self.audit
            .append(CreateAuditEntry {
                timestamp: self.clock.now(),
                action,
                session_prefix: id.prefix(),
                metadata,
            })
            .await?;
        Ok(())
    }
}
