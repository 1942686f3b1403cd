//! Attorney verification session model.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Number of identifier characters that may appear in audit records and logs.
pub const SESSION_PREFIX_LEN: usize = 8;

/// Opaque, unguessable session identifier.
///
/// `Debug` only shows the correlation prefix so identifiers never leak
/// through logged structs.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First [`SESSION_PREFIX_LEN`] characters, for correlation without
    /// exposing the secret.
    pub fn prefix(&self) -> String {
        self.0.chars().take(SESSION_PREFIX_LEN).collect()
    }
}

impl fmt::Debug for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SessionId({}…)", self.prefix())
    }
}

impl From<&str> for SessionId {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Verified,
    Expired,
    Terminated,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttorneySession {
    pub id: SessionId,
    pub status: SessionStatus,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub last_activity_at: DateTime<Utc>,
}

impl AttorneySession {
    /// A session is past its TTL once `now` is strictly after `expires_at`.
    pub fn is_past_expiry(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

/// Result of an atomic touch of a session record.
#[derive(Debug, Clone)]
pub enum SessionTouch {
    /// The session was live; `last_activity_at` has been refreshed.
    Active(AttorneySession),
    /// The session crossed its expiry during this touch.
    Expired(AttorneySession),
    /// The session had already been marked expired by an earlier touch or sweep.
    AlreadyExpired,
    Terminated,
    NotFound,
}

/// Returned from a successful session creation.
#[derive(Debug, Clone, Serialize)]
pub struct CreatedSession {
    pub session_id: SessionId,
    pub expires_at: DateTime<Utc>,
}

/// Returned from a successful session validation.
#[derive(Debug, Clone, Serialize)]
pub struct SessionValidation {
    pub verified: bool,
    pub expires_at: DateTime<Utc>,
    /// Whole seconds left before expiry.
    pub time_remaining_secs: i64,
}
