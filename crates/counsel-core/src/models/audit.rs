//! Audit log domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    SessionCreated,
    SessionValidated,
    SessionTerminated,
    SessionExpired,
    DocumentGenerated,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SessionCreated => "session_created",
            Self::SessionValidated => "session_validated",
            Self::SessionTerminated => "session_terminated",
            Self::SessionExpired => "session_expired",
            Self::DocumentGenerated => "document_generated",
        }
    }
}

/// Immutable audit record. Sessions are referenced by prefix only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttorneyAuditEntry {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub action: AuditAction,
    pub session_prefix: String,
    pub metadata: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAuditEntry {
    pub timestamp: DateTime<Utc>,
    pub action: AuditAction,
    pub session_prefix: String,
    pub metadata: Option<serde_json::Value>,
}
