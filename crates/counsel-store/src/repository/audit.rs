//! Audit log sinks.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use counsel_core::error::CounselResult;
use counsel_core::models::audit::{AttorneyAuditEntry, AuditAction, CreateAuditEntry};
use counsel_core::repository::AuditLogSink;
use uuid::Uuid;

use crate::error::StoreError;

fn build_entry(input: CreateAuditEntry) -> AttorneyAuditEntry {
    AttorneyAuditEntry {
        id: Uuid::new_v4(),
        timestamp: input.timestamp,
        action: input.action,
        session_prefix: input.session_prefix,
        metadata: input
            .metadata
            .unwrap_or_else(|| serde_json::Value::Object(Default::default())),
    }
}

/// Query filters for audit log entries.
#[derive(Debug, Clone, Default)]
pub struct AuditLogFilter {
    pub action: Option<AuditAction>,
    pub session_prefix: Option<String>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl AuditLogFilter {
    fn matches(&self, entry: &AttorneyAuditEntry) -> bool {
        self.action.is_none_or(|a| a == entry.action)
            && self
                .session_prefix
                .as_deref()
                .is_none_or(|p| p == entry.session_prefix)
            && self.from.is_none_or(|from| entry.timestamp >= from)
            && self.to.is_none_or(|to| entry.timestamp <= to)
    }
}

/// Append-only in-memory audit log. Clones share the same entries.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAuditLog {
    entries: Arc<Mutex<Vec<AttorneyAuditEntry>>>,
}

impl InMemoryAuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every entry, oldest first.
    pub fn entries(&self) -> Vec<AttorneyAuditEntry> {
        self.list(&AuditLogFilter::default())
    }

    pub fn list(&self, filter: &AuditLogFilter) -> Vec<AttorneyAuditEntry> {
        match self.entries.lock() {
            Ok(entries) => entries
                .iter()
                .filter(|e| filter.matches(e))
                .cloned()
                .collect(),
            Err(_) => Vec::new(),
        }
    }

    pub fn count(&self, action: AuditAction) -> usize {
        self.list(&AuditLogFilter {
            action: Some(action),
            ..Default::default()
        })
        .len()
    }
}

impl AuditLogSink for InMemoryAuditLog {
    async fn append(&self, input: CreateAuditEntry) -> CounselResult<AttorneyAuditEntry> {
        let entry = build_entry(input);
        self.entries
            .lock()
            .map_err(|_| StoreError::Poisoned("audit log"))?
            .push(entry.clone());
        Ok(entry)
    }
}

/// Writes audit entries as structured `tracing` events on the
/// `counsel::audit` target, for shipping through the log pipeline.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAuditLog;

impl AuditLogSink for TracingAuditLog {
    async fn append(&self, input: CreateAuditEntry) -> CounselResult<AttorneyAuditEntry> {
        let entry = build_entry(input);
        tracing::info!(
            target: "counsel::audit",
            audit_id = %entry.id,
            action = entry.action.as_str(),
            session = %entry.session_prefix,
            timestamp = %entry.timestamp,
            metadata = %entry.metadata,
            "audit"
        );
        Ok(entry)
    }
}
