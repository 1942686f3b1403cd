//! Counsel Store: in-process implementations of the session store and
//! audit log traits defined in `counsel-core`.
//!
//! Sessions live only in process memory; nothing here is persisted.

mod error;
pub mod repository;

pub use error::StoreError;
pub use repository::{AuditLogFilter, InMemoryAuditLog, InMemorySessionStore, TracingAuditLog};
