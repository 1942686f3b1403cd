//! In-memory repository implementations.

mod audit;
mod session;

pub use audit::{AuditLogFilter, InMemoryAuditLog, TracingAuditLog};
pub use session::InMemorySessionStore;
