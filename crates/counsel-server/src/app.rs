//! Wiring of the engine from server configuration.

use std::sync::Arc;
use std::time::Duration;

use counsel_auth::AttorneySessionService;
use counsel_core::clock::Clock;
use counsel_core::drafting::SectionDrafter;
use counsel_core::error::CounselResult;
use counsel_docgen::{DocumentGenerator, DraftingPolicy, SectionGenerator};
use counsel_store::{InMemorySessionStore, TracingAuditLog};
use counsel_template::{StaticTemplateRegistry, load_catalog};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::warn;

use crate::config::ServerConfig;

/// Audit entries leave the process through the log pipeline; nothing is
/// retained in memory.
pub type AuditLog = TracingAuditLog;

pub type Generator<C, D> =
    DocumentGenerator<InMemorySessionStore, AuditLog, C, StaticTemplateRegistry, D>;

/// Load the template catalog and assemble the session service and
/// document generator.
pub fn build_generator<C, D>(
    config: &ServerConfig,
    clock: C,
    drafter: D,
) -> CounselResult<Generator<C, D>>
where
    C: Clock,
    D: SectionDrafter + 'static,
{
    let registry = load_catalog(&config.catalog)?;
    let sessions = AttorneySessionService::new(
        InMemorySessionStore::new(),
        TracingAuditLog,
        clock,
        config.auth.clone(),
    )?;
    Ok(DocumentGenerator::new(
        Arc::new(sessions),
        Arc::new(registry),
        SectionGenerator::new(drafter, DraftingPolicy::from(&config.drafting)),
    ))
}

/// Periodically drop expired and terminated sessions.
pub fn spawn_sweeper<C, D>(generator: Arc<Generator<C, D>>, every: Duration) -> JoinHandle<()>
where
    C: Clock + 'static,
    D: SectionDrafter + 'static,
{
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            if let Err(e) = generator.sessions().sweep_expired().await {
                warn!(error = %e, "Session sweep failed");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_audit_sink_holds_no_entries() {
        assert_eq!(std::mem::size_of::<AuditLog>(), 0);
    }
}
