use bastion_infra::{DispatchError, EngineConfig, InMemoryLedgerService};

/// Services shared by every handler.
pub type AppServices = InMemoryLedgerService;

pub fn build_services(config: &EngineConfig) -> Result<AppServices, DispatchError> {
    let services = InMemoryLedgerService::in_memory(config)?;
    spawn_activity_log(&services);
    Ok(services)
}

/// Background subscriber: bus -> activity log.
///
/// Ends when the service (and with it the bus) is dropped.
fn spawn_activity_log(services: &AppServices) {
    let sub = services.subscribe();
    tokio::task::spawn_blocking(move || {
        while let Ok(env) = sub.recv() {
            tracing::debug!(
                account_id = %env.account_id(),
                event_type = env.event_type(),
                sequence_number = env.sequence_number(),
                occurred_at = %env.occurred_at(),
                "ledger event"
            );
        }
    });
}
