/// Execute an aggregate command deterministically (no IO, no async).
///
/// The canonical lifecycle:
///
/// 1. **Decide**: `aggregate.handle(command)` produces events (pure, no mutation)
/// 2. **Evolve**: each event is applied via `aggregate.apply(event)`
///
/// If `handle` rejects the command the aggregate is left untouched.
pub fn execute<A>(
    aggregate: &mut A,
    command: &A::Command,
) -> Result<Vec<A::Event>, A::Error>
where
    A: bastion_core::Aggregate,
{
    let events = A::handle(aggregate, command)?;
    for ev in &events {
        A::apply(aggregate, ev);
    }
    Ok(events)
}
