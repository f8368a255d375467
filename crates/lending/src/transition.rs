use bastion_core::DomainResult;

use crate::account::Account;
use crate::command::LedgerCommand;
use crate::event::LedgerEvent;

/// Pure state transition: `(state, command) -> (next state, outcome)`.
///
/// The input is never modified. On rejection the returned state equals the
/// input exactly.
pub fn apply(state: &Account, command: &LedgerCommand) -> (Account, DomainResult<Vec<LedgerEvent>>) {
    let mut next = state.clone();
    let outcome = bastion_events::execute(&mut next, command);
    (next, outcome)
}
